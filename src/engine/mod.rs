//! Waterfall engine for single and batch distribution calculations

mod distribution;
mod engine;
mod state;

pub use distribution::{
    GpAllocation, InvestorAllocation, TierAllocation, TierDistribution, WaterfallDistribution,
};
pub use engine::{calculate_waterfall, WaterfallEngine};
