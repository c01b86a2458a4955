//! Waterfall structure definitions and built-in templates

mod data;
pub mod templates;

pub use data::{TierKind, WaterfallStructure, WaterfallTier};
pub use templates::{american_waterfall, standard_waterfall, structure_by_name};
