//! Waterfall Engine - Multi-tier distribution engine for fund waterfalls
//!
//! This library provides:
//! - Ordered-tier waterfall calculation (return of capital, preferred return,
//!   GP catch-up, carried interest)
//! - Per-investor and GP allocation breakdowns with conservation guarantees
//! - Built-in structure templates (standard and American waterfalls)
//! - Capital account loading from CSV ledger exports
//! - Batch scenario previews across candidate distribution amounts

pub mod account;
pub mod engine;
pub mod error;
pub mod format;
pub mod structure;

// Re-export commonly used types
pub use account::InvestorCapitalAccount;
pub use engine::{calculate_waterfall, WaterfallDistribution, WaterfallEngine};
pub use error::WaterfallError;
pub use structure::{TierKind, WaterfallStructure, WaterfallTier};
