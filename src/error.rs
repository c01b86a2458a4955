//! Error types for waterfall validation and calculation
//!
//! All public operations validate eagerly and fail fast: a distribution
//! calculation drives real money movement, so malformed input is rejected
//! up front rather than degrading to a silently-wrong zero allocation.

use thiserror::Error;

/// Errors produced by structure validation, account validation, or the
/// waterfall calculation itself.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaterfallError {
    /// A waterfall structure must contain at least one tier.
    #[error("waterfall structure '{structure}' has no tiers")]
    EmptyStructure { structure: String },

    /// Tier orders must be unique within a structure; processing order is
    /// otherwise ambiguous.
    #[error("duplicate tier order {order} in structure '{structure}'")]
    DuplicateTierOrder { structure: String, order: u32 },

    /// A tier rate or split percentage falls outside its valid range.
    #[error("tier '{tier}': {field} = {value} is outside [{min}, {max}]")]
    RateOutOfRange {
        tier: String,
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Carried-interest LP and GP splits must sum to exactly 100%.
    #[error("tier '{tier}': lp_split + gp_split = {sum}, expected 100")]
    SplitMismatch { tier: String, sum: f64 },

    /// Distribution amounts must be non-negative and finite.
    #[error("distribution amount {amount} is negative or not finite")]
    InvalidAmount { amount: f64 },

    /// A capital account carries an impossible balance.
    #[error("capital account '{investor_id}': {reason}")]
    InvalidAccount {
        investor_id: String,
        reason: AccountErrorReason,
    },
}

/// Why a capital account failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccountErrorReason {
    #[error("capital_contributed is negative")]
    NegativeContributed,
    #[error("capital_returned is negative")]
    NegativeReturned,
    #[error("preferred_return_paid is negative")]
    NegativePreferredPaid,
    #[error("capital_returned exceeds capital_contributed")]
    ReturnedExceedsContributed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WaterfallError::DuplicateTierOrder {
            structure: "standard".to_string(),
            order: 2,
        };
        assert_eq!(
            err.to_string(),
            "duplicate tier order 2 in structure 'standard'"
        );

        let err = WaterfallError::InvalidAccount {
            investor_id: "inv-1".to_string(),
            reason: AccountErrorReason::ReturnedExceedsContributed,
        };
        assert!(err.to_string().contains("inv-1"));
        assert!(err.to_string().contains("exceeds"));
    }
}
