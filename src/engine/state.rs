//! Running accumulator threaded through the tier fold
//!
//! The catch-up tier needs the cumulative profit distributed to LPs by
//! preceding tiers and the GP's cumulative take so far. Both are carried
//! here as explicit running sums, updated after every tier regardless of
//! its position, so no tier rule depends on where another tier sits in
//! the sequence.

use crate::structure::TierKind;

/// Per-run allocation state, advanced once per tier.
#[derive(Debug, Clone)]
pub(crate) struct AllocationState {
    /// Cash not yet absorbed by any tier.
    pub remaining: f64,
    /// LP profit distributed so far: LP amounts from all non-ROC tiers.
    /// Return of capital is excluded because it is not profit.
    pub lp_profit_so_far: f64,
    /// GP's cumulative take across all tiers so far.
    pub gp_so_far: f64,
}

impl AllocationState {
    pub fn new(distribution_amount: f64) -> Self {
        Self {
            remaining: distribution_amount,
            lp_profit_so_far: 0.0,
            gp_so_far: 0.0,
        }
    }

    /// True once no cash is left for subsequent tiers.
    pub fn exhausted(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Advance past one tier that absorbed `tier_amount`, split into
    /// `lp_amount` + `gp_amount`.
    pub fn advance(&mut self, kind: &TierKind, tier_amount: f64, lp_amount: f64, gp_amount: f64) {
        self.remaining -= tier_amount;
        self.gp_so_far += gp_amount;
        if !matches!(kind, TierKind::ReturnOfCapital) {
            self.lp_profit_so_far += lp_amount;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_roc_excluded_from_profit() {
        let mut state = AllocationState::new(100_000.0);
        state.advance(&TierKind::ReturnOfCapital, 60_000.0, 60_000.0, 0.0);
        assert_relative_eq!(state.remaining, 40_000.0);
        assert_relative_eq!(state.lp_profit_so_far, 0.0);
        assert_relative_eq!(state.gp_so_far, 0.0);
    }

    #[test]
    fn test_preferred_counts_as_lp_profit() {
        let mut state = AllocationState::new(100_000.0);
        state.advance(
            &TierKind::PreferredReturn { hurdle_rate: 8.0 },
            30_000.0,
            30_000.0,
            0.0,
        );
        assert_relative_eq!(state.lp_profit_so_far, 30_000.0);
        assert_relative_eq!(state.remaining, 70_000.0);
    }

    #[test]
    fn test_gp_take_accumulates() {
        let mut state = AllocationState::new(50_000.0);
        state.advance(&TierKind::CatchUp { catch_up_to: 20.0 }, 10_000.0, 0.0, 10_000.0);
        state.advance(
            &TierKind::CarriedInterest { lp_split: 80.0, gp_split: 20.0 },
            40_000.0,
            32_000.0,
            8_000.0,
        );
        assert_relative_eq!(state.gp_so_far, 18_000.0);
        assert_relative_eq!(state.lp_profit_so_far, 32_000.0);
        assert!(state.exhausted());
    }
}
