//! Per-investor capital account state
//!
//! Accounts are supplied by the external fund ledger and consumed read-only
//! by the engine. The ledger mutations a computed distribution implies
//! (marking capital returned, preferred return paid) are the caller's
//! responsibility, applied exactly once per distribution event.

use crate::error::{AccountErrorReason, WaterfallError};
use serde::{Deserialize, Serialize};

/// Running capital state for one investor (LP).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorCapitalAccount {
    pub investor_id: String,
    pub investor_name: String,

    /// Cumulative capital paid in; basis for ownership percentage and the
    /// preferred-return calculation.
    pub capital_contributed: f64,

    /// Cumulative capital already returned via prior ROC distributions.
    #[serde(default)]
    pub capital_returned: f64,

    /// Informational accrual bucket; not read by the flat-rate calculation.
    #[serde(default)]
    pub preferred_return_accrued: f64,

    /// Preferred return already paid out in prior distributions.
    #[serde(default)]
    pub preferred_return_paid: f64,

    /// Informational cumulative total; never mutated by the engine.
    #[serde(default)]
    pub distributions_received: f64,
}

impl InvestorCapitalAccount {
    /// Capital contributed but not yet returned.
    pub fn unreturned_capital(&self) -> f64 {
        (self.capital_contributed - self.capital_returned).max(0.0)
    }

    /// Preferred return still owed at a flat annual hurdle rate (percent)
    /// applied to total contributed capital.
    pub fn unpaid_preferred(&self, hurdle_rate: f64) -> f64 {
        let entitled = self.capital_contributed * (hurdle_rate / 100.0);
        (entitled - self.preferred_return_paid).max(0.0)
    }

    /// Reject accounts with impossible balances before calculation.
    pub fn validate(&self) -> Result<(), WaterfallError> {
        let fail = |reason| {
            Err(WaterfallError::InvalidAccount {
                investor_id: self.investor_id.clone(),
                reason,
            })
        };
        if self.capital_contributed < 0.0 {
            return fail(AccountErrorReason::NegativeContributed);
        }
        if self.capital_returned < 0.0 {
            return fail(AccountErrorReason::NegativeReturned);
        }
        if self.preferred_return_paid < 0.0 {
            return fail(AccountErrorReason::NegativePreferredPaid);
        }
        if self.capital_returned > self.capital_contributed {
            return fail(AccountErrorReason::ReturnedExceedsContributed);
        }
        Ok(())
    }
}
