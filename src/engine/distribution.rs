//! Output records for one computed distribution event
//!
//! A `WaterfallDistribution` is the full allocation picture for a single
//! distribution: how much each tier absorbed, in order, and how the absorbed
//! cash was routed to each investor and to the GP. Conservation holds for
//! every valid run: the investor totals plus the GP total equal the sum of
//! tier amounts, which never exceeds the distributable amount.

use serde::{Deserialize, Serialize};

/// Amount routed through one tier to one recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierAllocation {
    pub tier_id: String,
    pub amount: f64,
}

/// What one tier absorbed and how it split, in processing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierDistribution {
    pub tier_id: String,
    pub tier_name: String,
    pub order: u32,
    /// Total cash this tier absorbed.
    pub amount_distributed: f64,
    /// Portion routed to LPs.
    pub lp_amount: f64,
    /// Portion routed to the GP.
    pub gp_amount: f64,
    /// Cash left for subsequent tiers.
    pub remaining_after: f64,
}

/// Per-investor allocation with tier-by-tier breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorAllocation {
    pub investor_id: String,
    pub investor_name: String,
    /// Share of total contributed capital, in percent.
    pub ownership_percent: f64,
    pub total_allocation: f64,
    pub tier_allocations: Vec<TierAllocation>,
}

/// GP allocation with tier-by-tier breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpAllocation {
    pub total_amount: f64,
    pub tier_allocations: Vec<TierAllocation>,
}

/// The full computed allocation for one distribution event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallDistribution {
    /// Input amount echoed back.
    pub total_distributable: f64,
    /// One entry per tier, ascending by order, regardless of exhaustion.
    pub tier_distributions: Vec<TierDistribution>,
    /// One entry per input account, in input order.
    pub investor_allocations: Vec<InvestorAllocation>,
    pub gp_allocation: GpAllocation,
}

impl WaterfallDistribution {
    /// Total cash absorbed across all tiers.
    pub fn total_distributed(&self) -> f64 {
        self.tier_distributions
            .iter()
            .map(|t| t.amount_distributed)
            .sum()
    }

    /// Total cash routed to investors.
    pub fn total_to_investors(&self) -> f64 {
        self.investor_allocations
            .iter()
            .map(|a| a.total_allocation)
            .sum()
    }

    /// Cash not absorbed by any tier.
    pub fn undistributed(&self) -> f64 {
        self.total_distributable - self.total_distributed()
    }

    /// Look up one investor's allocation by id.
    pub fn allocation_for(&self, investor_id: &str) -> Option<&InvestorAllocation> {
        self.investor_allocations
            .iter()
            .find(|a| a.investor_id == investor_id)
    }
}
