//! Waterfall calculation over sorted tiers
//!
//! Pure, synchronous, side-effect-free: the engine never mutates its inputs
//! and allocates fresh accumulators per call, so concurrent invocations for
//! different distributions need no coordination. Computation is
//! O(tiers x investors).
//!
//! The preferred-return tier applies a flat hurdle against total contributed
//! capital, not compounded or prorated over the holding period. The
//! `fund_start_date` and `distribution_date` parameters are accepted for
//! interface stability (time-weighted hurdle variants) but do not currently
//! affect the result.

use crate::account::InvestorCapitalAccount;
use crate::error::WaterfallError;
use crate::structure::{TierKind, WaterfallStructure, WaterfallTier};
use chrono::NaiveDate;
use rayon::prelude::*;

use super::distribution::{
    GpAllocation, InvestorAllocation, TierAllocation, TierDistribution, WaterfallDistribution,
};
use super::state::AllocationState;

/// Computes waterfall distributions against a validated structure.
///
/// Validation and tier sorting happen once at construction; `distribute`
/// can then be called for any number of distribution events.
pub struct WaterfallEngine {
    structure: WaterfallStructure,
    /// Tiers sorted ascending by order.
    tiers: Vec<WaterfallTier>,
}

impl WaterfallEngine {
    /// Validate the structure and prepare it for calculation.
    pub fn new(structure: WaterfallStructure) -> Result<Self, WaterfallError> {
        structure.validate()?;
        let tiers = structure.sorted_tiers();
        Ok(Self { structure, tiers })
    }

    /// The validated structure this engine was built from.
    pub fn structure(&self) -> &WaterfallStructure {
        &self.structure
    }

    /// Compute the allocation of `distribution_amount` across the structure's
    /// tiers for the given capital accounts.
    ///
    /// Zero amounts and empty account lists are valid and produce all-zero
    /// results. The output lists every tier exactly once, in order, even
    /// after cash is exhausted.
    pub fn distribute(
        &self,
        distribution_amount: f64,
        accounts: &[InvestorCapitalAccount],
        fund_start_date: NaiveDate,
        distribution_date: NaiveDate,
    ) -> Result<WaterfallDistribution, WaterfallError> {
        if !(distribution_amount >= 0.0 && distribution_amount.is_finite()) {
            return Err(WaterfallError::InvalidAmount {
                amount: distribution_amount,
            });
        }
        for account in accounts {
            account.validate()?;
        }

        log::debug!(
            "distributing {:.2} through '{}' ({} tiers, {} accounts, fund inception {}, event date {})",
            distribution_amount,
            self.structure.id,
            self.tiers.len(),
            accounts.len(),
            fund_start_date,
            distribution_date,
        );

        // Ownership percentages derive from contributed capital and do not
        // change during a run, so they are computed once up front.
        let total_contributed: f64 = accounts.iter().map(|a| a.capital_contributed).sum();
        let ownership: Vec<f64> = accounts
            .iter()
            .map(|a| {
                if total_contributed > 0.0 {
                    a.capital_contributed / total_contributed * 100.0
                } else {
                    0.0
                }
            })
            .collect();

        let mut state = AllocationState::new(distribution_amount);
        let mut tier_distributions = Vec::with_capacity(self.tiers.len());
        let mut investor_totals = vec![0.0f64; accounts.len()];
        let mut investor_tiers: Vec<Vec<TierAllocation>> =
            vec![Vec::with_capacity(self.tiers.len()); accounts.len()];
        let mut gp_tiers: Vec<TierAllocation> = Vec::with_capacity(self.tiers.len());
        let mut gp_total = 0.0f64;

        for tier in &self.tiers {
            let (tier_amount, lp_amount, gp_amount, investor_shares) = if state.exhausted() {
                // Tiers after exhaustion still appear in the output, zeroed.
                (0.0, 0.0, 0.0, vec![0.0; accounts.len()])
            } else {
                apply_tier(tier, &state, accounts, &ownership, total_contributed)
            };

            for (idx, share) in investor_shares.iter().enumerate() {
                investor_totals[idx] += share;
                investor_tiers[idx].push(TierAllocation {
                    tier_id: tier.id.clone(),
                    amount: *share,
                });
            }
            gp_total += gp_amount;
            gp_tiers.push(TierAllocation {
                tier_id: tier.id.clone(),
                amount: gp_amount,
            });

            state.advance(&tier.kind, tier_amount, lp_amount, gp_amount);
            log::debug!(
                "tier '{}' ({}) absorbed {:.2} (lp {:.2}, gp {:.2}), {:.2} remaining",
                tier.id,
                tier.kind.label(),
                tier_amount,
                lp_amount,
                gp_amount,
                state.remaining,
            );

            tier_distributions.push(TierDistribution {
                tier_id: tier.id.clone(),
                tier_name: tier.name.clone(),
                order: tier.order,
                amount_distributed: tier_amount,
                lp_amount,
                gp_amount,
                remaining_after: state.remaining,
            });
        }

        let investor_allocations = accounts
            .iter()
            .enumerate()
            .map(|(idx, account)| InvestorAllocation {
                investor_id: account.investor_id.clone(),
                investor_name: account.investor_name.clone(),
                ownership_percent: ownership[idx],
                total_allocation: investor_totals[idx],
                tier_allocations: std::mem::take(&mut investor_tiers[idx]),
            })
            .collect();

        Ok(WaterfallDistribution {
            total_distributable: distribution_amount,
            tier_distributions,
            investor_allocations,
            gp_allocation: GpAllocation {
                total_amount: gp_total,
                tier_allocations: gp_tiers,
            },
        })
    }

    /// Preview several candidate distribution amounts in parallel.
    pub fn preview_many(
        &self,
        amounts: &[f64],
        accounts: &[InvestorCapitalAccount],
        fund_start_date: NaiveDate,
        distribution_date: NaiveDate,
    ) -> Result<Vec<WaterfallDistribution>, WaterfallError> {
        amounts
            .par_iter()
            .map(|&amount| self.distribute(amount, accounts, fund_start_date, distribution_date))
            .collect()
    }
}

/// Convenience wrapper: validate the structure and compute one distribution.
pub fn calculate_waterfall(
    structure: &WaterfallStructure,
    distribution_amount: f64,
    accounts: &[InvestorCapitalAccount],
    fund_start_date: NaiveDate,
    distribution_date: NaiveDate,
) -> Result<WaterfallDistribution, WaterfallError> {
    let engine = WaterfallEngine::new(structure.clone())?;
    engine.distribute(distribution_amount, accounts, fund_start_date, distribution_date)
}

/// Compute one tier's absorption and split.
///
/// Returns (tier_amount, lp_amount, gp_amount, per-investor shares).
fn apply_tier(
    tier: &WaterfallTier,
    state: &AllocationState,
    accounts: &[InvestorCapitalAccount],
    ownership: &[f64],
    total_contributed: f64,
) -> (f64, f64, f64, Vec<f64>) {
    match &tier.kind {
        TierKind::ReturnOfCapital => {
            let weights: Vec<f64> = accounts.iter().map(|a| a.unreturned_capital()).collect();
            let capacity: f64 = weights.iter().sum();
            let tier_amount = state.remaining.min(capacity);
            let shares = pro_rata(&weights, capacity, tier_amount);
            (tier_amount, tier_amount, 0.0, shares)
        }
        TierKind::PreferredReturn { hurdle_rate } => {
            let weights: Vec<f64> = accounts
                .iter()
                .map(|a| a.unpaid_preferred(*hurdle_rate))
                .collect();
            let capacity: f64 = weights.iter().sum();
            let tier_amount = state.remaining.min(capacity);
            let shares = pro_rata(&weights, capacity, tier_amount);
            (tier_amount, tier_amount, 0.0, shares)
        }
        TierKind::CatchUp { catch_up_to } => {
            // Target GP take such that GP holds `catch_up_to` percent of the
            // profit distributed so far (LP profit + GP's own receipts).
            let profit_base = state.lp_profit_so_far + state.gp_so_far;
            let target_gp = profit_base * (catch_up_to / (100.0 - catch_up_to));
            let tier_amount = state.remaining.min((target_gp - state.gp_so_far).max(0.0));
            (tier_amount, 0.0, tier_amount, vec![0.0; accounts.len()])
        }
        TierKind::CarriedInterest { lp_split, .. } => {
            // With no contributed capital the LP share has no recipients, so
            // the tier resolves to zero rather than absorbing cash it cannot
            // route (conservation).
            if total_contributed <= 0.0 {
                return (0.0, 0.0, 0.0, vec![0.0; accounts.len()]);
            }
            let tier_amount = state.remaining;
            let lp_amount = tier_amount * (lp_split / 100.0);
            let gp_amount = tier_amount - lp_amount;
            let shares = pro_rata(ownership, 100.0, lp_amount);
            (tier_amount, lp_amount, gp_amount, shares)
        }
    }
}

/// Split `amount` across recipients proportionally to `weights`.
/// Zero aggregate weight or zero amount yields all-zero shares.
fn pro_rata(weights: &[f64], total_weight: f64, amount: f64) -> Vec<f64> {
    if total_weight <= 0.0 || amount <= 0.0 {
        return vec![0.0; weights.len()];
    }
    weights.iter().map(|w| w / total_weight * amount).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{american_waterfall, standard_waterfall};
    use approx::assert_relative_eq;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn inception() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
    }

    fn account(id: &str, contributed: f64, returned: f64, pref_paid: f64) -> InvestorCapitalAccount {
        InvestorCapitalAccount {
            investor_id: id.to_string(),
            investor_name: format!("Investor {}", id),
            capital_contributed: contributed,
            capital_returned: returned,
            preferred_return_accrued: 0.0,
            preferred_return_paid: pref_paid,
            distributions_received: 0.0,
        }
    }

    fn roc_only_structure() -> WaterfallStructure {
        WaterfallStructure {
            id: "roc-only".to_string(),
            name: "ROC Only".to_string(),
            tiers: vec![WaterfallTier {
                id: "tier-roc".to_string(),
                name: "Return of Capital".to_string(),
                kind: TierKind::ReturnOfCapital,
                order: 1,
            }],
        }
    }

    fn assert_conservation(dist: &WaterfallDistribution) {
        let distributed = dist.total_distributed();
        assert!(distributed <= dist.total_distributable + 1e-6);
        assert_relative_eq!(
            dist.total_to_investors() + dist.gp_allocation.total_amount,
            distributed,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_scenario_a_roc_only_pro_rata() {
        // Two investors, $100k and $200k contributed, nothing returned;
        // a $150k distribution splits 1:2 and exhausts exactly.
        let accounts = vec![
            account("1", 100_000.0, 0.0, 0.0),
            account("2", 200_000.0, 0.0, 0.0),
        ];
        let dist =
            calculate_waterfall(&roc_only_structure(), 150_000.0, &accounts, inception(), date())
                .unwrap();

        assert_relative_eq!(
            dist.allocation_for("1").unwrap().total_allocation,
            50_000.0,
            epsilon = 1e-6
        );
        assert_relative_eq!(
            dist.allocation_for("2").unwrap().total_allocation,
            100_000.0,
            epsilon = 1e-6
        );
        assert_relative_eq!(dist.tier_distributions[0].remaining_after, 0.0, epsilon = 1e-6);
        assert_conservation(&dist);
    }

    #[test]
    fn test_scenario_b_full_standard_waterfall() {
        // Capital fully returned, no preferred paid: $100k flows as
        // $0 ROC, $80k preferred, $20k GP catch-up, $0 carry.
        let accounts = vec![account("1", 1_000_000.0, 1_000_000.0, 0.0)];
        let dist = calculate_waterfall(
            &standard_waterfall(),
            100_000.0,
            &accounts,
            inception(),
            date(),
        )
        .unwrap();

        let tiers = &dist.tier_distributions;
        assert_eq!(tiers.len(), 4);
        assert_relative_eq!(tiers[0].amount_distributed, 0.0, epsilon = 1e-6);
        assert_relative_eq!(tiers[1].amount_distributed, 80_000.0, epsilon = 1e-6);
        assert_relative_eq!(tiers[1].lp_amount, 80_000.0, epsilon = 1e-6);
        assert_relative_eq!(tiers[2].amount_distributed, 20_000.0, epsilon = 1e-6);
        assert_relative_eq!(tiers[2].gp_amount, 20_000.0, epsilon = 1e-6);
        assert_relative_eq!(tiers[3].amount_distributed, 0.0, epsilon = 1e-6);

        assert_relative_eq!(
            dist.allocation_for("1").unwrap().total_allocation,
            80_000.0,
            epsilon = 1e-6
        );
        assert_relative_eq!(dist.gp_allocation.total_amount, 20_000.0, epsilon = 1e-6);
        assert_conservation(&dist);
    }

    #[test]
    fn test_scenario_c_empty_accounts() {
        // No investors: every tier resolves to zero without NaN.
        for structure in [standard_waterfall(), american_waterfall()] {
            let dist =
                calculate_waterfall(&structure, 500_000.0, &[], inception(), date()).unwrap();
            for tier in &dist.tier_distributions {
                assert_relative_eq!(tier.amount_distributed, 0.0);
                assert!(tier.amount_distributed.is_finite());
            }
            assert_relative_eq!(dist.gp_allocation.total_amount, 0.0);
            assert!(dist.investor_allocations.is_empty());
            assert_conservation(&dist);
        }
    }

    #[test]
    fn test_zero_amount_all_zero() {
        let accounts = vec![account("1", 500_000.0, 0.0, 0.0)];
        let dist =
            calculate_waterfall(&standard_waterfall(), 0.0, &accounts, inception(), date())
                .unwrap();

        assert_eq!(dist.tier_distributions.len(), 4);
        for tier in &dist.tier_distributions {
            assert_relative_eq!(tier.amount_distributed, 0.0);
        }
        assert_relative_eq!(dist.allocation_for("1").unwrap().total_allocation, 0.0);
        assert_relative_eq!(dist.gp_allocation.total_amount, 0.0);
    }

    #[test]
    fn test_full_roc_absorption() {
        // Amount covers all unreturned capital: tier 1 absorbs exactly it.
        let accounts = vec![
            account("1", 300_000.0, 100_000.0, 0.0),
            account("2", 700_000.0, 0.0, 0.0),
        ];
        let unreturned = 200_000.0 + 700_000.0;
        let dist = calculate_waterfall(
            &standard_waterfall(),
            2_000_000.0,
            &accounts,
            inception(),
            date(),
        )
        .unwrap();

        assert_relative_eq!(
            dist.tier_distributions[0].amount_distributed,
            unreturned,
            epsilon = 1e-6
        );
        assert_conservation(&dist);
    }

    #[test]
    fn test_roc_proportionality_on_partial_fill() {
        // $90k against $200k + $700k unreturned: shares track unreturned
        // capital ratios, not contributed ratios.
        let accounts = vec![
            account("1", 300_000.0, 100_000.0, 0.0),
            account("2", 700_000.0, 0.0, 0.0),
        ];
        let dist =
            calculate_waterfall(&roc_only_structure(), 90_000.0, &accounts, inception(), date())
                .unwrap();

        let a1 = dist.allocation_for("1").unwrap().total_allocation;
        let a2 = dist.allocation_for("2").unwrap().total_allocation;
        assert_relative_eq!(a1 / 90_000.0, 200_000.0 / 900_000.0, epsilon = 1e-9);
        assert_relative_eq!(a2 / 90_000.0, 700_000.0 / 900_000.0, epsilon = 1e-9);
        assert_conservation(&dist);
    }

    #[test]
    fn test_preferred_proportional_to_unpaid() {
        // Investor 1 already received half their preferred return, so a
        // partial preferred tier skews toward investor 2.
        let accounts = vec![
            account("1", 1_000_000.0, 1_000_000.0, 40_000.0), // unpaid 40k
            account("2", 1_000_000.0, 1_000_000.0, 0.0),      // unpaid 80k
        ];
        let dist = calculate_waterfall(
            &standard_waterfall(),
            60_000.0,
            &accounts,
            inception(),
            date(),
        )
        .unwrap();

        let pref = &dist.tier_distributions[1];
        assert_relative_eq!(pref.amount_distributed, 60_000.0, epsilon = 1e-6);
        let a1 = dist.allocation_for("1").unwrap().total_allocation;
        let a2 = dist.allocation_for("2").unwrap().total_allocation;
        assert_relative_eq!(a1, 20_000.0, epsilon = 1e-6); // 40/120 of 60k
        assert_relative_eq!(a2, 40_000.0, epsilon = 1e-6); // 80/120 of 60k
        assert_conservation(&dist);
    }

    #[test]
    fn test_catch_up_partial_when_cash_runs_out() {
        // Preferred absorbs 80k of 90k; catch-up target is 20k but only
        // 10k remains.
        let accounts = vec![account("1", 1_000_000.0, 1_000_000.0, 0.0)];
        let dist = calculate_waterfall(
            &standard_waterfall(),
            90_000.0,
            &accounts,
            inception(),
            date(),
        )
        .unwrap();

        assert_relative_eq!(
            dist.tier_distributions[2].amount_distributed,
            10_000.0,
            epsilon = 1e-6
        );
        assert_relative_eq!(dist.gp_allocation.total_amount, 10_000.0, epsilon = 1e-6);
        assert_relative_eq!(dist.tier_distributions[3].amount_distributed, 0.0);
        assert_conservation(&dist);
    }

    #[test]
    fn test_carried_interest_split_exact_and_by_ownership() {
        // Capital already returned on both accounts: $1M flows as $0 ROC,
        // $40k preferred, $10k catch-up, $950k through carry at 80/20.
        let accounts = vec![
            account("1", 300_000.0, 300_000.0, 0.0),
            account("2", 200_000.0, 200_000.0, 0.0),
        ];
        let dist = calculate_waterfall(
            &standard_waterfall(),
            1_000_000.0,
            &accounts,
            inception(),
            date(),
        )
        .unwrap();

        // pref = 8% of 500k = 40k; catch-up = 40k * 20/80 = 10k
        assert_relative_eq!(dist.tier_distributions[1].amount_distributed, 40_000.0, epsilon = 1e-6);
        assert_relative_eq!(dist.tier_distributions[2].amount_distributed, 10_000.0, epsilon = 1e-6);

        let carry = &dist.tier_distributions[3];
        assert_relative_eq!(carry.amount_distributed, 950_000.0, epsilon = 1e-6);
        // Split exactness: lp + gp reassembles the tier amount exactly.
        assert_eq!(carry.lp_amount + carry.gp_amount, carry.amount_distributed);
        assert_relative_eq!(carry.lp_amount, 760_000.0, epsilon = 1e-6);
        assert_relative_eq!(carry.gp_amount, 190_000.0, epsilon = 1e-6);

        // Carry LP portion follows ownership (60/40), not unreturned capital.
        let a1 = dist.allocation_for("1").unwrap();
        let a2 = dist.allocation_for("2").unwrap();
        assert_relative_eq!(a1.ownership_percent, 60.0, epsilon = 1e-9);
        assert_relative_eq!(a2.ownership_percent, 40.0, epsilon = 1e-9);
        let carry_1 = a1.tier_allocations[3].amount;
        let carry_2 = a2.tier_allocations[3].amount;
        assert_relative_eq!(carry_1, 760_000.0 * 0.6, epsilon = 1e-6);
        assert_relative_eq!(carry_2, 760_000.0 * 0.4, epsilon = 1e-6);
        assert_conservation(&dist);
    }

    #[test]
    fn test_tier_completeness_and_order() {
        let accounts = vec![account("1", 100_000.0, 0.0, 0.0)];
        // 50k exhausts inside tier 1; tiers 2-4 still appear, zeroed.
        let dist = calculate_waterfall(
            &standard_waterfall(),
            50_000.0,
            &accounts,
            inception(),
            date(),
        )
        .unwrap();

        assert_eq!(dist.tier_distributions.len(), 4);
        let orders: Vec<u32> = dist.tier_distributions.iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
        for tier in &dist.tier_distributions[1..] {
            assert_relative_eq!(tier.amount_distributed, 0.0);
            assert_relative_eq!(tier.remaining_after, 0.0);
        }
        // Per-investor breakdown also carries one entry per tier.
        assert_eq!(
            dist.allocation_for("1").unwrap().tier_allocations.len(),
            4
        );
    }

    #[test]
    fn test_unsorted_tiers_are_sorted_before_processing() {
        let mut structure = standard_waterfall();
        structure.tiers.reverse();
        let accounts = vec![account("1", 1_000_000.0, 1_000_000.0, 0.0)];
        let dist =
            calculate_waterfall(&structure, 100_000.0, &accounts, inception(), date()).unwrap();

        // Same as scenario B despite reversed input order.
        assert_eq!(dist.tier_distributions[0].tier_id, "tier-roc");
        assert_relative_eq!(
            dist.tier_distributions[1].amount_distributed,
            80_000.0,
            epsilon = 1e-6
        );
        assert_relative_eq!(dist.gp_allocation.total_amount, 20_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_american_waterfall_skips_catch_up() {
        // Same book as scenario B but American style: no catch-up tier, the
        // $20k after preferred flows through the 80/20 carry.
        let accounts = vec![account("1", 1_000_000.0, 1_000_000.0, 0.0)];
        let dist = calculate_waterfall(
            &american_waterfall(),
            100_000.0,
            &accounts,
            inception(),
            date(),
        )
        .unwrap();

        assert_eq!(dist.tier_distributions.len(), 3);
        let carry = &dist.tier_distributions[2];
        assert_relative_eq!(carry.amount_distributed, 20_000.0, epsilon = 1e-6);
        assert_relative_eq!(carry.lp_amount, 16_000.0, epsilon = 1e-6);
        assert_relative_eq!(carry.gp_amount, 4_000.0, epsilon = 1e-6);
        assert_conservation(&dist);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result = calculate_waterfall(
            &standard_waterfall(),
            -1.0,
            &[],
            inception(),
            date(),
        );
        assert_eq!(result, Err(WaterfallError::InvalidAmount { amount: -1.0 }));
    }

    #[test]
    fn test_nan_amount_rejected() {
        let result =
            calculate_waterfall(&standard_waterfall(), f64::NAN, &[], inception(), date());
        assert!(matches!(result, Err(WaterfallError::InvalidAmount { .. })));
    }

    #[test]
    fn test_invalid_account_rejected() {
        let accounts = vec![account("bad", 100_000.0, 200_000.0, 0.0)];
        let result = calculate_waterfall(
            &standard_waterfall(),
            50_000.0,
            &accounts,
            inception(),
            date(),
        );
        assert!(matches!(
            result,
            Err(WaterfallError::InvalidAccount { .. })
        ));
    }

    #[test]
    fn test_inputs_not_mutated() {
        let accounts = vec![account("1", 100_000.0, 0.0, 0.0)];
        let before = accounts.clone();
        let _ = calculate_waterfall(
            &standard_waterfall(),
            250_000.0,
            &accounts,
            inception(),
            date(),
        )
        .unwrap();
        assert_eq!(accounts, before);
    }

    #[test]
    fn test_preview_many_matches_single_runs() {
        let accounts = vec![
            account("1", 400_000.0, 100_000.0, 0.0),
            account("2", 600_000.0, 0.0, 10_000.0),
        ];
        let engine = WaterfallEngine::new(standard_waterfall()).unwrap();
        let amounts = [0.0, 50_000.0, 500_000.0, 2_000_000.0];
        let batch = engine
            .preview_many(&amounts, &accounts, inception(), date())
            .unwrap();

        assert_eq!(batch.len(), amounts.len());
        for (amount, preview) in amounts.iter().zip(&batch) {
            let single = engine
                .distribute(*amount, &accounts, inception(), date())
                .unwrap();
            assert_eq!(*preview, single);
            assert_conservation(preview);
        }
    }

    #[test]
    fn test_preview_many_propagates_errors() {
        let engine = WaterfallEngine::new(standard_waterfall()).unwrap();
        let result = engine.preview_many(&[100.0, -5.0], &[], inception(), date());
        assert!(result.is_err());
    }
}
