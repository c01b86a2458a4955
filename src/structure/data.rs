//! Tier and structure data types with eager validation
//!
//! A `WaterfallStructure` is an immutable, named template: constructed once
//! as configuration and read-only during calculation. Tier behavior is
//! dispatched on `TierKind`, a closed set carried as enum payloads so that
//! a tier can never reference a rate that does not apply to its kind.

use crate::error::WaterfallError;
use serde::{Deserialize, Serialize};

/// The kind of a waterfall tier, with the parameters that kind requires.
///
/// Serialized with an internal `type` tag (`RETURN_OF_CAPITAL`,
/// `PREFERRED_RETURN`, `CATCH_UP`, `CARRIED_INTEREST`) so JSON structure
/// documents read the same as the hosting API's wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TierKind {
    /// Return contributed capital to LPs, pro-rata by unreturned balance.
    ReturnOfCapital,
    /// Pay LPs their preferred return shortfall at a flat annual hurdle
    /// applied to contributed capital (not time-weighted; see engine docs).
    PreferredReturn { hurdle_rate: f64 },
    /// Let the GP catch up to a target cumulative share of profits.
    CatchUp { catch_up_to: f64 },
    /// Split all remaining cash between LPs and GP.
    CarriedInterest { lp_split: f64, gp_split: f64 },
}

impl TierKind {
    /// Human-readable label used in logs and CLI summaries.
    pub fn label(&self) -> &'static str {
        match self {
            TierKind::ReturnOfCapital => "Return of Capital",
            TierKind::PreferredReturn { .. } => "Preferred Return",
            TierKind::CatchUp { .. } => "GP Catch-Up",
            TierKind::CarriedInterest { .. } => "Carried Interest",
        }
    }
}

/// One ordered step in the distribution sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallTier {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: TierKind,
    /// Tiers are processed in ascending order; unique within a structure.
    pub order: u32,
}

/// Named, ordered collection of tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallStructure {
    pub id: String,
    pub name: String,
    pub tiers: Vec<WaterfallTier>,
}

impl WaterfallStructure {
    /// Validate the structure: non-empty, unique tier orders, all rates and
    /// splits inside their valid ranges, carry splits summing to 100.
    ///
    /// `catch_up_to` must be strictly below 100 because the catch-up target
    /// divides by `100 - catch_up_to`.
    pub fn validate(&self) -> Result<(), WaterfallError> {
        if self.tiers.is_empty() {
            return Err(WaterfallError::EmptyStructure {
                structure: self.id.clone(),
            });
        }

        let mut seen_orders: Vec<u32> = Vec::with_capacity(self.tiers.len());
        for tier in &self.tiers {
            if seen_orders.contains(&tier.order) {
                return Err(WaterfallError::DuplicateTierOrder {
                    structure: self.id.clone(),
                    order: tier.order,
                });
            }
            seen_orders.push(tier.order);
            tier.validate()?;
        }

        Ok(())
    }

    /// Return the tiers sorted ascending by `order` (stable; caller-supplied
    /// order is not trusted to already be sorted).
    pub fn sorted_tiers(&self) -> Vec<WaterfallTier> {
        let mut tiers = self.tiers.clone();
        tiers.sort_by_key(|t| t.order);
        tiers
    }
}

impl WaterfallTier {
    fn validate(&self) -> Result<(), WaterfallError> {
        match &self.kind {
            TierKind::ReturnOfCapital => Ok(()),
            TierKind::PreferredReturn { hurdle_rate } => {
                check_range(&self.id, "hurdle_rate", *hurdle_rate, 0.0, 100.0)
            }
            TierKind::CatchUp { catch_up_to } => {
                // Strictly below 100: the target formula divides by 100 - c.
                if !(*catch_up_to >= 0.0 && *catch_up_to < 100.0) {
                    return Err(WaterfallError::RateOutOfRange {
                        tier: self.id.clone(),
                        field: "catch_up_to",
                        value: *catch_up_to,
                        min: 0.0,
                        max: 100.0,
                    });
                }
                Ok(())
            }
            TierKind::CarriedInterest { lp_split, gp_split } => {
                check_range(&self.id, "lp_split", *lp_split, 0.0, 100.0)?;
                check_range(&self.id, "gp_split", *gp_split, 0.0, 100.0)?;
                let sum = lp_split + gp_split;
                if (sum - 100.0).abs() > 1e-9 {
                    return Err(WaterfallError::SplitMismatch {
                        tier: self.id.clone(),
                        sum,
                    });
                }
                Ok(())
            }
        }
    }
}

fn check_range(
    tier: &str,
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), WaterfallError> {
    // The negated comparison also rejects NaN.
    if !(value >= min && value <= max) {
        return Err(WaterfallError::RateOutOfRange {
            tier: tier.to_string(),
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
