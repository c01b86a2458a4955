//! Built-in waterfall structure templates
//!
//! Two pre-built templates act as a small configuration registry:
//! - Standard 4-tier: ROC -> 8% preferred -> GP catch-up to 20% -> 80/20 split
//! - American 3-tier: ROC -> 8% preferred -> 80/20 split (no catch-up)

use super::{TierKind, WaterfallStructure, WaterfallTier};

/// Default annual hurdle rate for the preferred-return tier (8%)
pub const DEFAULT_HURDLE_RATE: f64 = 8.0;

/// Default GP carry percentage (20%)
pub const DEFAULT_CARRY_PCT: f64 = 20.0;

/// Standard 4-tier European-style waterfall:
/// return of capital, 8% preferred return, GP catch-up to 20%, 80/20 carry.
pub fn standard_waterfall() -> WaterfallStructure {
    WaterfallStructure {
        id: "standard-4-tier".to_string(),
        name: "Standard 4-Tier".to_string(),
        tiers: vec![
            WaterfallTier {
                id: "tier-roc".to_string(),
                name: "Return of Capital".to_string(),
                kind: TierKind::ReturnOfCapital,
                order: 1,
            },
            WaterfallTier {
                id: "tier-pref".to_string(),
                name: "Preferred Return".to_string(),
                kind: TierKind::PreferredReturn {
                    hurdle_rate: DEFAULT_HURDLE_RATE,
                },
                order: 2,
            },
            WaterfallTier {
                id: "tier-catchup".to_string(),
                name: "GP Catch-Up".to_string(),
                kind: TierKind::CatchUp {
                    catch_up_to: DEFAULT_CARRY_PCT,
                },
                order: 3,
            },
            WaterfallTier {
                id: "tier-carry".to_string(),
                name: "Carried Interest".to_string(),
                kind: TierKind::CarriedInterest {
                    lp_split: 100.0 - DEFAULT_CARRY_PCT,
                    gp_split: DEFAULT_CARRY_PCT,
                },
                order: 4,
            },
        ],
    }
}

/// American-style 3-tier waterfall: return of capital, 8% preferred return,
/// 80/20 carry with no GP catch-up tier.
pub fn american_waterfall() -> WaterfallStructure {
    WaterfallStructure {
        id: "american-3-tier".to_string(),
        name: "American 3-Tier".to_string(),
        tiers: vec![
            WaterfallTier {
                id: "tier-roc".to_string(),
                name: "Return of Capital".to_string(),
                kind: TierKind::ReturnOfCapital,
                order: 1,
            },
            WaterfallTier {
                id: "tier-pref".to_string(),
                name: "Preferred Return".to_string(),
                kind: TierKind::PreferredReturn {
                    hurdle_rate: DEFAULT_HURDLE_RATE,
                },
                order: 2,
            },
            WaterfallTier {
                id: "tier-carry".to_string(),
                name: "Carried Interest".to_string(),
                kind: TierKind::CarriedInterest {
                    lp_split: 100.0 - DEFAULT_CARRY_PCT,
                    gp_split: DEFAULT_CARRY_PCT,
                },
                order: 3,
            },
        ],
    }
}

/// Look up a built-in template by registry id.
pub fn structure_by_name(name: &str) -> Option<WaterfallStructure> {
    match name {
        "standard" | "standard-4-tier" => Some(standard_waterfall()),
        "american" | "american-3-tier" => Some(american_waterfall()),
        _ => None,
    }
}
