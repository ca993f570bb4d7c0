//! Weight tables.
//!
//! Every tier has one composite table over its five components, and every
//! component has a sub-weight table over its metrics. All tables must sum
//! to 1.0; [`validate_all`] checks this and is exercised by the test suite
//! and the `check` subcommand.

use crate::error::{ScoringError, ScoringResult};
use crate::tier::Tier;

/// Allowed deviation of a table sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// A named, ordered list of weights.
#[derive(Debug, Clone, Copy)]
pub struct WeightTable {
    name: &'static str,
    entries: &'static [(&'static str, f64)],
}

impl WeightTable {
    pub const fn new(name: &'static str, entries: &'static [(&'static str, f64)]) -> Self {
        Self { name, entries }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn entries(&self) -> &'static [(&'static str, f64)] {
        self.entries
    }

    /// Weight of a named entry.
    pub fn weight(&self, entry: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| *name == entry)
            .map(|(_, w)| *w)
    }

    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    /// Check the table sums to 1.0.
    pub fn validate(&self) -> ScoringResult<()> {
        let sum = self.sum();
        if (sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE {
            Ok(())
        } else {
            Err(ScoringError::Configuration {
                table: self.name.to_string(),
                sum,
            })
        }
    }

    /// Weighted sum of `scores`, taken positionally against the entries.
    pub fn combine(&self, scores: &[f64]) -> f64 {
        debug_assert_eq!(
            scores.len(),
            self.entries.len(),
            "score count does not match weight table {}",
            self.name
        );
        self.entries
            .iter()
            .zip(scores)
            .map(|((_, weight), score)| score * weight)
            .sum()
    }
}

// ============================================================================
// Composite Tables
// ============================================================================

pub static TIER1_COMPOSITE: WeightTable = WeightTable::new(
    "tier1.composite",
    &[
        ("valuation", 0.20),
        ("quality", 0.35),
        ("growth", 0.25),
        ("momentum", 0.10),
        ("financial_health", 0.10),
    ],
);

pub static TIER2_COMPOSITE: WeightTable = WeightTable::new(
    "tier2.composite",
    &[
        ("valuation", 0.18),
        ("quality", 0.28),
        ("growth", 0.32),
        ("momentum", 0.12),
        ("scale_moat", 0.10),
    ],
);

pub static TIER3_COMPOSITE: WeightTable = WeightTable::new(
    "tier3.composite",
    &[
        ("valuation", 0.15),
        ("quality", 0.22),
        ("growth", 0.38),
        ("momentum", 0.15),
        ("scale_inflection", 0.10),
    ],
);

pub static TIER4_COMPOSITE: WeightTable = WeightTable::new(
    "tier4.composite",
    &[
        ("valuation", 0.10),
        ("quality", 0.15),
        ("growth", 0.40),
        ("momentum", 0.15),
        ("disruption", 0.20),
    ],
);

/// Composite table for a tier.
pub fn composite_table(tier: Tier) -> &'static WeightTable {
    match tier {
        Tier::MegaCapCore => &TIER1_COMPOSITE,
        Tier::LargeCapGrowth => &TIER2_COMPOSITE,
        Tier::MidCapEmerging => &TIER3_COMPOSITE,
        Tier::SmallCapMoonshot => &TIER4_COMPOSITE,
    }
}

// ============================================================================
// Tier 1 Sub-weights
// ============================================================================

pub static T1_VALUATION: WeightTable = WeightTable::new(
    "tier1.valuation",
    &[("pe_vs_history", 0.35), ("fcf_yield", 0.30), ("peg", 0.35)],
);

pub static T1_QUALITY: WeightTable = WeightTable::new(
    "tier1.quality",
    &[
        ("roic", 0.30),
        ("operating_margin", 0.20),
        ("margin_trend", 0.12),
        ("moat", 0.18),
        ("management", 0.10),
        ("cash_conversion", 0.10),
    ],
);

pub static T1_GROWTH: WeightTable = WeightTable::new(
    "tier1.growth",
    &[
        ("revenue_cagr", 0.30),
        ("consistency", 0.15),
        ("eps_cagr", 0.25),
        ("future_potential", 0.15),
        ("analyst_consensus", 0.15),
    ],
);

pub static T1_MOMENTUM: WeightTable = WeightTable::new(
    "tier1.momentum",
    &[("return_12m", 0.40), ("relative_strength", 0.35), ("technical", 0.25)],
);

pub static T1_FINANCIAL_HEALTH: WeightTable = WeightTable::new(
    "tier1.financial_health",
    &[("net_cash", 0.50), ("fcf_generation", 0.40), ("capital_allocation", 0.10)],
);

// ============================================================================
// Tier 2 Sub-weights
// ============================================================================

pub static T2_VALUATION: WeightTable = WeightTable::new(
    "tier2.valuation",
    &[("pe_or_ps", 0.55), ("peg", 0.25), ("relative_valuation", 0.20)],
);

pub static T2_QUALITY: WeightTable = WeightTable::new(
    "tier2.quality",
    &[
        ("revenue_scale", 0.15),
        ("profitability", 0.18),
        ("gross_margin", 0.20),
        ("margin_trajectory", 0.15),
        ("customer_retention", 0.20),
        ("market_position", 0.12),
    ],
);

pub static T2_GROWTH: WeightTable = WeightTable::new(
    "tier2.growth",
    &[
        ("revenue_growth", 0.25),
        ("consistency", 0.15),
        ("forward_estimate", 0.20),
        ("eps_vs_revenue", 0.10),
        ("tam", 0.15),
        ("drivers", 0.10),
        ("cyclicality", 0.05),
    ],
);

pub static T2_MOMENTUM: WeightTable = WeightTable::new(
    "tier2.momentum",
    &[("return_6m", 0.40), ("relative_strength", 0.35), ("technical", 0.25)],
);

pub static T2_SCALE_MOAT: WeightTable = WeightTable::new(
    "tier2.scale_moat",
    &[
        ("competitive_position", 0.35),
        ("moat_development", 0.30),
        ("operating_leverage", 0.20),
        ("partnerships", 0.15),
    ],
);

// ============================================================================
// Tier 3 Sub-weights
// ============================================================================

pub static T3_VALUATION: WeightTable = WeightTable::new(
    "tier3.valuation",
    &[("price_to_sales", 0.60), ("relative_valuation", 0.25), ("insider_ownership", 0.15)],
);

pub static T3_QUALITY: WeightTable = WeightTable::new(
    "tier3.quality",
    &[
        ("revenue_scale", 0.18),
        ("profit_path", 0.20),
        ("gross_margin", 0.22),
        ("unit_economics", 0.20),
        ("customer_quality", 0.20),
    ],
);

pub static T3_GROWTH: WeightTable = WeightTable::new(
    "tier3.growth",
    &[
        ("revenue_growth", 0.28),
        ("acceleration", 0.18),
        ("forward_estimate", 0.18),
        ("tam", 0.18),
        ("drivers", 0.12),
        ("cyclicality", 0.06),
    ],
);

pub static T3_MOMENTUM: WeightTable = WeightTable::new(
    "tier3.momentum",
    &[("return_6m", 0.40), ("relative_strength", 0.35), ("volume_sentiment", 0.25)],
);

pub static T3_SCALE_INFLECTION: WeightTable = WeightTable::new(
    "tier3.scale_inflection",
    &[
        ("market_position", 0.30),
        ("operating_leverage", 0.30),
        ("moat_formation", 0.25),
        ("partnerships", 0.15),
    ],
);

// ============================================================================
// Tier 4 Sub-weights
// ============================================================================

pub static T4_VALUATION: WeightTable = WeightTable::new(
    "tier4.valuation",
    &[("price_to_sales", 0.60), ("relative_valuation", 0.25), ("insider_ownership", 0.15)],
);

pub static T4_QUALITY: WeightTable = WeightTable::new(
    "tier4.quality",
    &[
        ("gross_margin", 0.30),
        ("revenue_quality", 0.30),
        ("unit_economics", 0.20),
        ("profit_path", 0.20),
    ],
);

pub static T4_GROWTH: WeightTable = WeightTable::new(
    "tier4.growth",
    &[
        ("revenue_growth", 0.28),
        ("consistency", 0.15),
        ("tam", 0.15),
        ("penetration", 0.10),
        ("drivers", 0.15),
        ("forward_estimate", 0.12),
        ("catalysts", 0.05),
    ],
);

pub static T4_MOMENTUM: WeightTable = WeightTable::new(
    "tier4.momentum",
    &[
        ("return_6m", 0.40),
        ("relative_strength", 0.30),
        ("social_sentiment", 0.20),
        ("volume_surge", 0.10),
    ],
);

pub static T4_DISRUPTION: WeightTable = WeightTable::new(
    "tier4.disruption",
    &[
        ("market_disruption", 0.35),
        ("tech_moat", 0.25),
        ("competitive_dynamics", 0.25),
        ("catalysts", 0.15),
    ],
);

/// Every sub-weight table, Tier 1 first.
pub static SUB_WEIGHT_TABLES: [&WeightTable; 20] = [
    &T1_VALUATION,
    &T1_QUALITY,
    &T1_GROWTH,
    &T1_MOMENTUM,
    &T1_FINANCIAL_HEALTH,
    &T2_VALUATION,
    &T2_QUALITY,
    &T2_GROWTH,
    &T2_MOMENTUM,
    &T2_SCALE_MOAT,
    &T3_VALUATION,
    &T3_QUALITY,
    &T3_GROWTH,
    &T3_MOMENTUM,
    &T3_SCALE_INFLECTION,
    &T4_VALUATION,
    &T4_QUALITY,
    &T4_GROWTH,
    &T4_MOMENTUM,
    &T4_DISRUPTION,
];

/// Every table: the four composites followed by all sub-weight tables.
pub fn all_tables() -> impl Iterator<Item = &'static WeightTable> {
    Tier::ALL
        .into_iter()
        .map(composite_table)
        .chain(SUB_WEIGHT_TABLES.iter().copied())
}

/// Validate every weight table, returning the first failure.
pub fn validate_all() -> ScoringResult<()> {
    for table in all_tables() {
        table.validate()?;
    }
    tracing::debug!(tables = all_tables().count(), "Weight tables validated");
    Ok(())
}
