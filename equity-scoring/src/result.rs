//! Score result record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::brackets::round2;
use crate::composite::ComponentKind;
use crate::rating::{BufferHealth, Rating};
use crate::tier::Tier;

/// Everything the engine reports for one security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub ticker: String,
    pub tier: Tier,
    /// Tier number, 1 through 4
    pub tier_number: u8,
    pub tier_name: String,
    pub market_cap_billions: f64,
    /// Composite score, two decimals
    pub composite_score: f64,
    pub components: BTreeMap<ComponentKind, f64>,
    pub rating: Rating,
    pub stars: String,
    pub min_score_for_tier: f64,
    /// `composite_score − min_score_for_tier`, two decimals
    pub score_buffer: f64,
    pub buffer_health: BufferHealth,
    /// Whether the composite meets the tier minimum
    pub qualifies: bool,
    /// Recommended allocation (%)
    pub position_size_pct: f64,
    pub beta: f64,
}

impl ScoreResult {
    pub(crate) fn new(
        ticker: impl Into<String>,
        tier: Tier,
        market_cap_billions: f64,
        composite_score: f64,
        components: BTreeMap<ComponentKind, f64>,
        position_size_pct: f64,
        beta: f64,
    ) -> Self {
        let rating = Rating::from_score(composite_score);
        let min_score = tier.min_score();
        let score_buffer = round2(composite_score - min_score);

        Self {
            ticker: ticker.into(),
            tier,
            tier_number: tier.number(),
            tier_name: tier.name().to_string(),
            market_cap_billions,
            composite_score,
            components,
            rating,
            stars: rating.stars(),
            min_score_for_tier: min_score,
            score_buffer,
            buffer_health: BufferHealth::from_buffer(score_buffer),
            qualifies: score_buffer >= 0.0,
            position_size_pct,
            beta,
        }
    }

    /// Score of a named component, if this tier has it.
    pub fn component(&self, kind: ComponentKind) -> Option<f64> {
        self.components.get(&kind).copied()
    }
}

impl std::fmt::Display for ScoreResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {:.2} {} ({}, {}, position {:.1}%)",
            self.ticker,
            self.composite_score,
            self.rating,
            self.tier,
            if self.qualifies { "qualifies" } else { "below minimum" },
            self.position_size_pct
        )
    }
}
