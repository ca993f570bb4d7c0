//! Scoring engine entry points.
//!
//! Flow for one record:
//!
//! ```text
//! ScoreInput ─▶ Tier ─▶ 5 component scorers ─▶ Composite ─┬─▶ Rating
//!                                                          └─▶ Position size
//! ```
//!
//! The engine holds only immutable configuration, so any number of
//! records may be scored concurrently.

use rayon::prelude::*;
use std::time::Instant;

use equity_common::config::{PositionConfig, ScoringConfig};
use equity_common::logging::generate_run_id;

use crate::components::score_components;
use crate::composite::Composite;
use crate::input::ScoreInput;
use crate::position::PositionSizer;
use crate::result::ScoreResult;
use crate::tier::Tier;

/// Tiered scoring engine.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    sizer: PositionSizer,
}

impl ScoringEngine {
    /// Create an engine with default sizing (no tier ceiling).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine from the scoring section of the configuration.
    pub fn with_config(config: &ScoringConfig) -> Self {
        Self::with_position_config(config.position.clone())
    }

    pub fn with_position_config(config: PositionConfig) -> Self {
        Self {
            sizer: PositionSizer::new(config),
        }
    }

    pub fn sizer(&self) -> &PositionSizer {
        &self.sizer
    }

    /// Score one security.
    ///
    /// Never fails: absent or unusable fields fall back to their defaults.
    pub fn calculate_score(&self, ticker: &str, input: &ScoreInput) -> ScoreResult {
        let market_cap = input.market_cap_billions();
        let tier = Tier::from_market_cap(market_cap);

        let composite = Composite::from_scores(tier, score_components(tier, input));

        let beta = input.beta();
        let position = self.sizer.size(tier, composite.score, beta);

        let result = ScoreResult::new(
            ticker,
            tier,
            market_cap,
            composite.score,
            composite.components,
            position,
            beta,
        );

        tracing::debug!(
            ticker = %result.ticker,
            tier = result.tier_number,
            composite = result.composite_score,
            rating = %result.rating,
            position_pct = result.position_size_pct,
            "Scored"
        );

        result
    }

    /// Score independent records in parallel, preserving input order.
    pub fn score_batch(&self, records: &[(String, ScoreInput)]) -> Vec<ScoreResult> {
        let run_id = generate_run_id();
        let started = Instant::now();

        let results: Vec<ScoreResult> = records
            .par_iter()
            .map(|(ticker, input)| self.calculate_score(ticker, input))
            .collect();

        tracing::info!(
            run_id = %run_id,
            total = results.len(),
            qualifying = results.iter().filter(|r| r.qualifies).count(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Batch scored"
        );

        results
    }
}

/// Score one security with the default engine.
pub fn calculate_score(ticker: &str, input: &ScoreInput) -> ScoreResult {
    ScoringEngine::new().calculate_score(ticker, input)
}
