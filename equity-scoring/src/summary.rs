//! Batch summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::brackets::round2;
use crate::rating::Rating;
use crate::result::ScoreResult;
use crate::tier::Tier;

/// Default length of [`BatchSummary::top`].
pub const DEFAULT_TOP_N: usize = 10;

/// Aggregate view over a scored batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    /// Results meeting their tier minimum
    pub qualifying: usize,
    pub by_rating: BTreeMap<Rating, usize>,
    pub by_tier: BTreeMap<Tier, usize>,
    /// Mean composite, two decimals; 0 for an empty batch
    pub mean_composite: f64,
    /// Tickers ordered by composite, best first
    pub top: Vec<String>,
}

impl BatchSummary {
    pub fn from_results(results: &[ScoreResult]) -> Self {
        Self::with_top_n(results, DEFAULT_TOP_N)
    }

    pub fn with_top_n(results: &[ScoreResult], top_n: usize) -> Self {
        let mut by_rating = BTreeMap::new();
        let mut by_tier = BTreeMap::new();
        for result in results {
            *by_rating.entry(result.rating).or_insert(0) += 1;
            *by_tier.entry(result.tier).or_insert(0) += 1;
        }

        let mean_composite = if results.is_empty() {
            0.0
        } else {
            round2(results.iter().map(|r| r.composite_score).sum::<f64>() / results.len() as f64)
        };

        // Stable sort keeps input order among equal scores
        let mut ranked: Vec<&ScoreResult> = results.iter().collect();
        ranked.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));

        Self {
            generated_at: Utc::now(),
            total: results.len(),
            qualifying: results.iter().filter(|r| r.qualifies).count(),
            by_rating,
            by_tier,
            mean_composite,
            top: ranked.into_iter().take(top_n).map(|r| r.ticker.clone()).collect(),
        }
    }

    /// Count of results with the given rating.
    pub fn rating_count(&self, rating: Rating) -> usize {
        self.by_rating.get(&rating).copied().unwrap_or(0)
    }

    pub fn tier_count(&self, tier: Tier) -> usize {
        self.by_tier.get(&tier).copied().unwrap_or(0)
    }
}
