//! Tier-specific component scorers.
//!
//! Each tier computes five components. The first four are always
//! Valuation, Quality, Growth and Momentum; the fifth is tier-specific:
//!
//! | Tier | Fifth component  |
//! |------|------------------|
//! | 1    | Financial Health |
//! | 2    | Scale & Moat     |
//! | 3    | Scale Inflection |
//! | 4    | Disruption       |
//!
//! Every scorer is a plain function of the input record. Each component is
//! a weighted sum of sub-scores, clamped to [0, 100] and rounded to two
//! decimals.

pub mod shared;
pub mod tier1;
pub mod tier2;
pub mod tier3;
pub mod tier4;

use crate::brackets::{clamp_score, round2};
use crate::input::ScoreInput;
use crate::tier::Tier;
use crate::weights::WeightTable;

/// Combine sub-scores with their weight table into a component score.
pub(crate) fn finish(table: &WeightTable, sub_scores: &[f64]) -> f64 {
    round2(clamp_score(table.combine(sub_scores)))
}

/// Score all five components for a tier, in composite order.
pub fn score_components(tier: Tier, input: &ScoreInput) -> [f64; 5] {
    match tier {
        Tier::MegaCapCore => tier1::score(input),
        Tier::LargeCapGrowth => tier2::score(input),
        Tier::MidCapEmerging => tier3::score(input),
        Tier::SmallCapMoonshot => tier4::score(input),
    }
}
