//! Sub-scores used by more than one tier.

use crate::brackets::{Bound, Ladder};
use crate::input::ScoreInput;

/// Price position against the 50- and 200-day moving averages.
///
/// Above both: 100. Above the 200-day only: 70. Above the 50-day only: 55.
/// Otherwise 30. Missing prices default to 0, which scores 30.
pub fn technical_setup(input: &ScoreInput) -> f64 {
    let price = input.number_or("price", 0.0);
    let ma_50 = input.number_or("ma_50", 0.0);
    let ma_200 = input.number_or("ma_200", 0.0);

    if price > ma_50 && price > ma_200 {
        100.0
    } else if price > ma_200 {
        70.0
    } else if price > ma_50 {
        55.0
    } else {
        30.0
    }
}

const LTV_CAC: Ladder = Ladder::new(
    &[
        (Bound::Above(3.0), 100.0),
        (Bound::AtLeast(2.0), 75.0),
        (Bound::AtLeast(1.0), 40.0),
    ],
    40.0,
);

/// Unit economics, preferring LTV/CAC.
///
/// Below an LTV/CAC of 1 (or when it is absent) the proxies are tried in
/// order: CAC payback under 12 months (85), expanding gross margin (70),
/// improving cohorts (60), and finally 40.
pub fn unit_economics(input: &ScoreInput) -> f64 {
    if let Some(score) = LTV_CAC.rung_score(input.number_or("ltv_cac_ratio", 0.0)) {
        return score;
    }

    if input.number_or("cac_payback_months", 999.0) < 12.0 {
        85.0
    } else if input.flag_or("gross_margin_expanding", false) {
        70.0
    } else if input.flag_or("cohorts_improving", false) {
        60.0
    } else {
        40.0
    }
}

/// Best score among substitutable retention proxies; 50 with none.
pub fn best_proxy(scores: &[f64]) -> f64 {
    scores.iter().copied().reduce(f64::max).unwrap_or(50.0)
}
