//! Tier 4: Small-Cap Moonshot.
//!
//! Early, volatile issuers. Growth carries the most weight, and the fifth
//! component scores disruption potential. Relative strength is measured
//! against IWO.

use super::{finish, shared};
use crate::brackets::{clamp_score, BonusTable, Bound, Ladder, NEUTRAL_SCORE};
use crate::input::ScoreInput;
use crate::relative;
use crate::weights;

// ============================================================================
// Valuation
// ============================================================================

const PRICE_TO_SALES: Ladder = Ladder::new(
    &[
        (Bound::Below(12.0), 100.0),
        (Bound::Below(20.0), 85.0),
        (Bound::Below(35.0), 70.0),
        (Bound::Below(50.0), 50.0),
        (Bound::Below(75.0), 35.0),
    ],
    25.0,
);

const RELATIVE_PS: Ladder = Ladder::new(
    &[
        (Bound::Below(1.0), 100.0),
        (Bound::AtMost(1.0), 75.0),
        (Bound::AtMost(2.0), 60.0),
        (Bound::AtMost(3.0), 40.0),
    ],
    20.0,
);

const INSIDER_OWNERSHIP: Ladder = Ladder::new(
    &[
        (Bound::Above(25.0), 100.0),
        (Bound::AtLeast(20.0), 90.0),
        (Bound::AtLeast(15.0), 80.0),
        (Bound::AtLeast(10.0), 65.0),
        (Bound::AtLeast(5.0), 45.0),
    ],
    30.0,
);

const INSIDER: BonusTable = BonusTable::new(&[("recent_buying", 20.0)]);

pub fn valuation(input: &ScoreInput) -> f64 {
    let ps = input.number_or("ps_ratio", 999.0);
    let growth = input.number_or("revenue_growth_ttm_pct", 0.0);

    let context_bonus = if growth > 75.0 && (35.0..=50.0).contains(&ps) {
        35.0
    } else if growth > 100.0 && (50.0..=75.0).contains(&ps) {
        30.0
    } else if growth > 100.0 && ps > 75.0 {
        25.0
    } else {
        0.0
    };
    let ps_score = (PRICE_TO_SALES.score(ps) + context_bonus).min(100.0);

    // A missing multiple keeps its 999 placeholder; only the median is guarded
    let ratio = relative::sector_ratio(Some(ps), input.try_number("sector_median_ps").ok());
    let relative_score = RELATIVE_PS.score(ratio);

    let ownership = input.number_or("insider_ownership_pct", 0.0);
    let heavy_ownership = if ownership > 30.0 { 20.0 } else { 0.0 };
    let insider = INSIDER.accumulate(
        INSIDER_OWNERSHIP.score(ownership) + heavy_ownership,
        &input.flags("insider_bonuses"),
    );

    finish(&weights::T4_VALUATION, &[ps_score, relative_score, insider])
}

// ============================================================================
// Quality
// ============================================================================

const GROSS_MARGIN: Ladder = Ladder::new(
    &[
        (Bound::Above(70.0), 100.0),
        (Bound::AtLeast(60.0), 85.0),
        (Bound::AtLeast(50.0), 70.0),
        (Bound::AtLeast(40.0), 50.0),
        (Bound::AtLeast(30.0), 35.0),
    ],
    20.0,
);

const RECURRING_REVENUE: Ladder = Ladder::new(
    &[(Bound::Above(70.0), 30.0), (Bound::AtLeast(50.0), 20.0)],
    0.0,
);

/// Largest customer: a small share helps, a dominant one hurts badly.
const TOP_CUSTOMER: Ladder = Ladder::new(
    &[(Bound::Below(10.0), 15.0), (Bound::AtMost(50.0), 0.0)],
    -35.0,
);

const TOP_3_CUSTOMERS: Ladder = Ladder::new(
    &[(Bound::Below(25.0), 5.0), (Bound::AtMost(30.0), 0.0)],
    -20.0,
);

const MONTHS_TO_PROFIT: Ladder = Ladder::new(
    &[
        (Bound::Below(12.0), 80.0),
        (Bound::Below(24.0), 60.0),
        (Bound::Below(36.0), 40.0),
        (Bound::Below(48.0), 25.0),
    ],
    15.0,
);

const PROFIT_PATH_PENALTIES: BonusTable = BonusTable::new(&[
    ("burn_accelerating", -25.0),
    ("no_guidance", -15.0),
    ("frequent_raises", -10.0),
]);

pub fn quality(input: &ScoreInput) -> f64 {
    let gross = GROSS_MARGIN.score(input.number_or("gross_margin_pct", 0.0));
    let revenue = revenue_quality(input);
    let unit_economics = shared::unit_economics(input);

    let profit_base = if input.flag_or("is_profitable", false) {
        100.0
    } else {
        MONTHS_TO_PROFIT.score(input.number_or("path_to_profit_months", 999.0))
    };
    let profit_path = PROFIT_PATH_PENALTIES.accumulate(profit_base, &input.flags("profit_path_penalties"));

    finish(
        &weights::T4_QUALITY,
        &[gross, revenue, unit_economics, profit_path],
    )
}

/// Recurring share, net retention and customer concentration on a base of 50.
fn revenue_quality(input: &ScoreInput) -> f64 {
    let nrr_bonus = if input.number_or("nrr_pct", 100.0) > 110.0 {
        20.0
    } else {
        0.0
    };

    clamp_score(
        NEUTRAL_SCORE
            + RECURRING_REVENUE.score(input.number_or("recurring_revenue_pct", 0.0))
            + nrr_bonus
            + TOP_CUSTOMER.score(input.number_or("top_customer_concentration_pct", 100.0))
            + TOP_3_CUSTOMERS.score(input.number_or("top_3_concentration_pct", 100.0)),
    )
}

// ============================================================================
// Growth
// ============================================================================

const TTM_GROWTH: Ladder = Ladder::new(
    &[
        (Bound::Above(100.0), 100.0),
        (Bound::AtLeast(75.0), 95.0),
        (Bound::AtLeast(55.0), 85.0),
        (Bound::AtLeast(40.0), 70.0),
        (Bound::AtLeast(30.0), 50.0),
        (Bound::AtLeast(20.0), 30.0),
    ],
    15.0,
);

const TAM: Ladder = Ladder::new(
    &[
        (Bound::Above(150.0), 100.0),
        (Bound::AtLeast(100.0), 90.0),
        (Bound::AtLeast(50.0), 75.0),
        (Bound::AtLeast(25.0), 55.0),
        (Bound::AtLeast(10.0), 35.0),
    ],
    20.0,
);

const PENETRATION: Ladder = Ladder::new(
    &[
        (Bound::Below(3.0), 100.0),
        (Bound::Below(5.0), 90.0),
        (Bound::Below(10.0), 75.0),
        (Bound::Below(15.0), 55.0),
    ],
    35.0,
);

const DRIVERS: BonusTable = BonusTable::new(&[
    ("network_effects", 25.0),
    ("viral_growth_50plus", 25.0),
    ("platform_forming", 20.0),
    ("multiple_streams_35plus", 20.0),
    ("gov_enterprise_accelerating", 20.0),
]);

const FORWARD_GROWTH: Ladder = Ladder::new(
    &[
        (Bound::Above(60.0), 100.0),
        (Bound::AtLeast(50.0), 90.0),
        (Bound::AtLeast(40.0), 80.0),
        (Bound::AtLeast(30.0), 65.0),
        (Bound::AtLeast(20.0), 45.0),
    ],
    25.0,
);

const GROWTH_CATALYSTS: BonusTable = BonusTable::new(&[
    ("major_launch_6mo", 30.0),
    ("market_expansion", 25.0),
    ("partnership_expected", 25.0),
    ("regulatory_milestone", 30.0),
    ("index_inclusion", 20.0),
]);

pub fn growth(input: &ScoreInput) -> f64 {
    let ttm = input.number_or("revenue_growth_ttm_pct", 0.0);
    let revenue = TTM_GROWTH.score(ttm);

    let quarters = input.number_or("quarters_accelerating", 0.0);
    let consistency = if quarters >= 5.0 {
        100.0
    } else if quarters == 4.0 {
        90.0
    } else if quarters == 3.0 {
        80.0
    } else if ttm >= 40.0 {
        70.0
    } else {
        30.0
    };

    let tam = TAM.score(input.number_or("tam_billions", 0.0));
    let penetration = PENETRATION.score(input.number_or("market_penetration_pct", 100.0));
    let drivers = DRIVERS.accumulate(NEUTRAL_SCORE, &input.flags("growth_driver_bonuses"));

    let forward_estimate = input.number_or("analyst_forward_growth_pct", 0.0);
    let forward_bonus = if relative::forward_outpaces(forward_estimate, ttm, 12.0) {
        20.0
    } else {
        0.0
    };
    let forward = (FORWARD_GROWTH.score(forward_estimate) + forward_bonus).min(100.0);

    let catalysts = GROWTH_CATALYSTS.accumulate(NEUTRAL_SCORE, &input.flags("catalyst_bonuses"));

    finish(
        &weights::T4_GROWTH,
        &[
            revenue,
            consistency,
            tam,
            penetration,
            drivers,
            forward,
            catalysts,
        ],
    )
}

// ============================================================================
// Momentum
// ============================================================================

const RETURN_6M: Ladder = Ladder::new(
    &[
        (Bound::Above(100.0), 100.0),
        (Bound::AtLeast(70.0), 95.0),
        (Bound::AtLeast(50.0), 85.0),
        (Bound::AtLeast(30.0), 70.0),
        (Bound::AtLeast(15.0), 50.0),
        (Bound::AtLeast(0.0), 35.0),
    ],
    60.0,
);

const RELATIVE_STRENGTH: Ladder = Ladder::new(
    &[
        (Bound::Above(30.0), 100.0),
        (Bound::AtLeast(20.0), 85.0),
        (Bound::AtLeast(10.0), 65.0),
        (Bound::AtLeast(0.0), 45.0),
    ],
    25.0,
);

const SENTIMENT: BonusTable = BonusTable::new(&[
    ("rising_mentions_bullish", 25.0),
    ("positive_reddit", 20.0),
    ("analyst_upgrades_3plus", 25.0),
    ("target_increases", 20.0),
    ("positive_media", 15.0),
]);

const SENTIMENT_PENALTIES: BonusTable =
    BonusTable::new(&[("negative_trending", -25.0), ("unsustainable_meme", -20.0)]);

const VOLUME_SURGE: Ladder = Ladder::new(
    &[
        (Bound::Above(75.0), 100.0),
        (Bound::AtLeast(50.0), 85.0),
        (Bound::AtLeast(25.0), 65.0),
        (Bound::AtLeast(-25.0), 50.0),
    ],
    30.0,
);

pub fn momentum(input: &ScoreInput) -> f64 {
    let return_6m = input.number_or("return_6m_pct", 0.0);
    let return_score = RETURN_6M.score(return_6m);

    let excess = relative::excess_return(return_6m, input.number_or("iwo_return_6m_pct", 0.0));
    let relative_score = RELATIVE_STRENGTH.score(excess);

    let sentiment = clamp_score(
        NEUTRAL_SCORE
            + SENTIMENT.total(&input.flags("sentiment_bonuses"))
            + SENTIMENT_PENALTIES.total(&input.flags("sentiment_penalties")),
    );

    let volume = VOLUME_SURGE.score(input.number_or("volume_change_pct", 0.0));

    finish(
        &weights::T4_MOMENTUM,
        &[return_score, relative_score, sentiment, volume],
    )
}

// ============================================================================
// Disruption
// ============================================================================

const TECH_MOAT: BonusTable = BonusTable::new(&[
    ("proprietary_ai_ml", 30.0),
    ("strong_patents", 25.0),
    ("unique_data_assets", 25.0),
    ("first_mover_scale", 20.0),
    ("unique_supply_chain", 25.0),
]);

const DISRUPTION_CATALYSTS: BonusTable = BonusTable::new(&[
    ("major_launch_6mo", 30.0),
    ("partnership_expected", 25.0),
    ("market_expansion", 25.0),
    ("regulatory_approval", 30.0),
    ("acquisition_target", 20.0),
]);

/// Score for the categorical disruption type; unknown values are
/// incremental.
pub fn disruption_type_score(disruption_type: &str) -> f64 {
    match disruption_type {
        "attacking_100b_plus" => 100.0,
        "creating_new_category" => 95.0,
        "significant_share_gains" => 85.0,
        "niche_10_50b" => 70.0,
        _ => 50.0,
    }
}

/// Score for the categorical market structure; unknown values carry
/// commodity risk.
pub fn market_structure_score(market_structure: &str) -> f64 {
    match market_structure {
        "winner_take_most" => 100.0,
        "oligopoly_forming" => 80.0,
        "crowded_differentiated" => 60.0,
        "highly_competitive" => 40.0,
        _ => 20.0,
    }
}

pub fn disruption(input: &ScoreInput) -> f64 {
    let market = disruption_type_score(input.text_or("disruption_type", "incremental"));
    let tech_moat = TECH_MOAT.accumulate(NEUTRAL_SCORE, &input.flags("tech_moat_bonuses"));
    let dynamics = market_structure_score(input.text_or("market_structure", "highly_competitive"));
    let catalysts = DISRUPTION_CATALYSTS.accumulate(NEUTRAL_SCORE, &input.flags("catalyst_bonuses"));

    finish(
        &weights::T4_DISRUPTION,
        &[market, tech_moat, dynamics, catalysts],
    )
}

/// All five Tier 4 components in composite order.
pub fn score(input: &ScoreInput) -> [f64; 5] {
    [
        valuation(input),
        quality(input),
        growth(input),
        momentum(input),
        disruption(input),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_valuation_growth_context_and_zero_median() {
        let input = ScoreInput::new()
            .with_number("ps_ratio", 40.0)
            .with_number("revenue_growth_ttm_pct", 80.0)
            .with_number("sector_median_ps", 0.0)
            .with_number("insider_ownership_pct", 32.0);
        // P/S 50 + 35 = 85; median 0 → ratio 1.0 → 75; insider 100 + 20 → 100
        // 85 * 0.60 + 75 * 0.25 + 100 * 0.15 = 84.75
        assert_eq!(valuation(&input), 84.75);
    }

    #[test]
    fn test_revenue_quality_concentration_penalties() {
        let concentrated = ScoreInput::new()
            .with_number("top_customer_concentration_pct", 60.0)
            .with_number("top_3_concentration_pct", 70.0);
        assert_eq!(revenue_quality(&concentrated), 0.0);

        let diversified = ScoreInput::new()
            .with_number("recurring_revenue_pct", 80.0)
            .with_number("nrr_pct", 120.0)
            .with_number("top_customer_concentration_pct", 5.0)
            .with_number("top_3_concentration_pct", 12.0);
        assert_eq!(revenue_quality(&diversified), 100.0);

        let middling = ScoreInput::new()
            .with_number("recurring_revenue_pct", 55.0)
            .with_number("top_customer_concentration_pct", 20.0)
            .with_number("top_3_concentration_pct", 28.0);
        assert_eq!(revenue_quality(&middling), 70.0);
    }

    #[test]
    fn test_sentiment_penalties_offset_bonuses() {
        let mixed = ScoreInput::new()
            .with_flags("sentiment_bonuses", &["rising_mentions_bullish"])
            .with_flags("sentiment_penalties", &["negative_trending", "unsustainable_meme"]);
        let neutral = ScoreInput::new();
        // sentiment 30 vs 50 at 20% weight
        assert!((momentum(&neutral) - momentum(&mixed) - 4.0).abs() < 1e-9);
    }

    #[test_case("attacking_100b_plus", 100.0)]
    #[test_case("creating_new_category", 95.0)]
    #[test_case("niche_10_50b", 70.0)]
    #[test_case("incremental", 50.0)]
    #[test_case("something_else", 50.0)]
    fn test_disruption_type(kind: &str, expected: f64) {
        assert_eq!(disruption_type_score(kind), expected);
    }

    #[test_case("winner_take_most", 100.0)]
    #[test_case("highly_competitive", 40.0)]
    #[test_case("commodity_risk", 20.0)]
    fn test_market_structure(kind: &str, expected: f64) {
        assert_eq!(market_structure_score(kind), expected);
    }

    #[test]
    fn test_default_disruption() {
        // 50 * 0.35 + 50 * 0.25 + 40 * 0.25 + 50 * 0.15
        assert_eq!(disruption(&ScoreInput::new()), 47.5);
    }

    #[test]
    fn test_empty_input_scores_in_range() {
        let scores = score(&ScoreInput::new());
        assert!(scores.iter().all(|s| (0.0..=100.0).contains(s)));
    }

    #[test]
    fn test_missing_ps_is_expensive_against_sector() {
        let base = ScoreInput::new().with_number("market_cap_billions", 3.0);
        let missing = base.clone().with_number("sector_median_ps", 10.0);
        let explicit = missing.clone().with_number("ps_ratio", 999.0);
        assert_eq!(valuation(&missing), valuation(&explicit));
        // P/S 25, ratio 99.9 → 20, insider 30
        assert_eq!(valuation(&missing), 24.5);
        // Without a median the comparison is in line (75) rather than worst (20)
        let gap = valuation(&base) - valuation(&missing);
        assert!((gap - 0.25 * (75.0 - 20.0)).abs() < 1e-6, "gap {gap}");
    }
}
