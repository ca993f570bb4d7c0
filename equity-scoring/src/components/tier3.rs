//! Tier 3: Mid-Cap Emerging.
//!
//! Companies approaching scale: growth and its acceleration dominate, and
//! the fifth component looks for the inflection into operating leverage.
//! Relative strength is measured against IWM.

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
        (Bound::Below(10.0), 100.0),
        (Bound::Below(15.0), 85.0),
        (Bound::Below(22.0), 70.0),
        (Bound::Below(30.0), 55.0),
        (Bound::Below(40.0), 40.0),
    ],
    30.0,
);

const RELATIVE_PS: Ladder = Ladder::new(
    &[
        (Bound::Below(1.0), 100.0),
        (Bound::AtMost(1.0), 75.0),
        (Bound::AtMost(1.5), 60.0),
        (Bound::AtMost(2.0), 40.0),
    ],
    20.0,
);

const INSIDER_OWNERSHIP: Ladder = Ladder::new(
    &[
        (Bound::Above(20.0), 100.0),
        (Bound::AtLeast(15.0), 90.0),
        (Bound::AtLeast(10.0), 75.0),
        (Bound::AtLeast(5.0), 60.0),
    ],
    40.0,
);

const INSIDER: BonusTable = BonusTable::new(&[("recent_buying", 20.0)]);

pub fn valuation(input: &ScoreInput) -> f64 {
    let ps = input.number_or("ps_ratio", 999.0);
    let growth = input.number_or("revenue_growth_ttm_pct", 0.0);

    let context_bonus = if growth > 40.0 && (22.0..=30.0).contains(&ps) {
        25.0
    } else if growth > 50.0 && (30.0..=40.0).contains(&ps) {
        30.0
    } else if growth > 60.0 && ps > 40.0 {
        20.0
    } else {
        0.0
    };
    let ps_score = (PRICE_TO_SALES.score(ps) + context_bonus).min(100.0);

    // A missing multiple keeps its 999 placeholder; only the median is guarded
    let ratio = relative::sector_ratio(Some(ps), input.try_number("sector_median_ps").ok());
    let relative_score = RELATIVE_PS.score(ratio);

    let insider = insider_score(input);

    finish(&weights::T3_VALUATION, &[ps_score, relative_score, insider])
}

fn insider_score(input: &ScoreInput) -> f64 {
    let ownership = input.number_or("insider_ownership_pct", 0.0);
    let heavy_ownership = if ownership > 25.0 { 15.0 } else { 0.0 };
    INSIDER.accumulate(
        INSIDER_OWNERSHIP.score(ownership) + heavy_ownership,
        &input.flags("insider_bonuses"),
    )
}

// ============================================================================
// Quality
// ============================================================================

const REVENUE_SCALE: Ladder = Ladder::new(
    &[
        (Bound::Above(5.0), 100.0),
        (Bound::AtLeast(3.0), 85.0),
        (Bound::AtLeast(2.0), 75.0),
        (Bound::AtLeast(1.0), 60.0),
        (Bound::AtLeast(0.5), 45.0),
    ],
    30.0,
);

const PROFITABLE_MARGIN: Ladder = Ladder::new(
    &[
        (Bound::Above(15.0), 100.0),
        (Bound::AtLeast(10.0), 85.0),
        (Bound::AtLeast(5.0), 70.0),
    ],
    60.0,
);

const MONTHS_TO_PROFIT: Ladder = Ladder::new(
    &[
        (Bound::Below(12.0), 50.0),
        (Bound::Below(24.0), 40.0),
        (Bound::Below(36.0), 30.0),
    ],
    15.0,
);

const PROFIT_PATH_PENALTIES: BonusTable = BonusTable::new(&[
    ("burn_accelerating", -20.0),
    ("no_guidance", -15.0),
    ("frequent_raises", -10.0),
]);

const GROSS_MARGIN: Ladder = Ladder::new(
    &[
        (Bound::Above(75.0), 100.0),
        (Bound::AtLeast(65.0), 90.0),
        (Bound::AtLeast(55.0), 80.0),
        (Bound::AtLeast(45.0), 65.0),
        (Bound::AtLeast(35.0), 50.0),
    ],
    30.0,
);

const NET_REVENUE_RETENTION: Ladder = Ladder::new(
    &[
        (Bound::Above(125.0), 100.0),
        (Bound::AtLeast(115.0), 85.0),
        (Bound::AtLeast(105.0), 70.0),
        (Bound::AtLeast(95.0), 50.0),
    ],
    30.0,
);

const CONCENTRATION: Ladder = Ladder::new(
    &[
        (Bound::Below(10.0), 100.0),
        (Bound::Below(20.0), 80.0),
        (Bound::Below(30.0), 60.0),
    ],
    30.0,
);

const CUSTOMER_GROWTH: Ladder = Ladder::new(
    &[
        (Bound::Above(25.0), 100.0),
        (Bound::AtLeast(15.0), 80.0),
        (Bound::AtLeast(5.0), 60.0),
    ],
    40.0,
);

const REPEAT_REVENUE: Ladder = Ladder::new(
    &[
        (Bound::Above(60.0), 100.0),
        (Bound::AtLeast(40.0), 75.0),
        (Bound::AtLeast(20.0), 50.0),
    ],
    30.0,
);

pub fn quality(input: &ScoreInput) -> f64 {
    let scale = REVENUE_SCALE.score(input.number_or("revenue_billions", 0.0));

    let profit_base = if input.flag_or("is_profitable", false) {
        PROFITABLE_MARGIN.score(input.number_or("operating_margin_pct", 0.0))
    } else {
        MONTHS_TO_PROFIT.score(input.number_or("path_to_profit_months", 999.0))
    };
    let profit_path = PROFIT_PATH_PENALTIES.accumulate(profit_base, &input.flags("profit_path_penalties"));

    let gross = GROSS_MARGIN.score(input.number_or("gross_margin_pct", 0.0));
    let unit_economics = shared::unit_economics(input);
    let customers = customer_quality(input);

    finish(
        &weights::T3_QUALITY,
        &[scale, profit_path, gross, unit_economics, customers],
    )
}

fn customer_quality(input: &ScoreInput) -> f64 {
    if input.flag_or("is_saas", false) {
        return NET_REVENUE_RETENTION.score(input.number_or("nrr_pct", 100.0));
    }

    shared::best_proxy(&[
        CONCENTRATION.score(input.number_or("top_customer_concentration_pct", 100.0)),
        CUSTOMER_GROWTH.score(input.number_or("customer_growth_pct", 0.0)),
        REPEAT_REVENUE.score(input.number_or("repeat_revenue_pct", 0.0)),
    ])
}

// ============================================================================
// Growth
// ============================================================================

const TTM_GROWTH: Ladder = Ladder::new(
    &[
        (Bound::Above(50.0), 100.0),
        (Bound::AtLeast(40.0), 90.0),
        (Bound::AtLeast(32.0), 80.0),
        (Bound::AtLeast(25.0), 70.0),
        (Bound::AtLeast(20.0), 55.0),
        (Bound::AtLeast(15.0), 35.0),
    ],
    15.0,
);

const FORWARD_GROWTH: Ladder = Ladder::new(
    &[
        (Bound::Above(40.0), 100.0),
        (Bound::AtLeast(32.0), 85.0),
        (Bound::AtLeast(25.0), 70.0),
        (Bound::AtLeast(20.0), 55.0),
        (Bound::AtLeast(15.0), 40.0),
    ],
    20.0,
);

const DRIVERS: BonusTable = BonusTable::new(&[
    ("multiple_segments_25plus", 30.0),
    ("geographic_expansion", 20.0),
    ("new_product_launches", 20.0),
    ("platform_effects", 20.0),
    ("viral_network", 15.0),
]);

pub fn growth(input: &ScoreInput) -> f64 {
    let ttm = input.number_or("revenue_growth_ttm_pct", 0.0);
    let revenue = TTM_GROWTH.score(ttm);

    let quarters = input.number_or("quarters_accelerating", 0.0);
    let acceleration = if quarters >= 4.0 {
        100.0
    } else if quarters == 3.0 {
        90.0
    } else if quarters == 2.0 {
        75.0
    } else if ttm >= 30.0 {
        60.0
    } else {
        30.0
    };

    let forward_estimate = input.number_or("analyst_forward_growth_pct", 0.0);
    let forward_bonus = if relative::forward_outpaces(forward_estimate, ttm, 8.0) {
        20.0
    } else {
        0.0
    };
    let forward = (FORWARD_GROWTH.score(forward_estimate) + forward_bonus).min(100.0);

    let tam = input.number_or("tam_billions", 0.0);
    let penetration = input.number_or("market_penetration_pct", 100.0);
    let tam_score = if tam > 75.0 && penetration < 8.0 {
        100.0
    } else if tam >= 50.0 && penetration < 12.0 {
        85.0
    } else if tam >= 30.0 && penetration < 15.0 {
        70.0
    } else if tam >= 15.0 && penetration < 20.0 {
        55.0
    } else {
        35.0
    };

    let drivers = DRIVERS.accumulate(NEUTRAL_SCORE, &input.flags("growth_driver_bonuses"));
    let cyclicality = match input.text_or("business_type", "software") {
        "software" | "saas" | "non_cyclical" => 100.0,
        "early_mid_cycle_secular" => 85.0,
        "mid_cycle" => 70.0,
        "late_cycle" => 45.0,
        _ => 25.0,
    };

    finish(
        &weights::T3_GROWTH,
        &[revenue, acceleration, forward, tam_score, drivers, cyclicality],
    )
}

// ============================================================================
// Momentum
// ============================================================================

const RETURN_6M: Ladder = Ladder::new(
    &[
        (Bound::Above(70.0), 100.0),
        (Bound::AtLeast(50.0), 90.0),
        (Bound::AtLeast(30.0), 75.0),
        (Bound::AtLeast(15.0), 55.0),
        (Bound::AtLeast(0.0), 40.0),
    ],
    60.0,
);

const RELATIVE_STRENGTH: Ladder = Ladder::new(
    &[
        (Bound::Above(20.0), 100.0),
        (Bound::AtLeast(12.0), 80.0),
        (Bound::AtLeast(5.0), 60.0),
        (Bound::AtLeast(0.0), 45.0),
    ],
    30.0,
);

const ANALYST_MOMENTUM: BonusTable =
    BonusTable::new(&[("upgrades_3plus", 15.0), ("price_target_raises", 10.0)]);

/// Volume step: surge, rising, flat, or drying up.
const VOLUME_CHANGE: Ladder = Ladder::new(
    &[
        (Bound::Above(50.0), 25.0),
        (Bound::AtLeast(25.0), 15.0),
        (Bound::AtLeast(-25.0), 0.0),
    ],
    -15.0,
);

pub fn momentum(input: &ScoreInput) -> f64 {
    let return_6m = input.number_or("return_6m_pct", 0.0);
    let return_score = RETURN_6M.score(return_6m);

    let analyst_flags = input.flags("analyst_momentum_bonuses");
    let excess = relative::excess_return(return_6m, input.number_or("iwm_return_6m_pct", 0.0));
    let relative_score = ANALYST_MOMENTUM.accumulate(RELATIVE_STRENGTH.score(excess), &analyst_flags);

    let mut sentiment = NEUTRAL_SCORE + VOLUME_CHANGE.score(input.number_or("volume_change_pct", 0.0));
    if input.flag_or("sentiment_positive", false) {
        sentiment += 15.0;
    }
    if analyst_flags.is_set("analyst_momentum") {
        sentiment += 15.0;
    }

    finish(
        &weights::T3_MOMENTUM,
        &[return_score, relative_score, clamp_score(sentiment)],
    )
}

// ============================================================================
// Scale Inflection
// ============================================================================

const GROWTH_LEAD: Ladder = Ladder::new(
    &[
        (Bound::AtLeast(10.0), 100.0),
        (Bound::AtLeast(5.0), 80.0),
        (Bound::AtLeast(0.0), 60.0),
    ],
    30.0,
);

const MARGIN_EXPANSION: Ladder = Ladder::new(
    &[
        (Bound::Above(400.0), 100.0),
        (Bound::AtLeast(250.0), 85.0),
        (Bound::AtLeast(150.0), 70.0),
        (Bound::AtLeast(100.0), 55.0),
    ],
    35.0,
);

const MOAT_FORMATION: BonusTable = BonusTable::new(&[
    ("network_effects", 30.0),
    ("switching_costs", 25.0),
    ("scale_advantages", 20.0),
    ("data_ip_moat", 20.0),
    ("brand_emerging", 15.0),
]);

const PARTNERSHIPS: BonusTable = BonusTable::new(&[
    ("major_tech_partners", 30.0),
    ("gov_enterprise", 25.0),
    ("critical_integrations", 20.0),
    ("ecosystem_role", 15.0),
]);

pub fn scale_inflection(input: &ScoreInput) -> f64 {
    let lead = input.number_or("revenue_growth_ttm_pct", 0.0) - input.number_or("sector_avg_growth_pct", 0.0);
    let market_position = GROWTH_LEAD.score(lead);
    let operating_leverage = MARGIN_EXPANSION.score(input.number_or("margin_trend_bps_per_year", 0.0));
    let moat = MOAT_FORMATION.accumulate(NEUTRAL_SCORE, &input.flags("moat_formation_bonuses"));
    let partnerships = PARTNERSHIPS.accumulate(NEUTRAL_SCORE, &input.flags("partnership_bonuses"));

    finish(
        &weights::T3_SCALE_INFLECTION,
        &[market_position, operating_leverage, moat, partnerships],
    )
}

/// All five Tier 3 components in composite order.
pub fn score(input: &ScoreInput) -> [f64; 5] {
    [
        valuation(input),
        quality(input),
        growth(input),
        momentum(input),
        scale_inflection(input),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valuation_with_growth_context() {
        let input = ScoreInput::new()
            .with_number("ps_ratio", 25.0)
            .with_number("revenue_growth_ttm_pct", 45.0)
            .with_number("sector_median_ps", 20.0)
            .with_number("insider_ownership_pct", 12.0);
        // P/S 55 + 25 = 80; ratio 1.25 → 60; insider 75
        // 80 * 0.60 + 60 * 0.25 + 75 * 0.15 = 74.25
        assert_eq!(valuation(&input), 74.25);
    }

    #[test]
    fn test_relative_ps_without_median_is_in_line() {
        let input = ScoreInput::new().with_number("ps_ratio", 12.0);
        assert_eq!(relative::sector_ratio(input.try_number("ps_ratio").ok(), None), 1.0);
        assert_eq!(RELATIVE_PS.score(1.0), 75.0);
    }

    #[test]
    fn test_insider_bonuses_cap() {
        let input = ScoreInput::new()
            .with_number("insider_ownership_pct", 30.0)
            .with_flags("insider_bonuses", &["recent_buying"]);
        assert_eq!(insider_score(&input), 100.0);
    }

    #[test]
    fn test_profit_path_penalties_floor_at_zero() {
        let input = ScoreInput::new()
            .with_number("path_to_profit_months", 48.0)
            .with_flags(
                "profit_path_penalties",
                &["burn_accelerating", "no_guidance", "frequent_raises"],
            );
        let unpenalised = ScoreInput::new().with_number("path_to_profit_months", 48.0);
        // 15 points of profit path at 20% weight
        assert!((quality(&unpenalised) - quality(&input) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_customer_quality_branches() {
        let saas = ScoreInput::new()
            .with_flag("is_saas", true)
            .with_number("nrr_pct", 118.0);
        assert_eq!(customer_quality(&saas), 85.0);

        let other = ScoreInput::new()
            .with_number("top_customer_concentration_pct", 15.0)
            .with_number("repeat_revenue_pct", 65.0);
        assert_eq!(customer_quality(&other), 100.0);
    }

    #[test]
    fn test_acceleration_quarters() {
        let four = ScoreInput::new().with_number("quarters_accelerating", 6.0);
        let two = ScoreInput::new().with_number("quarters_accelerating", 2.0);
        // (100 - 75) at 18% weight
        assert!((growth(&four) - growth(&two) - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_volume_and_sentiment() {
        let quiet = ScoreInput::new().with_number("volume_change_pct", -40.0);
        let busy = ScoreInput::new()
            .with_number("volume_change_pct", 60.0)
            .with_flag("sentiment_positive", true)
            .with_flags("analyst_momentum_bonuses", &["analyst_momentum"]);
        // sentiment 35 vs 100 at 25% weight
        assert!((momentum(&busy) - momentum(&quiet) - 16.25).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_scores_in_range() {
        let scores = score(&ScoreInput::new());
        assert!(scores.iter().all(|s| (0.0..=100.0).contains(s)));
    }

    #[test]
    fn test_missing_ps_is_expensive_against_sector() {
        let base = ScoreInput::new().with_number("market_cap_billions", 25.0);
        let missing = base.clone().with_number("sector_median_ps", 10.0);
        let explicit = missing.clone().with_number("ps_ratio", 999.0);
        assert_eq!(valuation(&missing), valuation(&explicit));
        // Without a median the comparison is in line (75) rather than worst (20)
        let gap = valuation(&base) - valuation(&missing);
        assert!((gap - 0.25 * (75.0 - 20.0)).abs() < 1e-6, "gap {gap}");
    }
}
