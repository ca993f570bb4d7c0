//! Tier 2: Large-Cap Growth.
//!
//! Scaled growers, scored on growth durability and a moat that is still
//! forming. Relative strength is measured against QQQ.

use super::{finish, shared};
use crate::brackets::{bracket_score, BonusTable, Bound, Ladder, NEUTRAL_SCORE};
use crate::input::ScoreInput;
use crate::relative;
use crate::weights;

// ============================================================================
// Valuation
// ============================================================================

const FORWARD_PE: Ladder = Ladder::new(
    &[
        (Bound::Below(25.0), 100.0),
        (Bound::Below(35.0), 85.0),
        (Bound::Below(50.0), 70.0),
        (Bound::Below(70.0), 50.0),
    ],
    35.0,
);

const PRICE_TO_SALES: Ladder = Ladder::new(
    &[
        (Bound::Below(8.0), 100.0),
        (Bound::Below(12.0), 85.0),
        (Bound::Below(18.0), 70.0),
        (Bound::Below(25.0), 50.0),
        (Bound::Below(35.0), 35.0),
    ],
    25.0,
);

const PEG: Ladder = Ladder::new(
    &[
        (Bound::Below(1.0), 100.0),
        (Bound::Below(1.5), 85.0),
        (Bound::Below(2.0), 70.0),
        (Bound::Below(2.5), 50.0),
    ],
    30.0,
);

const RELATIVE_VALUATION: Ladder = Ladder::new(
    &[
        (Bound::Below(1.0), 100.0),
        (Bound::AtMost(1.15), 80.0),
        (Bound::AtMost(1.30), 60.0),
        (Bound::AtMost(1.50), 40.0),
    ],
    20.0,
);

/// Forward P/E (profitable) or P/S (unprofitable), PEG, and P/E against
/// the sector median.
pub fn valuation(input: &ScoreInput) -> f64 {
    let multiple = if input.flag_or("is_profitable", true) {
        FORWARD_PE.score(input.number_or("forward_pe", 999.0))
    } else {
        price_to_sales(input)
    };

    let peg = PEG.score(input.number_or("peg_ratio", 999.0));

    let ratio = relative::sector_ratio(
        input.try_number("forward_pe").ok(),
        input.try_number("sector_median_pe").ok(),
    );
    let relative_score = RELATIVE_VALUATION.score(ratio);

    finish(&weights::T2_VALUATION, &[multiple, peg, relative_score])
}

/// P/S with the growth-context bonus: a rich multiple is partly excused by
/// fast enough growth.
fn price_to_sales(input: &ScoreInput) -> f64 {
    let ps = input.number_or("ps_ratio", 999.0);
    let growth = input.number_or("revenue_growth_recent_yoy_pct", 0.0);

    let bonus = if growth > 50.0 && ps > 35.0 {
        15.0
    } else if growth > 50.0 && (25.0..=35.0).contains(&ps) {
        25.0
    } else if growth > 35.0 && (18.0..=25.0).contains(&ps) {
        20.0
    } else {
        0.0
    };

    (PRICE_TO_SALES.score(ps) + bonus).min(100.0)
}

// ============================================================================
// Quality
// ============================================================================

const REVENUE_SCALE: &[(f64, f64)] = &[
    (10.0, 100.0),
    (7.0, 90.0),
    (5.0, 80.0),
    (3.0, 70.0),
    (2.0, 60.0),
    (0.0, 45.0),
];

const GAAP_MARGIN: Ladder = Ladder::new(
    &[
        (Bound::Above(20.0), 100.0),
        (Bound::AtLeast(15.0), 90.0),
        (Bound::AtLeast(10.0), 75.0),
        (Bound::AtLeast(5.0), 60.0),
    ],
    50.0,
);

const QUARTERS_TO_PROFIT: Ladder =
    Ladder::new(&[(Bound::Below(4.0), 40.0), (Bound::Below(8.0), 30.0)], 15.0);

const GROSS_MARGIN: Ladder = Ladder::new(
    &[
        (Bound::Above(75.0), 100.0),
        (Bound::AtLeast(65.0), 90.0),
        (Bound::AtLeast(55.0), 80.0),
        (Bound::AtLeast(45.0), 70.0),
        (Bound::AtLeast(35.0), 55.0),
    ],
    35.0,
);

const MARGIN_TRAJECTORY: Ladder = Ladder::new(
    &[
        (Bound::Above(300.0), 100.0),
        (Bound::AtLeast(200.0), 90.0),
        (Bound::AtLeast(100.0), 80.0),
        (Bound::AtLeast(50.0), 65.0),
        (Bound::AtLeast(-50.0), 50.0),
    ],
    25.0,
);

const NET_REVENUE_RETENTION: Ladder = Ladder::new(
    &[
        (Bound::Above(130.0), 100.0),
        (Bound::AtLeast(120.0), 90.0),
        (Bound::AtLeast(110.0), 80.0),
        (Bound::AtLeast(100.0), 65.0),
        (Bound::AtLeast(90.0), 45.0),
    ],
    25.0,
);

const REPEAT_REVENUE: Ladder = Ladder::new(
    &[
        (Bound::Above(70.0), 100.0),
        (Bound::AtLeast(50.0), 80.0),
        (Bound::AtLeast(30.0), 60.0),
    ],
    40.0,
);

const CHURN: Ladder = Ladder::new(
    &[
        (Bound::Below(5.0), 100.0),
        (Bound::Below(10.0), 75.0),
        (Bound::Below(15.0), 50.0),
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

const CONCENTRATION: Ladder = Ladder::new(
    &[
        (Bound::Below(10.0), 85.0),
        (Bound::Below(20.0), 70.0),
        (Bound::Below(30.0), 50.0),
    ],
    25.0,
);

/// `top_1_or_2` and `top_3_to_5` are exclusive; only the first counts.
const MARKET_RANK: BonusTable = BonusTable::new(&[("top_1_or_2", 35.0), ("top_3_to_5", 25.0)]);
const MARKET_MOMENTUM: BonusTable =
    BonusTable::new(&[("gaining_share", 25.0), ("category_leader", 30.0)]);

pub fn quality(input: &ScoreInput) -> f64 {
    let scale = bracket_score(input.number_or("revenue_billions", 0.0), REVENUE_SCALE);

    let profitability = if input.flag_or("is_gaap_profitable", false) {
        GAAP_MARGIN.score(input.number_or("operating_margin_pct", 0.0))
    } else {
        QUARTERS_TO_PROFIT.score(input.number_or("path_to_profit_quarters", 999.0))
    };

    let gross = GROSS_MARGIN.score(input.number_or("gross_margin_pct", 0.0));
    let trajectory = MARGIN_TRAJECTORY.score(input.number_or("margin_trend_bps_per_year", 0.0));
    let retention = customer_retention(input);

    let position_flags = input.flags("market_position_bonuses");
    let position = MARKET_MOMENTUM.accumulate(
        NEUTRAL_SCORE + MARKET_RANK.first_of(&position_flags),
        &position_flags,
    );

    finish(
        &weights::T2_QUALITY,
        &[scale, profitability, gross, trajectory, retention, position],
    )
}

/// SaaS issuers score NRR with a dollar-retention kicker; everyone else is
/// credited with the best of four retention proxies.
fn customer_retention(input: &ScoreInput) -> f64 {
    if input.flag_or("is_saas", false) {
        let base = NET_REVENUE_RETENTION.score(input.number_or("nrr_pct", 100.0));
        let kicker = if input.number_or("dollar_based_retention_pct", 100.0) > 105.0 {
            15.0
        } else {
            0.0
        };
        return (base + kicker).min(100.0);
    }

    shared::best_proxy(&[
        REPEAT_REVENUE.score(input.number_or("repeat_revenue_pct", 0.0)),
        CHURN.score(input.number_or("customer_churn_pct", 100.0)),
        CUSTOMER_GROWTH.score(input.number_or("customer_growth_pct", 0.0)),
        CONCENTRATION.score(input.number_or("top_customer_concentration_pct", 100.0)),
    ])
}

// ============================================================================
// Growth
// ============================================================================

const TTM_GROWTH: Ladder = Ladder::new(
    &[
        (Bound::Above(35.0), 100.0),
        (Bound::AtLeast(28.0), 90.0),
        (Bound::AtLeast(22.0), 80.0),
        (Bound::AtLeast(18.0), 70.0),
        (Bound::AtLeast(15.0), 55.0),
        (Bound::AtLeast(12.0), 40.0),
    ],
    20.0,
);

const FORWARD_GROWTH: Ladder = Ladder::new(
    &[
        (Bound::Above(30.0), 100.0),
        (Bound::AtLeast(25.0), 85.0),
        (Bound::AtLeast(20.0), 70.0),
        (Bound::AtLeast(15.0), 55.0),
        (Bound::AtLeast(10.0), 40.0),
    ],
    20.0,
);

const DRIVERS: BonusTable = BonusTable::new(&[
    ("multiple_segments_20plus", 25.0),
    ("geographic_expansion", 15.0),
    ("new_products", 15.0),
    ("platform_effects", 15.0),
    ("viral_network", 10.0),
]);

pub fn growth(input: &ScoreInput) -> f64 {
    let ttm = input.number_or("revenue_growth_ttm_pct", 0.0);
    let revenue = TTM_GROWTH.score(ttm);

    let years_fast = input.number_or("years_of_25plus_growth", 0.0);
    let consistency = if years_fast >= 3.0 {
        100.0
    } else if years_fast == 2.0 {
        85.0
    } else if input.flag_or("is_accelerating", false) {
        80.0
    } else if ttm >= 20.0 {
        60.0
    } else {
        20.0
    };

    let forward_estimate = input.number_or("analyst_forward_growth_pct", 0.0);
    let forward_bonus = if relative::forward_outpaces(forward_estimate, ttm, 5.0) {
        20.0
    } else {
        0.0
    };
    let forward = (FORWARD_GROWTH.score(forward_estimate) + forward_bonus).min(100.0);

    let eps_vs_revenue = relative::eps_versus_revenue(input.number_or("eps_growth_pct", 0.0), ttm);

    let tam = input.number_or("tam_billions", 0.0);
    let penetration = input.number_or("market_penetration_pct", 100.0);
    let tam_score = if tam > 100.0 && penetration < 10.0 {
        100.0
    } else if tam >= 75.0 && penetration < 12.0 {
        90.0
    } else if tam >= 50.0 && penetration < 15.0 {
        80.0
    } else if tam >= 25.0 && penetration < 20.0 {
        65.0
    } else {
        40.0
    };

    let drivers = DRIVERS.accumulate(NEUTRAL_SCORE, &input.flags("growth_driver_bonuses"));
    let cyclicality = match input.text_or("business_type", "software") {
        "software" | "saas" => 100.0,
        "early_mid_cycle" => 85.0,
        "late_cycle_secular" => 70.0,
        "peak_cycle" => 40.0,
        _ => 20.0,
    };

    finish(
        &weights::T2_GROWTH,
        &[
            revenue,
            consistency,
            forward,
            eps_vs_revenue,
            tam_score,
            drivers,
            cyclicality,
        ],
    )
}

// ============================================================================
// Momentum
// ============================================================================

/// Negative six-month returns score 60 as oversold.
const RETURN_6M: Ladder = Ladder::new(
    &[
        (Bound::Above(50.0), 100.0),
        (Bound::AtLeast(35.0), 85.0),
        (Bound::AtLeast(20.0), 70.0),
        (Bound::AtLeast(10.0), 50.0),
        (Bound::AtLeast(0.0), 40.0),
    ],
    60.0,
);

const INSTITUTIONAL: BonusTable = BonusTable::new(&[
    ("increasing_ownership", 15.0),
    ("smart_money", 10.0),
    ("insider_buying", 10.0),
]);

const RELATIVE_STRENGTH: Ladder = Ladder::new(
    &[
        (Bound::Above(15.0), 100.0),
        (Bound::AtLeast(8.0), 80.0),
        (Bound::AtLeast(0.0), 60.0),
        (Bound::AtLeast(-8.0), 45.0),
    ],
    30.0,
);

const ANALYST_MOMENTUM: BonusTable = BonusTable::new(&[
    ("multiple_upgrades", 15.0),
    ("price_target_increases", 10.0),
    ("positive_revisions", 10.0),
]);

pub fn momentum(input: &ScoreInput) -> f64 {
    let return_6m = input.number_or("return_6m_pct", 0.0);
    let return_score = INSTITUTIONAL.accumulate(
        RETURN_6M.score(return_6m),
        &input.flags("institutional_bonuses"),
    );

    let excess = relative::excess_return(return_6m, input.number_or("qqq_return_6m_pct", 0.0));
    let relative_score = ANALYST_MOMENTUM.accumulate(
        RELATIVE_STRENGTH.score(excess),
        &input.flags("analyst_momentum_bonuses"),
    );

    let technical = shared::technical_setup(input);

    finish(
        &weights::T2_MOMENTUM,
        &[return_score, relative_score, technical],
    )
}

// ============================================================================
// Scale & Moat
// ============================================================================

const MOAT_DEVELOPMENT: BonusTable = BonusTable::new(&[
    ("network_effects", 30.0),
    ("switching_costs", 25.0),
    ("economies_of_scale", 20.0),
    ("brand_ecosystem", 20.0),
    ("data_ip_moat", 15.0),
]);

const PARTNERSHIPS: BonusTable = BonusTable::new(&[
    ("major_tech_partners", 25.0),
    ("gov_contracts", 25.0),
    ("ecosystem_integrations", 20.0),
    ("strategic_customers", 15.0),
]);

pub fn scale_moat(input: &ScoreInput) -> f64 {
    let company_growth = input.number_or("revenue_growth_ttm_pct", 0.0);
    let sector_growth = input.number_or("sector_avg_growth_pct", 0.0);

    let competitive_position = if company_growth > sector_growth * 1.5 {
        100.0
    } else if company_growth > sector_growth * 1.2 {
        80.0
    } else if company_growth >= sector_growth {
        60.0
    } else {
        30.0
    };

    let moat = MOAT_DEVELOPMENT.accumulate(NEUTRAL_SCORE, &input.flags("moat_development_bonuses"));

    // Margin expansion outrunning ten times the growth rate is a rough
    // operating-leverage proxy.
    let margin_expansion = input.number_or("margin_trend_bps_per_year", 0.0);
    let operating_leverage = if margin_expansion > company_growth * 10.0 {
        100.0
    } else if margin_expansion > 0.0 {
        75.0
    } else if margin_expansion > -100.0 {
        50.0
    } else {
        30.0
    };

    let partnerships = PARTNERSHIPS.accumulate(NEUTRAL_SCORE, &input.flags("partnership_bonuses"));

    finish(
        &weights::T2_SCALE_MOAT,
        &[competitive_position, moat, operating_leverage, partnerships],
    )
}

/// All five Tier 2 components in composite order.
pub fn score(input: &ScoreInput) -> [f64; 5] {
    [
        valuation(input),
        quality(input),
        growth(input),
        momentum(input),
        scale_moat(input),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profitable_valuation_uses_forward_pe() {
        let input = ScoreInput::new()
            .with_number("forward_pe", 30.0)
            .with_number("peg_ratio", 1.2)
            .with_number("sector_median_pe", 40.0);
        // 85 * 0.55 + 85 * 0.25 + 100 * 0.20
        assert_eq!(valuation(&input), 88.0);
    }

    #[test]
    fn test_unprofitable_growth_context_bonus() {
        let base = ScoreInput::new()
            .with_flag("is_profitable", false)
            .with_number("ps_ratio", 30.0);
        assert_eq!(price_to_sales(&base), 35.0);

        let fast = base.clone().with_number("revenue_growth_recent_yoy_pct", 60.0);
        assert_eq!(price_to_sales(&fast), 60.0);

        let very_rich = base.with_number("ps_ratio", 40.0).with_number("revenue_growth_recent_yoy_pct", 60.0);
        assert_eq!(price_to_sales(&very_rich), 40.0);
    }

    #[test]
    fn test_relative_valuation_neutral_without_median() {
        let input = ScoreInput::new().with_number("forward_pe", 30.0);
        let with_zero_median = input.clone().with_number("sector_median_pe", 0.0);
        assert_eq!(valuation(&input), valuation(&with_zero_median));
        // 85 * 0.55 + 30 * 0.25 + 80 * 0.20
        assert_eq!(valuation(&input), 70.25);
    }

    #[test]
    fn test_saas_retention_kicker_caps() {
        let input = ScoreInput::new()
            .with_flag("is_saas", true)
            .with_number("nrr_pct", 125.0)
            .with_number("dollar_based_retention_pct", 110.0);
        assert_eq!(customer_retention(&input), 100.0);

        let no_kicker = ScoreInput::new()
            .with_flag("is_saas", true)
            .with_number("nrr_pct", 105.0);
        assert_eq!(customer_retention(&no_kicker), 65.0);
    }

    #[test]
    fn test_non_saas_retention_takes_best_proxy() {
        let input = ScoreInput::new()
            .with_number("repeat_revenue_pct", 20.0)
            .with_number("customer_churn_pct", 7.0)
            .with_number("customer_growth_pct", 2.0);
        assert_eq!(customer_retention(&input), 75.0);

        assert_eq!(customer_retention(&ScoreInput::new()), 40.0);
    }

    #[test]
    fn test_market_rank_is_exclusive() {
        let both = ScoreInput::new().with_flags("market_position_bonuses", &["top_1_or_2", "top_3_to_5"]);
        let leader = ScoreInput::new().with_flags("market_position_bonuses", &["top_1_or_2"]);
        assert_eq!(quality(&both), quality(&leader));
    }

    #[test]
    fn test_forward_estimate_bonus() {
        let steady = ScoreInput::new()
            .with_number("revenue_growth_ttm_pct", 20.0)
            .with_number("analyst_forward_growth_pct", 22.0);
        let outpacing = steady.clone().with_number("analyst_forward_growth_pct", 26.0);
        assert!(growth(&outpacing) > growth(&steady));
    }

    #[test]
    fn test_unknown_business_type_is_most_cyclical() {
        let software = ScoreInput::new();
        let commodity = ScoreInput::new().with_text("business_type", "commodity");
        assert!((growth(&software) - growth(&commodity) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_scores_in_range() {
        let scores = score(&ScoreInput::new());
        assert!(scores.iter().all(|s| (0.0..=100.0).contains(s)));
    }
}
