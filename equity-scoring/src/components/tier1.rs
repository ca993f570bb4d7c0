//! Tier 1: Mega-Cap Core.
//!
//! Established franchises are judged mostly on quality and valuation
//! against their own history. Relative strength is measured against SPY.

use super::{finish, shared};
use crate::brackets::{bracket_score, clamp_score, BonusTable, Bound, Ladder, NEUTRAL_SCORE};
use crate::input::ScoreInput;
use crate::relative;
use crate::weights;

// ============================================================================
// Valuation
// ============================================================================

const FCF_YIELD: &[(f64, f64)] = &[(5.0, 100.0), (3.0, 80.0), (2.0, 60.0), (1.0, 40.0), (0.0, 20.0)];

const PEG: Ladder = Ladder::new(
    &[
        (Bound::Below(1.0), 100.0),
        (Bound::AtMost(1.0), 100.0),
        (Bound::AtMost(1.5), 85.0),
        (Bound::AtMost(2.0), 70.0),
        (Bound::AtMost(2.5), 50.0),
    ],
    30.0,
);

/// P/E against its own history, FCF yield and PEG.
pub fn valuation(input: &ScoreInput) -> f64 {
    let pe = input.number_or("pe_ratio", 0.0);
    let historical_pe = input.number_or("historical_pe_avg", pe);
    let pe_score = if historical_pe > 0.0 {
        clamp_score(100.0 - (pe / historical_pe - 1.0) * 100.0)
    } else {
        NEUTRAL_SCORE
    };

    let fcf_score = bracket_score(fcf_yield(input), FCF_YIELD);
    let peg_score = PEG.score(input.number_or("peg_ratio", 999.0));

    finish(&weights::T1_VALUATION, &[pe_score, fcf_score, peg_score])
}

/// FCF yield in percent; derived from FCF and market cap when not given.
fn fcf_yield(input: &ScoreInput) -> f64 {
    if input.contains("fcf_yield_pct") {
        return input.number_or("fcf_yield_pct", 0.0);
    }

    let market_cap = input.market_cap_billions();
    if market_cap > 0.0 {
        input.number_or("fcf_billions", 0.0) / market_cap * 100.0
    } else {
        0.0
    }
}

// ============================================================================
// Quality
// ============================================================================

const ROIC: &[(f64, f64)] = &[(25.0, 100.0), (20.0, 90.0), (15.0, 75.0), (10.0, 50.0), (0.0, 25.0)];
const OPERATING_MARGIN: &[(f64, f64)] =
    &[(30.0, 100.0), (20.0, 85.0), (15.0, 70.0), (10.0, 50.0), (0.0, 30.0)];
const MARGIN_TREND: &[(f64, f64)] =
    &[(200.0, 100.0), (100.0, 85.0), (50.0, 70.0), (-50.0, 60.0), (-999.0, 25.0)];
const CASH_CONVERSION: &[(f64, f64)] = &[(1.2, 100.0), (1.0, 80.0), (0.8, 60.0), (0.0, 30.0)];

const MOAT: BonusTable = BonusTable::new(&[
    ("network_effects", 25.0),
    ("economies_of_scale", 20.0),
    ("switching_costs", 20.0),
    ("intangible_assets", 15.0),
    ("regulatory_moat", 10.0),
]);

const EARNINGS_BEAT_RATE: Ladder = Ladder::new(
    &[
        (Bound::Above(80.0), 100.0),
        (Bound::AtLeast(70.0), 85.0),
        (Bound::AtLeast(60.0), 70.0),
    ],
    50.0,
);

const MANAGEMENT: BonusTable = BonusTable::new(&[
    ("smart_ma", 10.0),
    ("consistent_buybacks", 8.0),
    ("growing_dividend", 7.0),
]);

pub fn quality(input: &ScoreInput) -> f64 {
    let roic = bracket_score(input.number_or("roic_pct", 0.0), ROIC);
    let margin = bracket_score(input.number_or("operating_margin_pct", 0.0), OPERATING_MARGIN);
    let trend = bracket_score(input.number_or("margin_trend_bps_per_year", 0.0), MARGIN_TREND);
    let moat = MOAT.accumulate(NEUTRAL_SCORE, &input.flags("moat_bonuses"));

    let management_base = EARNINGS_BEAT_RATE.score(input.number_or("earnings_beat_rate_pct", 50.0));
    let management = MANAGEMENT.accumulate(management_base, &input.flags("mgmt_bonuses"));

    let cash = bracket_score(input.number_or("cash_conversion_ratio", 0.0), CASH_CONVERSION);

    finish(
        &weights::T1_QUALITY,
        &[roic, margin, trend, moat, management, cash],
    )
}

// ============================================================================
// Growth
// ============================================================================

const REVENUE_CAGR: &[(f64, f64)] = &[
    (20.0, 100.0),
    (15.0, 85.0),
    (10.0, 65.0),
    (7.0, 45.0),
    (5.0, 30.0),
    (0.0, 15.0),
];
const EPS_CAGR: &[(f64, f64)] = &[(25.0, 100.0), (18.0, 85.0), (12.0, 70.0), (8.0, 50.0), (0.0, 30.0)];
const ANALYST_GROWTH: &[(f64, f64)] =
    &[(15.0, 100.0), (12.0, 80.0), (8.0, 60.0), (5.0, 40.0), (0.0, 20.0)];

const FUTURE_GROWTH: BonusTable = BonusTable::new(&[
    ("geographic_expansion", 10.0),
    ("new_product_cycles", 10.0),
    ("platform_effects", 10.0),
    ("multiple_growth_vectors", 10.0),
]);

pub fn growth(input: &ScoreInput) -> f64 {
    let revenue_cagr = input.number_or("revenue_cagr_3yr_pct", 0.0);
    let revenue = bracket_score(revenue_cagr, REVENUE_CAGR);

    let recent = input.number_or("revenue_growth_recent_yoy_pct", 0.0);
    let consistency = relative::consistency_step(recent - revenue_cagr);

    let eps_cagr = input.number_or("eps_cagr_3yr_pct", 0.0);
    let eps = clamp_score(
        bracket_score(eps_cagr, EPS_CAGR)
            + relative::operating_leverage_adjustment(eps_cagr, revenue_cagr, 5.0, 15.0),
    );

    let future = future_potential(input);
    let analyst = bracket_score(input.number_or("analyst_forward_growth_pct", 0.0), ANALYST_GROWTH);

    finish(
        &weights::T1_GROWTH,
        &[revenue, consistency, eps, future, analyst],
    )
}

/// Room to grow: addressable market size against current share.
fn future_potential(input: &ScoreInput) -> f64 {
    let tam = input.number_or("tam_billions", 0.0);
    let share = input.number_or("market_share_pct", 100.0);

    let base = if tam > 500.0 && share < 20.0 {
        100.0
    } else if tam >= 200.0 && share < 30.0 {
        85.0
    } else if tam >= 100.0 && share < 40.0 {
        70.0
    } else {
        50.0
    };

    FUTURE_GROWTH.accumulate(base, &input.flags("future_growth_bonuses"))
}

// ============================================================================
// Momentum
// ============================================================================

/// Drops below -10% score 60 as an oversold rebound candidate.
const RETURN_12M: Ladder = Ladder::new(
    &[
        (Bound::AtLeast(30.0), 100.0),
        (Bound::AtLeast(20.0), 80.0),
        (Bound::AtLeast(10.0), 60.0),
        (Bound::AtLeast(0.0), 45.0),
        (Bound::AtLeast(-10.0), 40.0),
    ],
    60.0,
);

const RELATIVE_STRENGTH: &[(f64, f64)] =
    &[(10.0, 100.0), (5.0, 75.0), (0.0, 60.0), (-5.0, 50.0), (-999.0, 30.0)];

pub fn momentum(input: &ScoreInput) -> f64 {
    let return_12m = input.number_or("return_12m_pct", 0.0);
    let return_score = RETURN_12M.score(return_12m);

    let excess = relative::excess_return(return_12m, input.number_or("spy_return_12m_pct", 0.0));
    let relative_score = bracket_score(excess, RELATIVE_STRENGTH);

    let technical = shared::technical_setup(input);

    finish(
        &weights::T1_MOMENTUM,
        &[return_score, relative_score, technical],
    )
}

// ============================================================================
// Financial Health
// ============================================================================

const NET_CASH: Ladder = Ladder::new(
    &[
        (Bound::Above(75.0), 100.0),
        (Bound::AtLeast(50.0), 90.0),
        (Bound::AtLeast(25.0), 80.0),
        (Bound::AtLeast(0.0), 70.0),
        (Bound::AtLeast(-50.0), 60.0),
    ],
    40.0,
);

const FCF_GENERATION: &[(f64, f64)] =
    &[(20.0, 100.0), (15.0, 90.0), (10.0, 80.0), (5.0, 60.0), (0.0, 40.0)];

const CAPITAL_ALLOCATION: BonusTable = BonusTable::new(&[
    ("buybacks_rnd_gt_10pct", 25.0),
    ("value_creating_ma", 20.0),
    ("growing_dividend", 15.0),
    ("disciplined_deployment", 10.0),
]);

pub fn financial_health(input: &ScoreInput) -> f64 {
    let net_cash = NET_CASH.score(input.number_or("net_cash_billions", 0.0));
    let fcf = bracket_score(input.number_or("fcf_billions", 0.0), FCF_GENERATION);
    let allocation =
        CAPITAL_ALLOCATION.accumulate(NEUTRAL_SCORE, &input.flags("capital_allocation_bonuses"));

    finish(&weights::T1_FINANCIAL_HEALTH, &[net_cash, fcf, allocation])
}

/// All five Tier 1 components in composite order.
pub fn score(input: &ScoreInput) -> [f64; 5] {
    [
        valuation(input),
        quality(input),
        growth(input),
        momentum(input),
        financial_health(input),
    ]
}
