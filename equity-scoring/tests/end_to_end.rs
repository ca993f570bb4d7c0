//! End-to-end scoring tests through the public API.

use equity_scoring::{
    calculate_position_size, calculate_score, determine_tier, BatchSummary, BufferHealth,
    ComponentKind, Rating, ScoreInput, ScoringEngine, Tier,
};
use test_case::test_case;

const MEGA_CAP_JSON: &str = r#"{
    "market_cap_billions": 1800,
    "pe_ratio": 22,
    "historical_pe_avg": 25,
    "fcf_yield_pct": 4.17,
    "peg_ratio": 1.4,
    "roic_pct": 24.08,
    "operating_margin_pct": 32.08,
    "margin_trend_bps_per_year": 150,
    "moat_bonuses": { "network_effects": true, "economies_of_scale": true, "regulatory_moat": false },
    "earnings_beat_rate_pct": 83.3,
    "mgmt_bonuses": { "consistent_buybacks": true },
    "cash_conversion_ratio": 1.25,
    "revenue_cagr_3yr_pct": 11.86,
    "revenue_growth_recent_yoy_pct": 16.0,
    "eps_cagr_3yr_pct": 15.0,
    "tam_billions": 500,
    "market_share_pct": 15,
    "analyst_forward_growth_pct": 12,
    "return_12m_pct": 35.2,
    "spy_return_12m_pct": 25.0,
    "price": 140,
    "ma_50": 135,
    "ma_200": 125,
    "net_cash_billions": 100,
    "fcf_billions": 75,
    "capital_allocation_bonuses": { "buybacks_rnd_gt_10pct": true, "value_creating_ma": true },
    "beta": 1.1
}"#;

fn mega_cap() -> ScoreInput {
    serde_json::from_str(MEGA_CAP_JSON).unwrap()
}

#[test]
fn test_reference_mega_cap_end_to_end() {
    let result = calculate_score("MEGA", &mega_cap());

    assert_eq!(result.tier, Tier::MegaCapCore);
    assert_eq!(result.tier_number, 1);
    assert_eq!(result.component(ComponentKind::Valuation), Some(88.75));
    assert_eq!(result.component(ComponentKind::Quality), Some(94.3));
    assert_eq!(result.component(ComponentKind::Growth), Some(76.75));
    assert_eq!(result.component(ComponentKind::Momentum), Some(100.0));
    assert_eq!(result.component(ComponentKind::FinancialHealth), Some(99.5));
    assert_eq!(result.composite_score, 89.89);
    assert_eq!(result.rating, Rating::StrongBuy);
    assert_eq!(result.stars.chars().count(), 5);
    assert_eq!(result.min_score_for_tier, 60.0);
    assert_eq!(result.score_buffer, 29.89);
    assert_eq!(result.buffer_health, BufferHealth::Healthy);
    assert!(result.qualifies);
    assert_eq!(result.position_size_pct, 8.5);
    assert_eq!(result.beta, 1.1);
}

#[test]
fn test_result_serializes_component_names() {
    let result = calculate_score("MEGA", &mega_cap());
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["rating"], "Strong Buy");
    assert_eq!(json["components"]["Financial_Health"], 99.5);
    assert_eq!(json["buffer_health"], "healthy");
    assert_eq!(json["tier"], "MegaCapCore");
}

#[test]
fn test_malformed_field_is_treated_as_missing() {
    let mut json: serde_json::Value = serde_json::from_str(MEGA_CAP_JSON).unwrap();
    json["beta"] = serde_json::json!("high");
    let input: ScoreInput = serde_json::from_value(json).unwrap();

    let result = calculate_score("MEGA", &input);
    assert_eq!(result.beta, 1.0);
    assert_eq!(result.composite_score, 89.89);
}

#[test_case(250.0, Tier::MegaCapCore)]
#[test_case(200.0, Tier::MegaCapCore ; "tier 1 lower bound")]
#[test_case(199.99, Tier::LargeCapGrowth)]
#[test_case(50.0, Tier::LargeCapGrowth ; "tier 2 lower bound")]
#[test_case(49.99, Tier::MidCapEmerging)]
#[test_case(10.0, Tier::MidCapEmerging ; "tier 3 lower bound")]
#[test_case(9.99, Tier::SmallCapMoonshot)]
#[test_case(9.999, Tier::SmallCapMoonshot)]
#[test_case(0.0, Tier::SmallCapMoonshot ; "zero cap")]
#[test_case(-5.0, Tier::SmallCapMoonshot ; "negative cap")]
#[test_case(f64::NAN, Tier::SmallCapMoonshot ; "nan cap")]
fn test_tier_boundaries(market_cap: f64, expected: Tier) {
    assert_eq!(determine_tier(market_cap), expected);
}

#[test]
fn test_large_cap_strong_beats_weak() {
    let weak = ScoreInput::new().with_number("market_cap_billions", 120.0);
    let strong = ScoreInput::new()
        .with_number("market_cap_billions", 120.0)
        .with_flag("is_profitable", true)
        .with_number("forward_pe", 22.0)
        .with_number("peg_ratio", 0.9)
        .with_number("gross_margin_pct", 78.0)
        .with_number("operating_margin_pct", 28.0)
        .with_number("revenue_growth_ttm_pct", 35.0)
        .with_number("revenue_growth_recent_yoy_pct", 38.0)
        .with_number("eps_growth_pct", 45.0)
        .with_number("analyst_forward_growth_pct", 30.0)
        .with_number("return_6m_pct", 30.0)
        .with_number("qqq_return_6m_pct", 10.0)
        .with_number("revenue_billions", 20.0)
        .with_number("tam_billions", 400.0)
        .with_number("market_penetration_pct", 5.0)
        .with_flags("market_position_bonuses", &["top_1_or_2"])
        .with_flags("institutional_bonuses", &["increasing_ownership"]);

    let weak = calculate_score("WEAK", &weak);
    let strong = calculate_score("STRONG", &strong);

    assert_eq!(weak.tier, Tier::LargeCapGrowth);
    assert_eq!(strong.tier, Tier::LargeCapGrowth);
    assert!(strong.component(ComponentKind::ScaleMoat).is_some());
    assert!(strong.component(ComponentKind::FinancialHealth).is_none());
    assert!(strong.composite_score > weak.composite_score);
    assert!(strong.position_size_pct >= weak.position_size_pct);
}

#[test]
fn test_mid_cap_growth_profile() {
    let input = ScoreInput::new()
        .with_number("market_cap_billions", 25.0)
        .with_number("ps_ratio", 6.0)
        .with_number("revenue_growth_ttm_pct", 45.0)
        .with_number("gross_margin_pct", 75.0)
        .with_number("quarters_accelerating", 3.0)
        .with_number("insider_ownership_pct", 12.0)
        .with_number("return_6m_pct", 40.0)
        .with_number("iwm_return_6m_pct", 5.0)
        .with_flag("sentiment_positive", true);
    let baseline = ScoreInput::new().with_number("market_cap_billions", 25.0);

    let result = calculate_score("GROW", &input);
    let baseline = calculate_score("FLAT", &baseline);

    assert_eq!(result.tier, Tier::MidCapEmerging);
    assert_eq!(result.min_score_for_tier, 67.0);
    assert!(result.component(ComponentKind::ScaleInflection).is_some());
    assert!(result.component(ComponentKind::Growth) > baseline.component(ComponentKind::Growth));
    assert!(result.composite_score > baseline.composite_score);
}

#[test]
fn test_small_cap_disruptor_outscores_incremental() {
    let base = ScoreInput::new()
        .with_number("market_cap_billions", 3.0)
        .with_number("beta", 1.8);
    let disruptor = base
        .clone()
        .with_text("disruption_type", "attacking_100b_plus")
        .with_text("market_structure", "winner_take_most")
        .with_flags("tech_moat_bonuses", &["proprietary_ai_ml", "strong_patents"])
        .with_flags("catalyst_bonuses", &["major_launch_6mo", "regulatory_approval"]);

    let incremental = calculate_score("INCR", &base);
    let disruptor = calculate_score("DISR", &disruptor);

    assert_eq!(disruptor.tier, Tier::SmallCapMoonshot);
    assert_eq!(disruptor.min_score_for_tier, 70.0);
    assert!(
        disruptor.component(ComponentKind::Disruption)
            > incremental.component(ComponentKind::Disruption)
    );
    assert!(disruptor.composite_score > incremental.composite_score);
}

#[test]
fn test_reference_position_size() {
    assert_eq!(calculate_position_size(Tier::MegaCapCore, 89.89, 1.1), 8.5);
}

#[test]
fn test_batch_matches_single_scoring_and_summarizes() {
    let engine = ScoringEngine::new();
    let records = vec![
        ("MEGA".to_string(), mega_cap()),
        ("EMPTY".to_string(), ScoreInput::new()),
        (
            "LARGE".to_string(),
            ScoreInput::new().with_number("market_cap_billions", 60.0),
        ),
    ];

    let results = engine.score_batch(&records);
    assert_eq!(results.len(), 3);
    for ((ticker, input), result) in records.iter().zip(&results) {
        assert_eq!(&result.ticker, ticker);
        assert_eq!(result, &engine.calculate_score(ticker, input));
    }

    let summary = BatchSummary::from_results(&results);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.top[0], "MEGA");
    assert_eq!(summary.rating_count(Rating::StrongBuy), 1);
    assert_eq!(summary.tier_count(Tier::SmallCapMoonshot), 1);
    assert_eq!(summary.by_tier.values().sum::<usize>(), 3);
}
