//! Property tests for scoring invariants.

use equity_scoring::brackets::BonusTable;
use equity_scoring::{
    calculate_position_size, calculate_score, Composite, FlagSet, Rating, ScoreInput, Tier,
};
use proptest::prelude::*;

const NUMERIC_FIELDS: &[&str] = &[
    "market_cap_billions",
    "beta",
    "pe_ratio",
    "historical_pe_avg",
    "forward_pe",
    "ps_ratio",
    "peg_ratio",
    "sector_median_pe",
    "sector_median_ps",
    "roic_pct",
    "gross_margin_pct",
    "operating_margin_pct",
    "revenue_growth_ttm_pct",
    "revenue_cagr_3yr_pct",
    "eps_cagr_3yr_pct",
    "return_12m_pct",
    "return_6m_pct",
    "price",
    "ma_50",
    "ma_200",
    "net_cash_billions",
    "fcf_billions",
    "ltv_cac_ratio",
    "insider_ownership_pct",
    "tam_billions",
    "volume_change_pct",
];

static EVERY_FLAG: BonusTable = BonusTable::new(&[
    ("a", 40.0),
    ("b", 35.0),
    ("c", 30.0),
    ("d", -20.0),
    ("e", 25.0),
]);

fn arb_input() -> impl Strategy<Value = ScoreInput> {
    prop::collection::vec((0..NUMERIC_FIELDS.len(), -500.0f64..5000.0), 0..24).prop_map(|fields| {
        fields
            .into_iter()
            .fold(ScoreInput::new(), |input, (i, value)| input.with_number(NUMERIC_FIELDS[i], value))
    })
}

fn arb_tier() -> impl Strategy<Value = Tier> {
    prop::sample::select(Tier::ALL.to_vec())
}

proptest! {
    #[test]
    fn scores_stay_in_range(input in arb_input()) {
        let result = calculate_score("PROP", &input);
        prop_assert!((0.0..=100.0).contains(&result.composite_score));
        for score in result.components.values() {
            prop_assert!((0.0..=100.0).contains(score), "component {}", score);
        }
        prop_assert_eq!(result.components.len(), 5);
        prop_assert!(result.position_size_pct >= 0.0);
        prop_assert_eq!(result.rating, Rating::from_score(result.composite_score));
        prop_assert_eq!(result.tier, Tier::from_market_cap(result.market_cap_billions));
    }

    #[test]
    fn bonuses_are_capped(base in -50.0f64..150.0, mask in 0u8..32) {
        let flags: FlagSet = EVERY_FLAG
            .names()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, name)| name)
            .collect();
        let score = EVERY_FLAG.accumulate(base, &flags);
        prop_assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn composite_is_monotone_in_each_component(
        tier in arb_tier(),
        scores in prop::array::uniform5(0.0f64..100.0),
        index in 0usize..5,
        bump in 0.0f64..50.0,
    ) {
        let mut raised = scores;
        raised[index] += bump;
        let before = Composite::from_scores(tier, scores).score;
        let after = Composite::from_scores(tier, raised).score;
        prop_assert!(after >= before, "{} < {}", after, before);
    }

    #[test]
    fn position_rises_with_score_and_falls_with_beta(
        tier in arb_tier(),
        score in 0.0f64..100.0,
        extra in 0.0f64..20.0,
        beta in 0.5f64..3.0,
        beta_bump in 0.0f64..1.0,
    ) {
        let base = calculate_position_size(tier, score, beta);
        prop_assert!(calculate_position_size(tier, score + extra, beta) >= base);
        prop_assert!(calculate_position_size(tier, score, beta + beta_bump) <= base);
    }

    #[test]
    fn larger_caps_never_land_in_riskier_tiers(cap in -10.0f64..2000.0, more in 0.0f64..500.0) {
        prop_assert!(Tier::from_market_cap(cap + more).number() <= Tier::from_market_cap(cap).number());
    }
}
