//! Composite aggregation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::brackets::{clamp_score, round2};
use crate::tier::Tier;
use crate::weights::composite_table;

/// Name of a component score.
///
/// Ordering follows composite order, so a `BTreeMap` keyed by this type
/// lists Valuation first and the tier-specific component last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Valuation,
    Quality,
    Growth,
    Momentum,
    #[serde(rename = "Financial_Health")]
    FinancialHealth,
    #[serde(rename = "Scale_Moat")]
    ScaleMoat,
    #[serde(rename = "Scale_Inflection")]
    ScaleInflection,
    Disruption,
}

impl ComponentKind {
    /// The five components scored for a tier, in composite order.
    pub const fn for_tier(tier: Tier) -> [ComponentKind; 5] {
        let fifth = match tier {
            Tier::MegaCapCore => Self::FinancialHealth,
            Tier::LargeCapGrowth => Self::ScaleMoat,
            Tier::MidCapEmerging => Self::ScaleInflection,
            Tier::SmallCapMoonshot => Self::Disruption,
        };
        [
            Self::Valuation,
            Self::Quality,
            Self::Growth,
            Self::Momentum,
            fifth,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Valuation => "Valuation",
            Self::Quality => "Quality",
            Self::Growth => "Growth",
            Self::Momentum => "Momentum",
            Self::FinancialHealth => "Financial Health",
            Self::ScaleMoat => "Scale & Moat",
            Self::ScaleInflection => "Scale Inflection",
            Self::Disruption => "Disruption",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Composite score with its component breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    /// Weighted sum, rounded to two decimals
    pub score: f64,
    pub components: BTreeMap<ComponentKind, f64>,
}

impl Composite {
    /// Aggregate five component scores (in composite order) for a tier.
    pub fn from_scores(tier: Tier, scores: [f64; 5]) -> Self {
        let clamped = scores.map(clamp_score);
        let score = round2(clamp_score(composite_table(tier).combine(&clamped)));
        let components = ComponentKind::for_tier(tier).into_iter().zip(clamped).collect();

        Self { score, components }
    }

    /// Score of a component, if this tier has it.
    pub fn component(&self, kind: ComponentKind) -> Option<f64> {
        self.components.get(&kind).copied()
    }
}
