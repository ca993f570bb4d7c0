//! Rating ladder and score-buffer health.

use serde::{Deserialize, Serialize};

/// Discrete rating derived from the composite score.
///
/// One global ladder, independent of tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Buy,
    Hold,
    Reduce,
    Sell,
}

impl Rating {
    /// Every rating, best first.
    pub const ALL: [Rating; 5] = [
        Self::StrongBuy,
        Self::Buy,
        Self::Hold,
        Self::Reduce,
        Self::Sell,
    ];

    /// Map a composite score: ≥80 Strong Buy, ≥70 Buy, ≥60 Hold, ≥50 Reduce.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::StrongBuy
        } else if score >= 70.0 {
            Self::Buy
        } else if score >= 60.0 {
            Self::Hold
        } else if score >= 50.0 {
            Self::Reduce
        } else {
            Self::Sell
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::StrongBuy => "Strong Buy",
            Self::Buy => "Buy",
            Self::Hold => "Hold",
            Self::Reduce => "Reduce",
            Self::Sell => "Sell",
        }
    }

    /// Star count, 5 for Strong Buy down to 1 for Sell.
    pub const fn star_count(self) -> usize {
        match self {
            Self::StrongBuy => 5,
            Self::Buy => 4,
            Self::Hold => 3,
            Self::Reduce => 2,
            Self::Sell => 1,
        }
    }

    pub fn stars(self) -> String {
        "⭐".repeat(self.star_count())
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Health of the margin between a composite score and its tier minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferHealth {
    /// Under 5 points (including below the minimum)
    Low,
    /// 5 to 10 points
    Moderate,
    /// 10 points or more
    Healthy,
}

impl BufferHealth {
    pub fn from_buffer(buffer: f64) -> Self {
        if buffer < 5.0 {
            Self::Low
        } else if buffer < 10.0 {
            Self::Moderate
        } else {
            Self::Healthy
        }
    }
}
