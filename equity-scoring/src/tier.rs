//! Market-cap tiers and their static metadata.

use serde::{Deserialize, Serialize};

// ============================================================================
// Tier
// ============================================================================

/// Market-capitalisation bucket.
///
/// Intervals are half-open with an inclusive lower bound:
/// `[200, ∞)`, `[50, 200)`, `[10, 50)`, `(-∞, 10)` (in billions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// ≥ $200B
    MegaCapCore,
    /// $50B – $200B
    LargeCapGrowth,
    /// $10B – $50B
    MidCapEmerging,
    /// < $10B
    SmallCapMoonshot,
}

impl Tier {
    /// All tiers, Tier 1 first.
    pub const ALL: [Tier; 4] = [
        Self::MegaCapCore,
        Self::LargeCapGrowth,
        Self::MidCapEmerging,
        Self::SmallCapMoonshot,
    ];

    /// Classify a market cap given in billions.
    ///
    /// Total over every input: NaN and negative caps fall into the smallest
    /// tier.
    pub fn from_market_cap(market_cap_billions: f64) -> Self {
        if market_cap_billions >= 200.0 {
            Self::MegaCapCore
        } else if market_cap_billions >= 50.0 {
            Self::LargeCapGrowth
        } else if market_cap_billions >= 10.0 {
            Self::MidCapEmerging
        } else {
            Self::SmallCapMoonshot
        }
    }

    /// Tier number, 1 through 4.
    pub const fn number(self) -> u8 {
        match self {
            Self::MegaCapCore => 1,
            Self::LargeCapGrowth => 2,
            Self::MidCapEmerging => 3,
            Self::SmallCapMoonshot => 4,
        }
    }

    /// Look up a tier by number.
    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.number() == number)
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }

    /// Minimum composite score for a holding in this tier to qualify.
    pub fn min_score(self) -> f64 {
        self.profile().min_score
    }

    /// Static metadata for this tier.
    pub fn profile(self) -> &'static TierProfile {
        match self {
            Self::MegaCapCore => &MEGA_CAP_CORE,
            Self::LargeCapGrowth => &LARGE_CAP_GROWTH,
            Self::MidCapEmerging => &MID_CAP_EMERGING,
            Self::SmallCapMoonshot => &SMALL_CAP_MOONSHOT,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tier {} ({})", self.number(), self.name())
    }
}

/// Free-function form of [`Tier::from_market_cap`].
pub fn determine_tier(market_cap_billions: f64) -> Tier {
    Tier::from_market_cap(market_cap_billions)
}

// ============================================================================
// Tier Profile
// ============================================================================

/// Fixed per-tier parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierProfile {
    pub tier: Tier,
    /// Display name
    pub name: &'static str,
    /// Inclusive lower market-cap bound (billions)
    pub min_cap_billions: f64,
    /// Exclusive upper market-cap bound (billions), `None` for Tier 1
    pub max_cap_billions: Option<f64>,
    /// Minimum qualifying composite score
    pub min_score: f64,
    /// Index used for relative strength
    pub benchmark: &'static str,
    /// Base allocation (%) before score and beta adjustment
    pub base_allocation_pct: f64,
    /// Amplifies the beta penalty in position sizing
    pub volatility_multiplier: f64,
    /// Suggested share of the whole portfolio held in this tier (%)
    pub portfolio_share_pct: f64,
    /// Mandatory stop-loss (%, negative), if the tier carries one
    pub stop_loss_pct: Option<f64>,
}

/// Share of the portfolio left in cash by the tier allocation.
pub const CASH_RESERVE_PCT: f64 = 5.0;

static MEGA_CAP_CORE: TierProfile = TierProfile {
    tier: Tier::MegaCapCore,
    name: "Mega-Cap Core",
    min_cap_billions: 200.0,
    max_cap_billions: None,
    min_score: 60.0,
    benchmark: "SPY",
    base_allocation_pct: 10.0,
    volatility_multiplier: 0.75,
    portfolio_share_pct: 45.0,
    stop_loss_pct: None,
};

static LARGE_CAP_GROWTH: TierProfile = TierProfile {
    tier: Tier::LargeCapGrowth,
    name: "Large-Cap Growth",
    min_cap_billions: 50.0,
    max_cap_billions: Some(200.0),
    min_score: 65.0,
    benchmark: "QQQ",
    base_allocation_pct: 7.0,
    volatility_multiplier: 1.0,
    portfolio_share_pct: 28.0,
    stop_loss_pct: None,
};

static MID_CAP_EMERGING: TierProfile = TierProfile {
    tier: Tier::MidCapEmerging,
    name: "Mid-Cap Emerging",
    min_cap_billions: 10.0,
    max_cap_billions: Some(50.0),
    min_score: 67.0,
    benchmark: "IWM",
    base_allocation_pct: 5.0,
    volatility_multiplier: 1.3,
    portfolio_share_pct: 15.0,
    stop_loss_pct: None,
};

static SMALL_CAP_MOONSHOT: TierProfile = TierProfile {
    tier: Tier::SmallCapMoonshot,
    name: "Small-Cap Moonshot",
    min_cap_billions: 0.0,
    max_cap_billions: Some(10.0),
    min_score: 70.0,
    benchmark: "IWO",
    base_allocation_pct: 3.0,
    volatility_multiplier: 1.5,
    portfolio_share_pct: 7.0,
    stop_loss_pct: Some(-40.0),
};
