//! Beta-adjusted position sizing.
//!
//! ```text
//! position = (base_allocation × score / 100) / (1 + (beta − 1) × volatility_multiplier)
//! ```
//!
//! rounded to the nearest step (0.5 percentage points by default). A tier
//! ceiling is applied only when the configured cap mode asks for it.

use equity_common::config::{PositionCapMode, PositionConfig};

use crate::tier::Tier;

/// Position sizer bound to a sizing configuration.
#[derive(Debug, Clone, Default)]
pub struct PositionSizer {
    config: PositionConfig,
}

impl PositionSizer {
    pub fn new(config: PositionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PositionConfig {
        &self.config
    }

    /// Recommended allocation (%) for a holding.
    pub fn size(&self, tier: Tier, score: f64, beta: f64) -> f64 {
        let profile = tier.profile();

        let mut adjustment = 1.0 + (beta - 1.0) * profile.volatility_multiplier;
        if !(adjustment.is_finite() && adjustment > 0.0) {
            tracing::debug!(%tier, beta, "Degenerate volatility adjustment, ignoring beta");
            adjustment = 1.0;
        }

        let score = if score.is_finite() { score.clamp(0.0, 100.0) } else { 0.0 };
        let raw = profile.base_allocation_pct * (score / 100.0) / adjustment;
        let rounded = round_to_step(raw, self.config.rounding_step_pct).max(0.0);

        match self.config.cap {
            PositionCapMode::None => rounded,
            PositionCapMode::TierCeiling => rounded.min(self.ceiling(tier)),
        }
    }

    /// Configured ceiling (%) for a tier.
    pub fn ceiling(&self, tier: Tier) -> f64 {
        let ceilings = &self.config.tier_ceilings;
        match tier {
            Tier::MegaCapCore => ceilings.mega_cap,
            Tier::LargeCapGrowth => ceilings.large_cap,
            Tier::MidCapEmerging => ceilings.mid_cap,
            Tier::SmallCapMoonshot => ceilings.small_cap,
        }
    }
}

/// Round to the nearest multiple of `step`, ties to even.
fn round_to_step(value: f64, step: f64) -> f64 {
    if !(step.is_finite() && step > 0.0) {
        return value;
    }
    (value / step).round_ties_even() * step
}

/// Size a position with the default configuration (no ceiling, 0.5 steps).
pub fn calculate_position_size(tier: Tier, score: f64, beta: f64) -> f64 {
    PositionSizer::default().size(tier, score, beta)
}
