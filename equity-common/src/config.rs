//! Configuration management for the equity scoring tools.
//!
//! The scoring binary reads a single configuration file at
//! `~/.equity-scoring/config.json`. A missing file means defaults.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (EQUITY_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `EQUITY_LOG_LEVEL` → observability.log_level
//! - `EQUITY_LOG_FORMAT` → observability.log_format
//! - `EQUITY_POSITION_CAP` → scoring.position.cap (`none` | `tier_ceiling`)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".equity-scoring"),
        |dirs| dirs.home_dir().join(".equity-scoring"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Expand `~` and environment variables in a user-supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::full(raw).map_or_else(|_| raw.to_string(), |p| p.into_owned()))
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scoring engine options
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Logging options
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// Read and parse failures are both reported as [`Error::Config`].
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config from {}: {e}", path.display()))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse config from {}: {e}", path.display()))
        })
    }

    /// Load configuration (explicit path or default) with environment overrides applied.
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("EQUITY_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Ok(format) = std::env::var("EQUITY_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Ok(cap) = std::env::var("EQUITY_POSITION_CAP") {
            match cap.parse() {
                Ok(mode) => self.scoring.position.cap = mode,
                Err(e) => tracing::warn!(value = %cap, error = %e, "Ignoring EQUITY_POSITION_CAP"),
            }
        }
    }
}

// ============================================================================
// Scoring Configuration
// ============================================================================

/// Scoring engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Position sizing options
    #[serde(default)]
    pub position: PositionConfig,
}

/// How the recommended position size is bounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionCapMode {
    /// No ceiling; the beta-adjusted formula is used as-is.
    #[default]
    None,
    /// Clamp each position to its tier ceiling.
    TierCeiling,
}

impl std::fmt::Display for PositionCapMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::TierCeiling => write!(f, "tier_ceiling"),
        }
    }
}

impl std::str::FromStr for PositionCapMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "tier_ceiling" | "tier-ceiling" | "ceiling" => Ok(Self::TierCeiling),
            other => Err(format!("unknown position cap mode: {other}")),
        }
    }
}

/// Position sizing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionConfig {
    /// Cap mode
    #[serde(default)]
    pub cap: PositionCapMode,

    /// Per-tier maximum position (%), only applied with `tier_ceiling`
    #[serde(default)]
    pub tier_ceilings: TierCeilings,

    /// Rounding granularity for the final size (percentage points)
    #[serde(default = "default_rounding_step")]
    pub rounding_step_pct: f64,
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            cap: PositionCapMode::default(),
            tier_ceilings: TierCeilings::default(),
            rounding_step_pct: default_rounding_step(),
        }
    }
}

fn default_rounding_step() -> f64 {
    0.5
}

/// Maximum position size per market-cap tier (%).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierCeilings {
    #[serde(default = "default_mega_cap_ceiling")]
    pub mega_cap: f64,
    #[serde(default = "default_large_cap_ceiling")]
    pub large_cap: f64,
    #[serde(default = "default_mid_cap_ceiling")]
    pub mid_cap: f64,
    #[serde(default = "default_small_cap_ceiling")]
    pub small_cap: f64,
}

impl Default for TierCeilings {
    fn default() -> Self {
        Self {
            mega_cap: default_mega_cap_ceiling(),
            large_cap: default_large_cap_ceiling(),
            mid_cap: default_mid_cap_ceiling(),
            small_cap: default_small_cap_ceiling(),
        }
    }
}

impl TierCeilings {
    /// All ceilings with their config field names, mega-cap first.
    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("scoring.position.tier_ceilings.mega_cap", self.mega_cap),
            ("scoring.position.tier_ceilings.large_cap", self.large_cap),
            ("scoring.position.tier_ceilings.mid_cap", self.mid_cap),
            ("scoring.position.tier_ceilings.small_cap", self.small_cap),
        ]
    }
}

fn default_mega_cap_ceiling() -> f64 {
    15.0
}

fn default_large_cap_ceiling() -> f64 {
    8.0
}

fn default_mid_cap_ceiling() -> f64 {
    5.0
}

fn default_small_cap_ceiling() -> f64 {
    3.0
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

// ============================================================================
// Tests
// ============================================================================
