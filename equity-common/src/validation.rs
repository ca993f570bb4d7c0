//! Configuration validation.
//!
//! Ensures configured values are present and within valid ranges before the
//! scoring binary uses them.

use thiserror::Error;

use crate::config::{Config, ObservabilityConfig, PositionConfig};
use crate::error::Error;

/// Log levels accepted by `observability.log_level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Log formats accepted by `observability.log_format`.
pub const LOG_FORMATS: &[&str] = &["json", "pretty"];

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.scoring.position.validate() {
            errors.push(e);
        }

        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }

    /// Load (explicit path or default), apply env overrides, and validate.
    ///
    /// Every failure is an [`Error::Config`], so the binary exits with the
    /// configuration exit code.
    pub fn load_and_validate(path: Option<&std::path::Path>) -> crate::Result<Self> {
        let config = Self::load_with_env(path)?;
        config.validate().map_err(|e| Error::Config(e.to_string()))?;
        Ok(config)
    }
}

impl Validate for PositionConfig {
    fn validate(&self) -> ValidationResult<()> {
        if !(self.rounding_step_pct.is_finite() && self.rounding_step_pct > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: "scoring.position.rounding_step_pct".into(),
                reason: "must be a positive number".into(),
            });
        }

        for (field, ceiling) in self.tier_ceilings.entries() {
            if !(ceiling.is_finite() && ceiling > 0.0 && ceiling <= 100.0) {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    reason: format!("{ceiling} is outside (0, 100]"),
                });
            }
        }

        Ok(())
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.log_level.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "observability.log_level".into(),
            });
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
            });
        }

        if !LOG_FORMATS.contains(&self.log_format.as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("must be one of {}", LOG_FORMATS.join(", ")),
            });
        }

        Ok(())
    }
}
