//! Score input record.
//!
//! A [`ScoreInput`] is an open mapping from field name to a scalar, a
//! categorical string, or a nested set of named boolean flags. Field sets
//! differ per tier and per branch, so nothing is required: every accessor
//! takes the default the caller documents and falls back to it when the
//! field is absent or unusable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ScoringError, ScoringResult};

// ============================================================================
// Values
// ============================================================================

/// A single input value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    /// Boolean flag (`is_profitable`, `is_saas`, ...)
    Bool(bool),
    /// Numeric metric
    Number(f64),
    /// Categorical value (`business_type`, `market_structure`, ...)
    Text(String),
    /// Bonus/penalty set
    Flags(FlagSet),
    /// Anything else; kept so a malformed field never rejects the record
    Other(serde_json::Value),
}

impl InputValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::Flags(_) => "flag set",
            Self::Other(_) => "unsupported value",
        }
    }
}

/// A named set of boolean qualitative flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet(BTreeMap<String, bool>);

impl FlagSet {
    /// Create an empty flag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the named flag is present and true.
    pub fn is_set(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    /// Set a flag.
    pub fn set(&mut self, name: impl Into<String>, value: bool) {
        self.0.insert(name.into(), value);
    }

    /// Number of flags that are true.
    pub fn count_set(&self) -> usize {
        self.0.values().filter(|v| **v).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FlagSet {
    /// Collect flag names, all set to true.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|name| (name.into(), true)).collect())
    }
}

// ============================================================================
// Score Input
// ============================================================================

/// Flat input record for one security.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreInput {
    fields: BTreeMap<String, InputValue>,
}

impl ScoreInput {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, key: impl Into<String>, value: InputValue) {
        self.fields.insert(key.into(), value);
    }

    /// Builder: add a numeric field.
    pub fn with_number(mut self, key: impl Into<String>, value: f64) -> Self {
        self.insert(key, InputValue::Number(value));
        self
    }

    /// Builder: add a boolean field.
    pub fn with_flag(mut self, key: impl Into<String>, value: bool) -> Self {
        self.insert(key, InputValue::Bool(value));
        self
    }

    /// Builder: add a categorical field.
    pub fn with_text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, InputValue::Text(value.into()));
        self
    }

    /// Builder: add a bonus/penalty set with the given flags switched on.
    pub fn with_flags(mut self, key: impl Into<String>, names: &[&str]) -> Self {
        self.insert(key, InputValue::Flags(names.iter().copied().collect()));
        self
    }

    /// Whether a field is present at all.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Raw access to a field.
    pub fn get(&self, key: &str) -> Option<&InputValue> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Read a finite number.
    ///
    /// Numeric strings are accepted; booleans, flag sets and non-finite
    /// numbers are reported as out of range.
    pub fn try_number(&self, key: &str) -> ScoringResult<f64> {
        let value = self.fields.get(key).ok_or_else(|| ScoringError::MissingField {
            field: key.to_string(),
        })?;

        let number = match value {
            InputValue::Number(n) => *n,
            InputValue::Text(s) => s.trim().parse::<f64>().map_err(|_| out_of_range(key, value))?,
            other => return Err(out_of_range(key, other)),
        };

        if number.is_finite() {
            Ok(number)
        } else {
            Err(ScoringError::OutOfRangeInput {
                field: key.to_string(),
                reason: format!("non-finite value {number}"),
            })
        }
    }

    /// Read a number, falling back to `default`.
    pub fn number_or(&self, key: &str, default: f64) -> f64 {
        self.try_number(key).unwrap_or_else(|e| {
            log_default(&e, key);
            default
        })
    }

    /// Read a boolean, falling back to `default`.
    pub fn flag_or(&self, key: &str, default: bool) -> bool {
        match self.fields.get(key) {
            Some(InputValue::Bool(b)) => *b,
            Some(InputValue::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" => true,
                "false" | "no" => false,
                _ => {
                    log_default(&out_of_range(key, &InputValue::Text(s.clone())), key);
                    default
                }
            },
            Some(other) => {
                log_default(&out_of_range(key, other), key);
                default
            }
            None => default,
        }
    }

    /// Read a categorical value, falling back to `default`.
    pub fn text_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.fields.get(key) {
            Some(InputValue::Text(s)) => s.as_str(),
            Some(other) => {
                log_default(&out_of_range(key, other), key);
                default
            }
            None => default,
        }
    }

    /// Read a bonus/penalty set; absent or malformed sets are empty.
    pub fn flags(&self, key: &str) -> FlagSet {
        match self.fields.get(key) {
            Some(InputValue::Flags(set)) => set.clone(),
            Some(other) => {
                log_default(&out_of_range(key, other), key);
                FlagSet::new()
            }
            None => FlagSet::new(),
        }
    }

    /// Market capitalisation in billions (default 0).
    pub fn market_cap_billions(&self) -> f64 {
        self.number_or("market_cap_billions", 0.0)
    }

    /// Beta (default 1.0, i.e. market volatility).
    pub fn beta(&self) -> f64 {
        self.number_or("beta", 1.0)
    }
}

impl FromIterator<(String, InputValue)> for ScoreInput {
    fn from_iter<I: IntoIterator<Item = (String, InputValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

fn out_of_range(key: &str, value: &InputValue) -> ScoringError {
    ScoringError::OutOfRangeInput {
        field: key.to_string(),
        reason: format!("unexpected {}", value.kind()),
    }
}

fn log_default(error: &ScoringError, key: &str) {
    match error {
        ScoringError::MissingField { .. } => {
            tracing::trace!(field = key, "Field absent, using default");
        }
        other => {
            tracing::debug!(field = key, error = %other, "Unusable field, using default");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ScoreInput {
        serde_json::from_value(json!({
            "market_cap_billions": 1800,
            "pe_ratio": 22.5,
            "is_saas": true,
            "business_type": "software",
            "moat_bonuses": {"network_effects": true, "switching_costs": false},
            "weird": [1, 2, 3],
            "numeric_text": "12.5"
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_value_kinds() {
        let input = sample();
        assert_eq!(input.get("market_cap_billions"), Some(&InputValue::Number(1800.0)));
        assert_eq!(input.get("is_saas"), Some(&InputValue::Bool(true)));
        assert!(matches!(input.get("business_type"), Some(InputValue::Text(_))));
        assert!(matches!(input.get("moat_bonuses"), Some(InputValue::Flags(_))));
        assert!(matches!(input.get("weird"), Some(InputValue::Other(_))));
    }

    #[test]
    fn test_number_accessors() {
        let input = sample();
        assert_eq!(input.try_number("pe_ratio"), Ok(22.5));
        assert_eq!(input.number_or("numeric_text", 0.0), 12.5);
        assert_eq!(input.number_or("absent", 999.0), 999.0);
        assert_eq!(input.number_or("is_saas", 7.0), 7.0);
        assert!(matches!(
            input.try_number("absent"),
            Err(ScoringError::MissingField { .. })
        ));
        assert!(matches!(
            input.try_number("moat_bonuses"),
            Err(ScoringError::OutOfRangeInput { .. })
        ));
    }

    #[test]
    fn test_non_finite_number_is_out_of_range() {
        let input = ScoreInput::new().with_number("beta", f64::NAN);
        assert!(matches!(
            input.try_number("beta"),
            Err(ScoringError::OutOfRangeInput { .. })
        ));
        assert_eq!(input.beta(), 1.0);
    }

    #[test]
    fn test_flag_and_text_accessors() {
        let input = sample();
        assert!(input.flag_or("is_saas", false));
        assert!(!input.flag_or("absent", false));
        assert!(input.flag_or("is_profitable", true));
        assert!(input.flag_or("pe_ratio", true));
        assert_eq!(input.text_or("business_type", "cyclical"), "software");
        assert_eq!(input.text_or("absent", "cyclical"), "cyclical");
        assert_eq!(input.text_or("pe_ratio", "cyclical"), "cyclical");
    }

    #[test]
    fn test_flag_sets() {
        let input = sample();
        let moat = input.flags("moat_bonuses");
        assert!(moat.is_set("network_effects"));
        assert!(!moat.is_set("switching_costs"));
        assert!(!moat.is_set("absent"));
        assert_eq!(moat.count_set(), 1);
        assert!(input.flags("absent").is_empty());
        assert!(input.flags("pe_ratio").is_empty());
    }

    #[test]
    fn test_builder() {
        let input = ScoreInput::new()
            .with_number("market_cap_billions", 75.0)
            .with_flag("is_profitable", false)
            .with_text("business_type", "saas")
            .with_flags("moat_development_bonuses", &["network_effects", "data_ip_moat"]);

        assert_eq!(input.len(), 4);
        assert_eq!(input.market_cap_billions(), 75.0);
        assert!(!input.flag_or("is_profitable", true));
        assert_eq!(input.flags("moat_development_bonuses").count_set(), 2);
    }

    #[test]
    fn test_defaults_on_empty_record() {
        let input = ScoreInput::new();
        assert!(input.is_empty());
        assert_eq!(input.market_cap_billions(), 0.0);
        assert_eq!(input.beta(), 1.0);
    }
}
