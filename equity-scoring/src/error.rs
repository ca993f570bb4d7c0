//! Scoring error taxonomy.
//!
//! The engine never fails on input: `MissingField` and `OutOfRangeInput` are
//! produced by the fallible accessors on [`ScoreInput`](crate::input::ScoreInput)
//! and are always resolved to a documented default by the scorers.
//! `Configuration` is only raised by weight-table validation.

use thiserror::Error;

/// Result type for scoring operations.
pub type ScoringResult<T> = Result<T, ScoringError>;

/// Errors surfaced by the scoring engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// Field absent from the input record (non-fatal, defaulted)
    #[error("missing field: {field}")]
    MissingField { field: String },

    /// Field present but unusable (non-fatal, defaulted or clamped)
    #[error("out-of-range input for {field}: {reason}")]
    OutOfRangeInput { field: String, reason: String },

    /// A weight table does not sum to 1.0 (fatal)
    #[error("weight table {table} sums to {sum}, expected 1.0")]
    Configuration { table: String, sum: f64 },
}

impl ScoringError {
    /// Whether the engine can continue by falling back to a default.
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Configuration { .. })
    }
}
