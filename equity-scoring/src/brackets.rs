//! Scoring primitives.
//!
//! - [`bracket_score`]: descending threshold table, inclusive lower bound.
//! - [`Ladder`]: ordered rungs with an explicit bound kind per rung, for
//!   tables that mix strict and inclusive boundaries or score "lower is
//!   better" metrics against ceilings.
//! - [`BonusTable`]: base score plus fixed increments per true flag,
//!   summed first and then clamped to [0, 100].

use crate::input::FlagSet;

/// Lowest possible component score.
pub const MIN_SCORE: f64 = 0.0;

/// Highest possible component score.
pub const MAX_SCORE: f64 = 100.0;

/// Score used when a metric cannot be evaluated.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Clamp a score into [0, 100]. NaN maps to the neutral score.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        NEUTRAL_SCORE
    } else {
        score.clamp(MIN_SCORE, MAX_SCORE)
    }
}

/// Round to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score a value against `(threshold, score)` pairs sorted by descending
/// threshold.
///
/// Returns the score of the first pair with `value >= threshold`; when no
/// pair matches, the last pair's score is the floor. An empty table scores
/// neutral.
pub fn bracket_score(value: f64, brackets: &[(f64, f64)]) -> f64 {
    brackets
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .or_else(|| brackets.last())
        .map_or(NEUTRAL_SCORE, |(_, score)| *score)
}

// ============================================================================
// Ladder
// ============================================================================

/// Admission test for one rung of a [`Ladder`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// `value >= t`
    AtLeast(f64),
    /// `value > t`
    Above(f64),
    /// `value < t`
    Below(f64),
    /// `value <= t`
    AtMost(f64),
}

impl Bound {
    /// Whether `value` satisfies this bound.
    pub fn admits(self, value: f64) -> bool {
        match self {
            Self::AtLeast(t) => value >= t,
            Self::Above(t) => value > t,
            Self::Below(t) => value < t,
            Self::AtMost(t) => value <= t,
        }
    }
}

/// An ordered scoring table; the first admitting rung wins.
#[derive(Debug, Clone, Copy)]
pub struct Ladder {
    rungs: &'static [(Bound, f64)],
    floor: f64,
}

impl Ladder {
    /// Create a ladder with the score used when no rung admits the value.
    pub const fn new(rungs: &'static [(Bound, f64)], floor: f64) -> Self {
        Self { rungs, floor }
    }

    /// Score a value.
    pub fn score(&self, value: f64) -> f64 {
        self.rung_score(value).unwrap_or(self.floor)
    }

    /// Score of the first admitting rung, `None` when the value falls
    /// through to the floor.
    pub fn rung_score(&self, value: f64) -> Option<f64> {
        self.rungs
            .iter()
            .find(|(bound, _)| bound.admits(value))
            .map(|(_, score)| *score)
    }

    /// Score used when no rung admits the value.
    pub const fn floor(&self) -> f64 {
        self.floor
    }

    /// Every score this ladder can produce.
    pub fn scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.rungs.iter().map(|(_, s)| *s).chain(std::iter::once(self.floor))
    }
}

// ============================================================================
// Bonus Table
// ============================================================================

/// Fixed increments (or decrements) keyed by flag name.
#[derive(Debug, Clone, Copy)]
pub struct BonusTable {
    entries: &'static [(&'static str, f64)],
}

impl BonusTable {
    pub const fn new(entries: &'static [(&'static str, f64)]) -> Self {
        Self { entries }
    }

    /// Sum of increments for every true flag.
    pub fn total(&self, flags: &FlagSet) -> f64 {
        self.entries
            .iter()
            .filter(|(name, _)| flags.is_set(name))
            .map(|(_, increment)| increment)
            .sum()
    }

    /// Increment of the first true flag only, for mutually exclusive entries.
    pub fn first_of(&self, flags: &FlagSet) -> f64 {
        self.entries
            .iter()
            .find(|(name, _)| flags.is_set(name))
            .map_or(0.0, |(_, increment)| *increment)
    }

    /// `clamp(base + total)`: all bonuses are summed before capping.
    pub fn accumulate(&self, base: f64, flags: &FlagSet) -> f64 {
        clamp_score(base + self.total(flags))
    }

    /// Flag names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }
}

// ============================================================================
// Tests
// ============================================================================
