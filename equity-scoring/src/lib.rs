//! Equity Scoring Library
//!
//! Tiered scoring for equities. A security is placed into one of four
//! market-cap tiers, scored on five tier-specific components, combined into
//! a weighted composite, rated, and given a beta-adjusted position size.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        equity-scoring                               │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────┐     │
//! │  │  Tier           │  │  Component      │  │  Composite,     │     │
//! │  │  classifier     │─▶│  scorers (x4)   │─▶│  rating, sizing │     │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────┘     │
//! │           ▲                    ▲                                     │
//! │           │           brackets · relative · weights                │
//! │      ScoreInput                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Concepts
//!
//! ## Tiers
//! - **Mega-Cap Core** (≥ $200B): stability, quality and financial health
//! - **Large-Cap Growth** ($50B – $200B): growth plus scale and moat
//! - **Mid-Cap Emerging** ($10B – $50B): growth and scale inflection
//! - **Small-Cap Moonshot** (< $10B): disruption potential
//!
//! ## Scoring
//! - Every sub-metric maps to [0, 100] via a bracket ladder or bonus table
//! - Components are weighted sums of sub-metrics; the composite is a
//!   weighted sum of components
//! - Missing inputs take documented defaults; scoring never fails
//!
//! # Example
//!
//! ```
//! use equity_scoring::{calculate_score, Rating, ScoreInput, Tier};
//!
//! let input = ScoreInput::new()
//!     .with_number("market_cap_billions", 350.0)
//!     .with_number("return_12m_pct", 25.0);
//! let result = calculate_score("ACME", &input);
//!
//! assert_eq!(result.tier, Tier::MegaCapCore);
//! assert!((0.0..=100.0).contains(&result.composite_score));
//! assert_eq!(result.rating, Rating::from_score(result.composite_score));
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod brackets;
pub mod components;
pub mod composite;
pub mod engine;
pub mod error;
pub mod input;
pub mod position;
pub mod rating;
pub mod relative;
pub mod result;
pub mod summary;
pub mod tier;
pub mod weights;

pub use composite::{ComponentKind, Composite};
pub use engine::{calculate_score, ScoringEngine};
pub use error::{ScoringError, ScoringResult};
pub use input::{FlagSet, InputValue, ScoreInput};
pub use position::{calculate_position_size, PositionSizer};
pub use rating::{BufferHealth, Rating};
pub use result::ScoreResult;
pub use summary::BatchSummary;
pub use tier::{determine_tier, Tier, TierProfile};
