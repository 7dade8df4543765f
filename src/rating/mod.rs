//! Rating system integration using the Elo pairwise exchange
//!
//! This module provides the duel-level rating update, backed by the
//! skillratings crate, and the round-level aggregation hook run by the
//! epoch driver after every round.

pub mod aggregator;
pub mod calculator;
pub mod elo;

// Re-export commonly used types
pub use aggregator::{NoOpRatingAggregator, RatingAggregator};
pub use calculator::RatingCalculator;
pub use elo::EloRatingCalculator;
