//! Round-level rating aggregation
//!
//! Duel outcomes already move ratings while a game is simulated, so the
//! aggregation stage that runs after each round has nothing left to apply.
//! It stays as the place where round-wide adjustments (streak bonuses,
//! placement rewards) plug into the epoch driver.

use crate::types::{Game, GameResult, Population};

/// Trait for adjustments applied once every game of a round has finished
pub trait RatingAggregator: Send + Sync {
    /// Fold a round's results into the population
    ///
    /// `results` aligns positionally with `games`.
    fn aggregate(
        &self,
        population: &mut Population,
        games: &[Game],
        results: &[GameResult],
    ) -> crate::error::Result<()>;
}

/// Aggregator that leaves the population untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpRatingAggregator;

impl RatingAggregator for NoOpRatingAggregator {
    fn aggregate(
        &self,
        _population: &mut Population,
        _games: &[Game],
        _results: &[GameResult],
    ) -> crate::error::Result<()> {
        Ok(())
    }
}
