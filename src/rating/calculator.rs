//! Rating calculator trait
//!
//! This module defines the interface for pairwise rating updates applied
//! after every duel.

/// Trait for updating two ratings once a duel has a known winner
pub trait RatingCalculator: Send + Sync {
    /// Exchange rating between a duel's winner and loser
    ///
    /// # Arguments
    /// * `winner_rating` - Rating of the winning player before the duel
    /// * `loser_rating` - Rating of the losing player before the duel
    ///
    /// # Returns
    /// `(new_winner_rating, new_loser_rating)`. The winner gains exactly what
    /// the loser gives up.
    fn rate_1vs1(&self, winner_rating: f64, loser_rating: f64) -> (f64, f64);

    /// Rating assigned to freshly generated players
    fn initial_rating(&self) -> f64;
}
