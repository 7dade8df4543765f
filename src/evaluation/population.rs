//! Synthetic population bootstrap

use crate::types::{Player, Population};
use rand::Rng;

/// Create one player with a fresh identity and a uniform skill in [0, 1)
pub fn create_player<R: Rng + ?Sized>(initial_rating: f64, rng: &mut R) -> Player {
    Player::new(rng.gen::<f64>(), initial_rating)
}

/// Create `size` independently generated players, all starting at `initial_rating`
pub fn create_population<R: Rng + ?Sized>(
    size: usize,
    initial_rating: f64,
    rng: &mut R,
) -> Population {
    (0..size)
        .map(|_| create_player(initial_rating, rng))
        .collect::<Vec<_>>()
        .into()
}
