//! Rating system configuration

use serde::{Deserialize, Serialize};

/// Parameters of the pairwise Elo exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Rating every player starts the run with
    pub initial_rating: f64,
    /// Sensitivity constant: the largest possible swing from a single duel
    pub k_factor: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            initial_rating: 1200.0,
            k_factor: 10.0,
        }
    }
}
