//! Elo rating system implementation
//!
//! This module provides the concrete pairwise rating update using the Elo
//! algorithm from the skillratings crate.

use crate::config::RatingConfig;
use crate::error::EvaluationError;
use crate::rating::calculator::RatingCalculator;
use skillratings::elo::{elo, EloConfig, EloRating};
use skillratings::Outcomes;

/// Elo rating calculator implementation
#[derive(Debug, Clone)]
pub struct EloRatingCalculator {
    initial_rating: f64,
    elo_config: EloConfig,
}

impl EloRatingCalculator {
    /// Create a new Elo rating calculator
    pub fn new(config: &RatingConfig) -> crate::error::Result<Self> {
        if !config.k_factor.is_finite() || config.k_factor <= 0.0 {
            return Err(EvaluationError::ConfigurationError {
                message: format!("K-factor must be positive, got {}", config.k_factor),
            }
            .into());
        }

        if !config.initial_rating.is_finite() {
            return Err(EvaluationError::ConfigurationError {
                message: "Initial rating must be finite".to_string(),
            }
            .into());
        }

        Ok(Self {
            initial_rating: config.initial_rating,
            elo_config: EloConfig {
                k: config.k_factor,
            },
        })
    }
}

impl RatingCalculator for EloRatingCalculator {
    fn rate_1vs1(&self, winner_rating: f64, loser_rating: f64) -> (f64, f64) {
        let (winner, loser) = elo(
            &EloRating {
                rating: winner_rating,
            },
            &EloRating {
                rating: loser_rating,
            },
            &Outcomes::WIN,
            &self.elo_config,
        );

        (winner.rating, loser.rating)
    }

    fn initial_rating(&self) -> f64 {
        self.initial_rating
    }
}
