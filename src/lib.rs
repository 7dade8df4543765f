//! Ranked Evaluator - convergence testing for matchmaking and rating schemes
//!
//! This crate repeatedly matches a synthetic population into balanced
//! multi-team games, simulates those games through skill-weighted duels,
//! and tracks whether Elo ratings converge toward latent skill.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod matchmaking;
pub mod metrics;
pub mod rating;
pub mod simulation;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{EvaluationError, Result};
pub use types::*;

// Re-export key components
pub use evaluation::{EvaluationReport, RankedSystem, RankedSystemEvaluator};
pub use matchmaking::Matchmaker;
pub use rating::{EloRatingCalculator, RatingCalculator};
pub use simulation::{EliminationSimulator, SimulationRunner, TournamentSimulator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
