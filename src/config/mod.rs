//! Configuration management for the ranked system evaluator
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and default values for an evaluation run.

pub mod app;
pub mod matchmaking;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, EvaluationSettings, ServiceSettings, SimulationSettings};
pub use matchmaking::MatchmakingConfig;
pub use rating::RatingConfig;
