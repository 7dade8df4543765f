//! Main application configuration
//!
//! This module defines the primary configuration structures for an evaluation
//! run, including environment variable and TOML loading and validation.

use crate::config::{MatchmakingConfig, RatingConfig};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub matchmaking: MatchmakingConfig,
    pub simulation: SimulationSettings,
    pub rating: RatingConfig,
    pub evaluation: EvaluationSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Game simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Maximum number of games simulated at the same time
    pub max_concurrency: usize,
    /// Seed for the run's random source; entropy when absent
    pub seed: Option<u64>,
}

/// Run-level settings for the epoch driver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    /// Number of synthetic players
    pub population_size: usize,
    /// Number of matchmaking + simulation rounds
    pub epochs: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "ranked-evaluator".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            max_concurrency: crate::utils::default_concurrency(),
            seed: None,
        }
    }
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            population_size: 60_000,
            epochs: 10,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid {} value: {}", name, value)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }

        // Matchmaking settings
        if let Some(team_count) = parse_env("TEAM_COUNT")? {
            config.matchmaking.team_count = team_count;
        }
        if let Some(team_size) = parse_env("TEAM_SIZE")? {
            config.matchmaking.team_size = team_size;
        }

        // Simulation settings
        if let Some(max_concurrency) = parse_env("MAX_CONCURRENCY")? {
            config.simulation.max_concurrency = max_concurrency;
        }
        if let Some(seed) = parse_env("SIMULATION_SEED")? {
            config.simulation.seed = Some(seed);
        }

        // Rating settings
        if let Some(initial_rating) = parse_env("INITIAL_RATING")? {
            config.rating.initial_rating = initial_rating;
        }
        if let Some(k_factor) = parse_env("K_FACTOR")? {
            config.rating.k_factor = k_factor;
        }

        // Evaluation settings
        if let Some(population_size) = parse_env("POPULATION_SIZE")? {
            config.evaluation.population_size = population_size;
        }
        if let Some(epochs) = parse_env("EPOCHS")? {
            config.evaluation.epochs = epochs;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; missing sections keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to load config file {}", path.display()))
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        validate_config(&config)?;
        Ok(config)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate lobby shape
    if config.matchmaking.team_count == 0 {
        return Err(anyhow!("Team count must be greater than 0"));
    }
    if config.matchmaking.team_size == 0 {
        return Err(anyhow!("Team size must be greater than 0"));
    }

    // Validate worker pool
    if config.simulation.max_concurrency == 0 {
        return Err(anyhow!("Max concurrency must be greater than 0"));
    }

    // Validate rating parameters
    if !config.rating.initial_rating.is_finite() {
        return Err(anyhow!("Initial rating must be finite"));
    }
    if !config.rating.k_factor.is_finite() || config.rating.k_factor <= 0.0 {
        return Err(anyhow!("K-factor must be positive"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.matchmaking.team_count, 20);
        assert_eq!(config.matchmaking.team_size, 3);
        assert_eq!(config.evaluation.population_size, 60_000);
        assert_eq!(config.evaluation.epochs, 10);
        assert!(config.simulation.seed.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [matchmaking]
            team_count = 4

            [simulation]
            max_concurrency = 2
            seed = 42
            "#,
        )
        .unwrap();

        assert_eq!(config.matchmaking.team_count, 4);
        assert_eq!(config.matchmaking.team_size, 3);
        assert_eq!(config.simulation.max_concurrency, 2);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.rating.initial_rating, 1200.0);
        assert_eq!(config.service.log_level, "info");
    }

    #[test]
    fn test_invalid_toml_values_rejected() {
        assert!(AppConfig::from_toml_str("[matchmaking]\nteam_size = 0").is_err());
        assert!(AppConfig::from_toml_str("[service]\nlog_level = \"loud\"").is_err());
        assert!(AppConfig::from_toml_str("[rating]\nk_factor = -1.0").is_err());
        assert!(AppConfig::from_toml_str("[matchmaking]\nteam_count = \"many\"").is_err());
    }

    #[test]
    fn test_validation_rejects_zero_values() {
        let mut config = AppConfig::default();
        config.matchmaking.team_count = 0;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.simulation.max_concurrency = 0;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.rating.initial_rating = f64::NAN;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_run_is_valid() {
        let mut config = AppConfig::default();
        config.evaluation.population_size = 0;
        config.evaluation.epochs = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = AppConfig::from_file("/nonexistent/ranked-evaluator.toml").unwrap_err();
        assert!(format!("{:#}", err).contains("ranked-evaluator.toml"));
    }
}
