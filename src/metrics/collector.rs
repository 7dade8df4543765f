//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for game simulation and epoch
//! convergence using Prometheus metrics.

use crate::evaluation::EpochSummary;
use crate::types::GameResult;
use anyhow::Result;
use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the evaluator
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Per-game simulation metrics
    simulation_metrics: SimulationMetrics,

    /// Per-epoch convergence metrics
    evaluation_metrics: EvaluationMetrics,
}

/// Per-game simulation metrics
#[derive(Clone)]
pub struct SimulationMetrics {
    /// Total games simulated
    pub games_simulated_total: IntCounter,

    /// Total games whose simulation returned an error
    pub game_failures_total: IntCounter,

    /// Total team battles fought
    pub team_battles_total: IntCounter,

    /// Total player duels fought
    pub duels_total: IntCounter,

    /// Wall time spent simulating one game
    pub game_duration_seconds: Histogram,
}

/// Per-epoch convergence metrics
#[derive(Clone)]
pub struct EvaluationMetrics {
    /// Total epochs completed
    pub epochs_completed_total: IntCounter,

    /// Wall time of one matchmaking + simulation + aggregation round
    pub epoch_duration_seconds: Histogram,

    /// Mean population rating after the latest epoch
    pub mean_rating: Gauge,

    /// Rating standard deviation after the latest epoch
    pub rating_std_dev: Gauge,

    /// Spearman correlation between latent skill and rating
    pub skill_rating_correlation: Gauge,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let simulation_metrics = SimulationMetrics::new(&registry)?;
        let evaluation_metrics = EvaluationMetrics::new(&registry)?;

        Ok(Self {
            registry,
            simulation_metrics,
            evaluation_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Get simulation metrics
    pub fn simulation(&self) -> &SimulationMetrics {
        &self.simulation_metrics
    }

    /// Get evaluation metrics
    pub fn evaluation(&self) -> &EvaluationMetrics {
        &self.evaluation_metrics
    }

    /// Record a finished game
    pub fn record_game(&self, result: &GameResult, duration: Duration) {
        self.simulation_metrics.games_simulated_total.inc();
        self.simulation_metrics
            .team_battles_total
            .inc_by(result.team_battles as u64);
        self.simulation_metrics.duels_total.inc_by(result.duels as u64);
        self.simulation_metrics
            .game_duration_seconds
            .observe(duration.as_secs_f64());
    }

    /// Record a game whose simulation failed
    pub fn record_game_failure(&self) {
        self.simulation_metrics.game_failures_total.inc();
    }

    /// Record a completed epoch
    pub fn record_epoch(&self, summary: &EpochSummary) {
        self.evaluation_metrics.epochs_completed_total.inc();
        self.evaluation_metrics
            .epoch_duration_seconds
            .observe(summary.elapsed.as_secs_f64());
        self.evaluation_metrics.mean_rating.set(summary.mean_rating);
        self.evaluation_metrics
            .rating_std_dev
            .set(summary.rating_std_dev);
        self.evaluation_metrics
            .skill_rating_correlation
            .set(summary.skill_rating_correlation);
    }

    /// Render every registered metric in the Prometheus text format
    pub fn export(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Timer for the game and epoch duration histograms
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    /// Start timing now
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }
}

impl SimulationMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let games_simulated_total = IntCounter::new(
            "ranked_evaluator_games_simulated_total",
            "Total games simulated",
        )?;
        registry.register(Box::new(games_simulated_total.clone()))?;

        let game_failures_total = IntCounter::new(
            "ranked_evaluator_game_failures_total",
            "Total games whose simulation failed",
        )?;
        registry.register(Box::new(game_failures_total.clone()))?;

        let team_battles_total = IntCounter::new(
            "ranked_evaluator_team_battles_total",
            "Total team battles fought",
        )?;
        registry.register(Box::new(team_battles_total.clone()))?;

        let duels_total =
            IntCounter::new("ranked_evaluator_duels_total", "Total player duels fought")?;
        registry.register(Box::new(duels_total.clone()))?;

        let game_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "ranked_evaluator_game_duration_seconds",
                "Time spent simulating one game",
            )
            .buckets(vec![
                0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1,
            ]),
        )?;
        registry.register(Box::new(game_duration_seconds.clone()))?;

        Ok(Self {
            games_simulated_total,
            game_failures_total,
            team_battles_total,
            duels_total,
            game_duration_seconds,
        })
    }
}

impl EvaluationMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let epochs_completed_total = IntCounter::new(
            "ranked_evaluator_epochs_completed_total",
            "Total epochs completed",
        )?;
        registry.register(Box::new(epochs_completed_total.clone()))?;

        let epoch_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "ranked_evaluator_epoch_duration_seconds",
            "Time spent on one epoch",
        ))?;
        registry.register(Box::new(epoch_duration_seconds.clone()))?;

        let mean_rating = Gauge::new(
            "ranked_evaluator_mean_rating",
            "Mean population rating after the latest epoch",
        )?;
        registry.register(Box::new(mean_rating.clone()))?;

        let rating_std_dev = Gauge::new(
            "ranked_evaluator_rating_std_dev",
            "Population rating standard deviation after the latest epoch",
        )?;
        registry.register(Box::new(rating_std_dev.clone()))?;

        let skill_rating_correlation = Gauge::new(
            "ranked_evaluator_skill_rating_correlation",
            "Spearman correlation between latent skill and rating",
        )?;
        registry.register(Box::new(skill_rating_correlation.clone()))?;

        Ok(Self {
            epochs_completed_total,
            epoch_duration_seconds,
            mean_rating,
            rating_std_dev,
            skill_rating_correlation,
        })
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new().expect("Failed to create default metrics collector")
    }
}
