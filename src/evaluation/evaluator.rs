//! Epoch driver for a ranked system evaluation
//!
//! Each epoch runs matchmaking, simulation and rating aggregation strictly in
//! that order. The next epoch's matchmaking only starts once every game of the
//! current epoch has been simulated, since lobby seeding depends on the
//! ratings those games produce.

use crate::config::{AppConfig, MatchmakingConfig};
use crate::error::Result;
use crate::evaluation::population::create_population;
use crate::evaluation::statistics::EpochSummary;
use crate::matchmaking::Matchmaker;
use crate::metrics::{MetricsCollector, MetricsTimer};
use crate::rating::{EloRatingCalculator, NoOpRatingAggregator, RatingAggregator, RatingCalculator};
use crate::simulation::{EliminationSimulator, SimulationRunner};
use crate::types::Population;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// The scheme under evaluation: how lobbies are built and how rounds are scored
#[derive(Clone)]
pub struct RankedSystem {
    matchmaker: Matchmaker,
    aggregator: Arc<dyn RatingAggregator>,
}

impl RankedSystem {
    pub fn new(matchmaker: Matchmaker, aggregator: Arc<dyn RatingAggregator>) -> Self {
        Self {
            matchmaker,
            aggregator,
        }
    }

    pub fn matchmaker(&self) -> &Matchmaker {
        &self.matchmaker
    }

    pub fn aggregator(&self) -> &Arc<dyn RatingAggregator> {
        &self.aggregator
    }
}

/// Outcome of a full evaluation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub matchmaking: MatchmakingConfig,
    pub initial_rating: f64,
    /// One summary per completed epoch, in order
    pub epochs: Vec<EpochSummary>,
    /// Final population, sorted by rating as of the last matchmaking pass
    pub population: Population,
}

impl EvaluationReport {
    pub fn final_summary(&self) -> Option<&EpochSummary> {
        self.epochs.last()
    }
}

/// Runs a ranked system against a synthetic population for a fixed number of epochs
pub struct RankedSystemEvaluator {
    ranked_system: RankedSystem,
    runner: SimulationRunner,
    initial_rating: f64,
    population_size: usize,
    epochs: usize,
    metrics: Option<Arc<MetricsCollector>>,
}

impl RankedSystemEvaluator {
    pub fn new(
        ranked_system: RankedSystem,
        runner: SimulationRunner,
        initial_rating: f64,
        population_size: usize,
        epochs: usize,
    ) -> Self {
        Self {
            ranked_system,
            runner,
            initial_rating,
            population_size,
            epochs,
            metrics: None,
        }
    }

    /// Wire the default Elo + elimination stack from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        crate::config::validate_config(config)?;

        let calculator: Arc<dyn RatingCalculator> =
            Arc::new(EloRatingCalculator::new(&config.rating)?);
        let initial_rating = calculator.initial_rating();
        let simulator = EliminationSimulator::new(calculator);
        let runner = SimulationRunner::new(Arc::new(simulator), config.simulation.max_concurrency);
        let ranked_system = RankedSystem::new(
            Matchmaker::new(config.matchmaking.clone()),
            Arc::new(NoOpRatingAggregator),
        );

        Ok(Self::new(
            ranked_system,
            runner,
            initial_rating,
            config.evaluation.population_size,
            config.evaluation.epochs,
        ))
    }

    /// Record game and epoch metrics into `metrics`
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.runner = self.runner.with_metrics(metrics.clone());
        self.metrics = Some(metrics);
        self
    }

    pub fn ranked_system(&self) -> &RankedSystem {
        &self.ranked_system
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    /// Generate a fresh population and evaluate the ranked system against it
    pub async fn evaluate<R: Rng>(&self, rng: &mut R) -> Result<EvaluationReport> {
        let population = create_population(self.population_size, self.initial_rating, rng);
        info!(
            "Generated population of {} players starting at rating {}",
            population.len(),
            self.initial_rating
        );
        self.evaluate_population(population, rng).await
    }

    /// Evaluate the ranked system against a caller-supplied population
    pub async fn evaluate_population<R: Rng>(
        &self,
        mut population: Population,
        rng: &mut R,
    ) -> Result<EvaluationReport> {
        let started_at = crate::utils::current_timestamp();
        let mut epochs = Vec::with_capacity(self.epochs);

        for epoch in 0..self.epochs {
            let summary = self.run_epoch(epoch, &mut population, rng).await?;
            epochs.push(summary);
        }

        Ok(EvaluationReport {
            started_at,
            finished_at: crate::utils::current_timestamp(),
            matchmaking: self.ranked_system.matchmaker().config().clone(),
            initial_rating: self.initial_rating,
            epochs,
            population,
        })
    }

    /// One round: matchmaking, simulation, then aggregation
    pub async fn run_epoch<R: Rng>(
        &self,
        epoch: usize,
        population: &mut Population,
        rng: &mut R,
    ) -> Result<EpochSummary> {
        let timer = MetricsTimer::start();

        let games = self.ranked_system.matchmaker().create_games(population);
        debug!("Epoch {}: {} games created", epoch, games.len());

        let results = self.runner.simulate_games(population, &games, rng).await?;

        self.ranked_system
            .aggregator()
            .aggregate(population, &games, &results)?;

        let summary = EpochSummary::new(epoch, &results, population, timer.stop());
        info!(
            "Epoch {}: {} games, {} duels, mean rating {:.1} (sd {:.1}), skill/rating correlation {:.4}",
            summary.epoch,
            summary.games,
            summary.duels,
            summary.mean_rating,
            summary.rating_std_dev,
            summary.skill_rating_correlation
        );

        if let Some(metrics) = &self.metrics {
            metrics.record_epoch(&summary);
        }

        Ok(summary)
    }
}
