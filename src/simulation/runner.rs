//! Bounded concurrent simulation of a round's games
//!
//! Each game owns a contiguous slice of the rating-sorted population. The
//! runner moves those slices into blocking workers, so a player is only ever
//! reachable from the one game simulating it, and stitches the population
//! back together in game order once every worker has returned.

use crate::error::{EvaluationError, Result};
use crate::matchmaking::validate_partition;
use crate::metrics::{MetricsCollector, MetricsTimer};
use crate::simulation::tournament::TournamentSimulator;
use crate::types::{Game, GameResult, Player, Population};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error};

/// Output of one worker: the game's position, its players and its outcome
type WorkerOutput = (usize, Vec<Player>, Result<GameResult>, Duration);

/// Runs every game of a round on a bounded pool of workers
#[derive(Clone)]
pub struct SimulationRunner {
    simulator: Arc<dyn TournamentSimulator>,
    max_concurrency: usize,
    metrics: Option<Arc<MetricsCollector>>,
}

impl SimulationRunner {
    /// Create a runner that simulates at most `max_concurrency` games at once
    pub fn new(simulator: Arc<dyn TournamentSimulator>, max_concurrency: usize) -> Self {
        Self {
            simulator,
            max_concurrency: max_concurrency.max(1),
            metrics: None,
        }
    }

    /// Record per-game metrics into `metrics`
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Simulate every game and return results aligned with `games`
    ///
    /// `games` must partition `population` (as produced by the matchmaker for
    /// the population's current order); anything else is rejected before a
    /// single game runs. One seed per game is drawn from `rng` in game order,
    /// so a seeded round replays identically whatever order workers finish in.
    ///
    /// Ratings and tallies of the population are updated in place. If a game
    /// fails, the first failure in game order is returned after every worker
    /// has finished.
    pub async fn simulate_games<R: Rng>(
        &self,
        population: &mut Population,
        games: &[Game],
        rng: &mut R,
    ) -> Result<Vec<GameResult>> {
        validate_partition(population.len(), games)?;
        if games.is_empty() {
            return Ok(Vec::new());
        }

        let seeds: Vec<u64> = games.iter().map(|_| rng.gen()).collect();
        debug!(
            "Simulating {} games with up to {} workers",
            games.len(),
            self.max_concurrency
        );

        let total_players = population.len();
        let mut players = population.take_players().into_iter();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut workers: JoinSet<WorkerOutput> = JoinSet::new();

        for ((index, game), seed) in games.iter().enumerate().zip(seeds) {
            let mut lobby: Vec<Player> = players.by_ref().take(game.player_count()).collect();
            let permit = semaphore.clone().acquire_owned().await.map_err(|e| {
                EvaluationError::InternalError {
                    message: format!("worker pool closed: {}", e),
                }
            })?;
            let simulator = Arc::clone(&self.simulator);
            let game = game.clone();

            workers.spawn_blocking(move || {
                let _permit = permit;
                let timer = MetricsTimer::start();
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let result = simulator.simulate_game(&game, &mut lobby, &mut rng);
                (index, lobby, result, timer.stop())
            });
        }

        let mut slots: Vec<Option<(Vec<Player>, Result<GameResult>)>> =
            (0..games.len()).map(|_| None).collect();
        let mut lost_worker = None;

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((index, lobby, result, elapsed)) => {
                    if let Some(metrics) = &self.metrics {
                        match &result {
                            Ok(game_result) => metrics.record_game(game_result, elapsed),
                            Err(_) => metrics.record_game_failure(),
                        }
                    }
                    slots[index] = Some((lobby, result));
                }
                Err(e) => {
                    error!("Simulation worker died: {}", e);
                    lost_worker.get_or_insert_with(|| e.to_string());
                }
            }
        }

        // Reassemble in game order so population indices stay valid
        let mut restored = Vec::with_capacity(total_players);
        let mut results = Vec::with_capacity(games.len());
        let mut first_failure = None;
        for slot in slots.into_iter().flatten() {
            let (lobby, result) = slot;
            restored.extend(lobby);
            match result {
                Ok(game_result) => results.push(game_result),
                Err(e) => {
                    first_failure.get_or_insert(e);
                }
            }
        }
        population.restore_players(restored);

        if let Some(e) = first_failure {
            return Err(e);
        }
        if let Some(message) = lost_worker {
            return Err(EvaluationError::InternalError {
                message: format!("simulation worker died, its players are lost: {}", message),
            }
            .into());
        }

        Ok(results)
    }
}

impl std::fmt::Debug for SimulationRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationRunner")
            .field("max_concurrency", &self.max_concurrency)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}
