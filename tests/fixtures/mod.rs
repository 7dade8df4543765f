//! Test fixtures and mock implementations for integration testing
#![allow(dead_code)]

use mockall::mock;
use ranked_evaluator::config::{MatchmakingConfig, RatingConfig};
use ranked_evaluator::error::Result;
use ranked_evaluator::rating::{EloRatingCalculator, RatingAggregator};
use ranked_evaluator::simulation::{EliminationSimulator, TournamentSimulator};
use ranked_evaluator::types::{Game, GameId, GameResult, Player, Population, Team};
use ranked_evaluator::Matchmaker;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::{Arc, Mutex};
use std::time::Duration;

mock! {
    pub Aggregator {}

    impl RatingAggregator for Aggregator {
        fn aggregate(
            &self,
            population: &mut Population,
            games: &[Game],
            results: &[GameResult],
        ) -> Result<()>;
    }
}

/// Elimination simulator with the default Elo configuration
pub fn default_simulator() -> EliminationSimulator {
    let calculator = EloRatingCalculator::new(&RatingConfig::default())
        .expect("default rating config is valid");
    EliminationSimulator::new(Arc::new(calculator))
}

/// Population with seeded skills and ratings spread over [1000, 1400)
pub fn seeded_population(size: usize, seed: u64) -> Population {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..size)
        .map(|_| Player::new(rng.gen::<f64>(), rng.gen_range(1000.0..1400.0)))
        .collect::<Vec<_>>()
        .into()
}

/// Matchmake a seeded population into games of `team_count` teams of `team_size`
pub fn seeded_round(
    size: usize,
    team_count: usize,
    team_size: usize,
    seed: u64,
) -> (Population, Vec<Game>) {
    let mut population = seeded_population(size, seed);
    let games = Matchmaker::new(MatchmakingConfig {
        team_count,
        team_size,
    })
    .create_games(&mut population);
    (population, games)
}

/// Single game over a fresh lobby with the given team sizes and skills
pub fn custom_game(team_skills: &[Vec<f64>]) -> (Game, Vec<Player>) {
    let mut lobby = Vec::new();
    let mut teams = Vec::new();
    for (team_id, skills) in team_skills.iter().enumerate() {
        let members = skills
            .iter()
            .map(|&skill| {
                lobby.push(Player::new(skill, 1200.0));
                lobby.len() - 1
            })
            .collect();
        teams.push(Team::new(team_id, members));
    }

    let game = Game {
        id: 0,
        lobby: 0..lobby.len(),
        teams,
    };
    (game, lobby)
}

/// Simulator that makes earlier games slower and records completion order
pub struct SlowSimulator {
    inner: EliminationSimulator,
    game_count: usize,
    step: Duration,
    completed: Mutex<Vec<GameId>>,
}

impl SlowSimulator {
    pub fn new(game_count: usize, step: Duration) -> Self {
        Self {
            inner: default_simulator(),
            game_count,
            step,
            completed: Mutex::new(Vec::new()),
        }
    }

    /// Game ids in the order their simulations finished
    pub fn completion_order(&self) -> Vec<GameId> {
        self.completed
            .lock()
            .map(|completed| completed.clone())
            .unwrap_or_default()
    }
}

impl TournamentSimulator for SlowSimulator {
    fn simulate_game(
        &self,
        game: &Game,
        lobby: &mut [Player],
        rng: &mut dyn RngCore,
    ) -> Result<GameResult> {
        let remaining = self.game_count.saturating_sub(game.id) as u32;
        std::thread::sleep(self.step * remaining);

        let result = self.inner.simulate_game(game, lobby, rng);
        if let Ok(mut completed) = self.completed.lock() {
            completed.push(game.id);
        }
        result
    }
}

/// Aggregator that awards a flat rating bonus to every member of each winning team
pub struct WinnerBonusAggregator {
    pub bonus: f64,
}

impl RatingAggregator for WinnerBonusAggregator {
    fn aggregate(
        &self,
        population: &mut Population,
        games: &[Game],
        results: &[GameResult],
    ) -> Result<()> {
        for (game, result) in games.iter().zip(results) {
            let Some(winner) = result.winner().and_then(|id| game.team(id)) else {
                continue;
            };
            for &member in &winner.members {
                if let Some(player) = population.get_mut(member) {
                    player.rating += self.bonus;
                }
            }
        }
        Ok(())
    }
}
