//! Integration tests for the ranked system evaluator
//!
//! These tests validate the system working together, including:
//! - Matchmaking feeding the concurrent simulation runner
//! - Order preservation under uneven game durations
//! - The epoch driver's stage ordering and aggregation hook
//! - Failure propagation out of a round

// Modules for organizing tests
mod fixtures;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ranked_evaluator::config::{AppConfig, MatchmakingConfig};
use ranked_evaluator::evaluation::{create_population, RankedSystem, RankedSystemEvaluator};
use ranked_evaluator::rating::NoOpRatingAggregator;
use ranked_evaluator::simulation::{SimulationRunner, TournamentSimulator};
use ranked_evaluator::types::Team;
use ranked_evaluator::{EvaluationError, Game, Matchmaker};
use std::sync::Arc;
use std::time::Duration;

use fixtures::{
    custom_game, default_simulator, seeded_population, seeded_round, MockAggregator,
    SlowSimulator, WinnerBonusAggregator,
};

fn small_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.matchmaking = MatchmakingConfig {
        team_count: 4,
        team_size: 2,
    };
    config.simulation.max_concurrency = 4;
    config.evaluation.population_size = 96;
    config.evaluation.epochs = 3;
    config
}

fn evaluator_with(aggregator: Arc<dyn ranked_evaluator::rating::RatingAggregator>) -> RankedSystemEvaluator {
    let config = small_config();
    let runner = SimulationRunner::new(Arc::new(default_simulator()), 4);
    RankedSystemEvaluator::new(
        RankedSystem::new(Matchmaker::new(config.matchmaking.clone()), aggregator),
        runner,
        1200.0,
        config.evaluation.population_size,
        config.evaluation.epochs,
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_results_follow_submission_order_not_completion_order() {
    let (mut population, games) = seeded_round(6 * 8, 4, 2, 1);
    assert_eq!(games.len(), 6);

    let simulator = Arc::new(SlowSimulator::new(games.len(), Duration::from_millis(25)));
    let runner = SimulationRunner::new(simulator.clone(), games.len());
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    let results = runner
        .simulate_games(&mut population, &games, &mut rng)
        .await
        .unwrap();

    let result_ids: Vec<_> = results.iter().map(|r| r.game_id).collect();
    assert_eq!(result_ids, vec![0, 1, 2, 3, 4, 5]);

    // Earlier games were made slower, so they finished last
    let completion = simulator.completion_order();
    assert_eq!(completion.len(), 6);
    assert_eq!(completion.first(), Some(&5));
    assert_eq!(completion.last(), Some(&0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_bounded_pool_still_completes_every_game() {
    let (mut population, games) = seeded_round(500, 5, 3, 2);
    let rating_before: f64 = population.iter().map(|p| p.rating).sum();
    let runner = SimulationRunner::new(Arc::new(default_simulator()), 2);
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let results = runner
        .simulate_games(&mut population, &games, &mut rng)
        .await
        .unwrap();

    assert_eq!(results.len(), games.len());
    for (game, result) in games.iter().zip(&results) {
        let mut standings = result.standings.clone();
        standings.sort_unstable();
        assert_eq!(standings, (0..game.team_count()).collect::<Vec<_>>());
    }

    // Every duel has one killer and one victim
    let kills: u64 = population.iter().map(|p| p.kill_count as u64).sum();
    let deaths: u64 = population.iter().map(|p| p.death_count as u64).sum();
    let duels: u64 = results.iter().map(|r| r.duels as u64).sum();
    assert_eq!(kills, duels);
    assert_eq!(deaths, duels);

    let total_rating: f64 = population.iter().map(|p| p.rating).sum();
    assert!((total_rating - rating_before).abs() < 1e-6);
}

#[tokio::test]
async fn test_failing_game_surfaces_error_and_keeps_population() {
    let mut population = seeded_population(4, 4);
    let games = vec![
        Game {
            id: 0,
            lobby: 0..2,
            teams: vec![Team::new(0, vec![0]), Team::new(1, vec![1])],
        },
        Game {
            id: 1,
            lobby: 2..4,
            teams: vec![Team::new(0, vec![2]), Team::new(1, vec![3])],
        },
    ];

    struct FailingSimulator;
    impl TournamentSimulator for FailingSimulator {
        fn simulate_game(
            &self,
            game: &Game,
            _lobby: &mut [ranked_evaluator::Player],
            _rng: &mut dyn rand::RngCore,
        ) -> ranked_evaluator::Result<ranked_evaluator::GameResult> {
            Err(EvaluationError::SimulationFailed {
                game_id: game.id,
                reason: "forced".to_string(),
            }
            .into())
        }
    }

    let ids_before: Vec<_> = population.iter().map(|p| p.id).collect();
    let runner = SimulationRunner::new(Arc::new(FailingSimulator), 2);
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let err = runner
        .simulate_games(&mut population, &games, &mut rng)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<EvaluationError>(),
        Some(EvaluationError::SimulationFailed { game_id: 0, .. })
    ));
    let ids_after: Vec<_> = population.iter().map(|p| p.id).collect();
    assert_eq!(ids_before, ids_after);
}

#[tokio::test]
async fn test_aggregator_runs_once_per_epoch_with_aligned_results() {
    let mut aggregator = MockAggregator::new();
    aggregator
        .expect_aggregate()
        .times(3)
        .returning(|population, games, results| {
            assert_eq!(population.len(), 96);
            assert_eq!(games.len(), 12);
            assert_eq!(games.len(), results.len());
            for (game, result) in games.iter().zip(results) {
                assert_eq!(game.id, result.game_id);
            }
            Ok(())
        });

    let evaluator = evaluator_with(Arc::new(aggregator));
    let mut rng = ChaCha8Rng::seed_from_u64(12);

    let report = evaluator.evaluate(&mut rng).await.unwrap();
    assert_eq!(report.epochs.len(), 3);
}

#[tokio::test]
async fn test_aggregator_failure_stops_the_run() {
    let mut aggregator = MockAggregator::new();
    aggregator
        .expect_aggregate()
        .times(1)
        .returning(|_, _, _| Err(anyhow::anyhow!("aggregation refused")));

    let evaluator = evaluator_with(Arc::new(aggregator));
    let mut rng = ChaCha8Rng::seed_from_u64(13);

    let err = evaluator.evaluate(&mut rng).await.unwrap_err();
    assert!(err.to_string().contains("aggregation refused"));
}

#[tokio::test]
async fn test_aggregation_hook_changes_ratings() {
    let evaluator = evaluator_with(Arc::new(WinnerBonusAggregator { bonus: 5.0 }));
    let mut rng = ChaCha8Rng::seed_from_u64(14);

    let report = evaluator.evaluate(&mut rng).await.unwrap();

    // 12 games per epoch, 2 winners each, 5 points apiece, spread over 96 players
    let expected_mean = 1200.0 + 3.0 * 12.0 * 2.0 * 5.0 / 96.0;
    let final_mean = report.final_summary().unwrap().mean_rating;
    assert!((final_mean - expected_mean).abs() < 1e-6);
}

#[tokio::test]
async fn test_evaluate_supplied_population() {
    let evaluator = evaluator_with(Arc::new(NoOpRatingAggregator));
    let mut rng = ChaCha8Rng::seed_from_u64(15);
    let population = create_population(40, 1500.0, &mut rng);

    let report = evaluator
        .evaluate_population(population, &mut rng)
        .await
        .unwrap();

    assert_eq!(report.population.len(), 40);
    // 40 players in lobbies of 8: five full games per epoch
    assert!(report.epochs.iter().all(|summary| summary.games == 5));
    assert!((report.final_summary().unwrap().mean_rating - 1500.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_report_serializes_to_json() {
    let evaluator = RankedSystemEvaluator::from_config(&small_config()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(16);

    let report = evaluator.evaluate(&mut rng).await.unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["epochs"].as_array().map(|e| e.len()), Some(3));
    assert_eq!(json["matchmaking"]["team_count"], 4);
    assert!(json["population"]["players"].is_array());
}

#[test]
fn test_certain_winner_scenario() {
    let simulator = default_simulator();
    let (game, mut lobby) = custom_game(&[vec![0.0], vec![1.0]]);

    for seed in 0..50 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let result = simulator
            .simulate_game(&game, &mut lobby, &mut rng)
            .unwrap();
        assert_eq!(result.standings, vec![1, 0]);
    }
}
