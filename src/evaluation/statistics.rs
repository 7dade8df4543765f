//! Convergence statistics for a population
//!
//! This module measures how well current ratings order the population by
//! latent skill, which is the quantity an evaluation run is meant to watch.

use crate::types::{GameResult, Player, Population};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Snapshot of the population after one epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochSummary {
    /// Zero-based epoch number
    pub epoch: usize,
    /// Games played during the epoch
    pub games: usize,
    /// Team battles fought across all games
    pub team_battles: usize,
    /// Player duels fought across all games
    pub duels: usize,
    /// Mean rating after the epoch
    pub mean_rating: f64,
    /// Population standard deviation of ratings after the epoch
    pub rating_std_dev: f64,
    /// Spearman rank correlation between skill and rating (1.0 = perfectly ordered)
    pub skill_rating_correlation: f64,
    /// Wall time of the epoch
    pub elapsed: Duration,
}

impl EpochSummary {
    /// Summarize an epoch from its results and the updated population
    pub fn new(
        epoch: usize,
        results: &[GameResult],
        population: &Population,
        elapsed: Duration,
    ) -> Self {
        let ratings: Vec<f64> = population.iter().map(|p| p.rating).collect();
        let skills: Vec<f64> = population.iter().map(|p| p.skill_level).collect();

        Self {
            epoch,
            games: results.len(),
            team_battles: results.iter().map(|r| r.team_battles).sum(),
            duels: results.iter().map(|r| r.duels).sum(),
            mean_rating: mean(&ratings),
            rating_std_dev: standard_deviation(&ratings),
            skill_rating_correlation: spearman_correlation(&skills, &ratings),
            elapsed,
        }
    }
}

/// Arithmetic mean, 0.0 for no values
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, 0.0 for fewer than two values
pub fn standard_deviation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.max(0.0).sqrt()
}

/// Pearson correlation; 0.0 when either side has no variance
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let (mean_x, mean_y) = (mean(xs), mean(ys));

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mean_x, y - mean_y);
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    if variance_x <= 0.0 || variance_y <= 0.0 {
        return 0.0;
    }
    (covariance / (variance_x.sqrt() * variance_y.sqrt())).clamp(-1.0, 1.0)
}

/// One-based ranks with ties sharing their average rank
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end share ranks start+1 ..= end
        let shared = (start + 1 + end) as f64 / 2.0;
        for &index in &order[start..end] {
            ranks[index] = shared;
        }
        start = end;
    }
    ranks
}

/// Spearman rank correlation between two equally long samples
pub fn spearman_correlation(xs: &[f64], ys: &[f64]) -> f64 {
    pearson_correlation(&average_ranks(xs), &average_ranks(ys))
}

/// The `count` highest-rated players, best first
pub fn top_players(population: &Population, count: usize) -> Vec<&Player> {
    let mut players: Vec<&Player> = population.iter().collect();
    players.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    players.truncate(count);
    players
}
