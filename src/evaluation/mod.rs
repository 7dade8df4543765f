//! Epoch-level evaluation of a ranked system
//!
//! This module bootstraps a synthetic population, drives repeated rounds of
//! matchmaking, simulation and rating aggregation, and measures how closely
//! ratings track latent skill after each round.

pub mod evaluator;
pub mod population;
pub mod statistics;

pub use evaluator::{EvaluationReport, RankedSystem, RankedSystemEvaluator};
pub use population::{create_player, create_population};
pub use statistics::{spearman_correlation, top_players, EpochSummary};
