//! Error types for the ranked system evaluator
//!
//! Degenerate inputs (empty populations, undersized lobbies) are handled by
//! policy and never reach this module. Everything here is a fault that the
//! caller should see immediately.

use crate::types::{GameId, PlayerIndex, TeamId};

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific evaluation failures
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Games do not partition the population: {reason}")]
    PartitionViolation { reason: String },

    #[error("Game {game_id} has no team {team}")]
    UnknownTeam { game_id: GameId, team: TeamId },

    #[error("Game {game_id} references player {player} outside its lobby")]
    PlayerOutOfLobby { game_id: GameId, player: PlayerIndex },

    #[error("Simulation of game {game_id} failed: {reason}")]
    SimulationFailed { game_id: GameId, reason: String },

    #[error("Internal evaluator error: {message}")]
    InternalError { message: String },
}
