//! Matchmaking configuration

use serde::{Deserialize, Serialize};

/// Lobby shape used when partitioning the population
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchmakingConfig {
    /// Number of teams per game
    pub team_count: usize,
    /// Number of players per team
    pub team_size: usize,
}

impl MatchmakingConfig {
    /// Players needed to fill one lobby
    pub fn lobby_size(&self) -> usize {
        self.team_count.saturating_mul(self.team_size)
    }
}

impl Default for MatchmakingConfig {
    fn default() -> Self {
        Self {
            team_count: 20,
            team_size: 3,
        }
    }
}
