//! Rating-sorted lobby construction with striped team assignment
//!
//! Players are seeded by current rating so that each lobby holds a narrow
//! band of the population, then dealt round-robin onto teams so that no team
//! collects the strongest players of its lobby.

use crate::config::MatchmakingConfig;
use crate::types::{Game, PlayerIndex, Population, Team};
use std::ops::Range;
use tracing::{debug, warn};

/// Builds a round's games from the whole population
#[derive(Debug, Clone, Default)]
pub struct Matchmaker {
    config: MatchmakingConfig,
}

impl Matchmaker {
    pub fn new(config: MatchmakingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchmakingConfig {
        &self.config
    }

    /// Sort the population by rating and partition it into games
    ///
    /// The population is reordered in place; the returned games refer to the
    /// new order. Every player lands in exactly one team of exactly one game.
    /// When the population does not divide evenly the last game is smaller and
    /// its teams may differ in size by one.
    pub fn create_games(&self, population: &mut Population) -> Vec<Game> {
        population.sort_by_rating();

        let lobby_size = self.config.lobby_size().max(1);
        let total = population.len();
        if total > 0 && total < lobby_size {
            warn!(
                "Population of {} is smaller than one lobby of {}; running a single undersized game",
                total, lobby_size
            );
        }

        let mut games = Vec::with_capacity(total.div_ceil(lobby_size));
        let mut start = 0;
        while start < total {
            let end = (start + lobby_size).min(total);
            games.push(self.build_game(games.len(), start..end));
            start = end;
        }

        debug!(
            "Created {} games from {} players ({} teams of {})",
            games.len(),
            total,
            self.config.team_count,
            self.config.team_size
        );

        games
    }

    /// Stripe one lobby's rating-sorted players across its teams
    fn build_game(&self, id: usize, lobby: Range<PlayerIndex>) -> Game {
        let team_size = self.config.team_size.max(1);
        let team_count = lobby
            .len()
            .div_ceil(team_size)
            .min(self.config.team_count.max(1));

        let mut teams: Vec<Team> = (0..team_count)
            .map(|team_id| Team::new(team_id, Vec::with_capacity(team_size)))
            .collect();

        for (offset, player) in lobby.clone().enumerate() {
            teams[offset % team_count].members.push(player);
        }

        if lobby.len() % team_size != 0 {
            debug!(
                "Game {} has {} players for teams of {}; teams are uneven",
                id,
                lobby.len(),
                team_size
            );
        }

        Game { id, lobby, teams }
    }
}
