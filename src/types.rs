//! Common types used throughout the evaluator
//!
//! The population is the only owner of player state. Teams and games refer
//! to players by their index into the rating-sorted population, so a round's
//! games can be checked for being a true partition without chasing references.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use uuid::Uuid;

/// Unique identifier for players
pub type PlayerId = Uuid;

/// Position of a player inside the population for the current round
pub type PlayerIndex = usize;

/// Position of a team inside its game
pub type TeamId = usize;

/// Position of a game inside its round
pub type GameId = usize;

/// A synthetic participant with a fixed latent skill and a mutable rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Latent ability in [0, 1), fixed for the player's lifetime
    pub skill_level: f64,
    pub rating: f64,
    pub kill_count: u32,
    pub death_count: u32,
}

impl Player {
    /// Create a player with a fresh identity and no recorded duels
    pub fn new(skill_level: f64, rating: f64) -> Self {
        Self {
            id: crate::utils::generate_player_id(),
            skill_level,
            rating,
            kill_count: 0,
            death_count: 0,
        }
    }

    /// Total number of duels this player has taken part in
    pub fn duels_played(&self) -> u32 {
        self.kill_count + self.death_count
    }

    /// Kills per death, with deathless players reporting their raw kill count
    pub fn kill_death_ratio(&self) -> f64 {
        if self.death_count == 0 {
            self.kill_count as f64
        } else {
            self.kill_count as f64 / self.death_count as f64
        }
    }
}

/// Ordered, index-addressable store of every player in an evaluation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Population {
    players: Vec<Player>,
}

impl Population {
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    pub fn get(&self, index: PlayerIndex) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn get_mut(&mut self, index: PlayerIndex) -> Option<&mut Player> {
        self.players.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Stable ascending sort by current rating
    pub fn sort_by_rating(&mut self) {
        self.players.sort_by(|a, b| a.rating.total_cmp(&b.rating));
    }

    /// Players belonging to a game's lobby
    pub fn lobby(&self, game: &Game) -> Option<&[Player]> {
        self.players.get(game.lobby.clone())
    }

    /// Mutable view of the players belonging to a game's lobby
    pub fn lobby_mut(&mut self, game: &Game) -> Option<&mut [Player]> {
        self.players.get_mut(game.lobby.clone())
    }

    /// Hand ownership of every player to the caller, leaving the population empty
    pub(crate) fn take_players(&mut self) -> Vec<Player> {
        std::mem::take(&mut self.players)
    }

    pub(crate) fn restore_players(&mut self, players: Vec<Player>) {
        self.players = players;
    }
}

impl From<Vec<Player>> for Population {
    fn from(players: Vec<Player>) -> Self {
        Self::new(players)
    }
}

/// A fixed roster of players competing together in one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub members: Vec<PlayerIndex>,
}

impl Team {
    pub fn new(id: TeamId, members: Vec<PlayerIndex>) -> Self {
        Self { id, members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A lobby of teams drawn from one contiguous slice of the sorted population
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    /// Population indices owned by this game
    pub lobby: Range<PlayerIndex>,
    pub teams: Vec<Team>,
}

impl Game {
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(id)
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn player_count(&self) -> usize {
        self.lobby.len()
    }

    /// Translate a population index into an offset within this game's lobby
    pub fn local_index(&self, player: PlayerIndex) -> Option<usize> {
        self.lobby
            .contains(&player)
            .then(|| player - self.lobby.start)
    }
}

/// Finishing order of a simulated game, winner first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub game_id: GameId,
    pub standings: Vec<TeamId>,
    pub team_battles: usize,
    pub duels: usize,
}

impl GameResult {
    pub fn winner(&self) -> Option<TeamId> {
        self.standings.first().copied()
    }

    /// Resolve the standings against the game they came from
    pub fn teams_in_order<'a>(&self, game: &'a Game) -> Vec<&'a Team> {
        self.standings
            .iter()
            .filter_map(|&id| game.team(id))
            .collect()
    }
}
