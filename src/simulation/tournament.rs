//! Elimination tournament between the teams of one game
//!
//! A game is played as a sequence of team battles between two distinct,
//! still-surviving teams. Each battle is fought as a string of one-on-one
//! duels until one roster is wiped out. Every duel immediately updates both
//! duelists' ratings and kill/death tallies.

use crate::error::{EvaluationError, Result};
use crate::rating::RatingCalculator;
use crate::types::{Game, GameResult, Player, TeamId};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::trace;

/// Trait for resolving a game into a finishing order
pub trait TournamentSimulator: Send + Sync {
    /// Play out `game` and return its standings, winner first
    ///
    /// `lobby` is the game's slice of the population (`lobby[0]` is the player
    /// at `game.lobby.start`). Besides returning the result, this mutates the
    /// rating and kill/death tallies of the players in `lobby`.
    fn simulate_game(
        &self,
        game: &Game,
        lobby: &mut [Player],
        rng: &mut dyn RngCore,
    ) -> Result<GameResult>;
}

/// Which side of a duel came out on top
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelOutcome {
    FirstWins,
    SecondWins,
}

/// Result of one team battle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleOutcome {
    pub winner: TeamId,
    pub loser: TeamId,
    pub duels: usize,
}

/// Probability that a player with `skill` beats one with `opponent_skill`
///
/// Two skill-less players are an even match.
pub fn win_probability(skill: f64, opponent_skill: f64) -> f64 {
    let total = skill + opponent_skill;
    if total > 0.0 {
        (skill / total).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// Resolve a single duel with one uniform draw
pub fn duel(first: &Player, second: &Player, rng: &mut dyn RngCore) -> DuelOutcome {
    let p_first = win_probability(first.skill_level, second.skill_level);
    if rng.gen::<f64>() < p_first {
        DuelOutcome::FirstWins
    } else {
        DuelOutcome::SecondWins
    }
}

/// Simulator that eliminates one team per battle until a single team remains
#[derive(Clone)]
pub struct EliminationSimulator {
    rating: Arc<dyn RatingCalculator>,
}

impl EliminationSimulator {
    pub fn new(rating: Arc<dyn RatingCalculator>) -> Self {
        Self { rating }
    }

    /// Fight a team battle between teams `a` and `b` of `game`
    ///
    /// Both rosters are copied into independently shuffled stacks. The top of
    /// each stack duels; the loser is out for the rest of the battle and the
    /// winner goes back into its own stack at a random position. The team
    /// whose stack still has players wins.
    pub fn battle(
        &self,
        game: &Game,
        a: TeamId,
        b: TeamId,
        lobby: &mut [Player],
        rng: &mut dyn RngCore,
    ) -> Result<BattleOutcome> {
        if a == b {
            return Err(EvaluationError::SimulationFailed {
                game_id: game.id,
                reason: format!("team {} cannot battle itself", a),
            }
            .into());
        }

        let mut stack_a = Self::working_stack(game, a, lobby.len())?;
        let mut stack_b = Self::working_stack(game, b, lobby.len())?;
        stack_a.shuffle(rng);
        stack_b.shuffle(rng);

        let mut duels = 0;
        while !stack_a.is_empty() && !stack_b.is_empty() {
            let (Some(fighter_a), Some(fighter_b)) = (stack_a.pop(), stack_b.pop()) else {
                break;
            };

            let (winner, winner_stack, loser) = match duel(&lobby[fighter_a], &lobby[fighter_b], rng)
            {
                DuelOutcome::FirstWins => (fighter_a, &mut stack_a, fighter_b),
                DuelOutcome::SecondWins => (fighter_b, &mut stack_b, fighter_a),
            };

            self.record_duel(lobby, winner, loser);
            let slot = rng.gen_range(0..=winner_stack.len());
            winner_stack.insert(slot, winner);
            duels += 1;
        }

        let (winner, loser) = if stack_a.is_empty() { (b, a) } else { (a, b) };
        trace!(
            "Game {}: team {} beat team {} in {} duels",
            game.id,
            winner,
            loser,
            duels
        );

        Ok(BattleOutcome {
            winner,
            loser,
            duels,
        })
    }

    /// Lobby-local indices of a team's players
    fn working_stack(game: &Game, team: TeamId, lobby_len: usize) -> Result<Vec<usize>> {
        let team = game.team(team).ok_or(EvaluationError::UnknownTeam {
            game_id: game.id,
            team,
        })?;

        team.members
            .iter()
            .map(|&player| {
                game.local_index(player)
                    .filter(|&local| local < lobby_len)
                    .ok_or_else(|| {
                        EvaluationError::PlayerOutOfLobby {
                            game_id: game.id,
                            player,
                        }
                        .into()
                    })
            })
            .collect()
    }

    /// Apply the rating exchange and tallies for a finished duel
    fn record_duel(&self, lobby: &mut [Player], winner: usize, loser: usize) {
        let (winner_rating, loser_rating) = self
            .rating
            .rate_1vs1(lobby[winner].rating, lobby[loser].rating);

        lobby[winner].rating = winner_rating;
        lobby[winner].kill_count = lobby[winner].kill_count.saturating_add(1);
        lobby[loser].rating = loser_rating;
        lobby[loser].death_count = lobby[loser].death_count.saturating_add(1);
    }
}

impl std::fmt::Debug for EliminationSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EliminationSimulator").finish_non_exhaustive()
    }
}

impl TournamentSimulator for EliminationSimulator {
    fn simulate_game(
        &self,
        game: &Game,
        lobby: &mut [Player],
        rng: &mut dyn RngCore,
    ) -> Result<GameResult> {
        if lobby.len() != game.player_count() {
            return Err(EvaluationError::SimulationFailed {
                game_id: game.id,
                reason: format!(
                    "lobby holds {} players, game expects {}",
                    lobby.len(),
                    game.player_count()
                ),
            }
            .into());
        }
        if let Some(team) = game.teams.iter().find(|team| team.is_empty()) {
            return Err(EvaluationError::SimulationFailed {
                game_id: game.id,
                reason: format!("team {} has no players", team.id),
            }
            .into());
        }

        let mut surviving: Vec<TeamId> = (0..game.team_count()).collect();
        let mut standings = VecDeque::with_capacity(surviving.len());
        let mut team_battles = 0;
        let mut duels = 0;

        while surviving.len() > 1 {
            let picks = rand::seq::index::sample(rng, surviving.len(), 2);
            let (first, second) = (picks.index(0), picks.index(1));

            let outcome = self.battle(game, surviving[first], surviving[second], lobby, rng)?;
            team_battles += 1;
            duels += outcome.duels;

            let eliminated = if surviving[first] == outcome.loser {
                first
            } else {
                second
            };
            surviving.swap_remove(eliminated);
            standings.push_front(outcome.loser);
        }

        if let Some(winner) = surviving.pop() {
            standings.push_front(winner);
        }

        Ok(GameResult {
            game_id: game.id,
            standings: standings.into(),
            team_battles,
            duels,
        })
    }
}
