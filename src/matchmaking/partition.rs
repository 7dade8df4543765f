//! Partition check for a round's games
//!
//! Games are simulated concurrently and mutate the players they contain, so
//! no player may be reachable from two games. The runner refuses to start a
//! round that fails this check.

use crate::error::{EvaluationError, Result};
use crate::types::Game;

fn violation(reason: String) -> anyhow::Error {
    EvaluationError::PartitionViolation { reason }.into()
}

/// Check that `games` split a population of `population_len` players exactly
///
/// Lobbies must be non-empty, contiguous and in order, covering the whole
/// population. Inside each lobby every player must sit on exactly one
/// non-empty team, and team ids must match their position.
pub fn validate_partition(population_len: usize, games: &[Game]) -> Result<()> {
    let mut cursor = 0;

    for (position, game) in games.iter().enumerate() {
        if game.id != position {
            return Err(violation(format!(
                "game at position {} has id {}",
                position, game.id
            )));
        }
        if game.lobby.start != cursor {
            return Err(violation(format!(
                "game {} starts at player {}, expected {}",
                game.id, game.lobby.start, cursor
            )));
        }
        if game.lobby.is_empty() || game.teams.is_empty() {
            return Err(violation(format!("game {} is empty", game.id)));
        }

        let mut seen = vec![false; game.lobby.len()];
        for (team_position, team) in game.teams.iter().enumerate() {
            if team.id != team_position {
                return Err(violation(format!(
                    "game {} has team id {} at position {}",
                    game.id, team.id, team_position
                )));
            }
            if team.is_empty() {
                return Err(violation(format!(
                    "game {} team {} has no players",
                    game.id, team.id
                )));
            }

            for &player in &team.members {
                let local = game.local_index(player).ok_or_else(|| {
                    violation(format!(
                        "player {} of game {} lies outside lobby {:?}",
                        player, game.id, game.lobby
                    ))
                })?;
                if std::mem::replace(&mut seen[local], true) {
                    return Err(violation(format!(
                        "player {} appears twice in game {}",
                        player, game.id
                    )));
                }
            }
        }

        if let Some(missing) = seen.iter().position(|assigned| !assigned) {
            return Err(violation(format!(
                "player {} of game {} is not on any team",
                game.lobby.start + missing,
                game.id
            )));
        }

        cursor = game.lobby.end;
    }

    if cursor != population_len {
        return Err(violation(format!(
            "games cover {} of {} players",
            cursor, population_len
        )));
    }

    Ok(())
}
