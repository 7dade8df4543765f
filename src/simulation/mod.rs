//! Game simulation: resolving lobbies into finishing orders
//!
//! The tournament simulator plays one game at a time, moving ratings after
//! every duel. The runner fans a round's games out over a bounded pool of
//! blocking workers and hands the results back in game order.

pub mod runner;
pub mod tournament;

pub use runner::SimulationRunner;
pub use tournament::{
    duel, win_probability, BattleOutcome, DuelOutcome, EliminationSimulator, TournamentSimulator,
};
