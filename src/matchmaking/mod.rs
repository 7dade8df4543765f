//! Matchmaking: partitioning a rated population into balanced games
//!
//! This module contains the round-wide matchmaker and the partition check
//! that every round's games must pass before they are simulated.

pub mod matchmaker;
pub mod partition;

pub use matchmaker::Matchmaker;
pub use partition::validate_partition;
