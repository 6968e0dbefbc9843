//! Dice Combat - turn-based combat core for a dice-and-tile tactics game
//!
//! A state machine sequences player and enemy turns, a zone registry tracks
//! where every live die sits, and a filter pipeline turns placed dice into
//! damage or healing.

pub mod batch;
pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod zones;

pub use config::CombatConfig;
pub use error::{CombatError, Result};
