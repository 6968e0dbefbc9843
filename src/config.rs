//! Combat tuning knobs
//!
//! Defaults reproduce the standard ruleset. A JSON file can override any
//! subset of fields; command-line flags override the file.

use crate::game::VerbosityLevel;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Energy the player starts every combat with
pub const DEFAULT_STARTING_ENERGY: i32 = 4;

/// Energy granted at the start of every player turn
pub const DEFAULT_ENERGY_PER_TURN: i32 = 2;

/// Rounds before a combat is abandoned
pub const DEFAULT_MAX_ROUNDS: u32 = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub starting_energy: i32,
    pub energy_per_turn: i32,

    /// Maximum dice in the shared pool (None = unbounded)
    pub pool_capacity: Option<usize>,

    /// Player turns before the combat loop gives up
    pub max_rounds: u32,

    /// RNG seed (None = seed from entropy)
    pub seed: Option<u64>,

    pub verbosity: VerbosityLevel,
}

impl Default for CombatConfig {
    fn default() -> Self {
        CombatConfig {
            starting_energy: DEFAULT_STARTING_ENERGY,
            energy_per_turn: DEFAULT_ENERGY_PER_TURN,
            pool_capacity: None,
            max_rounds: DEFAULT_MAX_ROUNDS,
            seed: None,
            verbosity: VerbosityLevel::default(),
        }
    }
}

impl CombatConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CombatConfig::default();
        assert_eq!(config.starting_energy, 4);
        assert_eq!(config.energy_per_turn, 2);
        assert_eq!(config.pool_capacity, None);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_partial_override() {
        let config = CombatConfig::from_json_str(r#"{"energy_per_turn": 3, "pool_capacity": 5}"#).unwrap();
        assert_eq!(config.energy_per_turn, 3);
        assert_eq!(config.pool_capacity, Some(5));
        assert_eq!(config.starting_energy, DEFAULT_STARTING_ENERGY);
        assert_eq!(config.max_rounds, DEFAULT_MAX_ROUNDS);
    }

    #[test]
    fn test_bad_json() {
        assert!(CombatConfig::from_json_str("{ not json").is_err());
    }
}
