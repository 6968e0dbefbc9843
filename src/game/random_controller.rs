//! Random controller for testing and baseline play
//!
//! Rolls a random number of dice, drops them on random tiles and fires
//! most of the loaded tiles. A floor to compare smarter controllers with.

use crate::core::{DieId, ZoneId};
use crate::game::commands::PlayerTurn;
use crate::game::controller::{recoverable, CombatController};
use crate::Result;
use rand::seq::SliceRandom;
use rand::Rng;

pub struct RandomController {
    rng: Box<dyn rand::RngCore>,
}

impl RandomController {
    /// Create a random controller seeded from the thread RNG
    pub fn new() -> Self {
        RandomController {
            rng: Box::new(rand::thread_rng()),
        }
    }

    /// Create a random controller with a seeded RNG (for deterministic testing)
    pub fn with_seed(seed: u64) -> Self {
        use rand::SeedableRng;
        RandomController {
            rng: Box::new(rand::rngs::StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomController {
    fn default() -> Self {
        Self::new()
    }
}

impl CombatController for RandomController {
    fn name(&self) -> &str {
        "random"
    }

    fn take_turn(&mut self, turn: &mut PlayerTurn<'_>) -> Result<()> {
        let templates: Vec<String> = turn.available_dice().map(|t| t.key.clone()).collect();
        while turn.energy() > 0 && !templates.is_empty() && self.rng.gen_bool(0.85) {
            let Some(key) = templates.choose(&mut self.rng) else {
                break;
            };
            if recoverable(turn.roll_die(key))?.is_none() {
                break;
            }
        }

        let tiles: Vec<ZoneId> = turn.tiles().map(|t| t.zone).collect();
        if tiles.is_empty() {
            return turn.end_turn();
        }
        let pool: Vec<DieId> = turn.pool_dice().iter().map(|d| d.id).collect();
        for die in pool {
            if let Some(&zone) = tiles.choose(&mut self.rng) {
                recoverable(turn.move_die(die, zone))?;
            }
        }

        for zone in tiles {
            if turn.dice_in(zone).next().is_some() && self.rng.gen_bool(0.9) {
                recoverable(turn.activate_tile_zone(zone))?;
            }
        }

        turn.end_turn()
    }
}
