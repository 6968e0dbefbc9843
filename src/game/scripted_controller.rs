//! Scripted controller for tests and fixtures
//!
//! Plays a fixed list of commands per turn. Dice are referred to by the
//! order they were rolled in during that turn and tiles by template key,
//! so a script can be written before any id exists.

use crate::core::{DieId, ZoneId};
use crate::game::commands::PlayerTurn;
use crate::game::controller::{recoverable, CombatController};
use crate::{CombatError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerCommand {
    /// Roll a die of this template
    Roll(String),
    /// Put the n-th die rolled this turn on the first tile with this key
    Place { die: usize, tile: String },
    /// Activate the first tile with this key using the dice on it
    Activate(String),
    EndTurn,
}

pub struct ScriptedController {
    turns: Vec<Vec<PlayerCommand>>,
    current_turn: usize,
}

impl ScriptedController {
    /// One command list per player turn; turns past the end of the script
    /// are passed
    pub fn new(turns: Vec<Vec<PlayerCommand>>) -> Self {
        ScriptedController { turns, current_turn: 0 }
    }

    pub fn turns_played(&self) -> usize {
        self.current_turn
    }

    fn tile_zone(turn: &PlayerTurn<'_>, key: &str) -> Result<ZoneId> {
        turn.tiles()
            .find(|t| t.template == key)
            .map(|t| t.zone)
            .ok_or_else(|| CombatError::TemplateNotFound(key.to_string()))
    }
}

impl CombatController for ScriptedController {
    fn name(&self) -> &str {
        "scripted"
    }

    fn take_turn(&mut self, turn: &mut PlayerTurn<'_>) -> Result<()> {
        let commands = self.turns.get(self.current_turn).cloned().unwrap_or_default();
        self.current_turn += 1;

        let mut rolled: Vec<DieId> = Vec::new();
        for command in commands {
            match command {
                PlayerCommand::Roll(key) => {
                    if let Some(die) = recoverable(turn.roll_die(&key))? {
                        rolled.push(die.id);
                    }
                }
                PlayerCommand::Place { die, tile } => {
                    let zone = Self::tile_zone(turn, &tile)?;
                    let id = *rolled.get(die).ok_or_else(|| {
                        CombatError::InvalidScript(format!("script places die {die} before rolling it"))
                    })?;
                    recoverable(turn.place_die(id, zone))?;
                }
                PlayerCommand::Activate(tile) => {
                    let zone = Self::tile_zone(turn, &tile)?;
                    recoverable(turn.activate_tile_zone(zone))?;
                }
                PlayerCommand::EndTurn => break,
            }
        }

        if !turn.has_ended() {
            turn.end_turn()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DieTemplate;
    use crate::game::context::CombatContext;
    use crate::loader::Catalog;
    use crate::CombatConfig;

    fn context() -> CombatContext {
        let mut catalog = Catalog::builtin();
        catalog.dice.push(DieTemplate::new("six", &[6]));
        catalog.inventory.dice = vec!["six".to_string()];
        let mut ctx = CombatContext::new(catalog, "Beast", CombatConfig::default().with_seed(0)).unwrap();
        ctx.logger.enable_capture();
        ctx.load_inventory().unwrap();
        ctx.player.set_energy(4);
        ctx
    }

    #[test]
    fn test_script_runs_in_order() {
        let mut ctx = context();
        let mut controller = ScriptedController::new(vec![vec![
            PlayerCommand::Roll("six".into()),
            PlayerCommand::Roll("six".into()),
            PlayerCommand::Place {
                die: 0,
                tile: "strike".into(),
            },
            PlayerCommand::Place {
                die: 1,
                tile: "strike".into(),
            },
            PlayerCommand::Activate("strike".into()),
        ]]);

        controller.take_turn(&mut PlayerTurn::new(&mut ctx)).unwrap();
        assert_eq!(ctx.enemy.combatant.health, 38);
        assert_eq!(ctx.player.energy(), 2);
        assert!(ctx.turn_end_signalled());
        assert_eq!(controller.turns_played(), 1);
    }

    #[test]
    fn test_past_end_of_script_passes() {
        let mut ctx = context();
        let mut controller = ScriptedController::new(Vec::new());
        controller.take_turn(&mut PlayerTurn::new(&mut ctx)).unwrap();
        assert!(ctx.turn_end_signalled());
        assert_eq!(ctx.player.energy(), 4);
    }

    #[test]
    fn test_unknown_tile_is_an_error() {
        let mut ctx = context();
        let mut controller = ScriptedController::new(vec![vec![PlayerCommand::Activate("meteor".into())]]);
        let err = controller.take_turn(&mut PlayerTurn::new(&mut ctx)).unwrap_err();
        assert!(matches!(err, CombatError::TemplateNotFound(_)));
    }

    #[test]
    fn test_place_before_roll_is_a_script_error() {
        let mut ctx = context();
        let mut controller = ScriptedController::new(vec![vec![PlayerCommand::Place {
            die: 0,
            tile: "mend".into(),
        }]]);
        let err = controller.take_turn(&mut PlayerTurn::new(&mut ctx)).unwrap_err();
        assert!(matches!(err, CombatError::InvalidScript(_)));
        assert_eq!(ctx.zones.die_count(), 0);
    }

    #[test]
    fn test_commands_from_json() {
        let json = r#"[{"roll": "six"}, {"place": {"die": 0, "tile": "mend"}}, {"activate": "mend"}, "end_turn"]"#;
        let commands: Vec<PlayerCommand> = serde_json::from_str(json).unwrap();
        assert_eq!(commands.len(), 4);
        assert_eq!(commands[3], PlayerCommand::EndTurn);
    }
}
