//! Greedy controller
//!
//! Spends all energy on the die with the best average, heals when below
//! half health and otherwise stacks the biggest dice on the attack tiles.

use crate::core::{DieId, TileKind, ZoneId};
use crate::game::commands::PlayerTurn;
use crate::game::controller::{recoverable, CombatController};
use crate::Result;

#[derive(Debug, Default)]
pub struct GreedyController;

impl GreedyController {
    pub fn new() -> Self {
        GreedyController
    }

    fn free_slots(turn: &PlayerTurn<'_>, zone: ZoneId) -> usize {
        turn.context()
            .zones
            .zone(zone)
            .and_then(|z| z.free_slots())
            .unwrap_or(0)
    }

    /// Tiles of `kind`, best first (highest bonus, then most slots)
    fn ranked_tiles(turn: &PlayerTurn<'_>, kind: &TileKind) -> Vec<ZoneId> {
        let mut tiles: Vec<_> = turn
            .tiles()
            .filter(|t| &t.kind == kind)
            .map(|t| (t.bonus(), t.dice_slots, t.zone))
            .collect();
        tiles.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)).then(a.2.cmp(&b.2)));
        tiles.into_iter().map(|(_, _, zone)| zone).collect()
    }

    /// Move dice (already sorted best first) onto tiles until one runs out
    fn fill(turn: &mut PlayerTurn<'_>, dice: &mut Vec<DieId>, tiles: &[ZoneId]) -> Result<()> {
        for &zone in tiles {
            let mut free = Self::free_slots(turn, zone);
            while free > 0 && !dice.is_empty() {
                let die = dice.remove(0);
                if recoverable(turn.move_die(die, zone))?.is_some() {
                    free -= 1;
                }
            }
        }
        Ok(())
    }
}

impl CombatController for GreedyController {
    fn name(&self) -> &str {
        "greedy"
    }

    fn take_turn(&mut self, turn: &mut PlayerTurn<'_>) -> Result<()> {
        let best = turn
            .available_dice()
            .max_by(|a, b| a.mean_value().total_cmp(&b.mean_value()))
            .map(|t| t.key.clone());
        if let Some(key) = best {
            while turn.energy() > 0 {
                if recoverable(turn.roll_die(&key))?.is_none() {
                    break;
                }
            }
        }

        let mut dice: Vec<(i32, DieId)> = turn.pool_dice().iter().map(|d| (d.value, d.id)).collect();
        dice.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        let mut dice: Vec<DieId> = dice.into_iter().map(|(_, id)| id).collect();

        let player = turn.player();
        if player.health * 2 < player.max_health {
            let heal_tiles = Self::ranked_tiles(turn, &TileKind::Heal);
            Self::fill(turn, &mut dice, &heal_tiles)?;
        }
        let attack_tiles = Self::ranked_tiles(turn, &TileKind::Attack);
        Self::fill(turn, &mut dice, &attack_tiles)?;
        let fortify_tiles = Self::ranked_tiles(turn, &TileKind::Fortify);
        Self::fill(turn, &mut dice, &fortify_tiles)?;

        let loaded: Vec<ZoneId> = turn
            .tiles()
            .map(|t| t.zone)
            .filter(|&zone| turn.dice_in(zone).next().is_some())
            .collect();
        for zone in loaded {
            recoverable(turn.activate_tile_zone(zone))?;
        }

        turn.end_turn()
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
        catalog.dice.push(DieTemplate::new("four", &[4]));
        catalog.dice.push(DieTemplate::new("one", &[1]));
        catalog.inventory.dice = vec!["one".to_string(), "four".to_string()];
        let mut ctx = CombatContext::new(catalog, "Beast", CombatConfig::default().with_seed(0)).unwrap();
        ctx.logger.enable_capture();
        ctx.load_inventory().unwrap();
        ctx
    }

    #[test]
    fn test_spends_all_energy_on_best_die() {
        let mut ctx = context();
        ctx.player.set_energy(5);

        GreedyController::new()
            .take_turn(&mut PlayerTurn::new(&mut ctx))
            .unwrap();

        assert_eq!(ctx.player.energy(), 0);
        // smash (3 slots, +2) takes three dice, strike takes the other two
        assert_eq!(ctx.enemy.combatant.health, 50 - (12 + 2) - 8);
        assert_eq!(ctx.zones.die_count(), 0);
    }

    #[test]
    fn test_heals_when_low() {
        let mut ctx = context();
        ctx.player.set_energy(1);
        ctx.player.health = 10;

        GreedyController::new()
            .take_turn(&mut PlayerTurn::new(&mut ctx))
            .unwrap();

        assert_eq!(ctx.player.health, 14);
        assert_eq!(ctx.enemy.combatant.health, 50);
    }
}
