//! Player commands for the open turn
//!
//! A [`PlayerTurn`] is handed out by the state machine only while it is
//! suspended in `PlayerMidTurn`. It mutably borrows the combat context, so
//! no handler can run while the player is acting.

use crate::core::{Combatant, Die, DieId, DieTemplate, Tile, ZoneId};
use crate::game::context::CombatContext;
use crate::game::enemy::EnemyAction;
use crate::game::logger::log_if_verbose;
use crate::game::resolution::{resolve_tile, Resolution};
use crate::game::CombatEvent;
use crate::{CombatError, Result};

pub struct PlayerTurn<'a> {
    ctx: &'a mut CombatContext,
}

impl<'a> PlayerTurn<'a> {
    pub(crate) fn new(ctx: &'a mut CombatContext) -> Self {
        PlayerTurn { ctx }
    }

    /// Read-only access to the whole encounter
    pub fn context(&self) -> &CombatContext {
        &*self.ctx
    }

    pub fn player(&self) -> &Combatant {
        &self.ctx.player
    }

    pub fn enemy(&self) -> &Combatant {
        &self.ctx.enemy.combatant
    }

    pub fn energy(&self) -> i32 {
        self.ctx.player.energy()
    }

    pub fn queued_enemy_action(&self) -> Option<EnemyAction> {
        self.ctx.enemy.queued_action()
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.ctx.tiles()
    }

    pub fn available_dice(&self) -> impl Iterator<Item = &DieTemplate> {
        self.ctx.available_dice()
    }

    pub fn dice_in(&self, zone: ZoneId) -> impl Iterator<Item = &Die> {
        self.ctx.zones.dice_in(zone)
    }

    /// Dice waiting in the pool
    pub fn pool_dice(&self) -> Vec<&Die> {
        match self.ctx.pool() {
            Some(pool) => self.ctx.zones.dice_in(pool).collect(),
            None => Vec::new(),
        }
    }

    /// True once `end_turn` was called; every later command is refused
    pub fn has_ended(&self) -> bool {
        self.ctx.turn_end_signalled()
    }

    fn check_open(&self, command: &str) -> Result<()> {
        if self.has_ended() {
            let err = CombatError::NotPlayerTurn;
            self.ctx.logger.rejected(command, &err);
            return Err(err);
        }
        Ok(())
    }

    fn logged<T>(&self, command: &str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.ctx.logger.rejected(command, e);
        }
        result
    }

    /// Spend one energy to roll a die into the pool
    ///
    /// Nothing is spent if the roll cannot happen (no energy, unknown
    /// template, full pool).
    pub fn roll_die(&mut self, template_key: &str) -> Result<Die> {
        self.check_open("roll_die")?;
        if self.ctx.player.energy() <= 0 {
            return self.logged("roll_die", Err(CombatError::InsufficientEnergy));
        }

        let rolled = self.ctx.roll_into_pool(template_key);
        let die = self.logged("roll_die", rolled)?;
        self.ctx.player.spend_energy();

        self.ctx.emit(CombatEvent::DieRolled {
            die: die.id,
            value: die.value,
            template: die.template.clone(),
        });
        self.ctx.notify_energy();
        Ok(die)
    }

    pub fn move_die(&mut self, die: DieId, to_zone: ZoneId) -> Result<()> {
        self.check_open("move_die")?;
        let moved = self.ctx.zones.move_die(to_zone, die);
        self.logged("move_die", moved)?;
        log_if_verbose!(self.ctx.logger, "Moved die {die} to zone {to_zone}");
        Ok(())
    }

    pub fn swap_dice(&mut self, a: DieId, b: DieId) -> Result<()> {
        self.check_open("swap_dice")?;
        let swapped = self.ctx.zones.swap_dice(a, b);
        self.logged("swap_dice", swapped)?;
        log_if_verbose!(self.ctx.logger, "Swapped dice {a} and {b}");
        Ok(())
    }

    /// Drop a die onto a zone the way a drag-and-drop would
    ///
    /// Takes a free slot if there is one, otherwise trades places with the
    /// die in the zone's first slot.
    pub fn place_die(&mut self, die: DieId, zone: ZoneId) -> Result<()> {
        self.check_open("place_die")?;
        let target = match self.ctx.zones.zone(zone) {
            Some(z) => z,
            None => return self.logged("place_die", Err(CombatError::ZoneNotFound(zone))),
        };

        if !target.is_full() || target.contains(die) {
            let moved = self.ctx.zones.move_die(zone, die);
            return self.logged("place_die", moved);
        }

        let occupant = target.members().first().copied();
        match occupant {
            Some(occupant) => {
                let swapped = self.ctx.zones.swap_dice(die, occupant);
                self.logged("place_die", swapped)
            }
            None => self.logged("place_die", Err(CombatError::ZoneFull(zone))),
        }
    }

    /// Activate a tile with an explicit slot list
    pub fn activate_tile(&mut self, zone: ZoneId, slots: &[Option<DieId>]) -> Result<Resolution> {
        self.check_open("activate_tile")?;
        let resolved = resolve_tile(&mut *self.ctx, zone, slots);
        self.logged("activate_tile", resolved)
    }

    /// Activate a tile with whatever dice currently sit on it
    pub fn activate_tile_zone(&mut self, zone: ZoneId) -> Result<Resolution> {
        let slots: Vec<Option<DieId>> = match self.ctx.zones.zone(zone) {
            Some(z) => z.members().iter().copied().map(Some).collect(),
            None => Vec::new(),
        };
        self.activate_tile(zone, &slots)
    }

    /// Close the turn; the machine resumes on its next tick
    pub fn end_turn(&mut self) -> Result<()> {
        self.check_open("end_turn")?;
        log_if_verbose!(self.ctx.logger, "Player ends turn {}", self.ctx.round);
        self.ctx.signal_turn_end();
        Ok(())
    }
}
