//! Status effect hook
//!
//! The turn state machine passes every phase through each combatant's
//! status effects. No effects ship with the crate; damage-over-time,
//! stuns and the like plug in by implementing [`StatusEffect`].

use crate::core::Combatant;
use crate::game::CombatState;
use std::fmt;

pub trait StatusEffect: fmt::Debug {
    fn name(&self) -> &str;

    /// Called once per phase in which hooks fire
    /// (pre and post turn, for both sides).
    fn on_phase(&mut self, state: CombatState, bearer: &mut Combatant);

    /// Expired effects are dropped after the phase they expire in
    fn is_expired(&self) -> bool {
        false
    }
}
