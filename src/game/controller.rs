//! Combat controller trait
//!
//! A controller plays the player's side. The combat loop calls it once per
//! player turn with a [`PlayerTurn`] handle; everything the controller does
//! goes through that handle's commands.

use crate::game::commands::PlayerTurn;
use crate::game::context::CombatContext;
use crate::game::CombatOutcome;
use crate::Result;

pub trait CombatController {
    fn name(&self) -> &str;

    /// Play one turn
    ///
    /// The turn is ended for the controller if it returns without calling
    /// `end_turn`.
    fn take_turn(&mut self, turn: &mut PlayerTurn<'_>) -> Result<()>;

    /// Called once when the combat is over (outcome is None for aborted or
    /// round-limited combats)
    fn on_combat_end(&mut self, _ctx: &CombatContext, _outcome: Option<CombatOutcome>) {}
}

/// Swallow command rejections a controller can shrug off
///
/// Returns the value on success, None on a recoverable error, and passes
/// everything else up.
pub fn recoverable<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_recoverable() => Ok(None),
        Err(e) => Err(e),
    }
}
