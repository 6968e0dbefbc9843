//! Combat loop
//!
//! Drives a [`TurnStateMachine`] to the end, handing each player turn to a
//! controller. Stops early once the round limit is reached.
//!
//! Notifications stay queued on the context for the host to drain, unless an
//! event handler is installed, in which case they are handed over after every
//! tick and the queue stays empty.

use crate::game::controller::CombatController;
use crate::game::machine::{Tick, TurnStateMachine};
use crate::game::{CombatEvent, CombatOutcome, CombatState};
use crate::{CombatError, Result};

/// Why the combat ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatEndReason {
    Victory,
    Defeat,
    /// Round limit reached with both sides alive
    RoundLimit,
    /// Aborted from outside
    Aborted,
}

/// Result of running a combat to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatResult {
    pub outcome: Option<CombatOutcome>,
    pub end_reason: CombatEndReason,
    /// Player turns started
    pub rounds: u32,
    pub player_health: i32,
    pub enemy_health: i32,
}

impl CombatResult {
    pub fn is_victory(&self) -> bool {
        self.outcome == Some(CombatOutcome::Victory)
    }
}

pub struct CombatLoop<'a> {
    pub machine: &'a mut TurnStateMachine,
    max_rounds: u32,
    on_event: Option<Box<dyn FnMut(CombatEvent) + 'a>>,
}

impl<'a> CombatLoop<'a> {
    pub fn new(machine: &'a mut TurnStateMachine) -> Self {
        let max_rounds = machine.context().config.max_rounds;
        CombatLoop {
            machine,
            max_rounds,
            on_event: None,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Drain notifications into `handler` as the combat runs
    pub fn with_event_handler(mut self, handler: impl FnMut(CombatEvent) + 'a) -> Self {
        self.on_event = Some(Box::new(handler));
        self
    }

    fn forward_events(&mut self) {
        if let Some(handler) = self.on_event.as_mut() {
            for event in self.machine.drain_events() {
                handler(event);
            }
        }
    }

    /// Run until a terminal state, using `controller` for every player turn
    pub fn run(&mut self, controller: &mut dyn CombatController) -> Result<CombatResult> {
        let end_reason = loop {
            let tick = self.machine.tick()?;
            self.forward_events();
            match tick {
                Tick::Advanced { .. } => continue,
                Tick::Suspended => {
                    if self.machine.context().round > self.max_rounds {
                        self.machine.abort();
                        break CombatEndReason::RoundLimit;
                    }
                    let mut turn = self.machine.player_turn().ok_or(CombatError::InvalidTransition {
                        state: CombatState::PlayerMidTurn,
                        reason: "suspended without an open player turn",
                    })?;
                    controller.take_turn(&mut turn)?;
                    if !turn.has_ended() {
                        turn.end_turn()?;
                    }
                    self.forward_events();
                }
                Tick::Finished(CombatState::Win) => break CombatEndReason::Victory,
                Tick::Finished(CombatState::Lose) => break CombatEndReason::Defeat,
                Tick::Finished(_) => break CombatEndReason::Aborted,
            }
        };

        let outcome = match end_reason {
            CombatEndReason::Victory => Some(CombatOutcome::Victory),
            CombatEndReason::Defeat => Some(CombatOutcome::Defeat),
            _ => None,
        };
        let ctx = self.machine.context();
        controller.on_combat_end(ctx, outcome);
        ctx.logger.normal(&format!(
            "{} after {} rounds ({} vs {} {})",
            match end_reason {
                CombatEndReason::Victory => "Victory",
                CombatEndReason::Defeat => "Defeat",
                CombatEndReason::RoundLimit => "Round limit",
                CombatEndReason::Aborted => "Aborted",
            },
            ctx.round,
            ctx.player.health,
            ctx.enemy.name(),
            ctx.enemy.combatant.health
        ));

        Ok(CombatResult {
            outcome,
            end_reason,
            rounds: ctx.round,
            player_health: ctx.player.health,
            enemy_health: ctx.enemy.combatant.health,
        })
    }
}
