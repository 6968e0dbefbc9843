//! Turn state machine
//!
//! The host drives the combat by calling [`TurnStateMachine::tick`]. Each
//! tick runs the handler of the current state and moves to the next one.
//! `PlayerMidTurn` is the single suspension point: the machine parks on an
//! [`Continuation::AwaitTurnEnd`] and hands out a [`PlayerTurn`] until the
//! player ends the turn, then resumes on the following tick.

use crate::core::Side;
use crate::game::commands::PlayerTurn;
use crate::game::context::CombatContext;
use crate::game::enemy::ActionOutcome;
use crate::game::logger::log_if_verbose;
use crate::game::state::{next_state, TransitionFlags};
use crate::game::{CombatEvent, CombatOutcome, CombatState};
use crate::{CombatError, Result};

/// Work the machine is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Player mid-turn: resume once the player ends the turn
    AwaitTurnEnd,
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// A handler ran and the machine moved on
    Advanced { from: CombatState, to: CombatState },
    /// Waiting for the player to end the turn
    Suspended,
    /// Terminal state reached; further ticks change nothing
    Finished(CombatState),
}

#[derive(Debug)]
pub struct TurnStateMachine {
    ctx: CombatContext,
    state: CombatState,
    flags: TransitionFlags,
    continuation: Option<Continuation>,

    /// Cleared while a handler owns the current state
    state_ready: bool,

    outcome_reported: bool,
}

impl TurnStateMachine {
    pub fn new(ctx: CombatContext) -> Self {
        TurnStateMachine {
            ctx,
            state: CombatState::Start,
            flags: TransitionFlags::default(),
            continuation: None,
            state_ready: true,
            outcome_reported: false,
        }
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn flags(&self) -> TransitionFlags {
        self.flags
    }

    pub fn context(&self) -> &CombatContext {
        &self.ctx
    }

    /// Direct access for hosts and tests; bypasses the turn rules
    pub fn context_mut(&mut self) -> &mut CombatContext {
        &mut self.ctx
    }

    pub fn into_context(self) -> CombatContext {
        self.ctx
    }

    pub fn is_suspended(&self) -> bool {
        self.continuation.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        self.ctx.drain_events()
    }

    /// Command handle for the open player turn
    ///
    /// None outside `PlayerMidTurn` and once the turn has been ended.
    pub fn player_turn(&mut self) -> Option<PlayerTurn<'_>> {
        if self.continuation == Some(Continuation::AwaitTurnEnd) && !self.ctx.turn_end_signalled() {
            Some(PlayerTurn::new(&mut self.ctx))
        } else {
            None
        }
    }

    /// End the player's turn without borrowing a command handle
    pub fn end_turn(&mut self) -> Result<()> {
        if let Some(mut turn) = self.player_turn() {
            return turn.end_turn();
        }
        self.ctx.logger.rejected("end_turn", &CombatError::NotPlayerTurn);
        Err(CombatError::NotPlayerTurn)
    }

    /// Drop to the neutral `Aborted` state from anywhere
    ///
    /// A pending suspension is discarded. Handlers are never interrupted
    /// mid-way since none is running between ticks.
    pub fn abort(&mut self) {
        log_if_verbose!(self.ctx.logger, "Combat aborted in {}", self.state);
        self.state = CombatState::Aborted;
        self.continuation = None;
        self.ctx.take_turn_end();
        self.state_ready = true;
    }

    /// Run one step of the combat
    pub fn tick(&mut self) -> Result<Tick> {
        if self.state.is_terminal() {
            self.report_outcome();
            return Ok(Tick::Finished(self.state));
        }

        if let Some(Continuation::AwaitTurnEnd) = self.continuation {
            if !self.ctx.take_turn_end() {
                return Ok(Tick::Suspended);
            }
            self.continuation = None;
            self.resume_player_mid_turn();
            self.state_ready = true;
            return self.advance();
        }

        if !self.state_ready {
            debug_assert!(false, "tick in {:?} with the state gate closed", self.state);
            return Err(CombatError::InvalidTransition {
                state: self.state,
                reason: "state not ready",
            });
        }

        self.state_ready = false;
        let handled = match self.state {
            CombatState::Start => self.handle_start(),
            CombatState::PlayerPreTurn => {
                self.handle_player_pre_turn();
                Ok(())
            }
            CombatState::PlayerMidTurn => {
                self.continuation = Some(Continuation::AwaitTurnEnd);
                self.ctx.logger.normal("Waiting for the player");
                return Ok(Tick::Suspended);
            }
            CombatState::PlayerPostTurn => {
                self.handle_status_hooks();
                self.ctx.zones.clear();
                Ok(())
            }
            CombatState::EnemyPreTurn => {
                self.handle_status_hooks();
                Ok(())
            }
            CombatState::EnemyMidTurn => {
                self.handle_enemy_mid_turn();
                Ok(())
            }
            CombatState::EnemyPostTurn => {
                self.handle_status_hooks();
                self.enemy_decide();
                Ok(())
            }
            CombatState::Win | CombatState::Lose | CombatState::Aborted => unreachable!("terminal states return early"),
        };
        self.state_ready = true;
        handled?;

        self.advance()
    }

    /// Tick until the player has to act or the combat is over
    pub fn run_until_input(&mut self) -> Result<Tick> {
        loop {
            match self.tick()? {
                Tick::Advanced { .. } => continue,
                other => return Ok(other),
            }
        }
    }

    fn advance(&mut self) -> Result<Tick> {
        let from = self.state;
        let to = next_state(from, self.flags).ok_or(CombatError::InvalidTransition {
            state: from,
            reason: "no successor",
        })?;
        self.state = to;
        self.ctx.emit(CombatEvent::StateEntered { state: to });
        Ok(Tick::Advanced { from, to })
    }

    fn handle_start(&mut self) -> Result<()> {
        self.ctx.load_inventory()?;
        let energy = self.ctx.config.starting_energy;
        self.ctx.player.set_energy(energy);

        self.ctx.notify_health(Side::Player);
        self.ctx.notify_health(Side::Enemy);
        self.ctx.notify_energy();
        self.enemy_decide();
        Ok(())
    }

    fn handle_player_pre_turn(&mut self) {
        self.ctx.round += 1;
        let grant = self.ctx.config.energy_per_turn;
        self.ctx.player.regen_energy(grant);
        self.ctx
            .logger
            .normal(&format!("Round {}: {} energy", self.ctx.round, self.ctx.player.energy()));
        self.ctx.notify_energy();
        self.handle_status_hooks();
    }

    fn resume_player_mid_turn(&mut self) {
        if self.ctx.enemy.combatant.is_dead() {
            self.flags.victorious = true;
        }
    }

    fn handle_enemy_mid_turn(&mut self) {
        let ctx = &mut self.ctx;
        let outcome = ctx.enemy.execute_queued_action(&mut ctx.player, self.state);
        match outcome {
            ActionOutcome::Damaged { amount } => {
                ctx.logger.normal(&format!("{} hits for {amount}", ctx.enemy.name()));
            }
            ActionOutcome::Recovered { amount } => {
                ctx.logger.normal(&format!("{} recovers {amount}", ctx.enemy.name()));
            }
            ActionOutcome::NoQueuedAction => {
                ctx.logger.normal(&format!("{} has no action queued", ctx.enemy.name()));
            }
            ActionOutcome::OutOfPhase => {
                debug_assert!(false, "enemy acted outside its mid-turn");
            }
        }

        if ctx.player.is_dead() {
            self.flags.defeated = true;
        }
        self.ctx.notify_health(Side::Player);
        self.ctx.notify_health(Side::Enemy);
    }

    fn handle_status_hooks(&mut self) {
        for side in [Side::Player, Side::Enemy] {
            let combatant = self.ctx.combatant_mut(side);
            let before = combatant.health;
            combatant.handle_status_effects(self.state);
            if combatant.health != before {
                self.ctx.notify_health(side);
            }
        }
    }

    fn enemy_decide(&mut self) {
        let ctx = &mut self.ctx;
        let Some(action) = ctx.enemy.decide_action(&mut ctx.rng) else {
            ctx.logger.normal(&format!("{} has nothing to do", ctx.enemy.name()));
            return;
        };
        if let Some(text) = ctx.enemy.telegraph_text() {
            let enemy = ctx.enemy.name().to_string();
            ctx.emit(CombatEvent::ActionTelegraphed {
                enemy,
                action: action.kind,
                text,
            });
        }
    }

    fn report_outcome(&mut self) {
        if self.outcome_reported {
            return;
        }
        self.outcome_reported = true;
        let outcome = match self.state {
            CombatState::Win => CombatOutcome::Victory,
            CombatState::Lose => CombatOutcome::Defeat,
            _ => return,
        };
        self.ctx.emit(CombatEvent::ended(outcome));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DieTemplate, ZoneId};
    use crate::game::enemy::{EnemyAction, EnemyArchetype};
    use crate::loader::Catalog;
    use crate::CombatConfig;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::builtin();
        catalog.dice.push(DieTemplate::new("five", &[5]));
        catalog.dice.push(DieTemplate::new("ten", &[10]));
        catalog.inventory.dice = vec!["five".to_string(), "ten".to_string()];
        catalog.enemies.push(EnemyArchetype {
            name: "Brute".to_string(),
            max_health: 30,
            candidates: vec![EnemyAction::heavy_attack()],
        });
        catalog
    }

    fn machine(enemy: &str) -> TurnStateMachine {
        let mut ctx = CombatContext::new(catalog(), enemy, CombatConfig::default().with_seed(5)).unwrap();
        ctx.logger.enable_capture();
        TurnStateMachine::new(ctx)
    }

    fn strike_zone(machine: &TurnStateMachine) -> ZoneId {
        machine.context().tiles().find(|t| t.template == "strike").unwrap().zone
    }

    #[test]
    fn test_full_round_order() {
        let mut m = machine("Beast");
        let mut visited = vec![m.state()];

        for _ in 0..2 {
            assert_eq!(m.run_until_input().unwrap(), Tick::Suspended);
            m.end_turn().unwrap();
            loop {
                match m.tick().unwrap() {
                    Tick::Advanced { to, .. } => {
                        visited.push(to);
                        if to == CombatState::PlayerMidTurn {
                            break;
                        }
                    }
                    other => panic!("unexpected {other:?}"),
                }
            }
        }

        // First suspend happens before anything is recorded in the loop
        assert_eq!(
            visited,
            vec![
                CombatState::Start,
                CombatState::PlayerPostTurn,
                CombatState::EnemyPreTurn,
                CombatState::EnemyMidTurn,
                CombatState::EnemyPostTurn,
                CombatState::PlayerPreTurn,
                CombatState::PlayerMidTurn,
                CombatState::PlayerPostTurn,
                CombatState::EnemyPreTurn,
                CombatState::EnemyMidTurn,
                CombatState::EnemyPostTurn,
                CombatState::PlayerPreTurn,
                CombatState::PlayerMidTurn,
            ]
        );
    }

    #[test]
    fn test_energy_start_and_grant() {
        let mut m = machine("Beast");

        assert_eq!(
            m.tick().unwrap(),
            Tick::Advanced {
                from: CombatState::Start,
                to: CombatState::PlayerPreTurn
            }
        );
        assert_eq!(m.context().player.energy(), 4);

        m.tick().unwrap();
        assert_eq!(m.state(), CombatState::PlayerMidTurn);
        assert_eq!(m.context().player.energy(), 6);
        assert_eq!(m.context().round, 1);
    }

    #[test]
    fn test_start_telegraphs_enemy_action() {
        let mut m = machine("Beast");
        m.tick().unwrap();
        assert!(m.context().enemy.queued_action().is_some());

        let events = m.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            CombatEvent::ActionTelegraphed { text, .. } if text.starts_with("Beast is going to use ")
        )));
        assert!(events.iter().any(|e| matches!(e, CombatEvent::EnergyChanged { energy: 4, .. })));
    }

    #[test]
    fn test_suspended_until_turn_ends() {
        let mut m = machine("Beast");
        assert_eq!(m.run_until_input().unwrap(), Tick::Suspended);
        assert!(m.is_suspended());

        for _ in 0..3 {
            assert_eq!(m.tick().unwrap(), Tick::Suspended);
            assert_eq!(m.state(), CombatState::PlayerMidTurn);
        }

        m.player_turn().unwrap().end_turn().unwrap();
        assert!(m.player_turn().is_none());
        assert_eq!(
            m.tick().unwrap(),
            Tick::Advanced {
                from: CombatState::PlayerMidTurn,
                to: CombatState::PlayerPostTurn
            }
        );
        assert!(!m.is_suspended());
    }

    #[test]
    fn test_no_player_turn_outside_mid_turn() {
        let mut m = machine("Beast");
        assert!(m.player_turn().is_none());
        assert!(matches!(m.end_turn(), Err(CombatError::NotPlayerTurn)));

        m.tick().unwrap();
        assert!(m.player_turn().is_none());
    }

    #[test]
    fn test_overkill_wins_on_resume() {
        let mut m = machine("Beast");
        m.run_until_input().unwrap();
        m.context_mut().enemy.combatant.health = 10;
        let zone = strike_zone(&m);

        {
            let mut turn = m.player_turn().unwrap();
            let a = turn.roll_die("ten").unwrap().id;
            let b = turn.roll_die("five").unwrap().id;
            turn.move_die(a, zone).unwrap();
            turn.move_die(b, zone).unwrap();
            turn.activate_tile(zone, &[Some(a), Some(b)]).unwrap();
            assert_eq!(turn.enemy().health, -5);
            turn.end_turn().unwrap();
        }

        assert_eq!(
            m.tick().unwrap(),
            Tick::Advanced {
                from: CombatState::PlayerMidTurn,
                to: CombatState::Win
            }
        );
        assert!(m.flags().victorious);

        m.drain_events();
        assert_eq!(m.tick().unwrap(), Tick::Finished(CombatState::Win));
        assert_eq!(m.drain_events(), vec![CombatEvent::ended(CombatOutcome::Victory)]);

        // One-shot: no repeat notification
        assert_eq!(m.tick().unwrap(), Tick::Finished(CombatState::Win));
        assert!(m.drain_events().is_empty());
    }

    #[test]
    fn test_enemy_at_zero_is_not_defeated() {
        let mut m = machine("Beast");
        m.run_until_input().unwrap();
        m.context_mut().enemy.combatant.health = 0;
        m.end_turn().unwrap();

        assert_eq!(
            m.tick().unwrap(),
            Tick::Advanced {
                from: CombatState::PlayerMidTurn,
                to: CombatState::PlayerPostTurn
            }
        );
    }

    #[test]
    fn test_enemy_kills_player() {
        let mut m = machine("Brute");
        m.run_until_input().unwrap();
        m.context_mut().player.health = 3;
        m.end_turn().unwrap();

        let mut last = None;
        while let Tick::Advanced { to, .. } = m.tick().unwrap() {
            last = Some(to);
        }
        assert_eq!(last, Some(CombatState::Lose));
        assert_eq!(m.state(), CombatState::Lose);
        assert_eq!(m.context().player.health, -7);
        assert!(m
            .drain_events()
            .contains(&CombatEvent::ended(CombatOutcome::Defeat)));
    }

    #[test]
    fn test_post_turn_clears_dice() {
        let mut m = machine("Beast");
        m.run_until_input().unwrap();
        let zone = strike_zone(&m);
        {
            let mut turn = m.player_turn().unwrap();
            let a = turn.roll_die("five").unwrap().id;
            turn.roll_die("five").unwrap();
            turn.move_die(a, zone).unwrap();
            turn.end_turn().unwrap();
        }
        assert_eq!(m.context().zones.die_count(), 2);

        m.tick().unwrap();
        m.tick().unwrap();
        assert_eq!(m.state(), CombatState::EnemyPreTurn);
        assert_eq!(m.context().zones.die_count(), 0);
        assert_eq!(m.context().tiles().count(), 4);
    }

    #[test]
    fn test_failed_start_does_not_advance() {
        let mut catalog = catalog();
        catalog.inventory.tiles = vec!["strike".to_string(), "meteor".to_string(), "mend".to_string()];
        let ctx = CombatContext::new(catalog, "Beast", CombatConfig::default().with_seed(5)).unwrap();
        let mut m = TurnStateMachine::new(ctx);

        for _ in 0..2 {
            assert!(matches!(m.tick(), Err(CombatError::TemplateNotFound(ref key)) if key == "meteor"));
            assert_eq!(m.state(), CombatState::Start);
            assert_eq!(m.context().tiles().count(), 0);
        }
    }

    #[test]
    fn test_abort() {
        let mut m = machine("Beast");
        m.run_until_input().unwrap();
        m.abort();

        assert_eq!(m.state(), CombatState::Aborted);
        assert!(!m.is_suspended());
        assert!(m.player_turn().is_none());
        m.drain_events();
        assert_eq!(m.tick().unwrap(), Tick::Finished(CombatState::Aborted));
        assert!(m.drain_events().is_empty());
    }
}
