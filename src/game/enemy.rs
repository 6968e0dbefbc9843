//! Enemy archetypes and their decision policy
//!
//! An enemy picks its next action at the end of each of its turns and
//! telegraphs it to the player. The action runs during the following
//! enemy mid-turn.

use crate::core::{apply_filters_of_type, Combatant, FilterType, Side};
use crate::game::CombatState;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyActionKind {
    LightAttack,
    HeavyAttack,
    Recover,
}

impl EnemyActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            EnemyActionKind::LightAttack => "light attack",
            EnemyActionKind::HeavyAttack => "heavy attack",
            EnemyActionKind::Recover => "recover",
        }
    }

    pub fn is_attack(&self) -> bool {
        !matches!(self, EnemyActionKind::Recover)
    }
}

impl fmt::Display for EnemyActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A candidate action with its strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyAction {
    pub kind: EnemyActionKind,
    pub magnitude: i32,
}

impl EnemyAction {
    pub const fn new(kind: EnemyActionKind, magnitude: i32) -> Self {
        EnemyAction { kind, magnitude }
    }

    pub const fn light_attack() -> Self {
        Self::new(EnemyActionKind::LightAttack, 5)
    }

    pub const fn heavy_attack() -> Self {
        Self::new(EnemyActionKind::HeavyAttack, 10)
    }

    pub const fn recover() -> Self {
        Self::new(EnemyActionKind::Recover, 5)
    }
}

/// Catalog entry for an enemy
///
/// Duplicate candidates weight the draw: `[light, light, heavy]` picks a
/// light attack two times out of three.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyArchetype {
    pub name: String,
    pub max_health: i32,
    pub candidates: Vec<EnemyAction>,
}

impl EnemyArchetype {
    pub fn beast() -> Self {
        EnemyArchetype {
            name: "Beast".to_string(),
            max_health: 50,
            candidates: vec![
                EnemyAction::light_attack(),
                EnemyAction::light_attack(),
                EnemyAction::heavy_attack(),
            ],
        }
    }

    pub fn troll() -> Self {
        EnemyArchetype {
            name: "Troll".to_string(),
            max_health: 70,
            candidates: vec![
                EnemyAction::heavy_attack(),
                EnemyAction::heavy_attack(),
                EnemyAction::recover(),
            ],
        }
    }
}

/// How an enemy picks its next action
pub trait DecisionPolicy: fmt::Debug {
    /// Pick one of `candidates`, or None if there is nothing to pick
    fn choose(&mut self, candidates: &[EnemyAction], rng: &mut dyn RngCore) -> Option<EnemyAction>;
}

/// Uniform draw over the candidate list (duplicates act as weights)
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedUniform;

impl DecisionPolicy for WeightedUniform {
    fn choose(&mut self, candidates: &[EnemyAction], rng: &mut dyn RngCore) -> Option<EnemyAction> {
        if candidates.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..candidates.len());
        Some(candidates[index])
    }
}

/// What executing the queued action did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The target lost `amount` health (after filters)
    Damaged { amount: i32 },
    /// The enemy regained `amount` health
    Recovered { amount: i32 },
    /// Nothing was queued
    NoQueuedAction,
    /// Called outside the enemy's mid-turn
    OutOfPhase,
}

/// A live enemy: combatant state, archetype and queued action
#[derive(Debug)]
pub struct Enemy {
    pub combatant: Combatant,
    archetype: EnemyArchetype,
    queued: Option<EnemyAction>,
    policy: Box<dyn DecisionPolicy>,
}

impl Enemy {
    pub fn new(archetype: EnemyArchetype) -> Self {
        Self::with_policy(archetype, Box::new(WeightedUniform))
    }

    pub fn with_policy(archetype: EnemyArchetype, policy: Box<dyn DecisionPolicy>) -> Self {
        Enemy {
            combatant: Combatant::new(archetype.name.clone(), Side::Enemy, archetype.max_health),
            archetype,
            queued: None,
            policy,
        }
    }

    pub fn name(&self) -> &str {
        &self.combatant.name
    }

    pub fn archetype(&self) -> &EnemyArchetype {
        &self.archetype
    }

    /// Pick and queue the next action
    ///
    /// An archetype without candidates leaves the queue empty.
    pub fn decide_action(&mut self, rng: &mut dyn RngCore) -> Option<EnemyAction> {
        self.queued = self.policy.choose(&self.archetype.candidates, rng);
        self.queued
    }

    pub fn queued_action(&self) -> Option<EnemyAction> {
        self.queued
    }

    /// Player-facing announcement of the queued action
    pub fn telegraph_text(&self) -> Option<String> {
        self.queued.map(|action| {
            format!(
                "{} is going to use {}",
                self.name(),
                action.kind.name().to_uppercase()
            )
        })
    }

    /// Run the queued action against `target`
    ///
    /// Attacks pass through this enemy's `AttackActor` filters, then the
    /// target's `AttackRecipient` filters, and are floored at 0. The action
    /// stays queued until the next decision.
    pub fn execute_queued_action(&mut self, target: &mut Combatant, state: CombatState) -> ActionOutcome {
        if state != CombatState::EnemyMidTurn {
            return ActionOutcome::OutOfPhase;
        }
        let Some(action) = self.queued else {
            return ActionOutcome::NoQueuedAction;
        };

        match action.kind {
            EnemyActionKind::LightAttack | EnemyActionKind::HeavyAttack => {
                let outgoing =
                    apply_filters_of_type(action.magnitude, self.combatant.filters(), FilterType::AttackActor);
                let amount = apply_filters_of_type(outgoing, target.filters(), FilterType::AttackRecipient).max(0);
                target.take_damage(amount);
                ActionOutcome::Damaged { amount }
            }
            EnemyActionKind::Recover => {
                let outgoing =
                    apply_filters_of_type(action.magnitude, self.combatant.filters(), FilterType::HealActor);
                let amount = apply_filters_of_type(outgoing, self.combatant.filters(), FilterType::HealRecipient);
                self.combatant.heal(amount);
                ActionOutcome::Recovered { amount }
            }
        }
    }
}
