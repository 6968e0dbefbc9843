//! Combatant representation (player and enemies)

use crate::core::{ActionFilter, StatusEffect};
use crate::game::CombatState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the fight a combatant is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Enemy => write!(f, "enemy"),
        }
    }
}

/// Health, energy and modifiers of one side of a fight
///
/// Health is not clamped: it may drop below zero, and `health < 0` is
/// what counts as dead. Healing is not capped at `max_health` either.
pub struct Combatant {
    pub name: String,
    pub side: Side,
    pub health: i32,
    pub max_health: i32,

    /// Per-turn resource spent on rolling dice
    pub energy: i32,

    /// Modifiers applied to actions this combatant takes or receives
    pub filters: Vec<ActionFilter>,

    status_effects: Vec<Box<dyn StatusEffect>>,
}

impl Combatant {
    pub fn new(name: impl Into<String>, side: Side, max_health: i32) -> Self {
        Combatant {
            name: name.into(),
            side,
            health: max_health,
            max_health,
            energy: 0,
            filters: Vec::new(),
            status_effects: Vec::new(),
        }
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
    }

    pub fn heal(&mut self, amount: i32) {
        self.health += amount;
    }

    pub fn is_dead(&self) -> bool {
        self.health < 0
    }

    pub fn energy(&self) -> i32 {
        self.energy
    }

    pub fn set_energy(&mut self, energy: i32) {
        self.energy = energy;
    }

    /// Spend one unit of energy; fails (without spending) when none is left
    pub fn spend_energy(&mut self) -> bool {
        if self.energy > 0 {
            self.energy -= 1;
            true
        } else {
            false
        }
    }

    pub fn regen_energy(&mut self, amount: i32) {
        self.energy += amount;
    }

    pub fn filters(&self) -> &[ActionFilter] {
        &self.filters
    }

    pub fn add_filter(&mut self, filter: ActionFilter) {
        self.filters.push(filter);
    }

    pub fn add_status_effect(&mut self, effect: Box<dyn StatusEffect>) {
        self.status_effects.push(effect);
    }

    pub fn status_effects(&self) -> impl Iterator<Item = &dyn StatusEffect> {
        self.status_effects.iter().map(|e| e.as_ref())
    }

    /// Pass the current phase through every status effect
    pub fn handle_status_effects(&mut self, state: CombatState) {
        if self.status_effects.is_empty() {
            return;
        }

        // Effects mutate their bearer, so detach them while they run.
        let mut effects = std::mem::take(&mut self.status_effects);
        for effect in effects.iter_mut() {
            effect.on_phase(state, self);
        }
        effects.retain(|e| !e.is_expired());

        // Effects added while the hooks ran go after the existing ones
        effects.append(&mut self.status_effects);
        self.status_effects = effects;
    }
}

impl fmt::Debug for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combatant")
            .field("name", &self.name)
            .field("side", &self.side)
            .field("health", &self.health)
            .field("max_health", &self.max_health)
            .field("energy", &self.energy)
            .field("filters", &self.filters)
            .field("status_effects", &self.status_effects.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FilterOp, FilterType};

    #[test]
    fn test_damage_has_no_floor() {
        let mut enemy = Combatant::new("Beast", Side::Enemy, 10);
        enemy.take_damage(15);
        assert_eq!(enemy.health, -5);
        assert!(enemy.is_dead());
    }

    #[test]
    fn test_zero_health_is_alive() {
        let mut enemy = Combatant::new("Beast", Side::Enemy, 10);
        enemy.take_damage(10);
        assert_eq!(enemy.health, 0);
        assert!(!enemy.is_dead());
    }

    #[test]
    fn test_heal_has_no_ceiling() {
        let mut player = Combatant::new("Player", Side::Player, 20);
        player.heal(5);
        assert_eq!(player.health, 25);
    }

    #[test]
    fn test_energy() {
        let mut player = Combatant::new("Player", Side::Player, 20);
        assert!(!player.spend_energy());

        player.set_energy(2);
        assert!(player.spend_energy());
        assert!(player.spend_energy());
        assert!(!player.spend_energy());
        assert_eq!(player.energy(), 0);

        player.regen_energy(3);
        assert_eq!(player.energy(), 3);
    }

    #[test]
    fn test_filters_keep_order() {
        let mut player = Combatant::new("Player", Side::Player, 20);
        player.add_filter(ActionFilter::new(FilterType::AttackActor, FilterOp::Add(1)));
        player.add_filter(ActionFilter::new(FilterType::AttackActor, FilterOp::Multiply(2.0)));

        assert_eq!(player.filters().len(), 2);
        assert_eq!(player.filters()[0].op, FilterOp::Add(1));
    }

    #[derive(Debug)]
    struct Poison {
        ticks_left: u32,
    }

    impl StatusEffect for Poison {
        fn name(&self) -> &str {
            "poison"
        }

        fn on_phase(&mut self, state: CombatState, bearer: &mut Combatant) {
            if state == CombatState::EnemyPreTurn && self.ticks_left > 0 {
                bearer.take_damage(2);
                self.ticks_left -= 1;
            }
        }

        fn is_expired(&self) -> bool {
            self.ticks_left == 0
        }
    }

    #[test]
    fn test_status_effect_hook() {
        let mut enemy = Combatant::new("Beast", Side::Enemy, 10);
        enemy.add_status_effect(Box::new(Poison { ticks_left: 2 }));

        enemy.handle_status_effects(CombatState::PlayerPreTurn);
        assert_eq!(enemy.health, 10);

        enemy.handle_status_effects(CombatState::EnemyPreTurn);
        assert_eq!(enemy.health, 8);
        assert_eq!(enemy.status_effects().count(), 1);

        enemy.handle_status_effects(CombatState::EnemyPreTurn);
        assert_eq!(enemy.health, 6);
        assert_eq!(enemy.status_effects().count(), 0);
    }
}
