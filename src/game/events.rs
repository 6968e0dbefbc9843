//! Notifications from the combat core to the presentation layer
//!
//! Handlers push events into the context as they mutate health, energy or
//! the enemy's telegraphed action. The host drains them after each tick
//! and renders them however it likes.

use crate::core::{DieId, Side, ZoneId};
use crate::game::enemy::EnemyActionKind;
use crate::game::CombatState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the combat ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatOutcome {
    Victory,
    Defeat,
}

impl CombatOutcome {
    pub fn text(&self) -> &'static str {
        match self {
            CombatOutcome::Victory => "Victory",
            CombatOutcome::Defeat => "Defeat",
        }
    }

    pub fn color(&self) -> DisplayColor {
        match self {
            CombatOutcome::Victory => DisplayColor::Green,
            CombatOutcome::Defeat => DisplayColor::Red,
        }
    }
}

/// Display intent attached to a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayColor {
    White,
    Green,
    Red,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CombatEvent {
    StateEntered {
        state: CombatState,
    },
    HealthChanged {
        side: Side,
        name: String,
        health: i32,
        max_health: i32,
    },
    EnergyChanged {
        energy: i32,
        /// Shown in red when no energy is left
        color: DisplayColor,
    },
    ActionTelegraphed {
        enemy: String,
        action: EnemyActionKind,
        text: String,
    },
    DieRolled {
        die: DieId,
        value: i32,
        template: String,
    },
    TileResolved {
        zone: ZoneId,
        kind: String,
        base: i32,
        magnitude: i32,
    },
    CombatEnded {
        outcome: CombatOutcome,
        text: String,
        color: DisplayColor,
    },
}

impl CombatEvent {
    pub fn energy(energy: i32) -> Self {
        let color = if energy == 0 {
            DisplayColor::Red
        } else {
            DisplayColor::White
        };
        CombatEvent::EnergyChanged { energy, color }
    }

    pub fn ended(outcome: CombatOutcome) -> Self {
        CombatEvent::CombatEnded {
            outcome,
            text: outcome.text().to_string(),
            color: outcome.color(),
        }
    }
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatEvent::StateEntered { state } => write!(f, "--- {state} ---"),
            CombatEvent::HealthChanged {
                name,
                health,
                max_health,
                ..
            } => write!(f, "{name}: {health}/{max_health}"),
            CombatEvent::EnergyChanged { energy, .. } => write!(f, "Energy: {energy}"),
            CombatEvent::ActionTelegraphed { text, .. } => write!(f, "{text}"),
            CombatEvent::DieRolled {
                die,
                value,
                template,
            } => write!(f, "Rolled {template} #{die}: {value}"),
            CombatEvent::TileResolved {
                zone,
                kind,
                base,
                magnitude,
            } => write!(f, "Tile {zone} ({kind}): {base} -> {magnitude}"),
            CombatEvent::CombatEnded { text, .. } => write!(f, "{text}"),
        }
    }
}
