//! Combat states and the transition table

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of a combat encounter
///
/// Exactly one is active at a time; the turn state machine owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatState {
    Start,
    PlayerPreTurn,
    PlayerMidTurn,
    PlayerPostTurn,
    EnemyPreTurn,
    EnemyMidTurn,
    EnemyPostTurn,
    Win,
    Lose,
    /// Neutral terminal state left behind by an external abort
    Aborted,
}

impl CombatState {
    /// Nominal successor, ignoring win/lose overrides
    ///
    /// Terminal states have none.
    pub fn successor(&self) -> Option<CombatState> {
        match self {
            CombatState::Start => Some(CombatState::PlayerPreTurn),
            CombatState::PlayerPreTurn => Some(CombatState::PlayerMidTurn),
            CombatState::PlayerMidTurn => Some(CombatState::PlayerPostTurn),
            CombatState::PlayerPostTurn => Some(CombatState::EnemyPreTurn),
            CombatState::EnemyPreTurn => Some(CombatState::EnemyMidTurn),
            CombatState::EnemyMidTurn => Some(CombatState::EnemyPostTurn),
            CombatState::EnemyPostTurn => Some(CombatState::PlayerPreTurn),
            CombatState::Win | CombatState::Lose | CombatState::Aborted => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.successor().is_none()
    }

    pub fn is_player_phase(&self) -> bool {
        matches!(
            self,
            CombatState::PlayerPreTurn | CombatState::PlayerMidTurn | CombatState::PlayerPostTurn
        )
    }

    pub fn is_enemy_phase(&self) -> bool {
        matches!(
            self,
            CombatState::EnemyPreTurn | CombatState::EnemyMidTurn | CombatState::EnemyPostTurn
        )
    }
}

impl fmt::Display for CombatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Victory / defeat flags checked before every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransitionFlags {
    pub victorious: bool,
    pub defeated: bool,
}

/// Decide the next state
///
/// Victory wins over defeat, and both win over the transition table.
/// Returns None for terminal states.
pub fn next_state(current: CombatState, flags: TransitionFlags) -> Option<CombatState> {
    if current.is_terminal() {
        return None;
    }
    if flags.victorious {
        return Some(CombatState::Win);
    }
    if flags.defeated {
        return Some(CombatState::Lose);
    }
    current.successor()
}
