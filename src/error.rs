//! Error types for dice combat

use crate::core::{DieId, ZoneId};
use crate::game::CombatState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CombatError {
    #[error("Die not found: {0}")]
    DieNotFound(DieId),

    #[error("Zone not found: {0}")]
    ZoneNotFound(ZoneId),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Die {0} is already in play")]
    DuplicateDie(DieId),

    #[error("Zone {0} has no free slot")]
    ZoneFull(ZoneId),

    #[error("Not enough energy to roll a die")]
    InsufficientEnergy,

    #[error("Unknown tile kind: {0}")]
    UnknownTileKind(String),

    #[error("Invalid transition from {state:?}: {reason}")]
    InvalidTransition {
        state: CombatState,
        reason: &'static str,
    },

    #[error("Player commands are only accepted while the player's turn is open")]
    NotPlayerTurn,

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid script: {0}")]
    InvalidScript(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

impl CombatError {
    /// Lookup failures on die, zone or template ids.
    ///
    /// These never end a combat; callers log them and carry on.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CombatError::DieNotFound(_) | CombatError::ZoneNotFound(_) | CombatError::TemplateNotFound(_)
        )
    }

    /// Errors a player command can produce without affecting the rest of the combat
    pub fn is_recoverable(&self) -> bool {
        self.is_not_found()
            || matches!(
                self,
                CombatError::ZoneFull(_)
                    | CombatError::InsufficientEnergy
                    | CombatError::UnknownTileKind(_)
                    | CombatError::DuplicateDie(_)
                    | CombatError::NotPlayerTurn
            )
    }
}

pub type Result<T> = std::result::Result<T, CombatError>;
