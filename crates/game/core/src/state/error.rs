//! Battle setup errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{CombatantId, Position};

/// Errors raised while assembling a battle roster.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetupError {
    #[error("combatant {id} is already registered")]
    DuplicateId { id: CombatantId },

    #[error("combatant {id} placed outside the grid at {position}")]
    OutOfBounds { id: CombatantId, position: Position },

    #[error("combatant {id} placed on {position}, already occupied by {occupant}")]
    PositionOccupied {
        id: CombatantId,
        position: Position,
        occupant: CombatantId,
    },

    #[error("combatant {id} has zero speed and could never act")]
    ZeroSpeed { id: CombatantId },

    #[error("grid must have non-zero dimensions (got {width}x{height})")]
    EmptyGrid { width: u32, height: u32 },

    #[error("a battle needs at least one combatant")]
    EmptyRoster,
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateId { .. } => "SETUP_DUPLICATE_ID",
            Self::OutOfBounds { .. } => "SETUP_OUT_OF_BOUNDS",
            Self::PositionOccupied { .. } => "SETUP_POSITION_OCCUPIED",
            Self::ZeroSpeed { .. } => "SETUP_ZERO_SPEED",
            Self::EmptyGrid { .. } => "SETUP_EMPTY_GRID",
            Self::EmptyRoster => "SETUP_EMPTY_ROSTER",
        }
    }
}
