//! Error types for turn scheduling.

use crate::error::{ErrorSeverity, GameError};
use crate::state::CombatantId;

/// Errors that can occur during turn operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnError {
    #[error("no living combatants are queued")]
    NoActiveCombatants,

    #[error("combatant {0} is not part of this battle")]
    UnknownCombatant(CombatantId),

    #[error("combatant {actor} tried to complete a turn owned by {current:?}")]
    NotCurrentActor {
        actor: CombatantId,
        current: Option<CombatantId>,
    },
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoActiveCombatants => ErrorSeverity::Recoverable,
            Self::UnknownCombatant(_) => ErrorSeverity::Validation,
            Self::NotCurrentActor { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoActiveCombatants => "TURN_NO_ACTIVE_COMBATANTS",
            Self::UnknownCombatant(_) => "TURN_UNKNOWN_COMBATANT",
            Self::NotCurrentActor { .. } => "TURN_NOT_CURRENT_ACTOR",
        }
    }
}
