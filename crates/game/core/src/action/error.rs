//! Command rejection errors.
//!
//! Every variant is raised before any state is touched, so a rejected command
//! leaves the session exactly as it was and the caller may simply retry.

use std::fmt;

use crate::engine::TurnError;
use crate::error::{ErrorSeverity, GameError};
use crate::session::{BattleOutcome, Ticket};
use crate::state::{CombatantId, Position};

use super::{CommandKind, TurnPhase};

/// What an illegal command pointed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetRef {
    Cell(Position),
    Combatant(CombatantId),
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell(position) => write!(f, "cell {position}"),
            Self::Combatant(id) => write!(f, "combatant {id}"),
        }
    }
}

/// Why a target was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum IllegalReason {
    /// Not inside the currently exposed range.
    OutOfRange,
    /// The actor's own cell; visible in the movement range but not a destination.
    OwnCell,
    /// Same side as the actor.
    Friendly,
    /// Already defeated.
    Defeated,
}

/// Errors returned by session commands.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("illegal target {target}: {reason}")]
    IllegalTarget {
        target: TargetRef,
        reason: IllegalReason,
    },

    #[error("combatant {actor} submitted a command during {current}'s turn")]
    NotYourTurn {
        actor: CombatantId,
        current: CombatantId,
    },

    #[error("combatant {actor} needs {required} mp but has {available}")]
    InsufficientResource {
        actor: CombatantId,
        required: u32,
        available: u32,
    },

    #[error("{command} is not available while {phase}")]
    InvalidPhase {
        command: CommandKind,
        phase: TurnPhase,
    },

    #[error("skill slot {slot} does not exist")]
    InvalidSkillSlot { slot: usize },

    #[error("visual effect {ticket} has not completed yet")]
    EffectPending { ticket: Ticket },

    #[error("ticket {ticket} does not match the pending effect ({expected:?})")]
    UnknownTicket {
        ticket: Ticket,
        expected: Option<Ticket>,
    },

    #[error("combatant {0} is not part of this battle")]
    CombatantNotFound(CombatantId),

    #[error("battle is already decided: {0}")]
    BattleOver(BattleOutcome),

    #[error("no combatant is currently taking a turn")]
    NoActiveTurn,

    #[error(transparent)]
    Turn(#[from] TurnError),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::IllegalTarget { .. }
            | Self::InsufficientResource { .. }
            | Self::InvalidPhase { .. }
            | Self::EffectPending { .. }
            | Self::BattleOver(_)
            | Self::NoActiveTurn => ErrorSeverity::Recoverable,
            Self::NotYourTurn { .. }
            | Self::InvalidSkillSlot { .. }
            | Self::UnknownTicket { .. }
            | Self::CombatantNotFound(_) => ErrorSeverity::Validation,
            Self::Turn(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::IllegalTarget { .. } => "ACTION_ILLEGAL_TARGET",
            Self::NotYourTurn { .. } => "ACTION_NOT_YOUR_TURN",
            Self::InsufficientResource { .. } => "ACTION_INSUFFICIENT_RESOURCE",
            Self::InvalidPhase { .. } => "ACTION_INVALID_PHASE",
            Self::InvalidSkillSlot { .. } => "ACTION_INVALID_SKILL_SLOT",
            Self::EffectPending { .. } => "ACTION_EFFECT_PENDING",
            Self::UnknownTicket { .. } => "ACTION_UNKNOWN_TICKET",
            Self::CombatantNotFound(_) => "ACTION_COMBATANT_NOT_FOUND",
            Self::BattleOver(_) => "ACTION_BATTLE_OVER",
            Self::NoActiveTurn => "ACTION_NO_ACTIVE_TURN",
            Self::Turn(err) => err.error_code(),
        }
    }
}

impl ActionError {
    pub(crate) fn illegal_cell(position: Position, reason: IllegalReason) -> Self {
        Self::IllegalTarget {
            target: TargetRef::Cell(position),
            reason,
        }
    }

    pub(crate) fn illegal_combatant(id: CombatantId, reason: IllegalReason) -> Self {
        Self::IllegalTarget {
            target: TargetRef::Combatant(id),
            reason,
        }
    }
}
