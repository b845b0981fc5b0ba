//! Event types for the turn and effect topics.

use serde::{Deserialize, Serialize};

use tactics_core::{BattleOutcome, CombatantId, EffectRequest, SessionEvent, Ticket};

/// Turn boundaries (lightweight).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnEvent {
    Started { actor: CombatantId, elapsed: f64 },
    Completed { actor: CombatantId },
    BattleEnded { outcome: BattleOutcome },
}

impl TurnEvent {
    /// Extracts the turn boundary carried by a session event, if any.
    pub fn from_session(event: &SessionEvent) -> Option<Self> {
        match *event {
            SessionEvent::TurnStarted { actor, elapsed } => Some(Self::Started { actor, elapsed }),
            SessionEvent::TurnCompleted { actor } => Some(Self::Completed { actor }),
            SessionEvent::BattleEnded { outcome } => Some(Self::BattleEnded { outcome }),
            _ => None,
        }
    }
}

/// Visual effect lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectEvent {
    /// The session is waiting for this effect to be shown.
    Requested(EffectRequest),
    /// The effect was acknowledged and its continuation ran.
    Completed { ticket: Ticket },
}
