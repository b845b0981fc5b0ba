//! Session event log and battle outcome.

use crate::state::{CombatantId, Faction, Position};

/// Result of the battle as a whole.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BattleOutcome {
    #[default]
    Ongoing,
    /// No living enemies remain.
    Victory,
    /// No living player-side combatants remain.
    Defeat,
}

impl BattleOutcome {
    pub fn is_decided(self) -> bool {
        !matches!(self, Self::Ongoing)
    }

    /// Side that won, once decided.
    pub fn winner(self) -> Option<Faction> {
        match self {
            Self::Ongoing => None,
            Self::Victory => Some(Faction::Ally),
            Self::Defeat => Some(Faction::Enemy),
        }
    }
}

/// Something that happened in the battle, in the order it happened.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionEvent {
    TurnStarted {
        actor: CombatantId,
        /// Global clock at the start of the turn.
        elapsed: f64,
    },
    Moved {
        actor: CombatantId,
        from: Position,
        to: Position,
    },
    MoveCancelled {
        actor: CombatantId,
        restored: Position,
    },
    Attacked {
        attacker: CombatantId,
        target: CombatantId,
        damage: u32,
        remaining_hp: u32,
    },
    Defeated {
        combatant: CombatantId,
    },
    SkillUsed {
        actor: CombatantId,
        slot: usize,
        mp_cost: u32,
    },
    Waited {
        actor: CombatantId,
    },
    TurnCompleted {
        actor: CombatantId,
    },
    BattleEnded {
        outcome: BattleOutcome,
    },
}

impl SessionEvent {
    /// Returns true for events that open or close a turn.
    pub fn is_turn_boundary(&self) -> bool {
        matches!(
            self,
            Self::TurnStarted { .. } | Self::TurnCompleted { .. } | Self::BattleEnded { .. }
        )
    }
}
