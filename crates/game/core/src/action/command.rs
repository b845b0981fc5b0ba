use crate::state::{CombatantId, Position};

/// Input submitted for the current actor by the player or an automated provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerCommand {
    /// Open the movement range (`normal -> moving`).
    SelectMove,
    /// Pick a destination inside the movement range (`moving -> moved`).
    MoveTo(Position),
    /// Open the attack range (`normal | moved -> attacking`).
    SelectAttack,
    /// Attack a living opponent inside the attack range.
    Attack(CombatantId),
    /// Use a stubbed skill slot.
    Skill(usize),
    Wait,
    /// Undo a committed move (`moved -> normal`).
    CancelMove,
    /// Close an open movement or attack range.
    CancelSelection,
}

impl PlayerCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::SelectMove => CommandKind::SelectMove,
            Self::MoveTo(_) => CommandKind::MoveTo,
            Self::SelectAttack => CommandKind::SelectAttack,
            Self::Attack(_) => CommandKind::Attack,
            Self::Skill(_) => CommandKind::Skill,
            Self::Wait => CommandKind::Wait,
            Self::CancelMove => CommandKind::CancelMove,
            Self::CancelSelection => CommandKind::CancelSelection,
        }
    }

    /// Returns true if this command ends the turn once it succeeds.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Attack(_) | Self::Skill(_) | Self::Wait)
    }
}

/// Payload-free discriminant of the inputs a session accepts, used in errors
/// and logs. `AutoTurn` stands for a whole automatically decided turn.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CommandKind {
    SelectMove,
    MoveTo,
    SelectAttack,
    Attack,
    Skill,
    Wait,
    CancelMove,
    CancelSelection,
    AutoTurn,
}
