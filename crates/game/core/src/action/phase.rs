use crate::state::{CombatantId, Position};

use super::{ActionError, CommandKind};

/// Phase of the current actor's turn.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TurnPhase {
    /// Start of the turn; every action is still available.
    #[default]
    Normal,
    /// Movement range is open and a destination is being chosen.
    Moving,
    /// Movement resolved; only attack, skill, wait and cancel remain.
    Moved,
    /// Attack range is open and a target is being chosen.
    Attacking,
}

/// Action state machine for one activation of one combatant.
///
/// Transitions return [`ActionError::InvalidPhase`] and leave the phase
/// untouched when the command does not fit the current phase.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionPhase {
    actor: CombatantId,
    phase: TurnPhase,
    original_position: Option<Position>,
    /// Phase the attack range was opened from.
    attack_origin: TurnPhase,
}

impl ActionPhase {
    pub fn new(actor: CombatantId) -> Self {
        Self {
            actor,
            phase: TurnPhase::Normal,
            original_position: None,
            attack_origin: TurnPhase::Normal,
        }
    }

    pub fn actor(&self) -> CombatantId {
        self.actor
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Position saved when the move was committed, if the actor moved this turn.
    pub fn original_position(&self) -> Option<Position> {
        self.original_position
    }

    pub fn has_moved(&self) -> bool {
        self.original_position.is_some()
    }

    /// `normal -> moving`.
    pub fn begin_move(&mut self) -> Result<(), ActionError> {
        self.require_phase(CommandKind::SelectMove, &[TurnPhase::Normal])?;
        self.phase = TurnPhase::Moving;
        Ok(())
    }

    /// Checks that a destination may be picked now.
    pub fn check_move_target(&self) -> Result<(), ActionError> {
        self.require_phase(CommandKind::MoveTo, &[TurnPhase::Moving])
    }

    /// Records the committed move. The phase stays `moving` until the move
    /// effect has been presented.
    pub fn commit_move(&mut self, from: Position) -> Result<(), ActionError> {
        self.check_move_target()?;
        self.original_position = Some(from);
        Ok(())
    }

    /// `moving -> moved`, once the move effect completed.
    pub fn finish_move(&mut self) -> Result<(), ActionError> {
        self.require_phase(CommandKind::MoveTo, &[TurnPhase::Moving])?;
        self.phase = TurnPhase::Moved;
        Ok(())
    }

    /// `moved -> normal`. Returns the position the actor must be put back on.
    pub fn cancel_move(&mut self) -> Result<Position, ActionError> {
        self.require_phase(CommandKind::CancelMove, &[TurnPhase::Moved])?;
        let original = self.original_position.take().ok_or(ActionError::InvalidPhase {
            command: CommandKind::CancelMove,
            phase: self.phase,
        })?;
        self.phase = TurnPhase::Normal;
        Ok(original)
    }

    /// `normal | moved -> attacking`.
    pub fn begin_attack(&mut self) -> Result<(), ActionError> {
        self.require_phase(
            CommandKind::SelectAttack,
            &[TurnPhase::Normal, TurnPhase::Moved],
        )?;
        self.attack_origin = self.phase;
        self.phase = TurnPhase::Attacking;
        Ok(())
    }

    pub fn check_attack_target(&self) -> Result<(), ActionError> {
        self.require_phase(CommandKind::Attack, &[TurnPhase::Attacking])
    }

    /// Wait and skills resolve straight from `normal | moved`.
    pub fn check_immediate(&self, command: CommandKind) -> Result<(), ActionError> {
        self.require_phase(command, &[TurnPhase::Normal, TurnPhase::Moved])
    }

    /// `moving -> normal` or `attacking -> normal | moved`.
    pub fn cancel_selection(&mut self) -> Result<TurnPhase, ActionError> {
        match self.phase {
            TurnPhase::Moving if self.original_position.is_none() => {
                self.phase = TurnPhase::Normal;
            }
            TurnPhase::Attacking => {
                self.phase = self.attack_origin;
            }
            phase => {
                return Err(ActionError::InvalidPhase {
                    command: CommandKind::CancelSelection,
                    phase,
                });
            }
        }
        Ok(self.phase)
    }

    fn require_phase(&self, command: CommandKind, allowed: &[TurnPhase]) -> Result<(), ActionError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(ActionError::InvalidPhase {
                command,
                phase: self.phase,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_then_cancel_returns_to_normal() {
        let mut phase = ActionPhase::new(CombatantId(1));
        phase.begin_move().unwrap();
        phase.commit_move(Position::new(6, 4)).unwrap();
        phase.finish_move().unwrap();
        assert_eq!(phase.phase(), TurnPhase::Moved);

        assert_eq!(phase.cancel_move().unwrap(), Position::new(6, 4));
        assert_eq!(phase.phase(), TurnPhase::Normal);
        assert!(!phase.has_moved());
    }

    #[test]
    fn no_second_move_after_moving() {
        let mut phase = ActionPhase::new(CombatantId(1));
        phase.begin_move().unwrap();
        phase.commit_move(Position::ORIGIN).unwrap();
        phase.finish_move().unwrap();

        assert_eq!(
            phase.begin_move(),
            Err(ActionError::InvalidPhase {
                command: CommandKind::SelectMove,
                phase: TurnPhase::Moved,
            })
        );
    }

    #[test]
    fn attack_cancel_returns_to_origin_phase() {
        let mut phase = ActionPhase::new(CombatantId(1));
        phase.begin_attack().unwrap();
        assert_eq!(phase.cancel_selection().unwrap(), TurnPhase::Normal);

        phase.begin_move().unwrap();
        phase.commit_move(Position::ORIGIN).unwrap();
        phase.finish_move().unwrap();
        phase.begin_attack().unwrap();
        assert_eq!(phase.cancel_selection().unwrap(), TurnPhase::Moved);
    }

    #[test]
    fn committed_move_cannot_be_deselected() {
        let mut phase = ActionPhase::new(CombatantId(1));
        phase.begin_move().unwrap();
        assert_eq!(phase.cancel_selection().unwrap(), TurnPhase::Normal);

        phase.begin_move().unwrap();
        phase.commit_move(Position::ORIGIN).unwrap();
        assert!(phase.cancel_selection().is_err());
        assert!(phase.check_immediate(CommandKind::Wait).is_err());
    }

    #[test]
    fn phase_names_are_snake_case() {
        assert_eq!(TurnPhase::Attacking.to_string(), "attacking");
        assert_eq!("moved".parse::<TurnPhase>().unwrap(), TurnPhase::Moved);
    }
}
