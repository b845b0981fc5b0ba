//! Visual effect requests and their continuations.
//!
//! Whenever a resolution step must wait for the presentation layer (a move
//! animation, an attack flash, a damage number), the session enqueues an
//! [`EffectRequest`] and parks the rest of the step as a [`Continuation`].
//! The presentation plays the effect and hands the ticket back through
//! `BattleSession::notify_effect_complete`, which runs the continuation.

use std::fmt;

use crate::state::{CombatantId, Position};

/// Handle identifying one outstanding visual effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ticket(pub u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ticket#{}", self.0)
    }
}

/// Effect the presentation layer is asked to play.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VisualEffect {
    /// Animate `actor` along `path` (origin excluded, destination last).
    Move {
        actor: CombatantId,
        from: Position,
        to: Position,
        path: Vec<Position>,
    },
    AttackFlash {
        attacker: CombatantId,
        target: CombatantId,
        at: Position,
    },
    DamageNumber {
        target: CombatantId,
        damage: u32,
        at: Position,
    },
}

/// A visual effect together with the ticket that acknowledges it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectRequest {
    pub ticket: Ticket,
    pub effect: VisualEffect,
}

/// What the session does once an effect has been acknowledged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) enum Continuation {
    /// Player move finished: enter `moved` and re-offer the action menu.
    EnterMoved,
    /// Automatic move finished: attack `target` if any, else end the turn.
    FollowUp { target: Option<CombatantId> },
    /// Attack flash finished: show the damage number.
    ShowDamage {
        target: CombatantId,
        damage: u32,
        at: Position,
    },
    CompleteTurn,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct PendingEffect {
    pub request: EffectRequest,
    pub continuation: Continuation,
}
