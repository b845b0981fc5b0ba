//! Deterministic battle rules for a grid tactics game.
//!
//! `tactics-core` owns the canonical rules (reachability, initiative, action
//! phases, combat, automatic decisions) and exposes them through
//! [`session::BattleSession`]. Nothing here performs I/O or waits on time;
//! presentation and orchestration live in the runtime crate and drive the
//! session through commands and effect acknowledgements.
pub mod action;
pub mod ai;
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod reach;
pub mod session;
pub mod state;

pub use action::{
    ActionError, ActionPhase, CommandKind, IllegalReason, PlayerCommand, TargetRef, TurnPhase,
};
pub use ai::{AiActionKind, AiDecision};
pub use combat::{AttackOutcome, DamageKind, calculate_damage, perform_attack};
pub use config::BattleConfig;
pub use engine::{Scheduler, TurnError};
pub use error::{ErrorSeverity, GameError};
pub use reach::{
    RangeCell, RangeSet, attack_range, attack_range_from, movement_path, movement_range,
};
pub use session::{BattleOutcome, BattleSession, EffectRequest, SessionEvent, Ticket, VisualEffect};
pub use state::{
    BattleState, CardinalDirection, Combatant, CombatantId, Faction, Grid, Position, SetupError,
    Stats, StatusInfo,
};
