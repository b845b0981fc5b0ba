//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, battle setup, rejected commands
//! and pluggable providers so clients can bubble them up with consistent
//! context.
use std::fmt;

use thiserror::Error;
use tokio::sync::oneshot;

use tactics_core::{ActionError, ErrorSeverity, GameError, SetupError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{kind} action provider not set")]
    ProviderNotSet { kind: ProviderKind },

    #[error("runtime requires a battle session or roster before building")]
    MissingSession,

    #[error("failed to set up battle")]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("no combatant is currently taking a turn")]
    NoActiveTurn,

    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("{kind} action provider failed: {message}")]
    Provider { kind: ProviderKind, message: String },

    #[error("effect presenter failed: {0}")]
    Presenter(String),
}

impl RuntimeError {
    /// Attributes an error raised inside an action provider to that provider.
    pub fn into_provider_failure(self, kind: ProviderKind) -> Self {
        match self {
            err @ Self::Provider { .. } => err,
            other => Self::Provider {
                kind,
                message: other.to_string(),
            },
        }
    }

    /// Attributes an error raised inside an effect presenter to the presenter.
    pub fn into_presenter_failure(self) -> Self {
        match self {
            err @ Self::Presenter(_) => err,
            other => Self::Presenter(other.to_string()),
        }
    }

    /// Returns true for rejected commands the driver may re-prompt after.
    pub fn is_recoverable_rejection(&self) -> bool {
        match self {
            Self::Action(err) => matches!(
                err.severity(),
                ErrorSeverity::Recoverable | ErrorSeverity::Validation
            ),
            _ => false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProviderKind {
    Player,
    Npc,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderKind::Player => "player",
            ProviderKind::Npc => "npc",
        };
        write!(f, "{}", label)
    }
}
