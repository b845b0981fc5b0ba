//! Common error infrastructure for tactics-core.
//!
//! Domain-specific errors (`SetupError`, `TurnError`, `ActionError`) live
//! beside the code that raises them; this module only provides the shared
//! classification used by callers to decide how to react.
//!
//! No core error is fatal: every mutating operation validates against a
//! precomputed legal set before it touches state, so a rejected command leaves
//! the battle exactly as it was.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The same command may succeed later or a different input may be tried.
    ///
    /// Examples: target out of range, visual effect still pending
    Recoverable,

    /// The input itself is malformed for the current situation.
    ///
    /// Examples: unknown combatant, command issued for another actor
    Validation,

    /// Unexpected state inconsistency; indicates a bug in the caller or core.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable | Self::Validation)
    }
}

/// Common trait for all tactics-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
