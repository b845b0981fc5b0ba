//! Per-turn action state machine.
//!
//! A turn moves through [`TurnPhase`]s that gate which [`PlayerCommand`]s are
//! legal:
//!
//! ```text
//! normal --select move--> moving --destination--> moved
//!   ^                       |                       |
//!   +------cancel-----------+--------cancel move----+
//!
//! normal | moved --select attack--> attacking --target--> resolved
//! normal | moved --wait / skill--> resolved
//! ```
//!
//! [`ActionPhase`] only tracks the phase and the saved pre-move position; the
//! session applies the effects and asks the scheduler to complete the turn.

pub mod command;
pub mod error;
pub mod phase;

pub use command::{CommandKind, PlayerCommand};
pub use error::{ActionError, IllegalReason, TargetRef};
pub use phase::{ActionPhase, TurnPhase};
