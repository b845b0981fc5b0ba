//! Initiative scheduling.
//!
//! The [`Scheduler`] owns the turn queue and the global clock. Wait times live
//! on the combatants themselves so that snapshots carry them; the scheduler is
//! the only code that writes them.

mod errors;
mod turns;

pub use errors::TurnError;
pub use turns::Scheduler;
