//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the battle session and executes commands sent
//! through [`crate::RuntimeHandle`].

mod simulation;

pub use simulation::{Command, SimulationWorker};
