//! Async orchestration around the deterministic battle session.
//!
//! This crate wires the action provider and effect presenter abstractions,
//! the topic event bus and the simulation worker into a cohesive runtime API.
//! Consumers embed [`Runtime`] to drive turns, subscribe to events, and talk
//! to the battle through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the turn driver and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - `workers` keeps the background task internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{
    ActionProvider, AutoPlayProvider, BattleView, EffectPresenter, InstantPresenter,
    PacedPresenter, ProviderKind, Result, RuntimeError, RuntimeHandle, ScriptedProvider,
    WaitProvider,
};
pub use events::{EffectEvent, Event, EventBus, Topic, TurnEvent};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
