//! Data-driven battle content and loaders.
//!
//! This crate houses battle setups and provides loaders for RON/TOML data files:
//! - Scenarios: grid size and combatant roster (RON)
//! - Battle configuration: grid defaults, initiative base, skill costs (TOML)
//!
//! A built-in skirmish ([`Scenario::skirmish`]) is always available so the
//! client can run without any data directory.

pub mod scenario;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use scenario::{CombatantSpec, GridSpec, Scenario};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, ScenarioLoader};
