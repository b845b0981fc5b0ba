//! Headless battle client.
//!
//! The `tactics` binary is the composition root: it reads its settings from
//! the environment, installs logging, loads battle content and lets the
//! runtime play both sides until the battle is decided.

pub mod config;
pub mod logging;
pub mod report;

pub use config::ClientConfig;
