//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration and workers.

pub mod errors;
pub mod handle;
pub mod presenters;
pub mod providers;
pub mod view;

pub use errors::{ProviderKind, Result, RuntimeError};
pub use handle::RuntimeHandle;
pub use presenters::{EffectPresenter, InstantPresenter, PacedPresenter};
pub use providers::{ActionProvider, AutoPlayProvider, ScriptedProvider, WaitProvider};
pub use view::BattleView;
