//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and drives turns: it asks the matching [`ActionProvider`] for commands,
//! plays every requested effect through the [`EffectPresenter`], and hands
//! the tickets back so the battle can continue.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use tactics_core::{BattleConfig, BattleOutcome, BattleSession, Combatant, PlayerCommand, TurnPhase};

use crate::api::{
    ActionProvider, BattleView, EffectPresenter, InstantPresenter, ProviderKind, Result,
    RuntimeError, RuntimeHandle,
};
use crate::events::EventBus;
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Rules used when the builder creates the session from a roster.
    pub battle: BattleConfig,
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
    /// Rejected commands tolerated in one turn before the driver ends it.
    pub max_rejections_per_turn: u32,
    /// Accepted commands tolerated in one turn before the driver ends it.
    pub max_commands_per_turn: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            battle: BattleConfig::default(),
            command_buffer_size: 32,
            event_buffer_size: 256,
            max_rejections_per_turn: 3,
            max_commands_per_turn: 16,
        }
    }
}

/// Main runtime that orchestrates the battle
///
/// Runtime owns the worker and coordinates turns.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    config: RuntimeConfig,

    // Injected by user. Without an NPC provider enemy turns use the
    // session's built-in decision module.
    player_provider: Option<Box<dyn ActionProvider>>,
    npc_provider: Option<Box<dyn ActionProvider>>,
    presenter: Box<dyn EffectPresenter>,

    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Plays one full turn of the current actor.
    ///
    /// Returns the battle outcome after the turn. Once the battle is over this
    /// is a no-op that returns the final outcome.
    pub async fn step(&mut self) -> Result<BattleOutcome> {
        let Some(view) = self.handle.view().await? else {
            return self.handle.outcome().await;
        };

        let is_npc = view.actor().is_some_and(Combatant::is_enemy);
        if is_npc && self.npc_provider.is_none() {
            self.automatic_turn(&view).await?;
        } else {
            self.provided_turn(view, is_npc).await?;
        }

        self.handle.outcome().await
    }

    /// Runs turns until the battle is decided or `max_turns` have been played.
    pub async fn run(&mut self, max_turns: usize) -> Result<BattleOutcome> {
        let mut outcome = self.handle.outcome().await?;
        for _ in 0..max_turns {
            if outcome.is_decided() {
                break;
            }
            outcome = self.step().await?;
        }
        info!(target: "runtime::driver", %outcome, "run finished");
        Ok(outcome)
    }

    /// Set the player action provider
    pub fn set_player_provider(&mut self, provider: impl ActionProvider + 'static) {
        self.player_provider = Some(Box::new(provider));
    }

    /// Set the NPC action provider
    pub fn set_npc_provider(&mut self, provider: impl ActionProvider + 'static) {
        self.npc_provider = Some(Box::new(provider));
    }

    pub fn set_presenter(&mut self, presenter: impl EffectPresenter + 'static) {
        self.presenter = Box::new(presenter);
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for the worker to stop, which happens once every outstanding
    /// [`RuntimeHandle`] clone has been dropped as well.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }

    async fn automatic_turn(&self, view: &BattleView) -> Result<()> {
        match self.handle.take_ai_turn().await {
            Ok(decision) => {
                debug!(
                    target: "runtime::driver",
                    actor = %view.actor,
                    kind = %decision.kind(),
                    "automatic turn"
                );
            }
            Err(err) if err.is_recoverable_rejection() => {
                warn!(target: "runtime::driver", actor = %view.actor, %err, "automatic turn rejected");
                return self.force_end_turn(view.turn_index).await;
            }
            Err(err) => return Err(err),
        }
        self.present_pending().await
    }

    async fn provided_turn(&self, mut view: BattleView, is_npc: bool) -> Result<()> {
        let kind = if is_npc {
            ProviderKind::Npc
        } else {
            ProviderKind::Player
        };
        let provider = match kind {
            ProviderKind::Player => self.player_provider.as_deref(),
            ProviderKind::Npc => self.npc_provider.as_deref(),
        }
        .ok_or(RuntimeError::ProviderNotSet { kind })?;

        let actor = view.actor;
        let turn_index = view.turn_index;
        let mut rejections = 0u32;
        let mut accepted = 0u32;

        loop {
            let command = provider
                .provide_command(&view)
                .await
                .map_err(|err| err.into_provider_failure(kind))?;
            match self.handle.submit_as(actor, command).await {
                Ok(()) => {
                    accepted += 1;
                    self.present_pending().await?;
                }
                Err(err) if err.is_recoverable_rejection() => {
                    rejections += 1;
                    warn!(
                        target: "runtime::driver",
                        %actor,
                        ?command,
                        %err,
                        rejections,
                        "command rejected"
                    );
                }
                Err(err) => return Err(err),
            }

            if rejections >= self.config.max_rejections_per_turn
                || accepted >= self.config.max_commands_per_turn
            {
                return self.force_end_turn(turn_index).await;
            }

            match self.handle.view().await? {
                Some(next) if next.turn_index == turn_index => view = next,
                _ => return Ok(()),
            }
        }
    }

    /// Plays every outstanding effect and acknowledges it, oldest first.
    async fn present_pending(&self) -> Result<()> {
        while let Some(request) = self.handle.pending_effect().await? {
            self.presenter
                .present(&request)
                .await
                .map_err(RuntimeError::into_presenter_failure)?;
            self.handle.notify_effect_complete(request.ticket).await?;
        }
        Ok(())
    }

    /// Ends a stalled turn: finishes outstanding effects, backs out of any
    /// open selection and waits.
    async fn force_end_turn(&self, turn_index: u64) -> Result<()> {
        self.present_pending().await?;

        let Some(view) = self.handle.view().await? else {
            return Ok(());
        };
        if view.turn_index != turn_index {
            return Ok(());
        }

        warn!(target: "runtime::driver", actor = %view.actor, phase = %view.phase, "forcing wait");
        if matches!(view.phase, TurnPhase::Moving | TurnPhase::Attacking) {
            self.handle
                .submit_as(view.actor, PlayerCommand::CancelSelection)
                .await?;
        }
        self.handle.submit_as(view.actor, PlayerCommand::Wait).await?;
        self.present_pending().await
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    session: Option<BattleSession>,
    roster: Option<Vec<Combatant>>,
    player_provider: Option<Box<dyn ActionProvider>>,
    npc_provider: Option<Box<dyn ActionProvider>>,
    presenter: Option<Box<dyn EffectPresenter>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            session: None,
            roster: None,
            player_provider: None,
            npc_provider: None,
            presenter: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an already started session. Takes precedence over [`Self::roster`].
    pub fn session(mut self, session: BattleSession) -> Self {
        self.session = Some(session);
        self
    }

    /// Start a fresh session from `roster` with the configured battle rules.
    pub fn roster(mut self, roster: impl IntoIterator<Item = Combatant>) -> Self {
        self.roster = Some(roster.into_iter().collect());
        self
    }

    /// Set player action provider (optional)
    pub fn player_provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.player_provider = Some(Box::new(provider));
        self
    }

    /// Set NPC action provider (optional)
    pub fn npc_provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.npc_provider = Some(Box::new(provider));
        self
    }

    /// Set effect presenter. Defaults to [`InstantPresenter`].
    pub fn presenter(mut self, presenter: impl EffectPresenter + 'static) -> Self {
        self.presenter = Some(Box::new(presenter));
        self
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<Runtime> {
        let session = match (self.session, self.roster) {
            (Some(session), _) => session,
            (None, Some(roster)) => BattleSession::new(self.config.battle.clone(), roster)?,
            (None, None) => return Err(RuntimeError::MissingSession),
        };

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(session, command_rx, event_bus);
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            config: self.config,
            player_provider: self.player_provider,
            npc_provider: self.npc_provider,
            presenter: self
                .presenter
                .unwrap_or_else(|| Box::new(InstantPresenter)),
            sim_worker_handle,
        })
    }
}
