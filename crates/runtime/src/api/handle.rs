//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! querying the battle, submitting commands, acknowledging effects, and
//! streaming events from specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use tactics_core::{
    AiDecision, BattleOutcome, Combatant, CombatantId, EffectRequest, PlayerCommand, RangeSet,
    Ticket,
};

use super::errors::{Result, RuntimeError};
use super::view::BattleView;
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Snapshot of every combatant, dead or alive, in roster order.
    pub async fn combatants(&self) -> Result<Vec<Combatant>> {
        self.request(|reply| Command::Combatants { reply }).await
    }

    pub async fn current_actor(&self) -> Result<Option<Combatant>> {
        self.request(|reply| Command::CurrentActor { reply }).await
    }

    pub async fn movement_range(&self, actor: CombatantId) -> Result<RangeSet> {
        self.request(|reply| Command::MovementRange { actor, reply })
            .await?
    }

    pub async fn attack_range(&self, actor: CombatantId) -> Result<RangeSet> {
        self.request(|reply| Command::AttackRange { actor, reply })
            .await?
    }

    /// Living combatants with their remaining wait, soonest first.
    pub async fn turn_order(&self) -> Result<Vec<(CombatantId, f64)>> {
        self.request(|reply| Command::TurnOrder { reply }).await
    }

    pub async fn outcome(&self) -> Result<BattleOutcome> {
        self.request(|reply| Command::Outcome { reply }).await
    }

    /// Provider snapshot of the current turn, or `None` once the battle is over.
    pub async fn view(&self) -> Result<Option<BattleView>> {
        self.request(|reply| Command::View { reply }).await
    }

    /// Submits a command for whoever is currently acting.
    pub async fn submit(&self, command: PlayerCommand) -> Result<()> {
        self.request(|reply| Command::Submit {
            actor: None,
            command,
            reply,
        })
        .await?
    }

    /// Submits a command on behalf of `actor`, which must be the current actor.
    pub async fn submit_as(&self, actor: CombatantId, command: PlayerCommand) -> Result<()> {
        self.request(|reply| Command::Submit {
            actor: Some(actor),
            command,
            reply,
        })
        .await?
    }

    /// Lets the built-in decision module play the current actor's turn.
    pub async fn take_ai_turn(&self) -> Result<AiDecision> {
        self.request(|reply| Command::TakeAiTurn { reply }).await?
    }

    /// Oldest effect the battle is waiting on.
    pub async fn pending_effect(&self) -> Result<Option<EffectRequest>> {
        self.request(|reply| Command::PendingEffect { reply }).await
    }

    pub async fn notify_effect_complete(&self, ticket: Ticket) -> Result<()> {
        self.request(|reply| Command::NotifyEffectComplete { ticket, reply })
            .await?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Battle` - Every recorded session event
    /// - `Topic::Turn` - Turn boundaries and the final outcome
    /// - `Topic::Effect` - Effect requests and acknowledgements
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use tactics_runtime::Topic;
    ///
    /// let mut turns = handle.subscribe(Topic::Turn);
    /// while let Ok(event) = turns.recv().await {
    ///     // Handle turn events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
