//! Simulation worker that owns the authoritative [`BattleSession`].
//!
//! Receives commands from [`crate::RuntimeHandle`], applies them to the
//! session, and publishes the resulting session events and effect requests
//! to the [`EventBus`].

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use tactics_core::{
    AiDecision, BattleOutcome, BattleSession, Combatant, CombatantId, EffectRequest,
    PlayerCommand, RangeSet, Ticket,
};

use crate::api::{BattleView, Result, RuntimeError};
use crate::events::{EffectEvent, Event, EventBus, TurnEvent};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Snapshot of every combatant, dead or alive.
    Combatants {
        reply: oneshot::Sender<Vec<Combatant>>,
    },
    CurrentActor {
        reply: oneshot::Sender<Option<Combatant>>,
    },
    MovementRange {
        actor: CombatantId,
        reply: oneshot::Sender<Result<RangeSet>>,
    },
    AttackRange {
        actor: CombatantId,
        reply: oneshot::Sender<Result<RangeSet>>,
    },
    TurnOrder {
        reply: oneshot::Sender<Vec<(CombatantId, f64)>>,
    },
    Outcome {
        reply: oneshot::Sender<BattleOutcome>,
    },
    /// Everything a provider needs for the current actor. `None` once the
    /// battle is over.
    View {
        reply: oneshot::Sender<Option<BattleView>>,
    },
    /// Applies a command. `actor: None` targets the current actor.
    Submit {
        actor: Option<CombatantId>,
        command: PlayerCommand,
        reply: oneshot::Sender<Result<()>>,
    },
    TakeAiTurn {
        reply: oneshot::Sender<Result<AiDecision>>,
    },
    PendingEffect {
        reply: oneshot::Sender<Option<EffectRequest>>,
    },
    NotifyEffectComplete {
        ticket: Ticket,
        reply: oneshot::Sender<Result<()>>,
    },
}

/// Background task that processes battle commands.
///
/// The worker never waits on providers or presenters; the runtime driver
/// does that and talks to the worker only through [`Command`]s.
pub struct SimulationWorker {
    session: BattleSession,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    announced: Option<Ticket>,
}

impl SimulationWorker {
    pub fn new(
        session: BattleSession,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            target: "runtime::worker",
            combatants = session.combatants().len(),
            first_actor = ?session.current_actor().map(|c| c.id),
            "simulation worker initialized"
        );

        let mut worker = Self {
            session,
            command_rx,
            event_bus,
            announced: None,
        };
        // Opening TurnStarted is recorded at setup.
        worker.flush();
        worker
    }

    /// Main worker loop. Ends when every handle has been dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!(target: "runtime::worker", "command channel closed, worker stopping");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Combatants { reply } => {
                reply_or_log(reply, self.session.combatants().to_vec(), "Combatants");
            }
            Command::CurrentActor { reply } => {
                reply_or_log(reply, self.session.current_actor().cloned(), "CurrentActor");
            }
            Command::MovementRange { actor, reply } => {
                let result = self.session.movement_range(actor).map_err(RuntimeError::from);
                reply_or_log(reply, result, "MovementRange");
            }
            Command::AttackRange { actor, reply } => {
                let result = self.session.attack_range(actor).map_err(RuntimeError::from);
                reply_or_log(reply, result, "AttackRange");
            }
            Command::TurnOrder { reply } => {
                reply_or_log(reply, self.session.turn_order(), "TurnOrder");
            }
            Command::Outcome { reply } => {
                reply_or_log(reply, self.session.outcome(), "Outcome");
            }
            Command::View { reply } => {
                reply_or_log(reply, self.view(), "View");
            }
            Command::Submit {
                actor,
                command,
                reply,
            } => {
                let result = self.submit(actor, command);
                self.flush();
                reply_or_log(reply, result, "Submit");
            }
            Command::TakeAiTurn { reply } => {
                let result = self.session.take_ai_turn().map_err(RuntimeError::from);
                self.flush();
                reply_or_log(reply, result, "TakeAiTurn");
            }
            Command::PendingEffect { reply } => {
                reply_or_log(reply, self.session.pending_effect().cloned(), "PendingEffect");
            }
            Command::NotifyEffectComplete { ticket, reply } => {
                let result = self
                    .session
                    .notify_effect_complete(ticket)
                    .map_err(RuntimeError::from);
                if result.is_ok() {
                    self.event_bus
                        .publish(Event::Effect(EffectEvent::Completed { ticket }));
                }
                self.flush();
                reply_or_log(reply, result, "NotifyEffectComplete");
            }
        }
    }

    fn submit(&mut self, actor: Option<CombatantId>, command: PlayerCommand) -> Result<()> {
        let actor = match actor {
            Some(actor) => actor,
            None => self
                .session
                .current_actor()
                .map(|c| c.id)
                .ok_or(RuntimeError::NoActiveTurn)?,
        };
        debug!(target: "runtime::worker", %actor, ?command, "submitting command");
        self.session.submit(actor, command)?;
        Ok(())
    }

    fn view(&self) -> Option<BattleView> {
        if self.session.is_over() {
            return None;
        }
        let actor = self.session.current_actor()?.id;
        let phase = self.session.current_phase()?;
        Some(BattleView {
            actor,
            phase,
            turn_index: self.session.scheduler().completed_actions(),
            outcome: self.session.outcome(),
            state: self.session.state().clone(),
            movement_range: self.session.movement_range(actor).ok()?,
            attack_range: self.session.attack_range(actor).ok()?,
        })
    }

    /// Publishes everything the session recorded since the last flush and
    /// announces the head effect if it is new.
    fn flush(&mut self) {
        for event in self.session.drain_events() {
            if let Some(turn) = TurnEvent::from_session(&event) {
                self.event_bus.publish(Event::Turn(turn));
            }
            self.event_bus.publish(Event::Battle(event));
        }

        if let Some(request) = self.session.pending_effect()
            && self.announced != Some(request.ticket)
        {
            self.announced = Some(request.ticket);
            self.event_bus
                .publish(Event::Effect(EffectEvent::Requested(request.clone())));
        }
    }
}

fn reply_or_log<T>(reply: oneshot::Sender<T>, value: T, command: &'static str) {
    if reply.send(value).is_err() {
        debug!(target: "runtime::worker", command, "reply channel closed (caller dropped)");
    }
}
