//! Battle session: the single entry point the presentation layer talks to.
//!
//! A [`BattleSession`] owns the battle state, the initiative scheduler and the
//! current actor's [`ActionPhase`]. Commands are validated against the legal
//! sets computed by the reachability engine before anything is mutated.
//!
//! Resolution steps that depend on visual feedback are split at explicit
//! continuation points. For example an attack runs as:
//!
//! ```text
//! submit_attack          -> damage applied, AttackFlash queued
//! notify(flash ticket)   -> DamageNumber queued
//! notify(number ticket)  -> turn completed, next actor selected
//! ```
//!
//! While an effect is outstanding every command fails with
//! [`ActionError::EffectPending`], so a turn can never complete before its
//! effects have been shown.

mod effects;
mod events;

use std::collections::VecDeque;

use tracing::{debug, info};

pub use effects::{EffectRequest, Ticket, VisualEffect};
pub use events::{BattleOutcome, SessionEvent};

use effects::{Continuation, PendingEffect};

use crate::action::{ActionError, ActionPhase, CommandKind, IllegalReason, PlayerCommand, TurnPhase};
use crate::ai::{self, AiDecision};
use crate::combat::perform_attack;
use crate::config::BattleConfig;
use crate::engine::{Scheduler, TurnError};
use crate::reach::{self, RangeSet};
use crate::state::{BattleState, Combatant, CombatantId, Faction, Position, SetupError};

/// One battle from setup until one side has no living members.
#[derive(Clone, Debug)]
pub struct BattleSession {
    config: BattleConfig,
    state: BattleState,
    scheduler: Scheduler,
    turn: Option<ActionPhase>,
    pending: VecDeque<PendingEffect>,
    next_ticket: u64,
    events: Vec<SessionEvent>,
    outcome: BattleOutcome,
}

impl BattleSession {
    /// Places `combatants` on the configured grid and starts the first turn.
    pub fn new(
        config: BattleConfig,
        combatants: impl IntoIterator<Item = Combatant>,
    ) -> Result<Self, SetupError> {
        let state = BattleState::with_combatants(config.grid(), combatants)?;
        Self::from_state(config, state)
    }

    /// Starts a battle on an already assembled state. The state's grid wins
    /// over the grid dimensions in `config`.
    pub fn from_state(config: BattleConfig, mut state: BattleState) -> Result<Self, SetupError> {
        if state.living().next().is_none() {
            return Err(SetupError::EmptyRoster);
        }

        let mut scheduler = Scheduler::new(config.speed_base);
        scheduler.initialize(&mut state);

        let mut session = Self {
            config,
            state,
            scheduler,
            turn: None,
            pending: VecDeque::new(),
            next_ticket: 1,
            events: Vec::new(),
            outcome: BattleOutcome::Ongoing,
        };
        session
            .begin_next_turn()
            .map_err(|_| SetupError::EmptyRoster)?;
        Ok(session)
    }

    // ===== queries =====

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn combatants(&self) -> &[Combatant] {
        self.state.combatants()
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.state.combatant(id)
    }

    pub fn current_actor(&self) -> Option<&Combatant> {
        let turn = self.turn.as_ref()?;
        self.state.combatant(turn.actor())
    }

    pub fn current_phase(&self) -> Option<TurnPhase> {
        self.turn.as_ref().map(ActionPhase::phase)
    }

    pub fn turn(&self) -> Option<&ActionPhase> {
        self.turn.as_ref()
    }

    pub fn movement_range(&self, actor: CombatantId) -> Result<RangeSet, ActionError> {
        let combatant = self.require(actor)?;
        Ok(reach::movement_range(combatant, &self.state))
    }

    pub fn attack_range(&self, actor: CombatantId) -> Result<RangeSet, ActionError> {
        let combatant = self.require(actor)?;
        Ok(reach::attack_range(combatant, self.state.grid()))
    }

    pub fn movement_path(
        &self,
        actor: CombatantId,
        destination: Position,
    ) -> Result<Vec<Position>, ActionError> {
        let combatant = self.require(actor)?;
        Ok(reach::movement_path(combatant, &self.state, destination))
    }

    /// Living combatants with their wait times, next to act first.
    pub fn turn_order(&self) -> Vec<(CombatantId, f64)> {
        self.scheduler.queue(&self.state)
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn outcome(&self) -> BattleOutcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_decided()
    }

    /// Oldest visual effect still waiting for acknowledgement.
    pub fn pending_effect(&self) -> Option<&EffectRequest> {
        self.pending.front().map(|pending| &pending.request)
    }

    /// Events recorded since the last drain.
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== commands =====

    /// Routes a command to the matching `submit_*` operation.
    pub fn submit(&mut self, actor: CombatantId, command: PlayerCommand) -> Result<(), ActionError> {
        match command {
            PlayerCommand::SelectMove => self.select_move(actor),
            PlayerCommand::MoveTo(destination) => self.submit_move_to(actor, destination),
            PlayerCommand::SelectAttack => self.select_attack(actor),
            PlayerCommand::Attack(target) => self.submit_attack(actor, target),
            PlayerCommand::Skill(slot) => self.submit_skill(actor, slot),
            PlayerCommand::Wait => self.submit_wait(actor),
            PlayerCommand::CancelMove => self.submit_cancel_move(actor),
            PlayerCommand::CancelSelection => self.cancel_selection(actor),
        }
    }

    /// Opens the movement range.
    pub fn select_move(&mut self, actor: CombatantId) -> Result<(), ActionError> {
        self.ensure_turn(actor)?;
        self.phase_mut()?.begin_move()?;
        debug!(target: "tactics::session", %actor, "movement range opened");
        Ok(())
    }

    /// Moves the actor to `destination`, which must be a non-origin cell of
    /// its movement range. The position is committed at once; the phase
    /// becomes `moved` when the move effect is acknowledged.
    ///
    /// Picking a cell outside the range, or the actor's own cell, deselects:
    /// the phase returns to `normal` and `IllegalTarget` is reported. Nothing
    /// else changes.
    pub fn submit_move_to(
        &mut self,
        actor: CombatantId,
        destination: Position,
    ) -> Result<(), ActionError> {
        self.ensure_turn(actor)?;
        self.phase()?.check_move_target()?;

        let range = self.movement_range(actor)?;
        let rejected = match range.distance(destination) {
            None => Some(IllegalReason::OutOfRange),
            Some(0) => Some(IllegalReason::OwnCell),
            Some(_) => None,
        };
        if let Some(reason) = rejected {
            self.phase_mut()?.cancel_selection()?;
            debug!(target: "tactics::session", %actor, %destination, ?reason, "move deselected");
            return Err(ActionError::illegal_cell(destination, reason));
        }

        self.commit_move(actor, destination, Continuation::EnterMoved)
    }

    /// Opens the attack range from the actor's current cell.
    pub fn select_attack(&mut self, actor: CombatantId) -> Result<(), ActionError> {
        self.ensure_turn(actor)?;
        self.phase_mut()?.begin_attack()?;
        debug!(target: "tactics::session", %actor, "attack range opened");
        Ok(())
    }

    /// Attacks a living opponent inside the attack range.
    pub fn submit_attack(
        &mut self,
        actor: CombatantId,
        target: CombatantId,
    ) -> Result<(), ActionError> {
        self.ensure_turn(actor)?;
        self.phase()?.check_attack_target()?;
        self.resolve_attack(actor, target)
    }

    /// Uses a stubbed skill: spends its mp cost and ends the turn.
    pub fn submit_skill(&mut self, actor: CombatantId, slot: usize) -> Result<(), ActionError> {
        self.ensure_turn(actor)?;
        self.phase()?.check_immediate(CommandKind::Skill)?;

        let mp_cost = self
            .config
            .skill_mp_costs
            .get(slot)
            .copied()
            .ok_or(ActionError::InvalidSkillSlot { slot })?;
        let combatant = self
            .state
            .combatant_mut(actor)
            .ok_or(ActionError::CombatantNotFound(actor))?;
        let available = combatant.stats().mp;
        if !combatant.consume_mp(mp_cost) {
            return Err(ActionError::InsufficientResource {
                actor,
                required: mp_cost,
                available,
            });
        }

        info!(target: "tactics::session", %actor, slot, mp_cost, "skill used");
        self.events.push(SessionEvent::SkillUsed {
            actor,
            slot,
            mp_cost,
        });
        self.complete_turn(actor)
    }

    pub fn submit_wait(&mut self, actor: CombatantId) -> Result<(), ActionError> {
        self.ensure_turn(actor)?;
        self.phase()?.check_immediate(CommandKind::Wait)?;

        debug!(target: "tactics::session", %actor, "waiting");
        self.events.push(SessionEvent::Waited { actor });
        self.complete_turn(actor)
    }

    /// Puts the actor back on the cell it started the turn on.
    pub fn submit_cancel_move(&mut self, actor: CombatantId) -> Result<(), ActionError> {
        self.ensure_turn(actor)?;
        let original = self.phase_mut()?.cancel_move()?;
        self.state
            .relocate(actor, original)
            .ok_or(ActionError::CombatantNotFound(actor))?;

        debug!(target: "tactics::session", %actor, restored = %original, "move cancelled");
        self.events.push(SessionEvent::MoveCancelled {
            actor,
            restored: original,
        });
        Ok(())
    }

    /// Closes an open movement or attack range without acting.
    pub fn cancel_selection(&mut self, actor: CombatantId) -> Result<(), ActionError> {
        self.ensure_turn(actor)?;
        let phase = self.phase_mut()?.cancel_selection()?;
        debug!(target: "tactics::session", %actor, %phase, "selection cancelled");
        Ok(())
    }

    /// Lets the decision module play the current actor's whole turn.
    ///
    /// The move (if any) and the attack (if any) run through the same effect
    /// continuations as player commands. Only legal from `normal`.
    pub fn take_ai_turn(&mut self) -> Result<AiDecision, ActionError> {
        if self.outcome.is_decided() {
            return Err(ActionError::BattleOver(self.outcome));
        }
        let actor = self
            .turn
            .as_ref()
            .map(ActionPhase::actor)
            .ok_or(ActionError::NoActiveTurn)?;
        self.ensure_turn(actor)?;

        let phase = self.phase()?.phase();
        if phase != TurnPhase::Normal {
            return Err(ActionError::InvalidPhase {
                command: CommandKind::AutoTurn,
                phase,
            });
        }

        let decision = ai::decide(&self.state, actor).unwrap_or(AiDecision::idle(actor));
        info!(
            target: "tactics::session",
            %actor,
            kind = %decision.kind(),
            destination = ?decision.destination,
            target_id = ?decision.target,
            "automatic decision"
        );

        match (decision.destination, decision.target) {
            (Some(destination), target) => {
                self.phase_mut()?.begin_move()?;
                let moved = self.commit_move(actor, destination, Continuation::FollowUp { target });
                if let Err(err) = moved {
                    self.phase_mut()?.cancel_selection()?;
                    return Err(err);
                }
            }
            (None, Some(target)) => {
                self.phase_mut()?.begin_attack()?;
                if let Err(err) = self.resolve_attack(actor, target) {
                    self.phase_mut()?.cancel_selection()?;
                    return Err(err);
                }
            }
            (None, None) => {
                self.events.push(SessionEvent::Waited { actor });
                self.complete_turn(actor)?;
            }
        }

        Ok(decision)
    }

    /// Acknowledges the oldest pending effect and runs its continuation.
    pub fn notify_effect_complete(&mut self, ticket: Ticket) -> Result<(), ActionError> {
        let expected = self.pending.front().map(|pending| pending.request.ticket);
        if expected != Some(ticket) {
            return Err(ActionError::UnknownTicket { ticket, expected });
        }
        let Some(pending) = self.pending.pop_front() else {
            return Err(ActionError::UnknownTicket {
                ticket,
                expected: None,
            });
        };
        debug!(target: "tactics::session", %ticket, "effect complete");

        let actor = self
            .turn
            .as_ref()
            .map(ActionPhase::actor)
            .ok_or(ActionError::NoActiveTurn)?;

        match pending.continuation {
            Continuation::EnterMoved => {
                self.phase_mut()?.finish_move()?;
            }
            Continuation::FollowUp { target } => {
                self.phase_mut()?.finish_move()?;
                match target {
                    Some(target) => {
                        self.phase_mut()?.begin_attack()?;
                        if let Err(err) = self.resolve_attack(actor, target) {
                            // Nothing to hit after all; the move alone ends the turn.
                            debug!(target: "tactics::session", %actor, %err, "follow-up attack dropped");
                            self.complete_turn(actor)?;
                        }
                    }
                    None => self.complete_turn(actor)?,
                }
            }
            Continuation::ShowDamage { target, damage, at } => {
                self.enqueue(
                    VisualEffect::DamageNumber { target, damage, at },
                    Continuation::CompleteTurn,
                );
            }
            Continuation::CompleteTurn => self.complete_turn(actor)?,
        }
        Ok(())
    }

    // ===== internals =====

    fn require(&self, id: CombatantId) -> Result<&Combatant, ActionError> {
        self.state
            .combatant(id)
            .ok_or(ActionError::CombatantNotFound(id))
    }

    /// Common gate for every command: battle running, actor known and on
    /// turn, no effect outstanding.
    fn ensure_turn(&self, actor: CombatantId) -> Result<(), ActionError> {
        if self.outcome.is_decided() {
            return Err(ActionError::BattleOver(self.outcome));
        }
        self.require(actor)?;
        let turn = self.turn.as_ref().ok_or(ActionError::NoActiveTurn)?;
        if turn.actor() != actor {
            return Err(ActionError::NotYourTurn {
                actor,
                current: turn.actor(),
            });
        }
        if let Some(pending) = self.pending.front() {
            return Err(ActionError::EffectPending {
                ticket: pending.request.ticket,
            });
        }
        Ok(())
    }

    fn phase(&self) -> Result<&ActionPhase, ActionError> {
        self.turn.as_ref().ok_or(ActionError::NoActiveTurn)
    }

    fn phase_mut(&mut self) -> Result<&mut ActionPhase, ActionError> {
        self.turn.as_mut().ok_or(ActionError::NoActiveTurn)
    }

    /// Relocates the actor and queues the move effect. `destination` must
    /// already be validated against the movement range.
    fn commit_move(
        &mut self,
        actor: CombatantId,
        destination: Position,
        continuation: Continuation,
    ) -> Result<(), ActionError> {
        let combatant = self.require(actor)?;
        let from = combatant.position;
        let path = reach::movement_path(combatant, &self.state, destination);

        self.phase_mut()?.commit_move(from)?;
        self.state
            .relocate(actor, destination)
            .ok_or(ActionError::CombatantNotFound(actor))?;

        info!(target: "tactics::session", %actor, %from, to = %destination, "moved");
        self.events.push(SessionEvent::Moved {
            actor,
            from,
            to: destination,
        });
        self.enqueue(
            VisualEffect::Move {
                actor,
                from,
                to: destination,
                path,
            },
            continuation,
        );
        Ok(())
    }

    /// Validates the target, applies damage and queues the attack flash.
    fn resolve_attack(&mut self, actor: CombatantId, target: CombatantId) -> Result<(), ActionError> {
        let attacker = self.require(actor)?;
        let defender = self.require(target)?;

        if !defender.is_alive() {
            return Err(ActionError::illegal_combatant(target, IllegalReason::Defeated));
        }
        if defender.faction == attacker.faction {
            return Err(ActionError::illegal_combatant(target, IllegalReason::Friendly));
        }
        if !reach::attack_range(attacker, self.state.grid()).contains(defender.position) {
            return Err(ActionError::illegal_combatant(target, IllegalReason::OutOfRange));
        }

        let attacker_stats = *attacker.stats();
        let at = defender.position;
        let defender = self
            .state
            .combatant_mut(target)
            .ok_or(ActionError::CombatantNotFound(target))?;
        let outcome = perform_attack(&attacker_stats, defender);

        info!(
            target: "tactics::session",
            attacker = %actor,
            target_id = %target,
            damage = outcome.damage,
            remaining_hp = outcome.remaining_hp,
            "attack resolved"
        );
        self.events.push(SessionEvent::Attacked {
            attacker: actor,
            target,
            damage: outcome.damage,
            remaining_hp: outcome.remaining_hp,
        });
        if outcome.defeated {
            info!(target: "tactics::session", combatant = %target, "defeated");
            self.events.push(SessionEvent::Defeated { combatant: target });
        }

        self.enqueue(
            VisualEffect::AttackFlash {
                attacker: actor,
                target,
                at,
            },
            Continuation::ShowDamage {
                target,
                damage: outcome.damage,
                at,
            },
        );
        Ok(())
    }

    fn enqueue(&mut self, effect: VisualEffect, continuation: Continuation) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.pending.push_back(PendingEffect {
            request: EffectRequest { ticket, effect },
            continuation,
        });
        ticket
    }

    /// Re-queues the actor and either starts the next turn or ends the battle.
    fn complete_turn(&mut self, actor: CombatantId) -> Result<(), ActionError> {
        self.scheduler.finish_turn(&mut self.state, actor)?;
        self.turn = None;
        debug!(target: "tactics::session", %actor, "turn completed");
        self.events.push(SessionEvent::TurnCompleted { actor });
        self.begin_next_turn()?;
        Ok(())
    }

    fn begin_next_turn(&mut self) -> Result<(), TurnError> {
        self.outcome = self.evaluate_outcome();
        if self.outcome.is_decided() {
            self.turn = None;
            info!(target: "tactics::session", outcome = %self.outcome, "battle ended");
            self.events.push(SessionEvent::BattleEnded {
                outcome: self.outcome,
            });
            return Ok(());
        }

        let actor = self.scheduler.select_next_actor(&mut self.state)?;
        self.turn = Some(ActionPhase::new(actor));
        let elapsed = self.scheduler.elapsed();
        info!(target: "tactics::session", %actor, elapsed, "turn started");
        self.events.push(SessionEvent::TurnStarted { actor, elapsed });
        Ok(())
    }

    fn evaluate_outcome(&self) -> BattleOutcome {
        if self.state.living_in(Faction::Enemy).next().is_none() {
            BattleOutcome::Victory
        } else if self.state.living_in(Faction::Ally).next().is_none() {
            BattleOutcome::Defeat
        } else {
            BattleOutcome::Ongoing
        }
    }
}
