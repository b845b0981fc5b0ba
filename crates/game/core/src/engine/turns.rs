use tracing::{debug, trace};

use super::TurnError;
use crate::state::{BattleState, CombatantId};

/// Speed-driven initiative queue.
///
/// Every living combatant counts down `wait_time`; the one that reaches zero
/// first acts, then re-enters the queue with `speed_base / spd`. Over a long
/// battle each combatant's share of turns is proportional to its speed.
///
/// The queue is kept as a persistent list and re-sorted in place with a stable
/// sort, so combatants with equal wait keep their previous relative order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scheduler {
    speed_base: f64,
    queue: Vec<CombatantId>,
    current: Option<CombatantId>,
    elapsed: f64,
    completed_actions: u64,
}

impl Scheduler {
    pub fn new(speed_base: f64) -> Self {
        Self {
            speed_base,
            queue: Vec::new(),
            current: None,
            elapsed: 0.0,
            completed_actions: 0,
        }
    }

    /// Seeds the queue with every living combatant in roster order.
    pub fn initialize(&mut self, state: &mut BattleState) {
        self.queue.clear();
        self.current = None;
        self.elapsed = 0.0;
        self.completed_actions = 0;

        for combatant in state.combatants_mut() {
            if !combatant.is_alive() {
                continue;
            }
            combatant.wait_time = self.speed_base / f64::from(combatant.stats().spd);
            combatant.has_acted = false;
            self.queue.push(combatant.id);
        }
        self.sort(state);
    }

    /// Moves the global clock forward to the next ready combatant.
    ///
    /// Subtracts the smallest living wait from every living combatant and
    /// returns the amount advanced. Dead combatants are left untouched.
    pub fn advance_time(&mut self, state: &mut BattleState) -> Result<f64, TurnError> {
        let min_wait = self
            .living_queue(state)
            .map(|(_, wait)| wait)
            .fold(None, |acc: Option<f64>, wait| {
                Some(acc.map_or(wait, |m| m.min(wait)))
            })
            .ok_or(TurnError::NoActiveCombatants)?;

        for combatant in state.combatants_mut() {
            if combatant.is_alive() && self.queue.contains(&combatant.id) {
                combatant.wait_time -= min_wait;
            }
        }
        self.elapsed += min_wait;

        trace!(target: "tactics::scheduler", advanced = min_wait, elapsed = self.elapsed);
        Ok(min_wait)
    }

    /// Picks the next combatant to act.
    ///
    /// Dead combatants are dropped from the queue first. Time is advanced and
    /// the queue re-sorted until its head has exactly zero wait; since every
    /// advance zeroes the current minimum this settles after one pass.
    pub fn select_next_actor(&mut self, state: &mut BattleState) -> Result<CombatantId, TurnError> {
        self.queue
            .retain(|id| state.combatant(*id).is_some_and(|c| c.is_alive()));
        if self.queue.is_empty() {
            self.current = None;
            return Err(TurnError::NoActiveCombatants);
        }

        loop {
            self.advance_time(state)?;
            self.sort(state);
            let head = self.queue[0];
            let ready = state
                .combatant(head)
                .is_some_and(|c| c.wait_time <= 0.0);
            if ready {
                break;
            }
        }

        let actor = self.queue[0];
        if let Some(combatant) = state.combatant_mut(actor) {
            combatant.wait_time = 0.0;
            combatant.has_acted = false;
        }
        self.current = Some(actor);

        debug!(target: "tactics::scheduler", %actor, elapsed = self.elapsed, "selected next actor");
        Ok(actor)
    }

    /// Re-queues `actor` after its action resolved, without selecting the next actor.
    ///
    /// This is the only place a wait time is reset.
    pub fn finish_turn(
        &mut self,
        state: &mut BattleState,
        actor: CombatantId,
    ) -> Result<(), TurnError> {
        if self.current != Some(actor) {
            return Err(TurnError::NotCurrentActor {
                actor,
                current: self.current,
            });
        }
        let speed_base = self.speed_base;
        let combatant = state
            .combatant_mut(actor)
            .ok_or(TurnError::UnknownCombatant(actor))?;
        combatant.wait_time = speed_base / f64::from(combatant.stats().spd);
        combatant.has_acted = true;

        self.current = None;
        self.completed_actions += 1;
        self.sort(state);
        Ok(())
    }

    /// Re-queues `actor` and selects the next combatant to act.
    pub fn complete_action(
        &mut self,
        state: &mut BattleState,
        actor: CombatantId,
    ) -> Result<CombatantId, TurnError> {
        self.finish_turn(state, actor)?;
        self.select_next_actor(state)
    }

    pub fn current(&self) -> Option<CombatantId> {
        self.current
    }

    /// Living queue members with their wait times, soonest first.
    pub fn queue(&self, state: &BattleState) -> Vec<(CombatantId, f64)> {
        self.living_queue(state).collect()
    }

    /// Total simulated time advanced since initialization.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn completed_actions(&self) -> u64 {
        self.completed_actions
    }

    pub fn speed_base(&self) -> f64 {
        self.speed_base
    }

    fn living_queue<'a>(
        &'a self,
        state: &'a BattleState,
    ) -> impl Iterator<Item = (CombatantId, f64)> + 'a {
        self.queue.iter().filter_map(|&id| {
            let combatant = state.combatant(id)?;
            combatant.is_alive().then_some((id, combatant.wait_time))
        })
    }

    fn sort(&mut self, state: &BattleState) {
        let wait_of = |id: &CombatantId| {
            state
                .combatant(*id)
                .map_or(f64::INFINITY, |c| c.wait_time)
        };
        self.queue
            .sort_by(|a, b| wait_of(a).total_cmp(&wait_of(b)));
    }
}
