//! Move-and-attack decisions for automatically controlled combatants.
//!
//! [`decide`] is a pure function of the battle state. Hypothetical positions
//! are checked with [`attack_range_from`], so no combatant is ever relocated
//! while a decision is being made.
//!
//! Enumeration order is fixed: candidate cells in row-major order (the
//! actor's own cell included), targets in roster order inside each cell. A
//! later candidate only replaces the current best if it is strictly better, so
//! ties go to whichever was found first.

use crate::action::PlayerCommand;
use crate::reach::{attack_range_from, movement_range};
use crate::state::{BattleState, CombatantId, Position};

/// Broad category of an automatic decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AiActionKind {
    /// Attack a target, moving first if needed.
    Attack,
    /// Close in on the nearest target without attacking.
    Move,
    /// Nothing useful to do; the turn simply completes.
    Idle,
}

/// Chosen action for one combatant's turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AiDecision {
    pub actor: CombatantId,
    /// Cell to move to first. `None` when the actor stays put.
    pub destination: Option<Position>,
    /// Opponent to attack after the optional move.
    pub target: Option<CombatantId>,
}

impl AiDecision {
    pub fn idle(actor: CombatantId) -> Self {
        Self {
            actor,
            destination: None,
            target: None,
        }
    }

    pub fn kind(&self) -> AiActionKind {
        match (self.destination, self.target) {
            (_, Some(_)) => AiActionKind::Attack,
            (Some(_), None) => AiActionKind::Move,
            (None, None) => AiActionKind::Idle,
        }
    }

    /// Expands the decision into the command sequence a player would enter.
    pub fn commands(&self) -> Vec<PlayerCommand> {
        let mut commands = Vec::with_capacity(4);
        if let Some(destination) = self.destination {
            commands.push(PlayerCommand::SelectMove);
            commands.push(PlayerCommand::MoveTo(destination));
        }
        match self.target {
            Some(target) => {
                commands.push(PlayerCommand::SelectAttack);
                commands.push(PlayerCommand::Attack(target));
            }
            None => commands.push(PlayerCommand::Wait),
        }
        commands
    }
}

/// Picks an action for `actor` against the living members of the opposing side.
///
/// 1. Among all (reachable cell, target) pairs where the target would be in
///    attack range from that cell, take the one whose cell is closest to the
///    actor's start (Manhattan distance).
/// 2. Otherwise walk toward the closest target: the reachable cell nearest to
///    it, if any beats staying put.
/// 3. With no living targets the decision is idle.
///
/// Returns `None` if `actor` is unknown or already defeated.
pub fn decide(state: &BattleState, actor: CombatantId) -> Option<AiDecision> {
    let combatant = state.combatant(actor)?;
    if !combatant.is_alive() {
        return None;
    }

    let origin = combatant.position;
    let targets: Vec<_> = state
        .living_in(combatant.faction.opposing())
        .map(|target| (target.id, target.position))
        .collect();
    if targets.is_empty() {
        return Some(AiDecision::idle(actor));
    }

    let reach = combatant.stats().range;
    let moves = movement_range(combatant, state);

    let mut best: Option<(u32, Position, CombatantId)> = None;
    for cell in moves.iter() {
        let attack = attack_range_from(cell.position, reach, state.grid());
        for &(target, position) in &targets {
            if !attack.contains(position) {
                continue;
            }
            let distance = cell.position.manhattan(origin);
            if best.is_none_or(|(d, _, _)| distance < d) {
                best = Some((distance, cell.position, target));
            }
        }
    }

    if let Some((_, cell, target)) = best {
        return Some(AiDecision {
            actor,
            destination: (cell != origin).then_some(cell),
            target: Some(target),
        });
    }

    // Nothing attackable this turn: close in on the nearest target.
    let mut closest: Option<(u32, Position)> = None;
    for &(_, position) in &targets {
        let distance = origin.manhattan(position);
        if closest.is_none_or(|(d, _)| distance < d) {
            closest = Some((distance, position));
        }
    }
    let Some((mut best_distance, goal)) = closest else {
        return Some(AiDecision::idle(actor));
    };

    let mut step_to = origin;
    for cell in moves.targets() {
        let distance = cell.position.manhattan(goal);
        if distance < best_distance {
            best_distance = distance;
            step_to = cell.position;
        }
    }

    Some(AiDecision {
        actor,
        destination: (step_to != origin).then_some(step_to),
        target: None,
    })
}
