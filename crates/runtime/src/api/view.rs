//! Read-only snapshot handed to action providers.

use tactics_core::{
    BattleOutcome, BattleState, Combatant, CombatantId, RangeSet, TurnPhase,
};

/// Everything a provider needs to choose the next command for the current actor.
#[derive(Clone, Debug, PartialEq)]
pub struct BattleView {
    pub actor: CombatantId,
    pub phase: TurnPhase,
    /// Number of turns completed before this one; changes when the turn ends.
    pub turn_index: u64,
    pub outcome: BattleOutcome,
    pub state: BattleState,
    /// Movement range of the actor from its current cell.
    pub movement_range: RangeSet,
    /// Attack range of the actor from its current cell.
    pub attack_range: RangeSet,
}

impl BattleView {
    pub fn actor(&self) -> Option<&Combatant> {
        self.state.combatant(self.actor)
    }

    /// Living opponents of the actor whose cell lies inside the attack range,
    /// in roster order.
    pub fn attackable_targets(&self) -> impl Iterator<Item = &Combatant> + '_ {
        let faction = self.actor().map(|actor| actor.faction.opposing());
        self.state
            .living()
            .filter(move |c| Some(c.faction) == faction)
            .filter(|c| self.attack_range.contains(c.position))
    }
}
