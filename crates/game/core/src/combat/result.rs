//! Attack application.

use super::damage::{DamageKind, calculate_damage};
use crate::state::{Combatant, CombatantId, Stats};

/// What a resolved attack did to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackOutcome {
    pub target: CombatantId,
    pub damage: u32,
    /// Target hp after the hit.
    pub remaining_hp: u32,
    /// True if this hit brought the target to zero hp.
    pub defeated: bool,
}

/// Applies a physical attack to `target`.
///
/// Only the target's hp changes. No counterattack and no range check.
pub fn perform_attack(attacker: &Stats, target: &mut Combatant) -> AttackOutcome {
    let damage = calculate_damage(attacker, target.stats(), DamageKind::Physical);
    let defeated = target.take_damage(damage);
    AttackOutcome {
        target: target.id,
        damage,
        remaining_hp: target.stats().hp,
        defeated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Faction, Position};

    fn target(hp: u32, def: u32) -> Combatant {
        Combatant::new(
            CombatantId(7),
            "target",
            Faction::Enemy,
            Position::ORIGIN,
            Stats {
                hp,
                def,
                ..Stats::default()
            },
        )
    }

    #[test]
    fn attack_reduces_hp() {
        let attacker = Stats {
            str: 28,
            ..Stats::default()
        };
        let mut defender = target(100, 12);

        let outcome = perform_attack(&attacker, &mut defender);
        assert_eq!(outcome.damage, 16);
        assert_eq!(outcome.remaining_hp, 84);
        assert!(!outcome.defeated);
    }

    #[test]
    fn lethal_attack_reports_defeat() {
        let attacker = Stats {
            str: 28,
            ..Stats::default()
        };
        let mut defender = target(10, 12);

        let outcome = perform_attack(&attacker, &mut defender);
        assert!(outcome.defeated);
        assert_eq!(defender.stats().hp, 0);
        assert!(!defender.is_alive());
    }
}
