//! Damage calculation.

use crate::state::Stats;

/// Every landed attack deals at least this much, so battles always progress.
pub const MIN_DAMAGE: u32 = 1;

/// Which attack and defense pair an attack uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DamageKind {
    /// `str` against `def`.
    #[default]
    Physical,
    /// `mstr` against `mdef`. Reserved for skills.
    Magical,
}

/// Calculate damage from an attack.
///
/// # Formula
///
/// ```text
/// damage = max(MIN_DAMAGE, attack - defense)
/// ```
pub fn calculate_damage(attacker: &Stats, defender: &Stats, kind: DamageKind) -> u32 {
    let (attack, defense) = match kind {
        DamageKind::Physical => (attacker.str, defender.def),
        DamageKind::Magical => (attacker.mstr, defender.mdef),
    };
    attack.saturating_sub(defense).max(MIN_DAMAGE)
}
