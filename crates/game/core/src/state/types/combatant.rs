//! Combatant records.
//!
//! A single tagged struct covers both sides; the [`Faction`] flag decides
//! whether the player or the AI controls it.

use std::fmt;

use super::{CombatantId, Position};

/// Side a combatant fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Faction {
    /// Player-controlled side.
    #[strum(serialize = "ally")]
    Ally,
    /// AI-controlled side.
    #[strum(serialize = "enemy")]
    Enemy,
}

impl Faction {
    pub fn is_enemy(self) -> bool {
        matches!(self, Faction::Enemy)
    }

    pub fn opposing(self) -> Faction {
        match self {
            Faction::Ally => Faction::Enemy,
            Faction::Enemy => Faction::Ally,
        }
    }
}

/// Battle statistics. All values are non-negative.
///
/// # Invariants
///
/// - `hp <= maxhp`
/// - `mp <= maxmp`
///
/// Maintained by [`Combatant`]'s mutators; raw construction is clamped by
/// [`Stats::clamped`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Stats {
    pub hp: u32,
    pub maxhp: u32,
    pub mp: u32,
    pub maxmp: u32,
    /// Physical attack.
    pub str: u32,
    /// Physical defense.
    pub def: u32,
    /// Magical attack.
    pub mstr: u32,
    /// Magical defense.
    pub mdef: u32,
    pub spd: u32,
    /// Movement allowance in grid steps.
    pub mv: u32,
    /// Attack reach in grid steps.
    pub range: u32,
}

impl Stats {
    pub fn clamped(mut self) -> Self {
        self.hp = self.hp.min(self.maxhp);
        self.mp = self.mp.min(self.maxmp);
        self
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            hp: 100,
            maxhp: 100,
            mp: 50,
            maxmp: 50,
            str: 15,
            def: 10,
            mstr: 12,
            mdef: 8,
            spd: 5,
            mv: 3,
            range: 1,
        }
    }
}

/// Mutable battle participant.
///
/// Combatants are never removed from a battle; dead ones stay in place (and
/// keep blocking movement) but are skipped by targeting and scheduling.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub faction: Faction,
    /// Authoritative grid cell.
    pub position: Position,
    stats: Stats,
    /// Remaining time until this combatant's next turn.
    pub wait_time: f64,
    pub has_acted: bool,
}

impl Combatant {
    pub fn new(
        id: CombatantId,
        name: impl Into<String>,
        faction: Faction,
        position: Position,
        stats: Stats,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            faction,
            position,
            stats: stats.clamped(),
            wait_time: 0.0,
            has_acted: false,
        }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    #[inline]
    pub fn is_enemy(&self) -> bool {
        self.faction.is_enemy()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.stats.hp > 0
    }

    /// Replaces the stat block, re-clamping current hp and mp.
    pub fn set_stats(&mut self, stats: Stats) {
        self.stats = stats.clamped();
    }

    /// Applies damage (floored at zero hp). Returns true if this defeated the combatant.
    pub fn take_damage(&mut self, damage: u32) -> bool {
        self.stats.hp = self.stats.hp.saturating_sub(damage);
        self.stats.hp == 0
    }

    pub fn heal(&mut self, amount: u32) {
        self.stats.hp = self.stats.hp.saturating_add(amount).min(self.stats.maxhp);
    }

    /// Spends mp. Leaves mp untouched and returns false when it is insufficient.
    pub fn consume_mp(&mut self, amount: u32) -> bool {
        if self.stats.mp >= amount {
            self.stats.mp -= amount;
            true
        } else {
            false
        }
    }

    pub fn restore_mp(&mut self, amount: u32) {
        self.stats.mp = self.stats.mp.saturating_add(amount).min(self.stats.maxmp);
    }

    pub fn status(&self) -> StatusInfo {
        StatusInfo {
            side: self.faction.into(),
            hp: self.stats.hp,
            maxhp: self.stats.maxhp,
            mp: self.stats.mp,
            maxmp: self.stats.maxmp,
            str: self.stats.str,
            def: self.stats.def,
            mstr: self.stats.mstr,
            mdef: self.stats.mdef,
            spd: self.stats.spd,
            mv: self.stats.mv,
            range: self.stats.range,
        }
    }
}

/// Read-only status panel data for a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatusInfo {
    pub side: &'static str,
    pub hp: u32,
    pub maxhp: u32,
    pub mp: u32,
    pub maxmp: u32,
    pub str: u32,
    pub def: u32,
    pub mstr: u32,
    pub mdef: u32,
    pub spd: u32,
    pub mv: u32,
    pub range: u32,
}

impl fmt::Display for StatusInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] hp {}/{} mp {}/{} str {} def {} mstr {} mdef {} spd {} mv {} range {}",
            self.side,
            self.hp,
            self.maxhp,
            self.mp,
            self.maxmp,
            self.str,
            self.def,
            self.mstr,
            self.mdef,
            self.spd,
            self.mv,
            self.range
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighter(hp: u32) -> Combatant {
        Combatant::new(
            CombatantId(1),
            "fighter",
            Faction::Ally,
            Position::ORIGIN,
            Stats {
                hp,
                maxhp: 120,
                ..Stats::default()
            },
        )
    }

    #[test]
    fn take_damage_floors_at_zero() {
        let mut unit = fighter(30);
        assert!(!unit.take_damage(29));
        assert_eq!(unit.stats().hp, 1);
        assert!(unit.is_alive());

        assert!(unit.take_damage(500));
        assert_eq!(unit.stats().hp, 0);
        assert!(!unit.is_alive());
    }

    #[test]
    fn heal_and_restore_clamp_at_maximum() {
        let mut unit = fighter(100);
        unit.heal(1_000);
        assert_eq!(unit.stats().hp, 120);

        assert!(unit.consume_mp(20));
        unit.restore_mp(1_000);
        assert_eq!(unit.stats().mp, unit.stats().maxmp);
    }

    #[test]
    fn consume_mp_rejects_overdraw_without_change() {
        let mut unit = fighter(100);
        assert!(!unit.consume_mp(51));
        assert_eq!(unit.stats().mp, 50);
        assert!(unit.consume_mp(50));
        assert_eq!(unit.stats().mp, 0);
    }

    #[test]
    fn construction_and_set_stats_clamp_current_values() {
        let unit = Combatant::new(
            CombatantId(2),
            "overfull",
            Faction::Enemy,
            Position::ORIGIN,
            Stats {
                hp: 500,
                maxhp: 100,
                mp: 90,
                maxmp: 40,
                ..Stats::default()
            },
        );
        assert_eq!(unit.stats().hp, 100);
        assert_eq!(unit.stats().mp, 40);

        let mut unit = unit;
        unit.set_stats(Stats {
            hp: 80,
            maxhp: 60,
            ..*unit.stats()
        });
        assert_eq!(unit.stats().hp, 60);
    }

    #[test]
    fn status_reports_side_label() {
        let unit = fighter(42);
        let status = unit.status();
        assert_eq!(status.side, "ally");
        assert_eq!(status.hp, 42);
        assert!(status.to_string().starts_with("[ally] hp 42/120"));
    }
}
