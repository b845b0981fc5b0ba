//! Plain-text battle summary.
use std::fmt::Write;

use tactics_core::{BattleOutcome, Combatant};

/// One roster line: name, side, cell and remaining hp/mp.
pub fn roster_line(combatant: &Combatant) -> String {
    let status = combatant.status();
    let mut line = format!(
        "{:<10} {:<6} {} hp {}/{} mp {}/{}",
        combatant.name,
        status.side,
        combatant.position,
        status.hp,
        status.maxhp,
        status.mp,
        status.maxmp,
    );
    if !combatant.is_alive() {
        line.push_str(" (defeated)");
    }
    line
}

pub fn summary(outcome: BattleOutcome, turns: u64, roster: &[Combatant]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "outcome: {outcome} after {turns} turns");
    for combatant in roster {
        let _ = writeln!(out, "  {}", roster_line(combatant));
    }
    out
}

#[cfg(test)]
mod tests {
    use tactics_core::{CombatantId, Faction, Position, Stats};

    use super::*;

    #[test]
    fn summary_lists_every_combatant() {
        let hero = Combatant::new(
            CombatantId(1),
            "Hero",
            Faction::Ally,
            Position::new(6, 4),
            Stats::default(),
        );
        let mut enemy = Combatant::new(
            CombatantId(3),
            "Enemy",
            Faction::Enemy,
            Position::new(7, 4),
            Stats::default(),
        );
        enemy.take_damage(500);

        let text = summary(BattleOutcome::Victory, 12, &[hero, enemy]);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "outcome: victory after 12 turns");
        assert!(lines[1].contains("Hero"));
        assert!(lines[1].contains("hp 100/100"));
        assert!(lines[2].ends_with("(defeated)"));
    }
}
