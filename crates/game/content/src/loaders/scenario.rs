//! Scenario loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::scenario::Scenario;

/// Loader for battle scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load a scenario from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing a `Scenario`
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Scenario> {
        let scenario: Scenario = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;

        if scenario.combatants.is_empty() {
            anyhow::bail!("scenario '{}' has no combatants", scenario.name);
        }

        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use tactics_core::{Faction, Position, Stats};

    use super::*;

    const DUEL: &str = r#"
        Scenario(
            name: "duel",
            combatants: [
                (id: 1, name: "Knight", faction: Ally, position: (x: 0, y: 0)),
                (
                    id: 2,
                    name: "Brute",
                    faction: Enemy,
                    position: (x: 3, y: 2),
                    stats: (str: 30, spd: 7),
                ),
            ],
        )
    "#;

    #[test]
    fn omitted_fields_fall_back_to_defaults() {
        let scenario = ScenarioLoader::parse(DUEL).unwrap();
        assert_eq!(scenario.name, "duel");
        assert_eq!(scenario.grid, None);

        let knight = &scenario.combatants[0];
        assert_eq!(knight.faction, Faction::Ally);
        assert_eq!(knight.stats, Stats::default());

        let brute = &scenario.combatants[1];
        assert_eq!(brute.position, Position::new(3, 2));
        assert_eq!(brute.stats.str, 30);
        assert_eq!(brute.stats.spd, 7);
        assert_eq!(brute.stats.hp, Stats::default().hp);
    }

    #[test]
    fn empty_roster_is_rejected() {
        let err = ScenarioLoader::parse(r#"Scenario(name: "void", combatants: [])"#).unwrap_err();
        assert!(err.to_string().contains("no combatants"));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "Scenario(name: ").unwrap();

        let err = ScenarioLoader::load(&path).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Failed to parse scenario RON"));
        assert!(message.contains("broken.ron"));
    }
}
