//! Battle setups: grid size and the roster placed on it.
//!
//! Scenarios carry plain placement data only. Combatants are created from
//! them when a session starts, so the same scenario can be replayed under
//! different [`BattleConfig`]s.

use tactics_core::{
    BattleConfig, BattleSession, Combatant, CombatantId, Faction, Grid, Position, SetupError,
    Stats,
};

/// Grid dimensions as written in scenario files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSpec {
    pub width: u32,
    pub height: u32,
}

impl From<GridSpec> for Grid {
    fn from(spec: GridSpec) -> Self {
        Grid::new(spec.width, spec.height)
    }
}

/// One combatant placement. Omitted stats fall back to [`Stats::default`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSpec {
    pub id: u32,
    pub name: String,
    pub faction: Faction,
    pub position: Position,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: Stats,
}

impl CombatantSpec {
    pub fn to_combatant(&self) -> Combatant {
        Combatant::new(
            CombatantId(self.id),
            self.name.clone(),
            self.faction,
            self.position,
            self.stats,
        )
    }
}

/// Complete battle setup.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenario {
    pub name: String,
    /// Overrides the grid of the battle config when present.
    #[cfg_attr(feature = "serde", serde(default))]
    pub grid: Option<GridSpec>,
    pub combatants: Vec<CombatantSpec>,
}

impl Scenario {
    /// Default three-unit skirmish on a 12x8 field: a hero and an ally against
    /// a single enemy.
    pub fn skirmish() -> Self {
        let hero = Stats {
            hp: 120,
            maxhp: 120,
            mp: 60,
            maxmp: 60,
            str: 28,
            def: 12,
            mstr: 14,
            mdef: 10,
            spd: 100,
            mv: 3,
            range: 1,
        };
        Self {
            name: "skirmish".to_string(),
            grid: Some(GridSpec {
                width: BattleConfig::DEFAULT_GRID_WIDTH,
                height: BattleConfig::DEFAULT_GRID_HEIGHT,
            }),
            combatants: vec![
                CombatantSpec {
                    id: 1,
                    name: "Hero".to_string(),
                    faction: Faction::Ally,
                    position: Position::new(6, 4),
                    stats: hero,
                },
                CombatantSpec {
                    id: 2,
                    name: "Ally".to_string(),
                    faction: Faction::Ally,
                    position: Position::new(5, 4),
                    stats: Stats { spd: 90, ..hero },
                },
                CombatantSpec {
                    id: 3,
                    name: "Enemy".to_string(),
                    faction: Faction::Enemy,
                    position: Position::new(8, 5),
                    stats: Stats {
                        hp: 100,
                        maxhp: 100,
                        mp: 40,
                        maxmp: 40,
                        str: 16,
                        def: 8,
                        mstr: 10,
                        mdef: 6,
                        spd: 80,
                        mv: 2,
                        range: 1,
                    },
                },
            ],
        }
    }

    /// Battle config with this scenario's grid applied.
    pub fn apply_to(&self, config: &BattleConfig) -> BattleConfig {
        match self.grid {
            Some(grid) => config.clone().with_grid(grid.width, grid.height),
            None => config.clone(),
        }
    }

    /// Places the roster and starts the first turn.
    pub fn start(&self, config: &BattleConfig) -> Result<BattleSession, SetupError> {
        tracing::info!(
            scenario = %self.name,
            combatants = self.combatants.len(),
            "starting battle"
        );
        BattleSession::new(
            self.apply_to(config),
            self.combatants.iter().map(CombatantSpec::to_combatant),
        )
    }
}
