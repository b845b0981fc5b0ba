use crate::state::Grid;

/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Grid column count.
    pub grid_width: u32,
    /// Grid row count.
    pub grid_height: u32,
    /// Numerator of the wait-time formula `speed_base / spd`.
    pub speed_base: f64,
    /// MP cost of each stubbed skill slot.
    pub skill_mp_costs: [u32; BattleConfig::SKILL_SLOTS],
}

impl BattleConfig {
    pub const SKILL_SLOTS: usize = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_GRID_WIDTH: u32 = 12;
    pub const DEFAULT_GRID_HEIGHT: u32 = 8;
    pub const DEFAULT_SPEED_BASE: f64 = 10_000.0;

    pub fn new() -> Self {
        Self {
            grid_width: Self::DEFAULT_GRID_WIDTH,
            grid_height: Self::DEFAULT_GRID_HEIGHT,
            speed_base: Self::DEFAULT_SPEED_BASE,
            skill_mp_costs: [0; Self::SKILL_SLOTS],
        }
    }

    pub fn with_grid(mut self, width: u32, height: u32) -> Self {
        self.grid_width = width;
        self.grid_height = height;
        self
    }

    pub fn with_skill_mp_costs(mut self, costs: [u32; Self::SKILL_SLOTS]) -> Self {
        self.skill_mp_costs = costs;
        self
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_width, self.grid_height)
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
