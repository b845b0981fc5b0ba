//! Authoritative battle state representation.
//!
//! [`BattleState`] owns the grid bounds and the full combatant set. Occupancy
//! is derived from combatant positions rather than stored separately, so a
//! position change is the only thing needed to move a combatant.
pub mod error;
pub mod types;

pub use error::SetupError;
pub use types::{
    CardinalDirection, Combatant, CombatantId, Faction, Grid, Position, Stats, StatusInfo,
};

/// Grid plus every combatant that entered the battle, dead or alive.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    grid: Grid,
    combatants: Vec<Combatant>,
}

impl BattleState {
    pub fn new(grid: Grid) -> Result<Self, SetupError> {
        if grid.width() == 0 || grid.height() == 0 {
            return Err(SetupError::EmptyGrid {
                width: grid.width(),
                height: grid.height(),
            });
        }
        Ok(Self {
            grid,
            combatants: Vec::new(),
        })
    }

    /// Builds a state from a full roster, validating each placement in order.
    pub fn with_combatants(
        grid: Grid,
        combatants: impl IntoIterator<Item = Combatant>,
    ) -> Result<Self, SetupError> {
        let mut state = Self::new(grid)?;
        for combatant in combatants {
            state.add_combatant(combatant)?;
        }
        Ok(state)
    }

    /// Registers a combatant at battle setup.
    pub fn add_combatant(&mut self, combatant: Combatant) -> Result<(), SetupError> {
        let id = combatant.id;
        let position = combatant.position;

        if self.combatant(id).is_some() {
            return Err(SetupError::DuplicateId { id });
        }
        if !self.grid.contains(position) {
            return Err(SetupError::OutOfBounds { id, position });
        }
        if let Some(occupant) = self.occupant_at(position) {
            return Err(SetupError::PositionOccupied {
                id,
                position,
                occupant: occupant.id,
            });
        }
        if combatant.stats().spd == 0 {
            return Err(SetupError::ZeroSpeed { id });
        }

        self.combatants.push(combatant);
        Ok(())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// All combatants in registration order.
    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub(crate) fn combatants_mut(&mut self) -> &mut [Combatant] {
        &mut self.combatants
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    /// Combatant standing on `position`, alive or dead.
    pub fn occupant_at(&self, position: Position) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.position == position)
    }

    /// Returns true when a combatant other than `except` stands on `position`.
    pub fn is_occupied_by_other(&self, position: Position, except: CombatantId) -> bool {
        self.combatants
            .iter()
            .any(|c| c.id != except && c.position == position)
    }

    pub fn living(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(|c| c.is_alive())
    }

    pub fn living_in(&self, faction: Faction) -> impl Iterator<Item = &Combatant> {
        self.living().filter(move |c| c.faction == faction)
    }

    /// Moves a combatant without any legality check. Callers validate first.
    pub(crate) fn relocate(&mut self, id: CombatantId, to: Position) -> Option<Position> {
        let combatant = self.combatant_mut(id)?;
        let from = combatant.position;
        combatant.position = to;
        Some(from)
    }
}
