pub mod combatant;
pub mod common;
pub mod grid;

pub use combatant::{Combatant, Faction, Stats, StatusInfo};
pub use common::{CardinalDirection, CombatantId, Position};
pub use grid::Grid;
