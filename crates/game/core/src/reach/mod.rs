//! Reachability engine.
//!
//! Pure breadth-first searches over the orthogonal grid:
//! - movement ranges are blocked by every other combatant, alive or dead
//! - attack ranges ignore occupancy and form a diamond around the origin
//!
//! All searches share the 4-directional step metric, so a cell's distance is
//! its Manhattan distance from the origin whenever nothing blocks the way.

mod range;
mod search;

pub use range::{RangeCell, RangeSet};
pub use search::{attack_range, attack_range_from, movement_path, movement_range};
