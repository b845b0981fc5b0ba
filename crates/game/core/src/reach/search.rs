use std::collections::{HashMap, HashSet, VecDeque};

use super::RangeSet;
use crate::state::{BattleState, Combatant, Grid, Position};

/// Cells `combatant` can move to this turn, bounded by its `mv` stat.
///
/// The origin is included at distance 0 as a highlight marker; callers must
/// not treat it as a destination. A neighbour is expanded only if it lies on
/// the grid, was not visited yet, and no other combatant stands on it.
pub fn movement_range(combatant: &Combatant, state: &BattleState) -> RangeSet {
    let mut range = RangeSet::new();
    for (position, distance) in bounded_search(combatant, state).distances {
        range.insert(position, distance);
    }
    range
}

/// Attack reach of `combatant` from its current cell.
pub fn attack_range(combatant: &Combatant, grid: &Grid) -> RangeSet {
    attack_range_from(combatant.position, combatant.stats().range, grid)
}

/// Cells within `range` steps of `origin`, excluding the origin itself.
///
/// Occupancy is deliberately ignored: attack reach is a pure diamond clipped
/// to the grid. Because the origin is an explicit parameter, the AI can check
/// hypothetical positions without relocating anyone.
pub fn attack_range_from(origin: Position, range: u32, grid: &Grid) -> RangeSet {
    let mut result = RangeSet::new();
    let mut queue = VecDeque::from([(origin, 0u32)]);
    let mut visited = HashSet::from([origin]);

    while let Some((current, distance)) = queue.pop_front() {
        if distance > 0 {
            result.insert(current, distance);
        }
        if distance >= range {
            continue;
        }
        for next in current.neighbors() {
            if grid.contains(next) && visited.insert(next) {
                queue.push_back((next, distance + 1));
            }
        }
    }

    result
}

/// Step-by-step route from `combatant`'s cell to `destination`, origin excluded.
///
/// Follows the same occupancy-blocked search as [`movement_range`], so the
/// route never crosses another combatant. Empty when the destination is the
/// origin or not reachable this turn.
pub fn movement_path(
    combatant: &Combatant,
    state: &BattleState,
    destination: Position,
) -> Vec<Position> {
    let search = bounded_search(combatant, state);
    if !search.distances.contains_key(&destination) {
        return Vec::new();
    }

    let mut path = Vec::new();
    let mut cursor = destination;
    while cursor != combatant.position {
        path.push(cursor);
        match search.parents.get(&cursor) {
            Some(&parent) => cursor = parent,
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}

struct Search {
    distances: HashMap<Position, u32>,
    parents: HashMap<Position, Position>,
}

fn bounded_search(combatant: &Combatant, state: &BattleState) -> Search {
    let origin = combatant.position;
    let limit = combatant.stats().mv;
    let grid = state.grid();

    let mut distances = HashMap::from([(origin, 0u32)]);
    let mut parents = HashMap::new();
    let mut queue = VecDeque::from([(origin, 0u32)]);

    while let Some((current, distance)) = queue.pop_front() {
        if distance >= limit {
            continue;
        }
        for next in current.neighbors() {
            if !grid.contains(next) || distances.contains_key(&next) {
                continue;
            }
            if state.is_occupied_by_other(next, combatant.id) {
                continue;
            }
            distances.insert(next, distance + 1);
            parents.insert(next, current);
            queue.push_back((next, distance + 1));
        }
    }

    Search { distances, parents }
}
