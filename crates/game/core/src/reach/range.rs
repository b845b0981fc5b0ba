use std::collections::BTreeMap;

use crate::state::Position;

/// Cell reached by a search together with its step distance from the origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeCell {
    pub position: Position,
    pub distance: u32,
}

/// Result of a reachability query, keyed by cell.
///
/// Membership by position is the contract; iteration is row-major.
/// Serialized as a list of [`RangeCell`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(into = "Vec<RangeCell>", from = "Vec<RangeCell>")
)]
pub struct RangeSet {
    cells: BTreeMap<Position, u32>,
}

impl RangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a cell. The first distance recorded for a position wins.
    pub(crate) fn insert(&mut self, position: Position, distance: u32) {
        self.cells.entry(position).or_insert(distance);
    }

    pub fn contains(&self, position: Position) -> bool {
        self.cells.contains_key(&position)
    }

    pub fn distance(&self, position: Position) -> Option<u32> {
        self.cells.get(&position).copied()
    }

    /// Returns true if `position` is part of the set at a non-zero distance.
    ///
    /// The origin marker of a movement range is visible but never a legal target.
    pub fn is_target(&self, position: Position) -> bool {
        matches!(self.distance(position), Some(d) if d > 0)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells, including any distance-0 origin marker, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = RangeCell> + '_ {
        self.cells
            .iter()
            .map(|(&position, &distance)| RangeCell { position, distance })
    }

    /// Cells at distance >= 1 in row-major order.
    pub fn targets(&self) -> impl Iterator<Item = RangeCell> + '_ {
        self.iter().filter(|cell| cell.distance > 0)
    }
}

impl From<RangeSet> for Vec<RangeCell> {
    fn from(set: RangeSet) -> Self {
        set.iter().collect()
    }
}

impl From<Vec<RangeCell>> for RangeSet {
    fn from(cells: Vec<RangeCell>) -> Self {
        cells.into_iter().collect()
    }
}

impl FromIterator<RangeCell> for RangeSet {
    fn from_iter<I: IntoIterator<Item = RangeCell>>(iter: I) -> Self {
        let mut set = RangeSet::new();
        for cell in iter {
            set.insert(cell.position, cell.distance);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_cells_in_row_major_order() {
        let set: RangeSet = [
            RangeCell {
                position: Position::new(1, 1),
                distance: 0,
            },
            RangeCell {
                position: Position::new(2, 1),
                distance: 1,
            },
            RangeCell {
                position: Position::new(1, 0),
                distance: 1,
            },
        ]
        .into_iter()
        .collect();

        let cells: Vec<RangeCell> = set.clone().into();
        let positions: Vec<_> = cells.iter().map(|cell| cell.position).collect();
        assert_eq!(
            positions,
            vec![Position::new(1, 0), Position::new(1, 1), Position::new(2, 1)]
        );
        assert_eq!(RangeSet::from(cells), set);
    }
}
