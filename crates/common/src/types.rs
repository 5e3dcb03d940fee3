use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer code identifying a cell's terrain or feature kind.
///
/// The meaning is assigned by the active profile's tile table; the same id
/// can be a floor in one profile and a wall in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cell position in row/column grid space. Row 0 is the first row of the
/// layout array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    pub row: usize,
    pub col: usize,
}

impl GridCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Coordinate of a flat row-major index.
    pub fn from_index(index: usize, width: usize) -> Self {
        assert!(width > 0, "width must be positive");
        Self {
            row: index / width,
            col: index % width,
        }
    }

    /// Flat row-major index of this coordinate.
    pub fn index(self, width: usize) -> usize {
        self.row * width + self.col
    }

    /// The cell one row further into the layout, if the grid has one.
    pub fn below(self, height: usize) -> Option<Self> {
        (self.row + 1 < height).then(|| Self::new(self.row + 1, self.col))
    }

    /// The cell one row back in the layout, if any.
    pub fn above(self) -> Option<Self> {
        self.row.checked_sub(1).map(|row| Self::new(row, self.col))
    }
}

/// An enemy or decoration placed by the level author.
///
/// Positions are in cell units and may be fractional for sub-cell placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub position: DVec2,
}

impl PlacementInfo {
    pub fn new(kind: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            kind: kind.into(),
            position: DVec2::new(x, y),
        }
    }
}
