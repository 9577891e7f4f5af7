// Copyright 2025 the Quadgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive grid types and limits shared across the crate.

/// Maximum width or height of a managed region.
///
/// Both sides must fit in the 29-bit bucket fields of a [`NodeId`](crate::NodeId).
pub const MAX_SIDE: i32 = (1 << 29) - 1;

/// Maximum depth a tree can reach.
///
/// Every split at least halves one side, so a region within [`MAX_SIDE`]
/// bottoms out at single cells no deeper than this.
pub const MAX_DEPTH: u8 = 29;

/// Inclusive rectangle of grid cells.
///
/// `x` addresses rows and `y` addresses columns:
///
/// ```text
///     (x1,y1) +---------------+
///             |               |
///             +---------------+ (x2,y2)
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Upper-left row.
    pub x1: i32,
    /// Upper-left column.
    pub y1: i32,
    /// Lower-right row (inclusive).
    pub x2: i32,
    /// Lower-right column (inclusive).
    pub y2: i32,
}

impl Rect {
    /// Create a rectangle from its inclusive corners.
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Number of columns covered.
    pub const fn width(&self) -> i32 {
        self.y2 - self.y1 + 1
    }

    /// Number of rows covered.
    pub const fn height(&self) -> i32 {
        self.x2 - self.x1 + 1
    }

    /// Whether this rectangle covers exactly one cell.
    pub const fn is_single_cell(&self) -> bool {
        self.x1 == self.x2 && self.y1 == self.y2
    }

    /// Whether the cell `(x, y)` lies inside this rectangle.
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    /// Closed-interval AABB overlap test.
    pub const fn overlaps(&self, other: Rect) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }

    /// Decompose into the four quadrants around the midpoint `(x3, y3)`:
    ///
    /// ```text
    ///     y1    y3       y2
    ///  x1 -+------+------+-
    ///      |  0   |  1   |
    ///  x3  |    * |      |
    ///     -+------+------+-
    ///      |  2   |  3   |
    ///  x2 -+------+------+-
    /// ```
    ///
    /// On odd side lengths the upper/left halves are the larger ones. A
    /// quadrant whose rectangle would be empty is `None`, which happens on
    /// degenerate axes (a single-row or single-column rectangle).
    pub(crate) fn quadrants(&self) -> [Option<Rect>; 4] {
        let x3 = self.x1 + (self.x2 - self.x1) / 2;
        let y3 = self.y1 + (self.y2 - self.y1) / 2;
        [
            Rect::new(self.x1, self.y1, x3, y3),
            Rect::new(self.x1, y3 + 1, x3, self.y2),
            Rect::new(x3 + 1, self.y1, self.x2, y3),
            Rect::new(x3 + 1, y3 + 1, self.x2, self.y2),
        ]
        .map(|q| (q.x1 <= q.x2 && q.y1 <= q.y2).then_some(q))
    }
}

/// One of the eight planar directions used by neighbour queries.
///
/// The discriminants are fixed; the opposite of a cardinal direction is its
/// code XOR 2.
///
/// ```text
///    4 | 0(N) | 5
///   ---+------+---
///   3(W)|     | 1(E)
///   ---+------+---
///    7 | 2(S) | 6
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards smaller rows.
    North = 0,
    /// Towards larger columns.
    East = 1,
    /// Towards larger rows.
    South = 2,
    /// Towards smaller columns.
    West = 3,
    /// The corner shared by north and west.
    NorthWest = 4,
    /// The corner shared by north and east.
    NorthEast = 5,
    /// The corner shared by south and east.
    SouthEast = 6,
    /// The corner shared by south and west.
    SouthWest = 7,
}

impl Direction {
    /// Whether this is one of the four edge directions.
    pub const fn is_cardinal(self) -> bool {
        (self as u8) < 4
    }

    /// The direction pointing the opposite way.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
            Direction::NorthEast => Direction::SouthWest,
            Direction::SouthEast => Direction::NorthWest,
            Direction::SouthWest => Direction::NorthEast,
        }
    }
}

/// A stored object: a cell position plus the caller's tag.
///
/// Equality and hashing are componentwise, so two distinct tags at the same
/// cell are distinct entries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectEntry<P> {
    /// Row of the cell holding the object.
    pub x: i32,
    /// Column of the cell holding the object.
    pub y: i32,
    /// Caller-supplied tag.
    pub tag: P,
}
