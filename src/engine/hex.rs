//! Offset hexagonal coordinates.
//!
//! Columns are flat-topped and odd columns sit half a cell lower than even
//! columns, so the six neighbor offsets depend on the parity of `x`.

use serde::{Deserialize, Serialize};

/// Horizontal distance between adjacent column centers, in pixels.
pub const COLUMN_PITCH: i32 = 70;
/// Vertical distance between adjacent row centers, in pixels.
pub const ROW_PITCH: i32 = 64;

/// Neighbor offsets for even columns, indexed by `Direction::index()`.
const EVEN_COLUMN_OFFSETS: [(i32, i32); 6] = [
    (0, -1),  // up
    (1, -1),  // up-right
    (1, 0),   // down-right
    (0, 1),   // down
    (-1, 0),  // down-left
    (-1, -1), // up-left
];

/// Neighbor offsets for odd columns, indexed by `Direction::index()`.
const ODD_COLUMN_OFFSETS: [(i32, i32); 6] = [
    (0, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    UpRight,
    DownRight,
    Down,
    DownLeft,
    UpLeft,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Up,
        Direction::UpRight,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::UpLeft,
    ];

    /// Panics on indices outside 0..6.
    pub fn from_index(index: usize) -> Self {
        assert!(index < 6, "invalid direction index: {index}");
        Self::ALL[index]
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> Self {
        Self::ALL[(self.index() + 3) % 6]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn neighbor(self, direction: Direction) -> Self {
        let offsets = if self.x & 1 == 0 {
            &EVEN_COLUMN_OFFSETS
        } else {
            &ODD_COLUMN_OFFSETS
        };
        let (dx, dy) = offsets[direction.index()];
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn neighbors(self) -> [Coord; 6] {
        Direction::ALL.map(|d| self.neighbor(d))
    }

    pub fn is_adjacent(self, other: Coord) -> bool {
        self.neighbors().contains(&other)
    }

    /// Pixel offset of this cell's center relative to the center of (0,0).
    pub fn screen_position(self) -> (i32, i32) {
        let shift = if self.x & 1 == 0 { 0 } else { ROW_PITCH / 2 };
        (self.x * COLUMN_PITCH, self.y * ROW_PITCH + shift)
    }

    /// Pack into a single map key. Both halves keep their bit patterns, so
    /// distinct coordinates never collide.
    #[inline]
    pub fn pack(self) -> u64 {
        ((self.x as u32 as u64) << 32) | (self.y as u32 as u64)
    }

    pub fn unpack(key: u64) -> Self {
        Self::new((key >> 32) as u32 as i32, key as u32 as i32)
    }

    /// True when this cell lies beyond the viewport centered on `origin`.
    pub fn outside_view(self, origin: Coord, half_columns: i32, half_rows: i32) -> bool {
        (self.x - origin.x).abs() > half_columns || (self.y - origin.y).abs() > half_rows
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
