//! Core types module - shared data structures and constants
//!
//! Plain data shared by the game core, the input layer and the terminal
//! front end. Nothing in here owns state or performs I/O.
//!
//! # Levels
//!
//! Tiles carry a level in `1..=MAX_LEVEL`. Level `0` is the empty sentinel and
//! never appears on a live tile. Merging two tiles of level `n` yields one tile
//! of level `n + 1`; tiles already at `MAX_LEVEL` do not merge.
//!
//! | Level | Points |
//! |-------|--------|
//! | 1 | 5 |
//! | 2 | 10 |
//! | 3 | 20 |
//! | 4 | 35 |
//! | 5 | 55 |
//! | 6 | 80 |
//! | 7 | 110 |
//! | 8 | 145 |
//! | 9 | 200 |
//!
//! # Examples
//!
//! ```
//! use tile_merge_types::{base_points, CellPos, Direction};
//!
//! assert_eq!(Direction::from_str("left"), Some(Direction::Left));
//! assert_eq!(Direction::Up.opposite(), Direction::Down);
//!
//! let pos = CellPos::new(1, 2);
//! assert_eq!(pos.index(4), 6);
//!
//! assert_eq!(base_points(2), Some(10));
//! assert_eq!(base_points(0), None);
//! ```

use serde::{Deserialize, Serialize};

/// Tile level. `0` means "no tile".
pub type Level = u8;

/// Empty-cell sentinel level.
pub const EMPTY_LEVEL: Level = 0;

/// Highest level a tile can reach.
pub const MAX_LEVEL: Level = 9;

/// Base points awarded for producing a tile of level `index + 1`.
pub const SCORE_TABLE: [u32; MAX_LEVEL as usize] = [5, 10, 20, 35, 55, 80, 110, 145, 200];

/// Default board width in cells.
pub const DEFAULT_BOARD_WIDTH: u16 = 10;

/// Default board height in cells.
pub const DEFAULT_BOARD_HEIGHT: u16 = 10;

/// Largest board side accepted by `create_game`.
pub const MAX_BOARD_SIDE: u16 = 256;

/// Largest cell count (`width * height`) accepted by `create_game`.
pub const MAX_BOARD_CELLS: usize = 16_384;

/// Default session length in seconds.
pub const DEFAULT_GAME_TIME_SECS: u32 = 60;

/// Default number of tiles placed when a board is created.
pub const DEFAULT_SEED_TILES: u16 = 2;

/// Default chance (percent) that a spawned tile starts at level 2.
pub const DEFAULT_LEVEL_TWO_PERCENT: u8 = 10;

/// Default combo multiplier increment per merging move.
pub const DEFAULT_COMBO_STEP: f64 = 0.5;

/// Combo multiplier at the start of a session and after a non-merging move.
pub const BASE_COMBO: f64 = 1.0;

/// Storage key holding the persisted high score.
pub const HIGHSCORE_KEY: &str = "highscore";

/// Frame interval of the terminal loop in milliseconds (~60 FPS).
pub const FRAME_MS: u32 = 16;

/// Look up the base points for a resulting level.
///
/// Returns `None` outside `1..=MAX_LEVEL`.
pub fn base_points(level: Level) -> Option<u32> {
    if level == EMPTY_LEVEL || level > MAX_LEVEL {
        return None;
    }
    Some(SCORE_TABLE[(level - 1) as usize])
}

/// Slide direction of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parse direction from string (case-insensitive)
    ///
    /// Accepts full names or single letters: "up" | "u", "down" | "d",
    /// "left" | "l", "right" | "r".
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Whether tiles travel along a column (vertical moves).
    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// A cell coordinate: `row` counts from the top, `col` from the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPos {
    pub row: u16,
    pub col: u16,
}

impl CellPos {
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    /// Row-major flat index for a grid `width` cells wide.
    #[inline(always)]
    pub fn index(&self, width: u16) -> usize {
        (self.row as usize) * (width as usize) + (self.col as usize)
    }

    /// Inverse of [`CellPos::index`].
    #[inline(always)]
    pub fn from_index(index: usize, width: u16) -> Self {
        let width = width as usize;
        Self {
            row: (index / width) as u16,
            col: (index % width) as u16,
        }
    }
}

/// Identity of a tile, unique within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

/// Opaque visual handle handed out by the presentation layer's model catalog.
///
/// The core never inspects or mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualHandle(pub u32);
