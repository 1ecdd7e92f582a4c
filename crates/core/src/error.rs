//! Error types for the game core.

use thiserror::Error;

use crate::types::Level;

/// Failures raised by grid, ledger and controller operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// `create_game` / `create_map` called with a non-positive dimension.
    #[error("invalid board dimensions {width}x{height}: both must be positive")]
    InvalidDimension { width: i64, height: i64 },
    /// Positive dimensions past `MAX_BOARD_SIDE` or `MAX_BOARD_CELLS`.
    #[error("board {width}x{height} is too large (at most {max_side} per side, {max_cells} cells)")]
    DimensionTooLarge {
        width: i64,
        height: i64,
        max_side: u16,
        max_cells: usize,
    },
    /// Score lookup outside the score table. Indicates a broken grid invariant.
    #[error("tile level {0} is outside the score table")]
    InvalidLevel(Level),
    /// No empty cell was left for a spawn.
    #[error("no empty cell left to spawn a tile")]
    BoardFull,
}

/// Failures of the persistent high-score store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("high score storage I/O failed")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("high score storage is not valid JSON")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("stored high score {0:?} is not an integer")]
    Corrupt(String),
}
