//! Presentation boundary: events the core emits and the model lookup it consumes.
//!
//! The controller queues [`GameEvent`]s while it resolves input and frame
//! ticks; the presentation layer drains them once per frame.

use crate::grid::Tile;
use crate::score::ScorePopup;
use crate::types::{CellPos, Level, TileId, VisualHandle};

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    TimeExpired,
    /// No direction can change the board any more.
    NoMoves,
    /// A post-move spawn found no empty cell.
    BoardFull,
}

impl GameOverReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverReason::TimeExpired => "time expired",
            GameOverReason::NoMoves => "no moves left",
            GameOverReason::BoardFull => "board full",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A new board replaced the previous one; all earlier tiles are gone.
    BoardCreated { width: u16, height: u16 },
    TileSpawned {
        tile: Tile,
        visual: Option<VisualHandle>,
    },
    TileMoved {
        tile: TileId,
        from: CellPos,
        to: CellPos,
    },
    TileMerged {
        survivor: TileId,
        consumed: TileId,
        cell: CellPos,
        level: Level,
        visual: Option<VisualHandle>,
    },
    ScorePopup { cell: CellPos, popup: ScorePopup },
    ScoreChanged(u64),
    HighScoreChanged(u64),
    ComboChanged(f64),
    /// Seconds left on the countdown.
    TimeChanged(u32),
    GameStarted,
    GameOver(GameOverReason),
}

/// Per-level visual lookup supplied by the presentation layer once its assets
/// are loaded.
pub trait ModelCatalog {
    fn model_by_level(&self, level: Level) -> Option<VisualHandle>;
}

/// Catalog that knows no models. Used when asset loading failed.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalog;

impl ModelCatalog for EmptyCatalog {
    fn model_by_level(&self, _level: Level) -> Option<VisualHandle> {
        None
    }
}
