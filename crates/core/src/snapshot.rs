use crate::controller::GamePhase;
use crate::events::GameOverReason;
use crate::types::{CellPos, Level, BASE_COMBO, EMPTY_LEVEL};

/// Read-only copy of everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub width: u16,
    pub height: u16,
    /// Row-major levels, `0` for empty cells. Empty when no board exists yet.
    pub levels: Vec<Level>,
    pub score: u64,
    pub high_score: u64,
    pub combo: f64,
    pub time_left: u32,
    pub game_over: Option<GameOverReason>,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.phase = GamePhase::Setup;
        self.width = 0;
        self.height = 0;
        self.levels.clear();
        self.score = 0;
        self.high_score = 0;
        self.combo = BASE_COMBO;
        self.time_left = 0;
        self.game_over = None;
    }

    pub fn level_at(&self, pos: CellPos) -> Level {
        if pos.row >= self.height || pos.col >= self.width {
            return EMPTY_LEVEL;
        }
        self.levels
            .get(pos.index(self.width))
            .copied()
            .unwrap_or(EMPTY_LEVEL)
    }

    pub fn tile_count(&self) -> usize {
        self.levels.iter().filter(|&&l| l != EMPTY_LEVEL).count()
    }

    pub fn playable(&self) -> bool {
        self.phase == GamePhase::Playing
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            phase: GamePhase::Setup,
            width: 0,
            height: 0,
            levels: Vec::new(),
            score: 0,
            high_score: 0,
            combo: BASE_COMBO,
            time_left: 0,
            game_over: None,
        };
        s.clear();
        s
    }
}
