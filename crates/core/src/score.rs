//! Scoring module - merge points, combo multiplier and the high score
//!
//! Points come from a fixed per-level table (see [`crate::types::SCORE_TABLE`]).
//! The combo multiplier scales every merge of a move and is truncated back to
//! integer points. The high score is read from and written to an injected
//! [`HighScoreStore`].

use arrayvec::ArrayVec;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::storage::HighScoreStore;
use crate::types::{base_points, Level, BASE_COMBO, DEFAULT_COMBO_STEP};

/// Maximum glyphs in a score popup ("200x12345" and friends).
pub const POPUP_CAPACITY: usize = 16;

/// Floating score text shown where a merge happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorePopup {
    /// Table points of the merge (before the multiplier).
    pub base: u32,
    /// Integer part of the multiplier, only when it exceeds 1.0.
    pub combo: Option<u32>,
    /// Text to draw: base digits, then `x` and the combo digits.
    pub glyphs: ArrayVec<char, POPUP_CAPACITY>,
}

impl ScorePopup {
    fn new(base: u32, multiplier: f64) -> Self {
        let combo = (multiplier > BASE_COMBO).then(|| multiplier.trunc() as u32);

        let mut glyphs = ArrayVec::new();
        push_digits(base, &mut glyphs);
        if let Some(combo) = combo {
            let _ = glyphs.try_push('x');
            push_digits(combo, &mut glyphs);
        }

        Self {
            base,
            combo,
            glyphs,
        }
    }

    pub fn text(&self) -> String {
        self.glyphs.iter().collect()
    }
}

fn push_digits(value: u32, glyphs: &mut ArrayVec<char, POPUP_CAPACITY>) {
    for ch in value.to_string().chars() {
        let _ = glyphs.try_push(ch);
    }
}

/// Outcome of a single recorded merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreAward {
    /// Points actually added to the score.
    pub points: u64,
    pub popup: ScorePopup,
}

/// Score, combo multiplier and high score of a player.
pub struct ScoreLedger {
    score: u64,
    high_score: u64,
    combo: f64,
    combo_step: f64,
    store: Box<dyn HighScoreStore>,
}

impl std::fmt::Debug for ScoreLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreLedger")
            .field("score", &self.score)
            .field("high_score", &self.high_score)
            .field("combo", &self.combo)
            .field("combo_step", &self.combo_step)
            .finish_non_exhaustive()
    }
}

impl ScoreLedger {
    /// Create a ledger with the default combo step, loading the stored high score.
    pub fn new(store: Box<dyn HighScoreStore>) -> Self {
        Self::with_combo_step(store, DEFAULT_COMBO_STEP)
    }

    /// A step that is not a positive number falls back to the default, so
    /// the multiplier always grows after a merging move.
    pub fn with_combo_step(mut store: Box<dyn HighScoreStore>, combo_step: f64) -> Self {
        let combo_step = if combo_step.is_finite() && combo_step > 0.0 {
            combo_step
        } else {
            warn!(combo_step, "combo step must be positive, using the default");
            DEFAULT_COMBO_STEP
        };
        let high_score = match store.get() {
            Ok(Some(value)) => value,
            Ok(None) => {
                // First run: seed the store so later reads find a value.
                if let Err(err) = store.set(0) {
                    warn!(error = %err, "failed to initialise high score storage");
                }
                0
            }
            Err(err) => {
                warn!(error = %err, "failed to read high score, starting from 0");
                0
            }
        };

        Self {
            score: 0,
            high_score,
            combo: BASE_COMBO,
            combo_step,
            store,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn combo(&self) -> f64 {
        self.combo
    }

    pub fn combo_step(&self) -> f64 {
        self.combo_step
    }

    /// Start of a session: score back to 0, combo back to 1.0.
    pub fn reset(&mut self) {
        self.score = 0;
        self.combo = BASE_COMBO;
    }

    /// Award the points for a merge that produced `level`.
    pub fn record_merge(&mut self, level: Level, multiplier: f64) -> Result<ScoreAward, CoreError> {
        let base = base_points(level).ok_or(CoreError::InvalidLevel(level))?;
        let multiplier = multiplier.max(0.0);
        let points = (base as f64 * multiplier).trunc() as u64;

        self.score = self.score.saturating_add(points);
        debug!(level, multiplier, points, score = self.score, "merge scored");

        Ok(ScoreAward {
            points,
            popup: ScorePopup::new(base, multiplier),
        })
    }

    /// Called after a move with at least one merge.
    pub fn bump_combo(&mut self) {
        self.combo += self.combo_step;
    }

    /// Called after a move without merges.
    pub fn reset_combo(&mut self) {
        self.combo = BASE_COMBO;
    }

    /// Persist the score if it beats the high score. Returns whether it did.
    pub fn commit(&mut self) -> bool {
        if self.score <= self.high_score {
            return false;
        }
        self.high_score = self.score;
        if let Err(err) = self.store.set(self.high_score) {
            warn!(error = %err, high_score = self.high_score, "failed to persist high score");
        } else {
            info!(high_score = self.high_score, "new high score");
        }
        true
    }
}
