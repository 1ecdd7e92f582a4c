//! Floating score popups.
//!
//! A popup appears over the merge cell, drifts up one row and fades out.
//! Finished popups are dropped on the next update.

use crate::core::ScorePopup;
use crate::types::CellPos;

pub const POPUP_LIFETIME_SECS: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ActivePopup {
    pub cell: CellPos,
    pub text: String,
    pub age: f32,
}

impl ActivePopup {
    /// `0.0` when spawned, `1.0` when done.
    pub fn progress(&self) -> f32 {
        (self.age / POPUP_LIFETIME_SECS).clamp(0.0, 1.0)
    }

    pub fn is_done(&self) -> bool {
        self.age >= POPUP_LIFETIME_SECS
    }

    /// Rows above the cell's centre line.
    pub fn rise(&self) -> u16 {
        if self.progress() >= 0.5 {
            1
        } else {
            0
        }
    }
}

#[derive(Debug, Default)]
pub struct PopupLayer {
    popups: Vec<ActivePopup>,
}

impl PopupLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cell: CellPos, popup: &ScorePopup) {
        self.popups.push(ActivePopup {
            cell,
            text: popup.text(),
            age: 0.0,
        });
    }

    pub fn update(&mut self, delta_secs: f32) {
        if !delta_secs.is_finite() || delta_secs < 0.0 {
            return;
        }
        for popup in &mut self.popups {
            popup.age += delta_secs;
        }
        self.popups.retain(|p| !p.is_done());
    }

    /// Drop everything, e.g. when a new board is created.
    pub fn clear(&mut self) {
        self.popups.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivePopup> {
        self.popups.iter()
    }

    pub fn len(&self) -> usize {
        self.popups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.popups.is_empty()
    }
}
