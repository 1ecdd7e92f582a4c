//! Tile palette: label and colours per level.
//!
//! A theme is what the terminal front end calls its "models". Once loaded it
//! is handed to the controller as a [`ModelCatalog`] through [`ThemeCatalog`].

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::ModelCatalog;
use crate::fb::{Rgb, Style};
use crate::types::{Level, VisualHandle, EMPTY_LEVEL, MAX_LEVEL};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileStyle {
    pub label: String,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl TileStyle {
    fn new(label: &str, fg: Rgb, bg: Rgb) -> Self {
        Self {
            label: label.to_string(),
            fg,
            bg,
        }
    }

    pub fn style(&self) -> Style {
        Style::new(self.fg, self.bg).bold()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileTheme {
    /// Entry `i` styles level `i + 1`. Levels past the end have no model.
    pub tiles: Vec<TileStyle>,
    pub board: Rgb,
    pub empty: Rgb,
    pub frame: Rgb,
    /// Draw the ambient traffic around the board.
    pub decorations: bool,
}

impl Default for TileTheme {
    fn default() -> Self {
        let ink = Rgb::new(20, 20, 28);
        let paper = Rgb::new(245, 245, 235);
        Self {
            tiles: vec![
                TileStyle::new("tent", ink, Rgb::new(200, 190, 160)),
                TileStyle::new("hut", ink, Rgb::new(190, 160, 110)),
                TileStyle::new("house", ink, Rgb::new(230, 150, 90)),
                TileStyle::new("shop", ink, Rgb::new(240, 110, 80)),
                TileStyle::new("inn", paper, Rgb::new(200, 70, 70)),
                TileStyle::new("hall", paper, Rgb::new(150, 80, 170)),
                TileStyle::new("tower", paper, Rgb::new(80, 100, 200)),
                TileStyle::new("fort", ink, Rgb::new(80, 190, 200)),
                TileStyle::new("city", ink, Rgb::new(250, 210, 60)),
            ],
            board: Rgb::new(28, 30, 38),
            empty: Rgb::new(70, 74, 86),
            frame: Rgb::new(190, 190, 200),
            decorations: true,
        }
    }
}

impl TileTheme {
    /// Parse and check a theme document.
    pub fn from_json(text: &str) -> Result<Self> {
        let theme: TileTheme = serde_json::from_str(text).context("invalid theme json")?;
        theme.check()?;
        Ok(theme)
    }

    fn check(&self) -> Result<()> {
        if self.tiles.is_empty() {
            bail!("theme defines no tiles");
        }
        if self.tiles.len() > MAX_LEVEL as usize {
            bail!(
                "theme defines {} tiles, at most {} levels exist",
                self.tiles.len(),
                MAX_LEVEL
            );
        }
        if let Some(i) = self.tiles.iter().position(|t| t.label.trim().is_empty()) {
            bail!("tile for level {} has an empty label", i + 1);
        }
        Ok(())
    }

    pub fn tile(&self, level: Level) -> Option<&TileStyle> {
        if level == EMPTY_LEVEL {
            return None;
        }
        self.tiles.get(level as usize - 1)
    }

    /// Style behind a handle previously issued by [`ThemeCatalog`].
    pub fn resolve(&self, handle: VisualHandle) -> Option<&TileStyle> {
        u8::try_from(handle.0).ok().and_then(|level| self.tile(level))
    }

    pub fn board_style(&self) -> Style {
        Style::new(self.empty, self.board)
    }

    pub fn frame_style(&self) -> Style {
        Style::new(self.frame, Rgb::BLACK)
    }
}

/// Shared theme exposed to the controller as its model catalog.
#[derive(Debug, Clone)]
pub struct ThemeCatalog(pub Arc<TileTheme>);

impl ModelCatalog for ThemeCatalog {
    fn model_by_level(&self, level: Level) -> Option<VisualHandle> {
        self.0.tile(level).map(|_| VisualHandle(level as u32))
    }
}
