//! Command line and configuration file handling for the binary.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;

use crate::core::GameConfig;

/// Env var naming the log file. Logging is off when unset.
pub const LOG_ENV: &str = "TILE_MERGE_LOG";

/// Tile Merge - merge tiles into bigger buildings before the clock runs out
#[derive(Parser, Debug, Default)]
#[command(name = "tile-merge")]
#[command(about = "Timed tile-merging puzzle for the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Board width in cells
    #[arg(long)]
    pub width: Option<u16>,

    /// Board height in cells
    #[arg(long)]
    pub height: Option<u16>,

    /// Session length in seconds
    #[arg(short, long)]
    pub time: Option<u32>,

    /// RNG seed for reproducible boards
    #[arg(short, long)]
    pub seed: Option<u32>,

    /// Tile theme (JSON)
    #[arg(long)]
    pub theme: Option<PathBuf>,

    /// Where the high score is kept
    #[arg(long)]
    pub highscore: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// File values (or defaults), then flag overrides, then validation.
    /// A missing seed is filled from the system clock.
    pub fn load_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => GameConfig::default(),
        };
        self.apply_overrides(&mut config);
        if config.rng_seed.is_none() {
            config.rng_seed = Some(time_seed());
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut GameConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(time) = self.time {
            config.game_time_secs = time;
        }
        if let Some(seed) = self.seed {
            config.rng_seed = Some(seed);
        }
        if let Some(theme) = &self.theme {
            config.theme_path = Some(theme.clone());
        }
        if let Some(path) = &self.highscore {
            config.highscore_path = path.clone();
        }
    }
}

pub fn read_config(path: &Path) -> Result<GameConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}

/// Seed derived from the wall clock; never zero.
pub fn time_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    ((nanos ^ (nanos >> 32)) as u32).max(1)
}
