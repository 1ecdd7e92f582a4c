//! Game configuration.
//!
//! Plain serde data; the binary is responsible for reading it from disk and
//! layering command line overrides on top.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::grid::{check_dimensions, SpawnPolicy};
use crate::types::{
    DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DEFAULT_COMBO_STEP, DEFAULT_GAME_TIME_SECS,
    DEFAULT_LEVEL_TWO_PERCENT, DEFAULT_SEED_TILES,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    /// Session length in seconds.
    pub game_time_secs: u32,
    pub seed_tiles: u16,
    pub level_two_percent: u8,
    pub combo_step: f64,
    /// Fixed RNG seed; a time-derived seed is used when absent.
    pub rng_seed: Option<u32>,
    pub highscore_path: PathBuf,
    /// Optional tile palette (JSON) loaded by the terminal front end.
    pub theme_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            game_time_secs: DEFAULT_GAME_TIME_SECS,
            seed_tiles: DEFAULT_SEED_TILES,
            level_two_percent: DEFAULT_LEVEL_TWO_PERCENT,
            combo_step: DEFAULT_COMBO_STEP,
            rng_seed: None,
            highscore_path: PathBuf::from("tile-merge-highscore.json"),
            theme_path: None,
        }
    }
}

/// Why a configuration was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Dimensions(#[from] CoreError),
    #[error("game time must be at least one second")]
    GameTime,
    #[error("combo step must be a positive number, got {0}")]
    ComboStep(f64),
    #[error("level two chance must be a percentage, got {0}")]
    Percent(u8),
}

impl GameConfig {
    pub fn spawn_policy(&self) -> SpawnPolicy {
        SpawnPolicy {
            seed_tiles: self.seed_tiles,
            level_two_percent: self.level_two_percent,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_dimensions(self.width as i64, self.height as i64)?;
        if self.game_time_secs == 0 {
            return Err(ConfigError::GameTime);
        }
        if !(self.combo_step.is_finite() && self.combo_step > 0.0) {
            return Err(ConfigError::ComboStep(self.combo_step));
        }
        if self.level_two_percent > 100 {
            return Err(ConfigError::Percent(self.level_two_percent));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.width, 10);
        assert_eq!(config.game_time_secs, 60);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"width":4,"height":4}"#).unwrap();
        assert_eq!(config.width, 4);
        assert_eq!(config.height, 4);
        assert_eq!(config.game_time_secs, DEFAULT_GAME_TIME_SECS);
        assert_eq!(config.theme_path, None);
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = GameConfig {
            width: 0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Dimensions(_))));

        config.width = 4;
        config.game_time_secs = 0;
        assert_eq!(config.validate(), Err(ConfigError::GameTime));

        config.game_time_secs = 30;
        config.combo_step = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::ComboStep(0.0)));
        config.combo_step = -0.5;
        assert_eq!(config.validate(), Err(ConfigError::ComboStep(-0.5)));
        config.combo_step = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::ComboStep(_))));

        config.combo_step = 1.0;
        config.level_two_percent = 101;
        assert_eq!(config.validate(), Err(ConfigError::Percent(101)));
    }

    #[test]
    fn rejects_oversized_boards() {
        let config = GameConfig {
            width: 65_535,
            height: 65_535,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Dimensions(CoreError::DimensionTooLarge { .. }))
        ));
    }
}
