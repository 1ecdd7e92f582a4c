//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the rules of the tile-merging game and the session state
//! machine around them. It has **no dependencies** on terminals, rendering or
//! the file layout of assets, which keeps it:
//!
//! - **Deterministic**: the same seed produces identical boards and spawns
//! - **Testable**: every rule is covered by unit tests
//! - **Portable**: the terminal front end is just one possible presentation layer
//!
//! # Module Structure
//!
//! - [`grid`]: the tile board, slide/merge resolution and spawns
//! - [`score`]: merge points, combo multiplier and the high score
//! - [`clock`]: the countdown that ends a timed session
//! - [`controller`]: the `Setup -> WaitingToStart -> Playing -> GameOver` machine
//! - [`storage`]: the injected high-score store (file or memory)
//! - [`events`]: events for the presentation layer and the model catalog it supplies
//! - [`snapshot`]: a read-only frame of state for renderers
//! - [`config`]: serde configuration
//! - [`rng`]: a small LCG for reproducible spawns
//!
//! # Game Rules
//!
//! - A move slides every tile towards one edge. Equal neighbours merge into a
//!   tile one level higher; a merged tile does not merge again in the same move.
//! - Lines resolve from the destination edge backwards, so `[1, 1, 1, _]`
//!   moved left becomes `[2, 1, _, _]`.
//! - Every move that changes the board spawns one level 1 (sometimes level 2)
//!   tile on a random empty cell.
//! - Each merge scores its table value times the combo multiplier. The
//!   multiplier grows after every merging move and resets after a move without
//!   merges.
//! - The session ends when the countdown runs out or no move can change the board.
//!
//! # Example
//!
//! ```
//! use tile_merge_core::{EmptyCatalog, GameConfig, GameController, GamePhase, MemoryStore};
//! use tile_merge_core::types::Direction;
//!
//! let config = GameConfig { rng_seed: Some(12345), ..GameConfig::default() };
//! let mut game = GameController::new(config, Box::new(MemoryStore::new()));
//!
//! game.create_game(4, 4).unwrap();
//! game.assets_ready(Box::new(EmptyCatalog));
//! assert!(game.start());
//!
//! game.apply_move(Direction::Left);
//! game.update(0.016);
//! assert_eq!(game.phase(), GamePhase::Playing);
//! ```

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod grid;
pub mod rng;
pub mod score;
pub mod snapshot;
pub mod storage;

pub use tile_merge_types as types;

// Re-export commonly used types for convenience
pub use clock::{ClockPhase, ClockSignal, GameClock};
pub use config::{ConfigError, GameConfig};
pub use controller::{GameController, GamePhase, SharedCatalog};
pub use error::{CoreError, StorageError};
pub use events::{EmptyCatalog, GameEvent, GameOverReason, ModelCatalog};
pub use grid::{MergeResult, MoveOutcome, SpawnPolicy, Tile, TileGrid, TileMerge, TileMove};
pub use rng::SimpleRng;
pub use score::{ScoreAward, ScoreLedger, ScorePopup};
pub use snapshot::GameSnapshot;
pub use storage::{HighScoreStore, JsonFileStore, MemoryStore};
