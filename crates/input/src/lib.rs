//! Terminal input module.
//!
//! Maps `crossterm` key events into [`InputCommand`]s for the game loop. The
//! game resolves one move per key press, so there is no auto-repeat handling
//! here; terminal auto-repeat events are dropped by the runner.

pub mod map;

pub use tile_merge_types as types;

pub use map::{handle_key_event, should_quit, InputCommand};
