//! Tile Merge (workspace facade crate).
//!
//! Re-exports the workspace crates under short names and hosts the pieces the
//! binary needs on top of them: command line handling and the frame session.

pub mod cli;
pub mod logging;
pub mod session;

pub use tile_merge_core as core;
pub use tile_merge_input as input;
pub use tile_merge_term as term;
pub use tile_merge_types as types;
