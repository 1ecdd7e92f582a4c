//! Terminal presentation layer.
//!
//! Renders the game into a plain framebuffer which is then diffed and flushed
//! to the terminal, without a widget toolkit in between.
//!
//! - [`board_view`]: snapshot to framebuffer (HUD, board, popups, status line)
//! - [`renderer`]: framebuffer to terminal
//! - [`theme`]: tile labels and colours, exposed to the core as its model catalog
//! - [`assets`]: loads the theme in the background and signals readiness
//! - [`popups`] and [`decor`]: short-lived and ambient animation

pub mod assets;
pub mod board_view;
pub mod decor;
pub mod fb;
pub mod popups;
pub mod renderer;
pub mod theme;

pub use tile_merge_core as core;
pub use tile_merge_types as types;

pub use assets::AssetLoader;
pub use board_view::{BoardView, Scene, Viewport};
pub use decor::{default_decorations, Decoration, DecorationSpec};
pub use fb::{Cell, FrameBuffer, Rgb, Style};
pub use popups::PopupLayer;
pub use renderer::TerminalRenderer;
pub use theme::{ThemeCatalog, TileStyle, TileTheme};
