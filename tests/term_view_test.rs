//! Rendering a live controller snapshot through the board view.

use std::sync::Arc;

use tile_merge::core::{GameConfig, GameController, GamePhase, MemoryStore, ModelCatalog};
use tile_merge::term::{BoardView, PopupLayer, Scene, ThemeCatalog, TileTheme, Viewport};

fn frame_text(fb: &tile_merge::term::FrameBuffer) -> String {
    (0..fb.height()).map(|y| fb.row_text(y) + "\n").collect()
}

#[test]
fn test_theme_catalog_drives_visuals() {
    let theme = Arc::new(TileTheme::default());
    let config = GameConfig {
        width: 4,
        height: 4,
        rng_seed: Some(5),
        ..GameConfig::default()
    };
    let mut c = GameController::new(config, Box::new(MemoryStore::new()));
    c.assets_ready(Box::new(ThemeCatalog(theme.clone())));
    c.create_game(4, 4).unwrap();
    assert_eq!(c.phase(), GamePhase::WaitingToStart);

    for level in 1..=9 {
        let handle = c.model_for(level).unwrap();
        assert!(theme.resolve(handle).is_some());
    }
    assert!(ThemeCatalog(theme.clone()).model_by_level(10).is_none());

    let snap = c.snapshot();
    let scene = Scene {
        snapshot: &snap,
        theme: &theme,
        popups: &PopupLayer::new(),
        decorations: &[],
    };
    let fb = BoardView::new().render(&scene, Viewport::new(80, 30));
    let text = frame_text(&fb);
    assert!(text.contains("press SPACE to start"));
    assert!(text.contains("TIME 60"));
    assert!(text.contains("tent") || text.contains("hut"));
}

#[test]
fn test_fixed_cell_size_is_respected() {
    let theme = TileTheme::default();
    let mut c = GameController::new(GameConfig::default(), Box::new(MemoryStore::new()));
    c.create_game(3, 3).unwrap();
    let snap = c.snapshot();
    let scene = Scene {
        snapshot: &snap,
        theme: &theme,
        popups: &PopupLayer::new(),
        decorations: &[],
    };
    let fb = BoardView::with_cell_size(2, 1).render(&scene, Viewport::new(40, 20));
    let text = frame_text(&fb);
    // 3 cells of width 2 plus two border columns.
    assert!(text.contains("┌──────┐"));
}
