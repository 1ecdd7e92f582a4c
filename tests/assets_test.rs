//! Asset readiness handed to the controller over a oneshot channel.

use std::sync::Arc;

use tile_merge::core::{
    EmptyCatalog, GameConfig, GameController, GamePhase, MemoryStore, SharedCatalog,
};
use tile_merge::term::assets::load_theme;
use tile_merge::term::ThemeCatalog;
use tokio::sync::oneshot;

fn controller() -> GameController {
    let config = GameConfig {
        width: 4,
        height: 4,
        rng_seed: Some(1),
        ..GameConfig::default()
    };
    GameController::new(config, Box::new(MemoryStore::new()))
}

#[tokio::test]
async fn test_async_load_unblocks_setup() {
    let mut c = controller();
    let (tx, rx) = oneshot::channel::<SharedCatalog>();
    c.attach_assets(rx);
    c.create_game(4, 4).unwrap();

    c.update(0.016);
    assert_eq!(c.phase(), GamePhase::Setup);

    let task = tokio::spawn(async move {
        let theme = load_theme(None).await.unwrap();
        let _ = tx.send(Box::new(ThemeCatalog(Arc::new(theme))));
    });
    task.await.unwrap();

    c.update(0.016);
    assert_eq!(c.phase(), GamePhase::WaitingToStart);
    assert!(c.model_for(1).is_some());
}

#[tokio::test]
async fn test_loader_dropping_sender_falls_back_to_empty_catalog() {
    let mut c = controller();
    let (tx, rx) = oneshot::channel::<SharedCatalog>();
    c.attach_assets(rx);
    c.create_game(4, 4).unwrap();

    tokio::spawn(async move { drop(tx) }).await.unwrap();

    c.update(0.016);
    assert_eq!(c.phase(), GamePhase::WaitingToStart);
    assert!(c.model_for(1).is_none());
    assert!(c.start());
}

#[test]
fn test_assets_before_board_wait_for_create_game() {
    let mut c = controller();
    c.assets_ready(Box::new(EmptyCatalog));
    assert_eq!(c.phase(), GamePhase::Setup);
    c.create_game(4, 4).unwrap();
    assert_eq!(c.phase(), GamePhase::WaitingToStart);
}

#[test]
fn test_builtin_theme_loads_without_runtime_setup() {
    let theme = tokio_test::block_on(load_theme(None)).unwrap();
    assert_eq!(theme.tiles.len(), 9);
}
