//! High score persistence across sessions with the JSON file store.

use tile_merge::core::{
    EmptyCatalog, GameConfig, GameController, GamePhase, HighScoreStore, JsonFileStore,
    ScoreLedger,
};
use tile_merge::types::{Direction, HIGHSCORE_KEY};

#[test]
fn test_first_run_writes_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");

    let ledger = ScoreLedger::new(Box::new(JsonFileStore::new(&path)));
    assert_eq!(ledger.high_score(), 0);

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[HIGHSCORE_KEY], "0");
}

#[test]
fn test_commit_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");

    let mut ledger = ScoreLedger::new(Box::new(JsonFileStore::new(&path)));
    ledger.record_merge(4, 1.0).unwrap();
    ledger.record_merge(5, 1.5).unwrap();
    assert!(ledger.commit());
    let best = ledger.score();

    let reloaded = ScoreLedger::new(Box::new(JsonFileStore::new(&path)));
    assert_eq!(reloaded.high_score(), best);

    let mut store = JsonFileStore::new(&path);
    assert_eq!(store.get().unwrap(), Some(best));
    store.set(best + 1).unwrap();
    assert_eq!(store.get().unwrap(), Some(best + 1));
}

#[test]
fn test_lower_score_does_not_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");
    JsonFileStore::new(&path).set(1_000).unwrap();

    let mut ledger = ScoreLedger::new(Box::new(JsonFileStore::new(&path)));
    ledger.record_merge(3, 1.0).unwrap();
    assert!(!ledger.commit());
    assert_eq!(JsonFileStore::new(&path).get().unwrap(), Some(1_000));
}

#[test]
fn test_controller_persists_on_game_over() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");
    let config = GameConfig {
        width: 2,
        height: 2,
        rng_seed: Some(3),
        game_time_secs: 3600,
        highscore_path: path.clone(),
        ..GameConfig::default()
    };

    let mut c = GameController::new(config, Box::new(JsonFileStore::new(&path)));
    c.create_game(2, 2).unwrap();
    c.assets_ready(Box::new(EmptyCatalog));
    c.start();
    for step in 0..100_000 {
        if c.phase() == GamePhase::GameOver {
            break;
        }
        c.apply_move(Direction::ALL[step % 4]);
    }
    assert_eq!(c.phase(), GamePhase::GameOver);

    let stored = JsonFileStore::new(&path).get().unwrap().unwrap_or(0);
    assert_eq!(stored, c.ledger().score());
}
