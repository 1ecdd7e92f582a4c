//! Game controller - the top-level session state machine
//!
//! ```text
//! Setup --assets ready--> WaitingToStart --start()--> Playing --time/no moves--> GameOver
//!   ^                                                                               |
//!   +------------------------------ create_game() ---------------------------------+
//! ```
//!
//! The controller owns the grid, the ledger and the clock for the whole
//! session. Everything the presentation layer needs to know is queued as a
//! [`GameEvent`] and drained once per frame.

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{debug, error, info, warn};

use crate::clock::{ClockSignal, GameClock};
use crate::config::GameConfig;
use crate::error::CoreError;
use crate::events::{EmptyCatalog, GameEvent, GameOverReason, ModelCatalog};
use crate::grid::{check_dimensions, MoveOutcome, TileGrid};
use crate::rng::SimpleRng;
use crate::score::ScoreLedger;
use crate::snapshot::GameSnapshot;
use crate::storage::HighScoreStore;
use crate::types::{Direction, Level, VisualHandle, BASE_COMBO};

/// Model catalog handed over by the asset loader.
pub type SharedCatalog = Box<dyn ModelCatalog + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Board under construction or assets still loading.
    Setup,
    /// Board visible, input and clock disabled until the start trigger.
    WaitingToStart,
    Playing,
    /// Terminal until the next `create_game`.
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Setup => "setup",
            GamePhase::WaitingToStart => "waiting",
            GamePhase::Playing => "playing",
            GamePhase::GameOver => "game_over",
        }
    }
}

pub struct GameController {
    config: GameConfig,
    phase: GamePhase,
    grid: Option<TileGrid>,
    ledger: ScoreLedger,
    clock: GameClock,
    catalog: Option<SharedCatalog>,
    pending_assets: Option<oneshot::Receiver<SharedCatalog>>,
    events: Vec<GameEvent>,
    seeds: SimpleRng,
    game_over_reason: Option<GameOverReason>,
}

impl GameController {
    pub fn new(config: GameConfig, store: Box<dyn HighScoreStore>) -> Self {
        let ledger = ScoreLedger::with_combo_step(store, config.combo_step);
        let clock = GameClock::new(config.game_time_secs);
        let seeds = SimpleRng::new(config.rng_seed.unwrap_or(1));

        Self {
            config,
            phase: GamePhase::Setup,
            grid: None,
            ledger,
            clock,
            catalog: None,
            pending_assets: None,
            events: Vec::new(),
            seeds,
            game_over_reason: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> Option<&TileGrid> {
        self.grid.as_ref()
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    pub fn assets_loaded(&self) -> bool {
        self.catalog.is_some()
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Visual for a tile level, `None` when unknown or not loaded yet.
    pub fn model_for(&self, level: Level) -> Option<VisualHandle> {
        let visual = self
            .catalog
            .as_ref()
            .and_then(|catalog| catalog.model_by_level(level));
        if visual.is_none() {
            debug!(level, "no model for level, skipping decoration");
        }
        visual
    }

    /// Start a new session on a `width x height` board.
    ///
    /// Non-positive or oversized dimensions are rejected and leave the current
    /// session untouched.
    pub fn create_game(&mut self, width: i32, height: i32) -> Result<(), CoreError> {
        let (w, h) = check_dimensions(width as i64, height as i64)?;

        let seed = self.seeds.next_u32();
        let grid = TileGrid::create_map(w, h, self.config.spawn_policy(), seed)?;

        self.ledger.reset();
        // Armed for the session, but held until the start trigger.
        self.clock.reset();
        self.clock.stop();
        self.game_over_reason = None;

        self.emit(GameEvent::BoardCreated {
            width: w,
            height: h,
        });
        let seeded: Vec<_> = grid.tiles().copied().collect();
        self.grid = Some(grid);
        for tile in seeded {
            let visual = self.model_for(tile.level);
            self.emit(GameEvent::TileSpawned { tile, visual });
        }
        self.emit(GameEvent::ScoreChanged(self.ledger.score()));
        self.emit(GameEvent::ComboChanged(self.ledger.combo()));
        self.emit(GameEvent::HighScoreChanged(self.ledger.high_score()));
        self.emit(GameEvent::TimeChanged(self.clock.display_seconds()));

        self.phase = if self.catalog.is_some() {
            GamePhase::WaitingToStart
        } else {
            GamePhase::Setup
        };
        info!(width = w, height = h, seed, phase = self.phase.as_str(), "game created");
        Ok(())
    }

    /// Recreate the board with the current dimensions.
    pub fn restart(&mut self) -> Result<(), CoreError> {
        let (width, height) = match &self.grid {
            Some(grid) => (grid.width(), grid.height()),
            None => (self.config.width, self.config.height),
        };
        self.create_game(width as i32, height as i32)
    }

    /// Hand over the receiving end of the asset loader's readiness channel.
    pub fn attach_assets(&mut self, receiver: oneshot::Receiver<SharedCatalog>) {
        self.pending_assets = Some(receiver);
    }

    /// Assets are ready: leave `Setup` if a board exists.
    pub fn assets_ready(&mut self, catalog: SharedCatalog) {
        self.catalog = Some(catalog);
        self.pending_assets = None;
        if self.phase == GamePhase::Setup && self.grid.is_some() {
            self.phase = GamePhase::WaitingToStart;
            info!("assets ready, waiting for start");
        }
    }

    fn poll_assets(&mut self) {
        let Some(mut receiver) = self.pending_assets.take() else {
            return;
        };
        match receiver.try_recv() {
            Ok(catalog) => self.assets_ready(catalog),
            Err(TryRecvError::Empty) => self.pending_assets = Some(receiver),
            Err(TryRecvError::Closed) => {
                warn!("asset loader went away without a catalog, continuing without models");
                self.assets_ready(Box::new(EmptyCatalog));
            }
        }
    }

    /// Start trigger. Only honoured while waiting to start.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::WaitingToStart {
            debug!(phase = self.phase.as_str(), "start ignored");
            return false;
        }
        self.phase = GamePhase::Playing;
        self.clock.start();
        self.emit(GameEvent::GameStarted);
        info!("game started");
        true
    }

    /// Resolve one move. Returns `None` when the input was ignored.
    pub fn apply_move(&mut self, direction: Direction) -> Option<MoveOutcome> {
        if self.phase != GamePhase::Playing {
            debug!(direction = direction.as_str(), phase = self.phase.as_str(), "move ignored");
            return None;
        }
        let outcome = self.grid.as_mut()?.apply_move(direction);

        match &outcome {
            MoveOutcome::NoChange => self.reset_combo(),
            MoveOutcome::Changed(result) => {
                for mv in &result.moves {
                    self.emit(GameEvent::TileMoved {
                        tile: mv.tile,
                        from: mv.from,
                        to: mv.to,
                    });
                }

                let multiplier = self.ledger.combo();
                for merge in &result.merges {
                    let visual = self.model_for(merge.level);
                    self.emit(GameEvent::TileMerged {
                        survivor: merge.survivor,
                        consumed: merge.consumed,
                        cell: merge.cell,
                        level: merge.level,
                        visual,
                    });
                    match self.ledger.record_merge(merge.level, multiplier) {
                        Ok(award) => self.emit(GameEvent::ScorePopup {
                            cell: merge.cell,
                            popup: award.popup,
                        }),
                        Err(err) => {
                            error!(error = %err, "merge produced a level outside the score table");
                            debug_assert!(false, "{err}");
                        }
                    }
                }

                if result.has_merges() {
                    self.emit(GameEvent::ScoreChanged(self.ledger.score()));
                    self.ledger.bump_combo();
                    self.emit(GameEvent::ComboChanged(self.ledger.combo()));
                    if self.ledger.commit() {
                        self.emit(GameEvent::HighScoreChanged(self.ledger.high_score()));
                    }
                } else {
                    self.reset_combo();
                }

                if let Some(tile) = result.spawned {
                    let visual = self.model_for(tile.level);
                    self.emit(GameEvent::TileSpawned { tile, visual });
                }
            }
        }

        if outcome.merge_result().is_some_and(|r| r.board_full()) {
            self.game_over(GameOverReason::BoardFull);
        } else if !self.grid.as_ref().is_some_and(TileGrid::has_valid_moves) {
            self.game_over(GameOverReason::NoMoves);
        }

        Some(outcome)
    }

    fn reset_combo(&mut self) {
        let was = self.ledger.combo();
        self.ledger.reset_combo();
        if was != BASE_COMBO {
            self.emit(GameEvent::ComboChanged(self.ledger.combo()));
        }
    }

    /// Per-frame tick.
    pub fn update(&mut self, delta_secs: f32) {
        self.poll_assets();

        if self.phase != GamePhase::Playing {
            return;
        }
        match self.clock.tick(delta_secs) {
            ClockSignal::Changed(_) => {
                self.emit(GameEvent::TimeChanged(self.clock.display_seconds()));
            }
            ClockSignal::Expired => self.game_over(GameOverReason::TimeExpired),
            ClockSignal::Idle | ClockSignal::Pending => {}
        }
    }

    fn game_over(&mut self, reason: GameOverReason) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.game_over_reason = Some(reason);
        self.clock.stop();
        if self.ledger.commit() {
            self.emit(GameEvent::HighScoreChanged(self.ledger.high_score()));
        }
        self.emit(GameEvent::GameOver(reason));
        info!(reason = reason.as_str(), score = self.ledger.score(), "game over");
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.phase = self.phase;
        out.levels.clear();
        match &self.grid {
            Some(grid) => {
                out.width = grid.width();
                out.height = grid.height();
                out.levels.extend(grid.levels());
            }
            None => {
                out.width = 0;
                out.height = 0;
            }
        }
        out.score = self.ledger.score();
        out.high_score = self.ledger.high_score();
        out.combo = self.ledger.combo();
        out.time_left = self.clock.display_seconds();
        out.game_over = self.game_over_reason;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn controller() -> GameController {
        let config = GameConfig {
            width: 4,
            height: 4,
            game_time_secs: 60,
            rng_seed: Some(7),
            ..GameConfig::default()
        };
        GameController::new(config, Box::new(MemoryStore::new()))
    }

    fn playing() -> GameController {
        let mut c = controller();
        c.create_game(4, 4).unwrap();
        c.assets_ready(Box::new(EmptyCatalog));
        assert!(c.start());
        c.drain_events().for_each(drop);
        c
    }

    #[test]
    fn test_new_controller_is_in_setup() {
        let c = controller();
        assert_eq!(c.phase(), GamePhase::Setup);
        assert!(c.grid().is_none());
    }

    #[test]
    fn test_create_game_rejects_bad_dimensions() {
        let mut c = controller();
        assert!(matches!(
            c.create_game(0, 4),
            Err(CoreError::InvalidDimension { width: 0, height: 4 })
        ));
        assert!(c.create_game(4, -1).is_err());
        assert!(c.grid().is_none());
        assert!(c.drain_events().next().is_none());
    }

    #[test]
    fn test_create_game_rejects_oversized_boards() {
        let mut c = controller();
        c.create_game(4, 4).unwrap();
        c.drain_events().for_each(drop);
        let before = c.grid().unwrap().levels();

        for (w, h) in [(70_000, 1), (65_535, 65_535), (1, i32::MAX), (257, 1)] {
            assert!(
                matches!(
                    c.create_game(w, h),
                    Err(CoreError::DimensionTooLarge { .. })
                ),
                "{w}x{h}"
            );
        }
        assert_eq!(c.grid().unwrap().levels(), before);
        assert!(c.drain_events().next().is_none());

        // The limits themselves are accepted.
        c.create_game(crate::types::MAX_BOARD_SIDE as i32, 64).unwrap();
    }

    #[test]
    fn test_create_game_keeps_session_on_error() {
        let mut c = playing();
        let before = c.grid().unwrap().levels();
        assert!(c.create_game(-3, 2).is_err());
        assert_eq!(c.phase(), GamePhase::Playing);
        assert_eq!(c.grid().unwrap().levels(), before);
    }

    #[test]
    fn test_setup_until_assets_ready() {
        let mut c = controller();
        c.create_game(4, 4).unwrap();
        assert_eq!(c.phase(), GamePhase::Setup);
        assert!(!c.start());
        assert!(c.apply_move(Direction::Left).is_none());

        c.assets_ready(Box::new(EmptyCatalog));
        assert_eq!(c.phase(), GamePhase::WaitingToStart);
    }

    #[test]
    fn test_assets_before_board() {
        let mut c = controller();
        c.assets_ready(Box::new(EmptyCatalog));
        assert_eq!(c.phase(), GamePhase::Setup);
        c.create_game(4, 4).unwrap();
        assert_eq!(c.phase(), GamePhase::WaitingToStart);
    }

    #[test]
    fn test_assets_over_oneshot() {
        let mut c = controller();
        c.create_game(4, 4).unwrap();
        let (tx, rx) = oneshot::channel::<SharedCatalog>();
        c.attach_assets(rx);

        c.update(0.016);
        assert_eq!(c.phase(), GamePhase::Setup);

        tx.send(Box::new(EmptyCatalog)).ok();
        c.update(0.016);
        assert_eq!(c.phase(), GamePhase::WaitingToStart);
    }

    #[test]
    fn test_dropped_asset_sender_is_tolerated() {
        let mut c = controller();
        c.create_game(4, 4).unwrap();
        let (tx, rx) = oneshot::channel::<SharedCatalog>();
        c.attach_assets(rx);
        drop(tx);

        c.update(0.016);
        assert_eq!(c.phase(), GamePhase::WaitingToStart);
        assert_eq!(c.model_for(1), None);
    }

    #[test]
    fn test_clock_waits_for_start() {
        let mut c = controller();
        c.create_game(4, 4).unwrap();
        c.assets_ready(Box::new(EmptyCatalog));
        c.update(5.0);
        assert_eq!(c.clock().remaining(), 61);

        c.start();
        c.update(1.0);
        assert_eq!(c.clock().remaining(), 60);
        assert!(c
            .drain_events()
            .any(|e| e == GameEvent::TimeChanged(60)));
    }

    #[test]
    fn test_start_only_once() {
        let mut c = playing();
        assert!(!c.start());
    }

    #[test]
    fn test_time_expiry_ends_game() {
        let mut c = playing();
        for _ in 0..61 {
            c.update(1.0);
            assert_eq!(c.phase(), GamePhase::Playing);
        }
        c.update(1.0);
        assert_eq!(c.phase(), GamePhase::GameOver);
        assert_eq!(c.game_over_reason(), Some(GameOverReason::TimeExpired));
        let events: Vec<_> = c.drain_events().collect();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver(_)))
                .count(),
            1
        );
        assert!(c.apply_move(Direction::Up).is_none());
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut c = playing();
        c.update(100.0);
        assert_eq!(c.phase(), GamePhase::GameOver);

        c.restart().unwrap();
        assert_eq!(c.phase(), GamePhase::WaitingToStart);
        assert_eq!(c.ledger().score(), 0);
        assert_eq!(c.clock().display_seconds(), 60);
        assert!(c.game_over_reason().is_none());
    }

    #[test]
    fn test_create_game_emits_initial_state() {
        let mut c = controller();
        c.create_game(4, 4).unwrap();
        let events: Vec<_> = c.drain_events().collect();
        assert_eq!(
            events[0],
            GameEvent::BoardCreated {
                width: 4,
                height: 4
            }
        );
        let spawned = events
            .iter()
            .filter(|e| matches!(e, GameEvent::TileSpawned { .. }))
            .count();
        assert_eq!(spawned, c.grid().unwrap().tile_count());
        assert!(events.contains(&GameEvent::ScoreChanged(0)));
        assert!(events.contains(&GameEvent::TimeChanged(60)));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let c = playing();
        let snap = c.snapshot();
        assert_eq!(snap.phase, GamePhase::Playing);
        assert_eq!((snap.width, snap.height), (4, 4));
        assert_eq!(snap.tile_count(), c.grid().unwrap().tile_count());
        assert_eq!(snap.time_left, 60);
        assert!(snap.playable());
    }
}
