//! Session: glue between the controller and the terminal front end.
//!
//! Owns the controller plus the presentation-only state (theme, popups,
//! decorations) and turns drained [`GameEvent`]s into view updates. Kept out
//! of `main` so the whole frame pipeline can run without a terminal.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::core::{
    GameConfig, GameController, GameEvent, GameSnapshot, HighScoreStore, SharedCatalog,
};
use crate::input::InputCommand;
use crate::term::{
    default_decorations, AssetLoader, BoardView, Decoration, FrameBuffer, PopupLayer, Scene,
    TileTheme, Viewport,
};

pub struct Session {
    controller: GameController,
    loader: Option<AssetLoader>,
    theme: Arc<TileTheme>,
    popups: PopupLayer,
    decorations: Vec<Decoration>,
    snapshot: GameSnapshot,
    view: BoardView,
}

impl Session {
    pub fn new(config: GameConfig, store: Box<dyn HighScoreStore>) -> Self {
        Self {
            controller: GameController::new(config, store),
            loader: None,
            theme: Arc::new(TileTheme::default()),
            popups: PopupLayer::new(),
            decorations: default_decorations(),
            snapshot: GameSnapshot::default(),
            view: BoardView::new(),
        }
    }

    /// Wire up a running asset loader: the catalog goes to the controller,
    /// the theme is picked up here once it arrives.
    pub fn attach_assets(&mut self, loader: AssetLoader, catalog: oneshot::Receiver<SharedCatalog>) {
        self.controller.attach_assets(catalog);
        self.loader = Some(loader);
    }

    /// Create the first board with the configured dimensions.
    pub fn begin(&mut self) -> Result<()> {
        let (width, height) = {
            let config = self.controller.config();
            (config.width as i32, config.height as i32)
        };
        self.controller
            .create_game(width, height)
            .context("failed to create the board")?;
        self.drain();
        Ok(())
    }

    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut GameController {
        &mut self.controller
    }

    pub fn popups(&self) -> &PopupLayer {
        &self.popups
    }

    pub fn snapshot(&self) -> &GameSnapshot {
        &self.snapshot
    }

    pub fn handle(&mut self, command: InputCommand) {
        match command {
            InputCommand::Move(direction) => {
                self.controller.apply_move(direction);
            }
            InputCommand::Start => {
                self.controller.start();
            }
            InputCommand::Restart => {
                if let Err(err) = self.controller.restart() {
                    warn!(error = %err, "restart failed");
                }
            }
        }
        self.drain();
    }

    /// Advance one frame by `delta_secs`.
    pub fn tick(&mut self, delta_secs: f32) {
        if let Some(loader) = self.loader.as_mut() {
            if let Some(theme) = loader.poll_theme() {
                self.theme = theme;
            }
        }

        self.controller.update(delta_secs);
        self.drain();

        self.popups.update(delta_secs);
        for decoration in &mut self.decorations {
            decoration.update(delta_secs);
        }
    }

    fn drain(&mut self) {
        for event in self.controller.drain_events() {
            match event {
                GameEvent::BoardCreated { width, height } => {
                    self.popups.clear();
                    debug!(width, height, "board created");
                }
                GameEvent::ScorePopup { cell, popup } => self.popups.push(cell, &popup),
                GameEvent::GameOver(reason) => {
                    info!(reason = reason.as_str(), "session ended");
                }
                other => debug!(event = ?other, "game event"),
            }
        }
        self.controller.snapshot_into(&mut self.snapshot);
    }

    pub fn render_into(&self, viewport: Viewport, fb: &mut FrameBuffer) {
        let scene = Scene {
            snapshot: &self.snapshot,
            theme: &self.theme,
            popups: &self.popups,
            decorations: &self.decorations,
        };
        self.view.render_into(&scene, viewport, fb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EmptyCatalog, GamePhase, MemoryStore};
    use crate::types::Direction;

    fn session() -> Session {
        let config = GameConfig {
            width: 4,
            height: 4,
            rng_seed: Some(99),
            ..GameConfig::default()
        };
        Session::new(config, Box::new(MemoryStore::new()))
    }

    #[test]
    fn begin_shows_board_in_setup() {
        let mut s = session();
        s.begin().unwrap();
        assert_eq!(s.snapshot().phase, GamePhase::Setup);
        assert_eq!(s.snapshot().tile_count(), 2);
    }

    #[test]
    fn assets_then_start_then_play() {
        let mut s = session();
        s.begin().unwrap();
        s.controller_mut().assets_ready(Box::new(EmptyCatalog));
        s.tick(0.016);
        assert_eq!(s.snapshot().phase, GamePhase::WaitingToStart);

        s.handle(InputCommand::Start);
        assert_eq!(s.snapshot().phase, GamePhase::Playing);

        for dir in Direction::ALL {
            s.handle(InputCommand::Move(dir));
        }
        s.tick(0.5);
        assert!(s.snapshot().tile_count() >= 1);
    }

    #[test]
    fn restart_clears_popups_and_score() {
        let mut s = session();
        s.begin().unwrap();
        s.controller_mut().assets_ready(Box::new(EmptyCatalog));
        s.handle(InputCommand::Start);
        for _ in 0..20 {
            for dir in Direction::ALL {
                s.handle(InputCommand::Move(dir));
            }
        }
        s.handle(InputCommand::Restart);
        assert!(s.popups().is_empty());
        assert_eq!(s.snapshot().score, 0);
        assert_eq!(s.snapshot().phase, GamePhase::WaitingToStart);
    }

    #[test]
    fn renders_a_frame() {
        let mut s = session();
        s.begin().unwrap();
        let mut fb = FrameBuffer::new(1, 1);
        s.render_into(Viewport::new(60, 24), &mut fb);
        assert_eq!((fb.width(), fb.height()), (60, 24));
        let text: String = (0..fb.height()).map(|y| fb.row_text(y)).collect();
        assert!(text.contains("SCORE 0"));
    }
}
