//! Terminal tile-merge runner.
//!
//! Sets up logging, the high-score file and the asset loader, then drives the
//! session from a fixed-step frame loop fed by crossterm key events.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;

use tile_merge::cli::{Cli, LOG_ENV};
use tile_merge::core::JsonFileStore;
use tile_merge::input::{handle_key_event, should_quit};
use tile_merge::logging;
use tile_merge::session::Session;
use tile_merge::term::{AssetLoader, FrameBuffer, TerminalRenderer, Viewport};
use tile_merge::types::FRAME_MS;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let log_path = std::env::var_os(LOG_ENV).map(PathBuf::from);
    logging::init(log_path.as_deref())?;
    info!(
        width = config.width,
        height = config.height,
        time = config.game_time_secs,
        seed = ?config.rng_seed,
        "starting"
    );

    let store = JsonFileStore::new(config.highscore_path.clone());
    let (loader, catalog) = AssetLoader::start(config.theme_path.clone())?;

    let mut session = Session::new(config, Box::new(store));
    session.attach_assets(loader, catalog);
    session.begin()?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session);

    // Always try to restore terminal state.
    let _ = term.exit();
    info!(score = session.controller().ledger().score(), "exiting");
    result
}

fn run(term: &mut TerminalRenderer, session: &mut Session) -> Result<()> {
    let frame = Duration::from_millis(FRAME_MS as u64);
    let mut fb = FrameBuffer::new(0, 0);
    let mut last_tick = Instant::now();

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        session.render_into(Viewport::new(w, h), &mut fb);
        term.present(&mut fb)?;

        let timeout = frame.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(command) = handle_key_event(key) {
                        session.handle(command);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= frame {
            last_tick = Instant::now();
            session.tick(elapsed.as_secs_f32());
        }
    }
}
