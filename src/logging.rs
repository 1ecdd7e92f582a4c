//! Log setup for the binary.
//!
//! The terminal is busy drawing, so logs go to a file named by
//! [`LOG_ENV`](crate::cli::LOG_ENV). No file, no subscriber.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Install a file subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns `Ok(false)` when no path is given. Fails when the file cannot be
/// created or a global subscriber is already installed.
pub fn init(path: Option<&Path>) -> Result<bool> {
    let Some(path) = path else {
        return Ok(false);
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(anyhow::Error::msg)
        .context("failed to install log subscriber")?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_reports_missing_path_and_second_install() {
        assert!(!init(None).unwrap());

        let dir = tempfile::tempdir().unwrap();
        assert!(init(Some(&dir.path().join("missing/dir/game.log"))).is_err());

        let path = dir.path().join("game.log");
        assert!(init(Some(&path)).unwrap());
        tracing::info!("hello from the log test");
        assert!(path.exists());

        let err = init(Some(&dir.path().join("again.log"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to install log subscriber"));
    }
}
