//! Background theme loading.
//!
//! The game loop is synchronous; the loader owns a small tokio runtime, reads
//! the theme file there and reports readiness through one-shot channels: one
//! carries the model catalog to the controller, the other the theme itself to
//! the board view.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::core::SharedCatalog;
use crate::theme::{ThemeCatalog, TileTheme};

pub struct AssetLoader {
    _rt: Runtime,
    theme_rx: Option<oneshot::Receiver<Arc<TileTheme>>>,
}

impl AssetLoader {
    /// Spawn the load. The returned receiver belongs to the controller
    /// (`GameController::attach_assets`).
    pub fn start(theme_path: Option<PathBuf>) -> Result<(Self, oneshot::Receiver<SharedCatalog>)> {
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("tile-merge-assets")
            .enable_all()
            .build()
            .context("failed to create asset runtime")?;

        let (catalog_tx, catalog_rx) = oneshot::channel::<SharedCatalog>();
        let (theme_tx, theme_rx) = oneshot::channel::<Arc<TileTheme>>();

        rt.spawn(async move {
            let started = Instant::now();
            let theme = match load_theme(theme_path.as_deref()).await {
                Ok(theme) => theme,
                Err(err) => {
                    warn!(error = %format!("{err:#}"), "theme load failed, using built-in theme");
                    TileTheme::default()
                }
            };
            let theme = Arc::new(theme);
            info!(
                tiles = theme.tiles.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "assets ready"
            );
            let _ = theme_tx.send(theme.clone());
            let _ = catalog_tx.send(Box::new(ThemeCatalog(theme)));
        });

        Ok((
            Self {
                _rt: rt,
                theme_rx: Some(theme_rx),
            },
            catalog_rx,
        ))
    }

    /// The loaded theme, returned exactly once.
    pub fn poll_theme(&mut self) -> Option<Arc<TileTheme>> {
        let rx = self.theme_rx.as_mut()?;
        match rx.try_recv() {
            Ok(theme) => {
                self.theme_rx = None;
                Some(theme)
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.theme_rx = None;
                None
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.theme_rx.is_some()
    }
}

/// Read a theme file, or the built-in theme when no path is configured.
pub async fn load_theme(path: Option<&Path>) -> Result<TileTheme> {
    let Some(path) = path else {
        return Ok(TileTheme::default());
    };
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read theme {}", path.display()))?;
    TileTheme::from_json(&text).with_context(|| format!("bad theme {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use super::*;
    use crate::core::ModelCatalog;
    use crate::types::VisualHandle;

    #[test]
    fn no_path_gives_builtin_theme() {
        let theme = tokio_test::block_on(load_theme(None)).unwrap();
        assert_eq!(theme, TileTheme::default());
    }

    #[test]
    fn loads_theme_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"tiles":[{{"label":"one","fg":[1,1,1],"bg":[2,2,2]}}]}}"#
        )
        .unwrap();
        let theme = tokio_test::block_on(load_theme(Some(file.path()))).unwrap();
        assert_eq!(theme.tiles.len(), 1);
        assert_eq!(theme.tiles[0].label, "one");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(tokio_test::block_on(load_theme(Some(&path))).is_err());
    }

    #[test]
    fn loader_reports_readiness_once() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{").unwrap();

        let (mut loader, mut catalog_rx) = AssetLoader::start(Some(broken)).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let theme = loop {
            if let Some(theme) = loader.poll_theme() {
                break theme;
            }
            assert!(Instant::now() < deadline, "theme never arrived");
            std::thread::sleep(Duration::from_millis(5));
        };
        // A broken file falls back to the built-in theme.
        assert_eq!(*theme, TileTheme::default());
        assert!(!loader.is_pending());
        assert!(loader.poll_theme().is_none());

        let catalog = loop {
            match catalog_rx.try_recv() {
                Ok(catalog) => break catalog,
                Err(oneshot::error::TryRecvError::Empty) => {
                    assert!(Instant::now() < deadline, "catalog never arrived");
                    std::thread::sleep(Duration::from_millis(5));
                }
                Err(err) => panic!("catalog channel closed: {err:?}"),
            }
        };
        assert_eq!(catalog.model_by_level(1), Some(VisualHandle(1)));
    }
}
