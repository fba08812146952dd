//! Hot-reload of cave configuration files
//!
//! Watches a RON/JSON config with `notify` and hands back freshly loaded,
//! validated configs whenever the file changes:
//! - invalid edits are reported and the previous config stays in effect
//! - reload counters are tracked for status reporting

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::{CaveError, Result};
use crate::generation::CaveConfig;

/// Reload bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HotReloadStatus {
    pub watched_file: String,
    pub reload_count: u32,
    pub last_reload_success: bool,
    pub last_error: Option<String>,
}

/// File watcher for one config file
pub struct ConfigWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<Event>>,
    status: HotReloadStatus,
}

impl ConfigWatcher {
    /// Start watching `path`. The parent directory is watched so editors that
    /// replace the file on save are still picked up.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(CaveError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("config file not found: {}", path.display()),
            )));
        }

        let (tx, rx) = channel();
        let mut watcher = notify::recommended_watcher(tx)?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        info!("Hot-reload enabled for {:?}", path);

        Ok(Self {
            status: HotReloadStatus {
                watched_file: path.display().to_string(),
                ..HotReloadStatus::default()
            },
            path,
            _watcher: watcher,
            receiver: rx,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn status(&self) -> &HotReloadStatus {
        &self.status
    }

    /// Drain pending filesystem events. Returns `None` if the config file was
    /// not touched, otherwise the outcome of reloading it.
    pub fn poll(&mut self) -> Option<Result<CaveConfig>> {
        let mut touched = false;
        while let Ok(result) = self.receiver.try_recv() {
            match result {
                Ok(event) => touched |= self.is_config_event(&event),
                Err(e) => warn!("File watcher error: {}", e),
            }
        }

        touched.then(|| self.reload())
    }

    fn is_config_event(&self, event: &Event) -> bool {
        let relevant = matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_));
        let file_name = self.path.file_name();
        relevant && event.paths.iter().any(|p| p.file_name() == file_name)
    }

    /// Load the file now, updating the reload status
    pub fn reload(&mut self) -> Result<CaveConfig> {
        match CaveConfig::load(&self.path) {
            Ok(config) => {
                self.status.reload_count += 1;
                self.status.last_reload_success = true;
                self.status.last_error = None;
                info!(
                    "Config reloaded successfully (count: {})",
                    self.status.reload_count
                );
                Ok(config)
            }
            Err(e) => {
                self.status.last_reload_success = false;
                self.status.last_error = Some(e.to_string());
                error!("Config reload failed: {}", e);
                Err(e)
            }
        }
    }
}
