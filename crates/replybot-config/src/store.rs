use std::path::Path;
use std::sync::Arc;

use replybot_common::Result;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::loader::ConfigLoader;
use crate::model::BotConfig;

/// Holds the last successfully loaded config and publishes replacements.
///
/// Readers take an `Arc` snapshot, so a reload swaps the whole config at once
/// and in-flight lookups keep the snapshot they started with.
pub struct ConfigStore {
    loader: ConfigLoader,
    tx: watch::Sender<Arc<BotConfig>>,
}

impl ConfigStore {
    /// Perform the initial load. An error here means there is no config to
    /// fall back on, so callers should treat it as fatal.
    pub fn open(loader: ConfigLoader) -> Result<Self> {
        let config = loader.load()?;
        log_loaded(&config);
        let (tx, _) = watch::channel(Arc::new(config));
        Ok(Self { loader, tx })
    }

    pub fn path(&self) -> &Path {
        self.loader.path()
    }

    /// Snapshot of the currently published config.
    pub fn current(&self) -> Arc<BotConfig> {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every successful reload.
    pub fn subscribe(&self) -> watch::Receiver<Arc<BotConfig>> {
        self.tx.subscribe()
    }

    /// Re-read the file and publish it. On failure the previous config stays
    /// in place and the error is returned after being logged.
    pub fn reload(&self) -> Result<Arc<BotConfig>> {
        match self.loader.load() {
            Ok(config) => {
                log_loaded(&config);
                let config = Arc::new(config);
                self.tx.send_replace(Arc::clone(&config));
                Ok(config)
            }
            Err(e) => {
                warn!("config reload failed, keeping previous config: {e}");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("path", &self.loader.path())
            .field("commands", &self.tx.borrow().commands.len())
            .finish()
    }
}

fn log_loaded(config: &BotConfig) {
    for warning in config.warnings() {
        warn!("config: {warning}");
    }
    info!(
        commands = config.commands.len(),
        approved_only = config.approved_only,
        ids = config.ids.len(),
        "config loaded successfully"
    );
}
