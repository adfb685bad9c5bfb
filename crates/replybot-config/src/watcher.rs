//! Optional file watcher that turns edits of the config file into reload
//! requests, alongside `SIGHUP`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use replybot_common::{Error, Result};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Keeps the underlying OS watcher alive; dropping it stops notifications.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl ConfigWatcher {
    /// Start watching `path`. Each burst of changes results in at most one
    /// pending message on the returned receiver.
    ///
    /// The parent directory is watched rather than the file itself because
    /// editors commonly replace the file through a rename.
    pub fn start(path: &Path) -> Result<(Self, mpsc::Receiver<()>)> {
        let file_name = path
            .file_name()
            .map(OsString::from)
            .ok_or_else(|| Error::Config(format!("not a file path: {}", path.display())))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (tx, rx) = mpsc::channel(1);
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) if is_relevant(&event, &file_name) => {
                    debug!(kind = ?event.kind, "config file changed");
                    // A full channel already has a reload queued.
                    let _ = tx.try_send(());
                }
                Ok(_) => {}
                Err(e) => warn!("config watcher error: {e}"),
            }
        })
        .map_err(|e| Error::Config(format!("failed to create config watcher: {e}")))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| Error::Config(format!("failed to watch {}: {e}", dir.display())))?;

        Ok((
            Self {
                _watcher: watcher,
                path: path.to_path_buf(),
            },
            rx,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn is_relevant(event: &Event, file_name: &OsString) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event
        .paths
        .iter()
        .any(|p| p.file_name() == Some(file_name.as_os_str()))
}
