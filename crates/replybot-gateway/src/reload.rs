use std::sync::Arc;

use replybot_config::ConfigStore;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// What asked for a config reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadReason {
    /// `SIGHUP` was delivered to the process.
    Hangup,
    /// The config file changed on disk.
    FileChanged,
}

/// Spawn the task that performs reloads one at a time, in the order they
/// were requested. The task ends once every sender is dropped.
pub fn spawn_reloader(store: Arc<ConfigStore>) -> (mpsc::Sender<ReloadReason>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<ReloadReason>(8);
    let handle = tokio::spawn(async move {
        while let Some(reason) = rx.recv().await {
            info!(?reason, path = %store.path().display(), "reloading config");
            // Failures are logged by the store and the old config stays live.
            let _ = store.reload();
        }
        debug!("config reloader stopped");
    });
    (tx, handle)
}

/// Turn every `SIGHUP` into a reload request.
#[cfg(unix)]
pub fn forward_hangup(tx: mpsc::Sender<ReloadReason>) -> std::io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = signal(SignalKind::hangup())?;
    Ok(tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            if tx.send(ReloadReason::Hangup).await.is_err() {
                break;
            }
        }
    }))
}

/// Turn file watcher notifications into reload requests.
pub fn forward_file_changes(
    mut changes: mpsc::Receiver<()>,
    tx: mpsc::Sender<ReloadReason>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while changes.recv().await.is_some() {
            if tx.send(ReloadReason::FileChanged).await.is_err() {
                break;
            }
        }
    })
}
