use std::future::Future;
use std::sync::Arc;

use replybot_channels::{Channel, ChannelEvent, OnMessageFn};
use replybot_common::Result;
use replybot_config::{ConfigStore, ConfigWatcher};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::dispatch::Dispatcher;
use crate::reload::{forward_file_changes, spawn_reloader};
use crate::signals::shutdown_signal;

/// Ties a channel to the dispatcher, keeps the config fresh, and runs until
/// the process is told to stop.
pub struct ReplyBot {
    store: Arc<ConfigStore>,
    dispatcher: Arc<Dispatcher>,
    watch_config: bool,
}

impl ReplyBot {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&store)));
        Self {
            store,
            dispatcher,
            watch_config: false,
        }
    }

    /// Also reload when the config file changes on disk, not only on `SIGHUP`.
    pub fn with_config_watch(mut self, enabled: bool) -> Self {
        self.watch_config = enabled;
        self
    }

    /// Callback to hand to the channel so its messages reach the dispatcher.
    pub fn on_message_fn(&self) -> OnMessageFn {
        self.dispatcher.on_message_fn()
    }

    /// Run until `SIGINT`/`SIGTERM`.
    pub async fn run(self, channel: Box<dyn Channel>) -> Result<()> {
        self.run_until(channel, shutdown_signal()).await
    }

    /// Connect `channel`, serve until `shutdown` resolves or the channel
    /// fails, then disconnect.
    ///
    /// A failed connect is logged and treated as a normal return.
    pub async fn run_until(
        self,
        mut channel: Box<dyn Channel>,
        shutdown: impl Future<Output = ()>,
    ) -> Result<()> {
        let mut events = channel.subscribe();

        if let Err(e) = channel.connect().await {
            error!("error opening {} connection: {e}", channel.display_name());
            return Ok(());
        }

        let (reload_tx, reload_task) = spawn_reloader(Arc::clone(&self.store));
        let mut forwarders: Vec<JoinHandle<()>> = Vec::new();

        #[cfg(unix)]
        match crate::reload::forward_hangup(reload_tx.clone()) {
            Ok(handle) => forwarders.push(handle),
            Err(e) => warn!("cannot listen for SIGHUP, config reload disabled: {e}"),
        }

        let _watcher = if self.watch_config {
            match ConfigWatcher::start(self.store.path()) {
                Ok((watcher, changes)) => {
                    info!(path = %watcher.path().display(), "watching config file for changes");
                    forwarders.push(forward_file_changes(changes, reload_tx.clone()));
                    Some(watcher)
                }
                Err(e) => {
                    warn!("config file watching disabled: {e}");
                    None
                }
            }
        } else {
            None
        };
        drop(reload_tx);

        info!("running; press ctrl-c to exit");

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                event = events.recv() => match event {
                    Ok(ChannelEvent::Error(e)) => {
                        error!("{} channel stopped: {e}", channel.display_name());
                        break;
                    }
                    Ok(ChannelEvent::StatusChanged(status)) => {
                        debug!(?status, "channel status changed");
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("skipped {skipped} channel events");
                    }
                    Err(RecvError::Closed) => {
                        warn!("channel event stream closed");
                        break;
                    }
                },
            }
        }

        info!("exiting...");
        for handle in forwarders {
            handle.abort();
        }
        reload_task.abort();

        channel.disconnect().await
    }
}
