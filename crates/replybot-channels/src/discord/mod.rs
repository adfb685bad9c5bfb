//! Discord channel for ReplyBot.
//!
//! Provides a `DiscordChannel` struct that implements the `Channel` trait,
//! connecting to Discord via serenity and handing each incoming message to
//! an `OnMessageFn` callback.

pub mod config;
pub mod convert;
pub mod handler;

use std::sync::Arc;

use async_trait::async_trait;
use replybot_common::{ChannelId, Error, Result};
use serenity::all::{self as serenity_model, CreateMessage};
use tokio::sync::broadcast;
use tracing::{error, info};

use crate::traits::{Channel, ChannelEvent, ChannelStatus, OnMessageFn};
pub use config::DiscordConfig;
use handler::DiscordHandler;

/// Discord channel implementation.
///
/// Manages a serenity client lifecycle and bridges Discord events into
/// `ChannelEvent`s.
pub struct DiscordChannel {
    /// Discord-specific configuration.
    config: DiscordConfig,

    /// Current connection status.
    status: ChannelStatus,

    /// Callback used for incoming Discord text messages.
    on_message: OnMessageFn,

    /// Broadcast sender for channel events.
    event_tx: broadcast::Sender<ChannelEvent>,

    /// HTTP client for sending messages (available after connect).
    http: Option<Arc<serenity_model::Http>>,

    /// Handle to the spawned client task.
    client_handle: Option<tokio::task::JoinHandle<()>>,

    /// Shard manager for graceful shutdown.
    shard_manager: Option<Arc<serenity_model::ShardManager>>,
}

impl std::fmt::Debug for DiscordChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordChannel")
            .field("status", &self.status)
            .field("connected", &self.http.is_some())
            .finish()
    }
}

impl DiscordChannel {
    pub fn new(config: DiscordConfig, on_message: OnMessageFn) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            config,
            status: ChannelStatus::Disconnected,
            on_message,
            event_tx,
            http: None,
            client_handle: None,
            shard_manager: None,
        }
    }

    fn http(&self) -> Result<&Arc<serenity_model::Http>> {
        self.http
            .as_ref()
            .ok_or_else(|| Error::Channel("not connected to Discord".into()))
    }
}

/// Send `text` to a Discord channel as one or more messages. Stops at the
/// first failed chunk.
pub(crate) async fn send_chunked(
    http: &serenity_model::Http,
    channel: serenity_model::ChannelId,
    text: &str,
) -> Result<()> {
    for chunk in convert::reply_chunks(text) {
        channel
            .send_message(http, CreateMessage::new().content(chunk))
            .await
            .map_err(|e| Error::Channel(format!("failed to send message: {e}")))?;
    }
    Ok(())
}

#[async_trait]
impl Channel for DiscordChannel {
    fn channel_type(&self) -> &str {
        "discord"
    }

    fn display_name(&self) -> &str {
        "Discord"
    }

    async fn connect(&mut self) -> Result<()> {
        if matches!(self.status, ChannelStatus::Connected) {
            return Ok(());
        }

        self.status = ChannelStatus::Connecting;
        info!("connecting to Discord...");

        let handler = DiscordHandler::new(self.event_tx.clone(), Arc::clone(&self.on_message));

        let client = serenity_model::Client::builder(&self.config.bot_token, self.config.intents)
            .event_handler(handler)
            .await;
        let mut client = match client {
            Ok(client) => client,
            Err(e) => {
                self.status = ChannelStatus::Error(e.to_string());
                return Err(Error::Channel(format!("failed to build Discord client: {e}")));
            }
        };

        self.http = Some(client.http.clone());
        self.shard_manager = Some(client.shard_manager.clone());

        // The client runs until its shards are shut down or it hits a fatal
        // error such as an invalid token.
        let event_tx = self.event_tx.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = client.start().await {
                error!("Discord client error: {e}");
                let _ = event_tx.send(ChannelEvent::Error(format!("Discord client error: {e}")));
            }
        });

        self.client_handle = Some(handle);
        self.status = ChannelStatus::Connected;
        info!("Discord channel started");

        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if matches!(self.status, ChannelStatus::Disconnected) {
            return Ok(());
        }

        info!("disconnecting from Discord...");

        if let Some(shard_manager) = self.shard_manager.take() {
            shard_manager.shutdown_all().await;
        }

        if let Some(handle) = self.client_handle.take() {
            let _ = handle.await;
        }

        self.http = None;
        self.status = ChannelStatus::Disconnected;

        let _ = self
            .event_tx
            .send(ChannelEvent::StatusChanged(ChannelStatus::Disconnected));

        info!("Discord channel disconnected");
        Ok(())
    }

    async fn send_text(&self, channel_id: &ChannelId, text: &str) -> Result<()> {
        let http = self.http()?;

        let discord_channel_id = channel_id
            .as_str()
            .parse::<u64>()
            .map_err(|_| Error::Channel(format!("invalid Discord channel id: {channel_id}")))?;
        send_chunked(
            http.as_ref(),
            serenity_model::ChannelId::new(discord_channel_id),
            text,
        )
        .await
    }

    fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.event_tx.subscribe()
    }

    fn status(&self) -> ChannelStatus {
        self.status.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replybot_common::{IncomingMessage, UserId};

    fn test_channel() -> DiscordChannel {
        let on_msg: OnMessageFn = Arc::new(|_bot: UserId, _msg: IncomingMessage| {
            Box::pin(async { Some("test".to_string()) })
        });
        let config = DiscordConfig::new("test-token-not-real").expect("valid config");
        DiscordChannel::new(config, on_msg)
    }

    #[test]
    fn new_channel_starts_disconnected() {
        assert_eq!(test_channel().status(), ChannelStatus::Disconnected);
    }

    #[test]
    fn channel_type_returns_discord() {
        let channel = test_channel();
        assert_eq!(channel.channel_type(), "discord");
        assert_eq!(channel.display_name(), "Discord");
    }

    #[tokio::test]
    async fn disconnect_when_never_connected_is_noop() {
        let mut channel = test_channel();
        let mut rx = channel.subscribe();
        channel.disconnect().await.expect("disconnect should succeed");
        assert_eq!(channel.status(), ChannelStatus::Disconnected);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn send_text_without_connection_fails() {
        let channel = test_channel();
        let err = channel
            .send_text(&ChannelId::from_string("123"), "hello")
            .await
            .expect_err("should fail when not connected");
        assert!(err.to_string().contains("not connected"));
    }
}
