use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use replybot_common::{ChannelId, IncomingMessage, Result, UserId};
use tokio::sync::broadcast;

/// Callback invoked for every inbound text message.
///
/// Arguments: `(bot_user_id, message)`. Returning `Some(reply)` sends the
/// reply to the channel the message came from; `None` stays silent.
pub type OnMessageFn = Arc<
    dyn Fn(UserId, IncomingMessage) -> Pin<Box<dyn Future<Output = Option<String>> + Send>>
        + Send
        + Sync,
>;

/// A connection to a messaging service the bot can listen and reply on.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Unique identifier for this channel type (e.g. "discord").
    fn channel_type(&self) -> &str;

    /// Human-readable display name.
    fn display_name(&self) -> &str;

    /// Start the channel, connecting to the external service.
    async fn connect(&mut self) -> Result<()>;

    /// Gracefully disconnect from the external service.
    async fn disconnect(&mut self) -> Result<()>;

    /// Send plain text to a channel of the external service.
    async fn send_text(&self, channel_id: &ChannelId, text: &str) -> Result<()>;

    /// Receive lifecycle events (status changes and client errors).
    fn subscribe(&self) -> broadcast::Receiver<ChannelEvent>;

    /// Current connection status.
    fn status(&self) -> ChannelStatus;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelStatus {
    Disconnected,
    Connecting,
    Connected,
    Error(String),
}

#[derive(Debug, Clone)]
pub enum ChannelEvent {
    StatusChanged(ChannelStatus),
    /// The client stopped with an unrecoverable error.
    Error(String),
}
