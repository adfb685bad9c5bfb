use replybot_common::UserId;
use serenity::all::{self as serenity_model, Context, EventHandler, Message as SerenityMessage, Ready};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::traits::{ChannelEvent, ChannelStatus, OnMessageFn};

use super::{convert, send_chunked};

/// Serenity event handler that hands every message to the `on_message`
/// callback and sends back whatever reply it produces.
pub struct DiscordHandler {
    /// Broadcast sender for emitting channel events to subscribers.
    event_tx: broadcast::Sender<ChannelEvent>,

    /// Callback deciding on a reply for each incoming message.
    on_message: OnMessageFn,
}

impl DiscordHandler {
    pub fn new(event_tx: broadcast::Sender<ChannelEvent>, on_message: OnMessageFn) -> Self {
        Self {
            event_tx,
            on_message,
        }
    }

    fn emit(&self, event: ChannelEvent) {
        if let Err(e) = self.event_tx.send(event) {
            debug!("no subscribers for channel event: {e}");
        }
    }
}

#[serenity::async_trait]
impl EventHandler for DiscordHandler {
    /// Fired when the bot successfully connects and is ready.
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            bot_id = %ready.user.id,
            "Discord bot connected as {} (guilds: {})",
            ready.user.name,
            ready.guilds.len()
        );
        self.emit(ChannelEvent::StatusChanged(ChannelStatus::Connected));
    }

    /// Fired when the bot resumes a previously interrupted gateway connection.
    async fn resume(&self, _ctx: Context, _: serenity_model::ResumedEvent) {
        info!("Discord gateway connection resumed");
        self.emit(ChannelEvent::StatusChanged(ChannelStatus::Connected));
    }

    /// Fired when a message is received in any channel the bot can see.
    async fn message(&self, ctx: Context, msg: SerenityMessage) {
        let bot_user_id = UserId::from(ctx.cache.current_user().id.get());
        let incoming = convert::discord_message_to_incoming(&msg);

        debug!(
            message_id = %msg.id,
            author = %msg.author.name,
            channel = %msg.channel_id,
            "received discord message"
        );

        let Some(reply) = (self.on_message)(bot_user_id, incoming).await else {
            return;
        };

        if reply.is_empty() {
            debug!(channel = %msg.channel_id, "configured reply is empty, nothing sent");
            return;
        }

        if let Err(e) = send_chunked(&ctx.http, msg.channel_id, &reply).await {
            warn!(channel = %msg.channel_id, "failed to send Discord reply: {e}");
        }
    }
}
