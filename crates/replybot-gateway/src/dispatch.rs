use std::sync::Arc;

use replybot_channels::OnMessageFn;
use replybot_common::{IncomingMessage, UserId};
use replybot_config::ConfigStore;
use replybot_security::Allowlist;
use tracing::debug;

/// Decides whether an incoming message gets a reply, and which one.
///
/// Each decision reads a single config snapshot, so a concurrent reload
/// never mixes the old command table with the new allowlist.
pub struct Dispatcher {
    store: Arc<ConfigStore>,
}

impl Dispatcher {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }

    /// Reply for `message`, or `None` when the bot should stay silent: the
    /// bot wrote it, the text is not a command, or the author is not approved.
    pub fn reply_for(&self, bot_user: &UserId, message: &IncomingMessage) -> Option<String> {
        if message.author_id == *bot_user {
            return None;
        }

        let config = self.store.current();
        let approved = Allowlist::config_allows(&config, &message.author_id);
        let reply = config.reply_for(&message.text)?;

        if !approved {
            debug!(
                author = %message.author_id,
                channel = %message.channel_id,
                "ignoring command from unapproved user"
            );
            return None;
        }

        debug!(
            author = %message.author_id,
            channel = %message.channel_id,
            command = %message.text,
            "matched command"
        );
        Some(reply.to_string())
    }

    /// Wrap the dispatcher as a channel callback.
    pub fn on_message_fn(self: &Arc<Self>) -> OnMessageFn {
        let dispatcher = Arc::clone(self);
        Arc::new(move |bot_user: UserId, message: IncomingMessage| {
            let reply = dispatcher.reply_for(&bot_user, &message);
            Box::pin(async move { reply })
        })
    }
}
