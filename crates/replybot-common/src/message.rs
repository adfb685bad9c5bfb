use crate::types::{ChannelId, UserId};

/// A text message received from the gateway, reduced to the fields the bot
/// needs to decide on a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub channel_id: ChannelId,
    pub author_id: UserId,
    pub text: String,
}

impl IncomingMessage {
    pub fn text(channel_id: ChannelId, author_id: UserId, text: impl Into<String>) -> Self {
        Self {
            channel_id,
            author_id,
            text: text.into(),
        }
    }
}
