use replybot_common::{ChannelId, IncomingMessage, UserId};
use serenity::all as serenity_model;

pub const DISCORD_MESSAGE_CHAR_LIMIT: usize = 2000;

/// Convert a serenity message into the bot's `IncomingMessage`.
///
/// Only the text content is kept; attachments and embeds never match a
/// command.
pub fn discord_message_to_incoming(msg: &serenity_model::Message) -> IncomingMessage {
    IncomingMessage::text(
        ChannelId::from(msg.channel_id.get()),
        UserId::from(msg.author.id.get()),
        msg.content.clone(),
    )
}

/// Neutralize mass mentions and normalize line endings before sending.
pub fn to_discord_markdown(input: &str) -> String {
    input
        .replace("\r\n", "\n")
        .replace("@everyone", "@\u{200B}everyone")
        .replace("@here", "@\u{200B}here")
}

/// Split text into Discord-safe chunks (<= 2000 bytes each). Empty input
/// yields no chunks, since Discord rejects empty messages.
pub fn split_discord_chunks(input: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for ch in input.chars() {
        if current.len() + ch.len_utf8() > DISCORD_MESSAGE_CHAR_LIMIT {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Everything needed to turn a reply into the messages actually sent.
pub fn reply_chunks(text: &str) -> Vec<String> {
    split_discord_chunks(&to_discord_markdown(text))
}
