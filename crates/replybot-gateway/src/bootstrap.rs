use replybot_channels::{DiscordChannel, DiscordConfig, OnMessageFn};
use replybot_common::Result;
use replybot_security::TokenValidator;

/// Environment variable holding the Discord bot token.
pub const TOKEN_ENV_VAR: &str = "TOKEN";

/// Build the Discord channel from a raw token as found in the environment.
pub fn build_discord_channel(raw_token: &str, on_message: OnMessageFn) -> Result<DiscordChannel> {
    let token = TokenValidator::normalize(raw_token)?;
    let config = DiscordConfig::new(token)?;
    Ok(DiscordChannel::new(config, on_message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use replybot_channels::{Channel, ChannelStatus};
    use replybot_common::{IncomingMessage, UserId};
    use std::sync::Arc;

    fn silent() -> OnMessageFn {
        Arc::new(|_bot: UserId, _msg: IncomingMessage| Box::pin(async { None }))
    }

    #[test]
    fn builds_disconnected_channel_from_prefixed_token() {
        let channel = build_discord_channel("Bot abc.def.ghi\n", silent()).expect("valid token");
        assert_eq!(channel.channel_type(), "discord");
        assert_eq!(channel.status(), ChannelStatus::Disconnected);
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = build_discord_channel("  ", silent()).expect_err("empty token should fail");
        assert!(err.to_string().contains(TOKEN_ENV_VAR));
    }
}
