use replybot_common::{Error, Result};
use serenity::all::GatewayIntents;

/// Settings needed to open a Discord gateway session.
#[derive(Clone)]
pub struct DiscordConfig {
    pub bot_token: String,
    pub intents: GatewayIntents,
}

impl DiscordConfig {
    /// Guild message events with their content; that is all the bot reacts to.
    pub fn default_intents() -> GatewayIntents {
        GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
    }

    pub fn new(bot_token: impl Into<String>) -> Result<Self> {
        let bot_token = bot_token.into();
        if bot_token.is_empty() {
            return Err(Error::Config("discord bot_token is required".into()));
        }
        Ok(Self {
            bot_token,
            intents: Self::default_intents(),
        })
    }
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("bot_token", &"<redacted>")
            .field("intents", &self.intents)
            .finish()
    }
}
