use replybot_common::{Error, Result};

/// Sanity checks for the bot token read from the environment.
pub struct TokenValidator;

impl TokenValidator {
    /// Trim surrounding whitespace and drop a leading `Bot ` scheme, which the
    /// gateway client adds on its own.
    pub fn normalize(token: &str) -> Result<String> {
        let token = token.trim_start();
        let token = token.strip_prefix("Bot ").unwrap_or(token).trim();

        if token.is_empty() {
            return Err(Error::Config("bot token is empty (set TOKEN)".into()));
        }
        if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(Error::Config(
                "bot token contains whitespace or control characters".into(),
            ));
        }

        Ok(token.to_string())
    }
}
