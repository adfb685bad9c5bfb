use replybot_common::UserId;
use replybot_config::BotConfig;

/// Decides which users may trigger command replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allowlist {
    approved: Vec<UserId>,
    mode: AllowlistMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowlistMode {
    /// Allow all users (no restrictions).
    Open,
    /// Only allow users in the allowlist.
    Restricted,
}

impl Allowlist {
    pub fn open() -> Self {
        Self {
            approved: Vec::new(),
            mode: AllowlistMode::Open,
        }
    }

    pub fn restricted(users: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            approved: users.into_iter().collect(),
            mode: AllowlistMode::Restricted,
        }
    }

    /// `approved_only` selects the mode; `ids` are kept in file order.
    pub fn from_config(config: &BotConfig) -> Self {
        if config.approved_only {
            Self::restricted(config.ids.iter().cloned())
        } else {
            Self::open()
        }
    }

    /// Same decision as `from_config(config).is_allowed(user_id)`, scanning
    /// `config.ids` in place.
    pub fn config_allows(config: &BotConfig, user_id: &UserId) -> bool {
        !config.approved_only || config.ids.iter().any(|id| id == user_id)
    }

    pub fn mode(&self) -> AllowlistMode {
        self.mode
    }

    pub fn is_allowed(&self, user_id: &UserId) -> bool {
        match self.mode {
            AllowlistMode::Open => true,
            AllowlistMode::Restricted => self.approved.iter().any(|id| id == user_id),
        }
    }
}
