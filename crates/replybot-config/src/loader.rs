use std::path::{Path, PathBuf};

use replybot_common::{Error, Result};
use tracing::info;

use crate::model::BotConfig;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Reads and parses the bot config from a single YAML file.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::with_path(DEFAULT_CONFIG_FILE)
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file and parse it. The whole file must parse; there are no
    /// partial results.
    pub fn load(&self) -> Result<BotConfig> {
        info!("loading config from {}", self.path.display());
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::Config(format!("failed to read {}: {e}", self.path.display()))
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<BotConfig> {
        serde_yaml::from_str(contents)
            .map_err(|e| Error::Config(format!("failed to parse YAML config: {e}")))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
