use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use replybot_config::{BotConfig, ConfigLoader, ConfigStore, DEFAULT_CONFIG_FILE};
use replybot_gateway::{ReplyBot, bootstrap};
use replybot_security::{Allowlist, AllowlistMode};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "replybot",
    version,
    about = "ReplyBot - answers exact-match Discord commands"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the YAML config file
    #[arg(long, env = "REPLYBOT_CONFIG", default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and answer commands (default)
    Run {
        /// Discord bot token
        #[arg(long, env = bootstrap::TOKEN_ENV_VAR, hide_env_values = true)]
        token: Option<String>,

        /// Also reload when the config file changes, not only on SIGHUP
        #[arg(long)]
        watch: bool,
    },

    /// Load and validate the config file, then exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is the normal case.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let command = cli.command.unwrap_or(Commands::Run {
        token: std::env::var(bootstrap::TOKEN_ENV_VAR).ok(),
        watch: false,
    });

    match command {
        Commands::Run { token, watch } => {
            let store = ConfigStore::open(ConfigLoader::with_path(&cli.config))
                .with_context(|| format!("failed to load {}", cli.config.display()))?;
            let bot = ReplyBot::new(Arc::new(store)).with_config_watch(watch);

            let token = token.unwrap_or_default();
            let channel = bootstrap::build_discord_channel(&token, bot.on_message_fn())?;

            bot.run(Box::new(channel)).await?;
            info!("bye");
        }
        Commands::Check => {
            let config = ConfigLoader::with_path(&cli.config)
                .load()
                .with_context(|| format!("failed to load {}", cli.config.display()))?;
            print!("{}", summarize(&cli.config, &config));
        }
    }

    Ok(())
}

fn summarize(path: &std::path::Path, config: &BotConfig) -> String {
    let mut out = format!("{}: ok\n", path.display());
    out.push_str(&format!("  commands: {}\n", config.commands.len()));

    let mut names: Vec<&str> = config.commands.keys().map(String::as_str).collect();
    names.sort_unstable();
    for name in names {
        out.push_str(&format!("    {name:?}\n"));
    }

    match Allowlist::from_config(config).mode() {
        AllowlistMode::Open => out.push_str("  allowlist: open to everyone\n"),
        AllowlistMode::Restricted => {
            out.push_str(&format!("  allowlist: {} approved id(s)\n", config.ids.len()))
        }
    }

    for warning in config.warnings() {
        out.push_str(&format!("  warning: {warning}\n"));
    }
    out
}
