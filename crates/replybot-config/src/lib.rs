pub mod loader;
pub mod model;
pub mod store;
pub mod watcher;

pub use loader::{ConfigLoader, DEFAULT_CONFIG_FILE};
pub use model::BotConfig;
pub use store::ConfigStore;
pub use watcher::ConfigWatcher;
