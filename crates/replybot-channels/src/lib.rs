pub mod traits;

#[cfg(feature = "discord")]
pub mod discord;

#[cfg(feature = "discord")]
pub use discord::{DiscordChannel, DiscordConfig};
pub use traits::{Channel, ChannelEvent, ChannelStatus, OnMessageFn};
