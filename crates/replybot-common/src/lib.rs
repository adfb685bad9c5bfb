pub mod error;
pub mod message;
pub mod types;

pub use error::{Error, Result};
pub use message::IncomingMessage;
pub use types::{ChannelId, UserId};
