pub mod bootstrap;
pub mod dispatch;
pub mod reload;
pub mod server;
pub mod signals;

pub use dispatch::Dispatcher;
pub use server::ReplyBot;
