pub mod adapter;
pub mod attach;
pub mod error;
pub mod handler;
pub mod send;

#[cfg(test)]
mod mock;

pub use adapter::TelegramAdapter;
pub use attach::TelegramMediaSource;
pub use error::TelegramError;
pub use send::TelegramNotifier;
