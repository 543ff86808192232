pub mod command;
pub mod config;
pub mod embed;
pub mod error;
pub mod service;
pub mod types;

pub use config::BridgeConfig;
pub use error::{BridgeError, Result};
