//! Message-to-cast translation: normalize, route, extract embeds, move media
//! through the image host, publish or retract, and acknowledge back to chat.

pub mod ack;
pub mod bridge;
pub mod media;
pub mod process;

#[cfg(test)]
mod fakes;

pub use bridge::{Bridge, BridgeServices};
pub use process::{process_post, PostOutcome, SkipReason};
