//! HTTP clients for the services a cast passes through: Neynar for the
//! Farcaster cast endpoint, Imgur for hosting photo attachments.

pub mod error;
pub mod imgur;
pub mod neynar;

#[cfg(test)]
mod mock;

pub use error::ClientError;
pub use imgur::ImgurClient;
pub use neynar::NeynarClient;
