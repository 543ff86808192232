//! Acknowledgment messages sent back to the chat a post came from.
//!
//! Only successes are acknowledged. Failed publishes and failed deletes are
//! logged and nothing is sent.

use tracing::{debug, warn};

use crate::bridge::Bridge;

/// Text sent after a cast is published. Carries the hash needed by `/delete`.
pub fn published_message(hash: &str) -> String {
    format!("Cast published: {hash}\nSend \"/delete {hash}\" to retract it.")
}

/// Text sent after a cast is deleted.
pub fn deleted_message(hash: &str) -> String {
    format!("Cast deleted: {hash}")
}

pub async fn report_published(bridge: &Bridge, chat_id: i64, hash: &str) {
    send(bridge, chat_id, &published_message(hash)).await;
}

pub async fn report_deleted(bridge: &Bridge, chat_id: i64, hash: &str) {
    send(bridge, chat_id, &deleted_message(hash)).await;
}

async fn send(bridge: &Bridge, chat_id: i64, text: &str) {
    match bridge
        .bounded("notify", bridge.notifier().notify(chat_id, text))
        .await
    {
        Ok(()) => debug!(chat_id, "acknowledgment sent"),
        Err(e) => warn!(chat_id, code = e.code(), error = %e, "failed to send acknowledgment"),
    }
}
