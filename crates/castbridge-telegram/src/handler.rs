//! Channel-post handler registered in the teloxide Dispatcher.

use std::sync::Arc;

use teloxide::prelude::*;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

use castbridge_core::types::{InboundPost, PhotoVariant};
use castbridge_pipeline::{process_post, Bridge, PostOutcome};

/// Snapshot the post and hand it to its own task. Never fails, so one bad
/// post cannot stall the dispatcher.
pub async fn handle_channel_post(
    msg: Message,
    bridge: Arc<Bridge>,
    tracker: TaskTracker,
) -> ResponseResult<()> {
    let post = to_inbound_post(&msg);
    debug!(
        chat_id = post.chat_id,
        message_id = post.message_id,
        photos = post.photo_variants.len(),
        "Telegram: channel post received"
    );

    tracker.spawn(async move {
        match process_post(&bridge, &post).await {
            PostOutcome::Published { hash } => {
                info!(chat_id = post.chat_id, message_id = post.message_id, %hash, "post bridged");
            }
            PostOutcome::Deleted { hash } => {
                info!(chat_id = post.chat_id, message_id = post.message_id, %hash, "cast retracted");
            }
            PostOutcome::Skipped(reason) => {
                debug!(chat_id = post.chat_id, message_id = post.message_id, ?reason, "post skipped");
            }
            PostOutcome::Failed(e) => {
                debug!(chat_id = post.chat_id, message_id = post.message_id, code = e.code(), "post not bridged");
            }
        }
    });

    Ok(())
}

/// Copy the fields the pipeline needs out of a Telegram message.
///
/// Photo sizes arrive smallest first, so the slice index is the resolution rank.
pub fn to_inbound_post(msg: &Message) -> InboundPost {
    let photo_variants = msg
        .photo()
        .map(|sizes| {
            sizes
                .iter()
                .enumerate()
                .map(|(rank, size)| PhotoVariant {
                    retrieval_handle: size.file.id.clone(),
                    resolution_rank: u32::try_from(rank).unwrap_or(u32::MAX),
                })
                .collect()
        })
        .unwrap_or_default();

    InboundPost {
        text: msg.text().map(String::from),
        caption: msg.caption().map(String::from),
        photo_variants,
        chat_id: msg.chat.id.0,
        message_id: msg.id.0,
        timestamp: msg.date,
    }
}
