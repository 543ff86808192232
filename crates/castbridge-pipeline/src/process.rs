//! Per-post orchestration.
//!
//! Publish: normalize → length check → extract embeds (+ media) → publish → ack.
//! Delete:  normalize → retract → ack.
//!
//! Every failure is handled here and reported through [`PostOutcome`]; nothing
//! propagates back to the event adapter.

use tracing::{debug, info, warn};

use castbridge_core::command::normalize;
use castbridge_core::embed::{assemble_embeds, extract_embeds};
use castbridge_core::error::BridgeError;
use castbridge_core::types::{
    CastRequest, DeleteRequest, InboundPost, InvalidReason, ParsedCommand, PublishCommand,
};

use crate::ack;
use crate::bridge::Bridge;
use crate::media::MediaPipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No text, caption or photo.
    EmptyPost,
    /// Nothing left after URL and media handling.
    NothingToPublish,
}

/// How a single post ended. Logged by the caller; never sent to the chat.
#[derive(Debug)]
pub enum PostOutcome {
    Published { hash: String },
    Deleted { hash: String },
    Skipped(SkipReason),
    Failed(BridgeError),
}

/// Process one inbound post to completion.
pub async fn process_post(bridge: &Bridge, post: &InboundPost) -> PostOutcome {
    match normalize(post, bridge.router()) {
        ParsedCommand::Publish(command) => publish(bridge, post, command).await,
        ParsedCommand::Delete { target_hash } => retract(bridge, post, target_hash).await,
        ParsedCommand::Invalid(InvalidReason::MalformedDelete { tokens }) => {
            let err = BridgeError::MalformedDeleteCommand { tokens };
            warn!(chat_id = post.chat_id, message_id = post.message_id, code = err.code(), "{err}");
            PostOutcome::Failed(err)
        }
        ParsedCommand::Invalid(InvalidReason::EmptyPost) => {
            debug!(chat_id = post.chat_id, message_id = post.message_id, "empty post ignored");
            PostOutcome::Skipped(SkipReason::EmptyPost)
        }
    }
}

async fn publish(bridge: &Bridge, post: &InboundPost, command: PublishCommand) -> PostOutcome {
    let max = bridge.runtime().max_cast_length;
    let len = command.remainder_text.chars().count();
    if len > max {
        let err = BridgeError::MessageTooLong { len, max };
        warn!(chat_id = post.chat_id, message_id = post.message_id, code = err.code(), "{err}; not sent");
        return PostOutcome::Failed(err);
    }

    let extracted = extract_embeds(&command.remainder_text);

    let media_url = match &command.photo {
        Some(photo) => {
            MediaPipeline::new(bridge, post.chat_id)
                .run(photo)
                .await
                .media_url
        }
        None => None,
    };

    let embeds = assemble_embeds(media_url, &extracted.urls);
    if extracted.display_text.is_empty() && embeds.is_empty() {
        info!(chat_id = post.chat_id, message_id = post.message_id, "nothing left to cast, skipping");
        return PostOutcome::Skipped(SkipReason::NothingToPublish);
    }

    let request = CastRequest {
        text: extracted.display_text,
        channel_id: command.channel_id,
        signer_uuid: bridge.signer_uuid().to_string(),
        embeds,
    };

    info!(
        chat_id = post.chat_id,
        message_id = post.message_id,
        channel = %request.channel_id,
        embeds = request.embeds.len(),
        "posting to channel"
    );

    let result = match bridge.bounded("publish", bridge.casts().publish(&request)).await {
        Ok(result) => result,
        Err(e) => {
            warn!(chat_id = post.chat_id, channel = %request.channel_id, code = e.code(), error = %e, "cast publish failed");
            return PostOutcome::Failed(e);
        }
    };

    let Some(hash) = result.correlation_hash().map(String::from) else {
        let err = BridgeError::PublishFailed("response carried no cast hash".to_string());
        warn!(chat_id = post.chat_id, channel = %request.channel_id, code = err.code(), error = %err, "cast publish failed");
        return PostOutcome::Failed(err);
    };

    info!(chat_id = post.chat_id, channel = %request.channel_id, hash = %hash, "cast published");
    ack::report_published(bridge, post.chat_id, &hash).await;
    PostOutcome::Published { hash }
}

async fn retract(bridge: &Bridge, post: &InboundPost, target_hash: String) -> PostOutcome {
    let request = DeleteRequest {
        target_hash,
        signer_uuid: bridge.signer_uuid().to_string(),
    };

    match bridge.bounded("delete", bridge.casts().delete(&request)).await {
        Ok(()) => {
            info!(chat_id = post.chat_id, hash = %request.target_hash, "cast deleted");
            ack::report_deleted(bridge, post.chat_id, &request.target_hash).await;
            PostOutcome::Deleted {
                hash: request.target_hash,
            }
        }
        Err(e) => {
            // Requester is deliberately not told about failed deletes.
            warn!(chat_id = post.chat_id, hash = %request.target_hash, code = e.code(), error = %e, "cast delete failed");
            PostOutcome::Failed(e)
        }
    }
}
