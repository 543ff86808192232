//! Message normalization and channel routing.
//!
//! Turns an [`InboundPost`] into a [`ParsedCommand`]:
//!
//! | Effective text                 | Result |
//! |--------------------------------|--------|
//! | `/delete <hash>`               | `Delete { target_hash }` |
//! | `/delete` with ≠ 2 tokens      | `Invalid(MalformedDelete)` |
//! | `/<known> rest`                | `Publish` to the mapped channel, text `rest` |
//! | `/<unknown> rest`              | `Publish` to the default channel, text unchanged |
//! | anything else                  | `Publish` to the default channel, text unchanged |

use std::collections::BTreeMap;

use tracing::warn;

use crate::types::{InboundPost, InvalidReason, ParsedCommand, PublishCommand};

const DELETE_COMMAND: &str = "/delete";

/// Exact, case-sensitive prefix → channel lookup with a fallback channel.
#[derive(Debug, Clone)]
pub struct ChannelRouter {
    table: BTreeMap<String, String>,
    default_channel: String,
}

impl ChannelRouter {
    pub fn new(table: BTreeMap<String, String>, default_channel: impl Into<String>) -> Self {
        Self {
            table,
            default_channel: default_channel.into(),
        }
    }

    pub fn lookup(&self, prefix: &str) -> Option<&str> {
        self.table.get(prefix).map(String::as_str)
    }

    pub fn default_channel(&self) -> &str {
        &self.default_channel
    }
}

/// Classify a post. Pure apart from the unknown-prefix diagnostic.
pub fn normalize(post: &InboundPost, router: &ChannelRouter) -> ParsedCommand {
    let text = post.effective_text();

    if starts_with_ignore_case(text, DELETE_COMMAND) {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        return match tokens.as_slice() {
            [_, hash] => ParsedCommand::Delete {
                target_hash: (*hash).to_string(),
            },
            _ => ParsedCommand::Invalid(InvalidReason::MalformedDelete {
                tokens: tokens.len(),
            }),
        };
    }

    let photo = post.best_photo().cloned();
    if text.is_empty() && photo.is_none() {
        return ParsedCommand::Invalid(InvalidReason::EmptyPost);
    }

    let mut command = PublishCommand {
        channel_id: router.default_channel().to_string(),
        channel_prefix: None,
        remainder_text: text.to_string(),
        photo,
    };

    if let Some(stripped) = text.strip_prefix('/') {
        let (candidate, rest) = match stripped.split_once(char::is_whitespace) {
            Some((head, tail)) => (head, tail),
            None => (stripped, ""),
        };
        match router.lookup(candidate) {
            Some(channel) => {
                command.channel_id = channel.to_string();
                command.channel_prefix = Some(candidate.to_string());
                command.remainder_text = rest.to_string();
            }
            None => {
                warn!(
                    prefix = candidate,
                    default = router.default_channel(),
                    "unknown channel prefix, using default channel"
                );
            }
        }
    }

    ParsedCommand::Publish(command)
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}
