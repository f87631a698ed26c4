use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Voice,
    Photo,
    Video,
    VideoNote,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Text => write!(f, "text"),
            MessageKind::Voice => write!(f, "voice"),
            MessageKind::Photo => write!(f, "photo"),
            MessageKind::Video => write!(f, "video"),
            MessageKind::VideoNote => write!(f, "video_note"),
        }
    }
}

/// One chat message as handed over by the ingestion side. Media kinds carry
/// whatever text was extracted for them (caption, transcript).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Message {
    pub user: String,
    #[serde(alias = "type")]
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    pub fn new(user: impl Into<String>, kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            kind,
            text: text.into(),
        }
    }

    pub fn text(user: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(user, MessageKind::Text, text)
    }
}

/// A message together with its chat-level id, used to advance the checkpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct TrackedMessage {
    pub message_id: i64,
    #[serde(flatten)]
    pub message: Message,
}

/// Topic key -> messages of that topic for the current window.
pub type TopicGroups = BTreeMap<String, Vec<Message>>;

/// Same as [`TopicGroups`] but with message ids attached.
pub type TrackedTopicGroups = BTreeMap<String, Vec<TrackedMessage>>;
