use serde::{Deserialize, Serialize};

/// Which platform event produced an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Created,
    Updated,
}

/// A chat message delivered by the platform adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub channel_id: String,
    pub author_id: String,
    /// May be empty when the platform omitted the author (some edits).
    pub author_display_name: String,
    pub content: String,
    pub kind: MessageKind,
}

impl IncomingMessage {
    pub fn created(
        channel_id: impl Into<String>,
        author_id: impl Into<String>,
        author_display_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            author_id: author_id.into(),
            author_display_name: author_display_name.into(),
            content: content.into(),
            kind: MessageKind::Created,
        }
    }

    pub fn updated(
        channel_id: impl Into<String>,
        author_id: impl Into<String>,
        author_display_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            kind: MessageKind::Updated,
            ..Self::created(channel_id, author_id, author_display_name, content)
        }
    }
}

/// A pinned message as returned by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedMessage {
    pub content: String,
    pub author_display_name: String,
    /// Attachment URLs, in platform order.
    #[serde(default)]
    pub attachments: Vec<String>,
}

impl PinnedMessage {
    pub fn new(content: impl Into<String>, author_display_name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author_display_name: author_display_name.into(),
            attachments: Vec::new(),
        }
    }
}
