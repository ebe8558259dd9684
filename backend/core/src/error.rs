use thiserror::Error;

/// Top-level error type for the bot.
///
/// Only `Configuration` is fatal; every other variant is a per-request
/// outcome that the dispatch layer logs and swallows.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("upstream {upstream} unavailable: {message}")]
    UpstreamUnavailable { upstream: String, message: String },

    #[error("no pinned messages in channel {0}")]
    NoPinnedMessages(String),

    #[error("no keyword matched")]
    NoMatch,

    #[error("could not send message to channel {channel_id}: {message}")]
    Send { channel_id: String, message: String },

    #[error("{0} timed out")]
    Timeout(String),

    #[error("{0} cancelled")]
    Cancelled(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BotError {
    pub fn upstream(upstream: impl Into<String>, message: impl ToString) -> Self {
        Self::UpstreamUnavailable {
            upstream: upstream.into(),
            message: message.to_string(),
        }
    }

    pub fn send(channel_id: impl Into<String>, message: impl ToString) -> Self {
        Self::Send {
            channel_id: channel_id.into(),
            message: message.to_string(),
        }
    }

    /// Normal absence of content rather than a failure.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::NoPinnedMessages(_) | Self::NoMatch)
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
