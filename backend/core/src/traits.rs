use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::message::PinnedMessage;
use crate::types::Joke;

/// Connection to the chat platform, as seen by the dispatch pipeline.
///
/// Adapters are assumed pre-authenticated. Inbound events travel over the
/// `EventBus`, not through this trait.
#[async_trait]
pub trait PlatformConnection: Send + Sync {
    /// Human-readable platform name for logging.
    fn name(&self) -> &str;

    /// The bot's own user id, once the session is ready.
    fn bot_user_id(&self) -> Option<String>;

    async fn send_message(&self, channel_id: &str, content: &str) -> Result<()>;

    async fn pinned_messages(&self, channel_id: &str) -> Result<Vec<PinnedMessage>>;

    async fn resolve_display_name(&self, user_id: &str) -> Result<String>;
}

/// Upstream provider of random jokes.
#[async_trait]
pub trait JokeSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch one joke. Must return `BotError::Cancelled` promptly once
    /// `cancel` fires.
    async fn fetch(&self, cancel: &CancellationToken) -> Result<Joke>;
}

/// Fire-and-forget usage counters.
pub trait MetricsSink: Send + Sync {
    /// Every non-self message seen, replied to or not.
    fn record_message(&self, channel: &str, user: &str);

    /// Messages that produced at least one reply.
    fn record_bot_usage(&self, channel: &str, user: &str);
}
