use async_trait::async_trait;
use buzzbot_core::IncomingMessage;
use tokio::sync::mpsc;

pub mod discord;
pub mod joke_api;

pub use discord::{DiscordAdapter, split_message};
pub use joke_api::{DEFAULT_JOKE_API_URL, JokeApiClient};

/// Chat platform adapters implement this trait alongside `PlatformConnection`.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Open the session and forward inbound messages until it ends.
    async fn start(&self, inbound_tx: mpsc::Sender<IncomingMessage>) -> anyhow::Result<()>;

    /// Close the session. Safe to call when the session never started.
    async fn shutdown(&self);

    /// Whether the gateway session is currently connected.
    fn is_connected(&self) -> bool;
}
