//! Pinned-message cache: per-channel excerpts backing the `!pin` command.
//!
//! Channels are filled lazily on first lookup and refreshed in place by a
//! background loop. Platform fetches happen outside the lock; only the map
//! mutation is serialized.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use buzzbot_core::{BotError, PinnedMessage, PlatformConnection, RandomSource, Result, pick};
use tokio::sync::Mutex;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Returned in place of an excerpt that rendered to nothing.
pub const EMPTY_EXCERPT_PLACEHOLDER: &str = "undefined";

/// Render one pinned message for chat.
///
/// Link-like content and attachment-only pins pass through as bare URLs;
/// everything else is quoted and attributed to the pin's author.
pub fn excerpt_for(pin: &PinnedMessage) -> String {
    if pin.content.is_empty() {
        return pin.attachments.first().cloned().unwrap_or_default();
    }
    if pin.content.contains("http") {
        return pin.content.clone();
    }
    format!("> {} \n > - {} \n", pin.content, pin.author_display_name)
}

pub struct PinnedMessageCache {
    platform: Arc<dyn PlatformConnection>,
    random: Arc<dyn RandomSource>,
    cached: Mutex<HashMap<String, Vec<String>>>,
}

impl PinnedMessageCache {
    pub fn new(platform: Arc<dyn PlatformConnection>, random: Arc<dyn RandomSource>) -> Self {
        Self {
            platform,
            random,
            cached: Mutex::new(HashMap::new()),
        }
    }

    /// One random excerpt for `channel_id`, fetching the pins on first use.
    ///
    /// A failed first fetch is not cached, so the next call retries.
    pub async fn get(&self, channel_id: &str) -> Result<String> {
        {
            let cached = self.cached.lock().await;
            if let Some(excerpts) = cached.get(channel_id) {
                return self.choose(channel_id, excerpts);
            }
        }

        let fresh = self.fetch_excerpts(channel_id).await?;
        debug!(channel = %channel_id, pins = fresh.len(), "Pinned cache filled");

        let mut cached = self.cached.lock().await;
        let excerpts = cached.entry(channel_id.to_string()).or_insert(fresh);
        self.choose(channel_id, excerpts)
    }

    /// Channels that currently have a cache entry.
    pub async fn known_channels(&self) -> Vec<String> {
        self.cached.lock().await.keys().cloned().collect()
    }

    /// Refetch every known channel. Channels whose fetch fails keep their
    /// previous entry. Returns how many channels were refreshed.
    pub async fn refresh_all(&self) -> usize {
        let mut refreshed = 0;
        for channel_id in self.known_channels().await {
            match self.fetch_excerpts(&channel_id).await {
                Ok(excerpts) => {
                    self.cached.lock().await.insert(channel_id, excerpts);
                    refreshed += 1;
                }
                Err(e) => {
                    warn!(channel = %channel_id, error = %e, "Pinned refresh failed; keeping cached entry");
                }
            }
        }
        refreshed
    }

    /// Refresh all channels every `period` until `cancel` fires.
    pub async fn run_refresh_loop(&self, period: Duration, cancel: CancellationToken) {
        let period = period.max(Duration::from_secs(1));
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately and the cache starts empty.
        interval.tick().await;

        info!(period_secs = period.as_secs(), "Pinned cache refresh loop started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        refreshed = self.refresh_all() => {
                            debug!(refreshed, "Pinned cache refresh sweep done");
                        }
                    }
                }
            }
        }
        info!("Pinned cache refresh loop stopped");
    }

    async fn fetch_excerpts(&self, channel_id: &str) -> Result<Vec<String>> {
        let pins = self.platform.pinned_messages(channel_id).await?;
        Ok(pins.iter().map(excerpt_for).collect())
    }

    fn choose(&self, channel_id: &str, excerpts: &[String]) -> Result<String> {
        match pick(self.random.as_ref(), excerpts) {
            None => Err(BotError::NoPinnedMessages(channel_id.to_string())),
            Some(excerpt) if excerpt.is_empty() => Ok(EMPTY_EXCERPT_PLACEHOLDER.to_string()),
            Some(excerpt) => Ok(excerpt.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use buzzbot_core::ScriptedRandom;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Platform whose pins can be swapped between calls. `None` fails the fetch.
    #[derive(Default)]
    struct PinBoard {
        pins: std::sync::Mutex<HashMap<String, Option<Vec<PinnedMessage>>>>,
        fetches: AtomicUsize,
        /// Fetches never complete while set.
        stalled: AtomicBool,
    }

    impl PinBoard {
        fn set(&self, channel: &str, pins: Option<Vec<PinnedMessage>>) {
            self.pins.lock().unwrap().insert(channel.to_string(), pins);
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PlatformConnection for PinBoard {
        fn name(&self) -> &str {
            "pinboard"
        }

        fn bot_user_id(&self) -> Option<String> {
            Some("bot".into())
        }

        async fn send_message(&self, _channel_id: &str, _content: &str) -> Result<()> {
            Ok(())
        }

        async fn pinned_messages(&self, channel_id: &str) -> Result<Vec<PinnedMessage>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.stalled.load(Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            match self.pins.lock().unwrap().get(channel_id) {
                Some(Some(pins)) => Ok(pins.clone()),
                _ => Err(BotError::upstream("pinboard", "fetch failed")),
            }
        }

        async fn resolve_display_name(&self, user_id: &str) -> Result<String> {
            Ok(user_id.to_string())
        }
    }

    fn cache(board: &Arc<PinBoard>) -> PinnedMessageCache {
        PinnedMessageCache::new(board.clone(), Arc::new(ScriptedRandom::first()))
    }

    #[test]
    fn excerpt_formatting() {
        assert_eq!(
            excerpt_for(&PinnedMessage::new("hello", "alice")),
            "> hello \n > - alice \n"
        );
        assert_eq!(
            excerpt_for(&PinnedMessage::new("look https://x/y.gif", "bob")),
            "look https://x/y.gif"
        );
        let attachment_only = PinnedMessage {
            attachments: vec!["https://cdn/a.png".into()],
            ..PinnedMessage::new("", "carol")
        };
        assert_eq!(excerpt_for(&attachment_only), "https://cdn/a.png");
        assert_eq!(excerpt_for(&PinnedMessage::new("", "dave")), "");
    }

    #[tokio::test]
    async fn first_lookup_fetches_once_then_hits_cache() {
        let board = Arc::new(PinBoard::default());
        board.set("c1", Some(vec![PinnedMessage::new("hello", "alice")]));
        let cache = cache(&board);

        assert_eq!(cache.get("c1").await.unwrap(), "> hello \n > - alice \n");
        assert_eq!(board.fetches(), 1);
        assert_eq!(cache.get("c1").await.unwrap(), "> hello \n > - alice \n");
        assert_eq!(board.fetches(), 1);
    }

    #[tokio::test]
    async fn empty_channel_is_cached_and_reported() {
        let board = Arc::new(PinBoard::default());
        board.set("c1", Some(vec![]));
        let cache = cache(&board);

        assert!(matches!(cache.get("c1").await, Err(BotError::NoPinnedMessages(_))));
        assert!(matches!(cache.get("c1").await, Err(BotError::NoPinnedMessages(_))));
        assert_eq!(board.fetches(), 1);
        assert_eq!(cache.known_channels().await, vec!["c1".to_string()]);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let board = Arc::new(PinBoard::default());
        let cache = cache(&board);

        assert!(matches!(cache.get("c1").await, Err(BotError::UpstreamUnavailable { .. })));
        assert!(cache.known_channels().await.is_empty());

        board.set("c1", Some(vec![PinnedMessage::new("later", "alice")]));
        assert!(cache.get("c1").await.is_ok());
        assert_eq!(board.fetches(), 2);
    }

    #[tokio::test]
    async fn blank_excerpt_becomes_placeholder() {
        let board = Arc::new(PinBoard::default());
        board.set("c1", Some(vec![PinnedMessage::new("", "alice")]));
        let cache = cache(&board);
        assert_eq!(cache.get("c1").await.unwrap(), EMPTY_EXCERPT_PLACEHOLDER);
    }

    #[tokio::test]
    async fn refresh_overwrites_and_skips_failures() {
        let board = Arc::new(PinBoard::default());
        board.set("c1", Some(vec![PinnedMessage::new("old", "alice")]));
        board.set("c2", Some(vec![PinnedMessage::new("keep", "bob")]));
        let cache = cache(&board);
        cache.get("c1").await.unwrap();
        cache.get("c2").await.unwrap();

        board.set("c1", Some(vec![PinnedMessage::new("new", "alice")]));
        board.set("c2", None);
        assert_eq!(cache.refresh_all().await, 1);

        assert_eq!(cache.get("c1").await.unwrap(), "> new \n > - alice \n");
        assert_eq!(cache.get("c2").await.unwrap(), "> keep \n > - bob \n");
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_loop_ticks_until_cancelled() {
        let board = Arc::new(PinBoard::default());
        board.set("c1", Some(vec![PinnedMessage::new("old", "alice")]));
        let cache = Arc::new(cache(&board));
        cache.get("c1").await.unwrap();

        let cancel = CancellationToken::new();
        let handle = tokio::spawn({
            let cache = cache.clone();
            let cancel = cancel.clone();
            async move { cache.run_refresh_loop(Duration::from_secs(60), cancel).await }
        });

        board.set("c1", Some(vec![PinnedMessage::new("new", "alice")]));
        time::sleep(Duration::from_secs(61)).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert_eq!(board.fetches(), 2);
        assert_eq!(cache.get("c1").await.unwrap(), "> new \n > - alice \n");

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_loop_stops_during_stalled_sweep() {
        let board = Arc::new(PinBoard::default());
        board.set("c1", Some(vec![PinnedMessage::new("old", "alice")]));
        let cache = Arc::new(cache(&board));
        cache.get("c1").await.unwrap();

        let cancel = CancellationToken::new();
        let handle = tokio::spawn({
            let cache = cache.clone();
            let cancel = cancel.clone();
            async move { cache.run_refresh_loop(Duration::from_secs(60), cancel).await }
        });

        board.stalled.store(true, Ordering::SeqCst);
        time::sleep(Duration::from_secs(61)).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert_eq!(board.fetches(), 2);

        cancel.cancel();
        time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("refresh loop ignored cancellation")
            .unwrap();
    }
}
