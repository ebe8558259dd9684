//! Route handlers.
//!
//! Each handler is a concrete struct implementing `RouteHandler`; the
//! router picks one per message and fans out whatever lines it returns.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use buzzbot_core::{BotError, JokeSource, Result};

use crate::dispatch::RouteHandler;
use crate::pinned::PinnedMessageCache;
use crate::registry::DictionaryIndex;
use crate::types::DispatchContext;

/// Help text shown before the keyword listing.
pub const DEFAULT_HELP_PREAMBLE: &str = "Here is what I can do:\n\
!help / !command - show this list\n\
!joke - tell a random joke\n\
!pin - quote a pinned message from this channel\n\
\n\
Keywords (use as !keyword):";

// ---------------------------------------------------------------------------
// !help
// ---------------------------------------------------------------------------

pub struct HelpHandler {
    pub dictionary: Arc<DictionaryIndex>,
    pub preamble: String,
}

#[async_trait]
impl RouteHandler for HelpHandler {
    async fn replies(&self, _ctx: &DispatchContext) -> Result<Vec<String>> {
        if self.dictionary.is_empty() {
            return Ok(vec![self.preamble.clone()]);
        }
        Ok(vec![format!("{}\n{}", self.preamble, self.dictionary.describe())])
    }
}

// ---------------------------------------------------------------------------
// !joke
// ---------------------------------------------------------------------------

pub struct JokeHandler {
    pub jokes: Arc<dyn JokeSource>,
    pub timeout: Duration,
}

#[async_trait]
impl RouteHandler for JokeHandler {
    async fn replies(&self, ctx: &DispatchContext) -> Result<Vec<String>> {
        let upstream = self.jokes.name();
        let joke = tokio::select! {
            _ = ctx.cancel.cancelled() => return Err(BotError::Cancelled(upstream.to_string())),
            fetched = tokio::time::timeout(self.timeout, self.jokes.fetch(&ctx.cancel)) => match fetched {
                Ok(joke) => joke?,
                Err(_) => return Err(BotError::Timeout(upstream.to_string())),
            },
        };

        if joke.is_empty() {
            return Err(BotError::upstream(upstream, "empty joke payload"));
        }
        Ok(vec![joke.render()])
    }
}

// ---------------------------------------------------------------------------
// !pin
// ---------------------------------------------------------------------------

pub struct PinHandler {
    pub pinned: Arc<PinnedMessageCache>,
    pub timeout: Duration,
}

#[async_trait]
impl RouteHandler for PinHandler {
    async fn replies(&self, ctx: &DispatchContext) -> Result<Vec<String>> {
        tokio::select! {
            _ = ctx.cancel.cancelled() => Err(BotError::Cancelled("pinned messages".into())),
            looked_up = tokio::time::timeout(self.timeout, self.pinned.get(&ctx.channel_id)) => match looked_up {
                Ok(excerpt) => Ok(vec![excerpt?]),
                Err(_) => Err(BotError::Timeout("pinned messages".into())),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// !<keyword>
// ---------------------------------------------------------------------------

pub struct QuoteHandler {
    pub dictionary: Arc<DictionaryIndex>,
}

#[async_trait]
impl RouteHandler for QuoteHandler {
    async fn replies(&self, ctx: &DispatchContext) -> Result<Vec<String>> {
        let quotes = self.dictionary.collect_responses(&ctx.normalized);
        if quotes.is_empty() {
            return Err(BotError::NoMatch);
        }
        Ok(quotes)
    }
}
