//! Response dispatch: route each inbound message to one handler and send
//! whatever it produces.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use buzzbot_core::{
    IncomingMessage, JokeSource, MessageKind, MetricsSink, PlatformConnection, Result,
};
use buzzbot_logging::{DispatchEvent, DispatchLogger, redact_sensitive_data};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::detection::detect_route;
use crate::handlers::{
    DEFAULT_HELP_PREAMBLE, HelpHandler, JokeHandler, PinHandler, QuoteHandler,
};
use crate::outbound::OutboundSender;
use crate::pinned::PinnedMessageCache;
use crate::registry::DictionaryIndex;
use crate::types::{DispatchContext, DispatchOutcome, IgnoreReason, Route};

// ---------------------------------------------------------------------------
// Handler trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait RouteHandler: Send + Sync {
    /// Reply lines for the message. `Ok(vec![])` and `Err` both mean silence.
    async fn replies(&self, ctx: &DispatchContext) -> Result<Vec<String>>;
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub help_preamble: String,
    /// Upper bound on a single joke fetch or on-demand pin lookup.
    pub upstream_timeout: Duration,
    /// Dispatch edited messages like new ones.
    pub handle_message_updates: bool,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            help_preamble: DEFAULT_HELP_PREAMBLE.to_string(),
            upstream_timeout: Duration::from_secs(10),
            handle_message_updates: false,
        }
    }
}

/// Everything the router needs, assembled in one step.
pub struct RouterParts {
    pub dictionary: Arc<DictionaryIndex>,
    pub platform: Arc<dyn PlatformConnection>,
    pub jokes: Arc<dyn JokeSource>,
    pub pinned: Arc<PinnedMessageCache>,
    pub metrics: Arc<dyn MetricsSink>,
    pub settings: RouterSettings,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub struct ResponseRouter {
    platform: Arc<dyn PlatformConnection>,
    metrics: Arc<dyn MetricsSink>,
    outbound: OutboundSender,
    handlers: HashMap<Route, Arc<dyn RouteHandler>>,
    handle_message_updates: bool,
}

impl ResponseRouter {
    pub fn new(parts: RouterParts) -> Self {
        let RouterParts { dictionary, platform, jokes, pinned, metrics, settings } = parts;

        let mut handlers: HashMap<Route, Arc<dyn RouteHandler>> = HashMap::new();
        handlers.insert(
            Route::Help,
            Arc::new(HelpHandler {
                dictionary: dictionary.clone(),
                preamble: settings.help_preamble,
            }),
        );
        handlers.insert(
            Route::Joke,
            Arc::new(JokeHandler { jokes, timeout: settings.upstream_timeout }),
        );
        handlers.insert(
            Route::Pin,
            Arc::new(PinHandler { pinned, timeout: settings.upstream_timeout }),
        );
        handlers.insert(Route::Quote, Arc::new(QuoteHandler { dictionary }));

        Self {
            outbound: OutboundSender::new(platform.clone()),
            platform,
            metrics,
            handlers,
            handle_message_updates: settings.handle_message_updates,
        }
    }

    /// Dispatch one message. Never fails: every collaborator error ends in
    /// silence plus a log line.
    pub async fn handle(&self, message: IncomingMessage, cancel: &CancellationToken) -> DispatchOutcome {
        let Some(bot_id) = self.platform.bot_user_id() else {
            debug!(channel = %message.channel_id, "Bot identity not known yet; dropping message");
            return DispatchOutcome::Ignored(IgnoreReason::IdentityUnknown);
        };
        if bot_id == message.author_id {
            debug!(channel = %message.channel_id, "Ignoring own message");
            return DispatchOutcome::Ignored(IgnoreReason::SelfAuthored);
        }
        if message.kind == MessageKind::Updated && !self.handle_message_updates {
            debug!(channel = %message.channel_id, "Ignoring edited message");
            return DispatchOutcome::Ignored(IgnoreReason::EditedMessage);
        }

        let normalized = message.content.to_lowercase();
        let route = detect_route(&normalized);
        let ctx = DispatchContext {
            channel_id: message.channel_id.clone(),
            author_id: message.author_id.clone(),
            normalized,
            cancel: cancel.child_token(),
        };

        let outcome = self.dispatch(route, &ctx, &message).await;

        let user = self.display_name(&message).await;
        self.metrics.record_message(&message.channel_id, &user);
        if outcome.delivered() > 0 {
            self.metrics.record_bot_usage(&message.channel_id, &user);
        }

        let (label, sent, failed) = match &outcome {
            DispatchOutcome::Replied { report, .. } => ("replied".to_string(), report.delivered(), report.failed),
            DispatchOutcome::Silent { reason, .. } => (reason.clone(), 0, 0),
            DispatchOutcome::Ignored(_) => ("ignored".to_string(), 0, 0),
        };
        DispatchLogger::log_event(
            DispatchEvent::new(&message.channel_id, &user, route.as_str(), &message.content)
                .with_outcome(label, sent, failed),
        );

        outcome
    }

    async fn dispatch(&self, route: Route, ctx: &DispatchContext, message: &IncomingMessage) -> DispatchOutcome {
        let Some(handler) = self.handlers.get(&route) else {
            error!(route = %route, "No handler registered for route");
            return DispatchOutcome::Silent { route, reason: "no handler".into() };
        };

        match handler.replies(ctx).await {
            Ok(replies) if replies.is_empty() => DispatchOutcome::Silent { route, reason: "empty reply".into() },
            Ok(replies) => {
                let report = self.outbound.send_all(&message.channel_id, &replies).await;
                DispatchOutcome::Replied { route, report }
            }
            Err(e) if e.is_expected() => {
                debug!(route = %route, channel = %message.channel_id, reason = %e, "No reply");
                DispatchOutcome::Silent { route, reason: e.to_string() }
            }
            Err(e) => {
                warn!(
                    route = %route,
                    channel = %message.channel_id,
                    author = %message.author_id,
                    content = %redact_sensitive_data(&message.content),
                    error = %e,
                    "Response source failed"
                );
                DispatchOutcome::Silent { route, reason: e.to_string() }
            }
        }
    }

    async fn display_name(&self, message: &IncomingMessage) -> String {
        if !message.author_display_name.is_empty() {
            return message.author_display_name.clone();
        }
        match self.platform.resolve_display_name(&message.author_id).await {
            Ok(name) => name,
            Err(e) => {
                debug!(author = %message.author_id, error = %e, "Could not resolve display name");
                message.author_id.clone()
            }
        }
    }

    /// Consume inbound messages until the bus closes or `cancel` fires.
    ///
    /// Each message is handled on its own task so a slow upstream never
    /// holds up the next event.
    pub async fn run(self: Arc<Self>, mut rx: mpsc::Receiver<IncomingMessage>, cancel: CancellationToken) {
        info!(platform = self.platform.name(), "Response router started");
        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                next = rx.recv() => {
                    let Some(message) = next else { break };
                    let router = Arc::clone(&self);
                    let cancel = cancel.clone();
                    tasks.spawn(async move { router.handle(message, &cancel).await });
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "Dispatch task failed");
                    }
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Dispatch task failed");
            }
        }
        info!("Response router stopped");
    }
}
