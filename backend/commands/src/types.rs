//! Dispatch types shared by the router and its handlers.
use std::fmt;

use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

/// Response path chosen for a message, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Help,
    Joke,
    Pin,
    /// Dictionary keyword lookup; the fallback when no built-in command is present.
    Quote,
}

impl Route {
    /// Built-in `!commands` that select this route.
    pub fn commands(self) -> &'static [&'static str] {
        match self {
            Route::Help => &["help", "command"],
            Route::Joke => &["joke"],
            Route::Pin => &["pin"],
            Route::Quote => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Route::Help => "help",
            Route::Joke => "joke",
            Route::Pin => "pin",
            Route::Quote => "quote",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Context passed to every route handler.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    pub channel_id: String,
    pub author_id: String,
    /// Lowercased message text.
    pub normalized: String,
    /// Cancelled when the bot shuts down.
    pub cancel: CancellationToken,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of one concurrent fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendReport {
    pub attempted: usize,
    pub failed: usize,
}

impl SendReport {
    pub fn delivered(&self) -> usize {
        self.attempted - self.failed
    }
}

/// Why a message was dropped before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    SelfAuthored,
    /// The session has not reported the bot's own id yet.
    IdentityUnknown,
    EditedMessage,
}

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Dropped before dispatch; no replies and no metrics.
    Ignored(IgnoreReason),
    Replied { route: Route, report: SendReport },
    /// Dispatched but nothing was sent; `reason` is for logs only.
    Silent { route: Route, reason: String },
}

impl DispatchOutcome {
    pub fn route(&self) -> Option<Route> {
        match self {
            DispatchOutcome::Ignored(_) => None,
            DispatchOutcome::Replied { route, .. } | DispatchOutcome::Silent { route, .. } => {
                Some(*route)
            }
        }
    }

    pub fn delivered(&self) -> usize {
        match self {
            DispatchOutcome::Replied { report, .. } => report.delivered(),
            _ => 0,
        }
    }
}
