//! Dispatch Event Logger
//!
//! One structured record per handled chat message, emitted under the
//! `dispatch_events` target so it can be filtered or routed separately.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
pub struct DispatchEvent {
    pub dispatch_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub channel_id: String,
    pub author: String,
    /// Response path taken (`help`, `joke`, `pin`, `quote`).
    pub route: String,
    pub replies_sent: usize,
    pub replies_failed: usize,
    /// Short outcome label, e.g. `replied` or the reason for silence.
    pub outcome: String,
    pub content: String,
}

impl DispatchEvent {
    pub fn new(
        channel_id: impl Into<String>,
        author: impl Into<String>,
        route: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            dispatch_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            channel_id: channel_id.into(),
            author: author.into(),
            route: route.into(),
            replies_sent: 0,
            replies_failed: 0,
            outcome: String::new(),
            content: content.into(),
        }
    }

    pub fn with_outcome(mut self, outcome: impl Into<String>, sent: usize, failed: usize) -> Self {
        self.outcome = outcome.into();
        self.replies_sent = sent;
        self.replies_failed = failed;
        self
    }
}

pub struct DispatchLogger;

impl DispatchLogger {
    /// Log a dispatch record with the message content redacted.
    pub fn log_event(mut event: DispatchEvent) -> DispatchEvent {
        event.content = redact_sensitive_data(&event.content);

        info!(
            target: "dispatch_events",
            dispatch_id = %event.dispatch_id,
            channel = %event.channel_id,
            author = %event.author,
            route = %event.route,
            sent = event.replies_sent,
            failed = event.replies_failed,
            outcome = %event.outcome,
            content = %event.content,
            "Message dispatched"
        );
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logged_event_has_redacted_content() {
        let event = DispatchEvent::new("c1", "alice", "quote", "Bearer abc123 !foo")
            .with_outcome("replied", 1, 0);
        let logged = DispatchLogger::log_event(event);
        assert_eq!(logged.content, "[REDACTED_AUTH] !foo");
        assert_eq!(logged.replies_sent, 1);
        assert_eq!(logged.outcome, "replied");
    }
}
