//! Outbound fan-out: send every reply line for one message concurrently.
use std::sync::Arc;

use buzzbot_core::PlatformConnection;
use futures::future::join_all;
use tracing::{debug, error};

use crate::types::SendReport;

pub struct OutboundSender {
    platform: Arc<dyn PlatformConnection>,
}

impl OutboundSender {
    pub fn new(platform: Arc<dyn PlatformConnection>) -> Self {
        Self { platform }
    }

    /// Send each non-empty message independently and wait for all attempts.
    ///
    /// A failed send is logged and counted; it never stops its siblings.
    /// No ordering is guaranteed between the messages.
    pub async fn send_all(&self, channel_id: &str, messages: &[String]) -> SendReport {
        let sends = messages
            .iter()
            .filter(|content| !content.is_empty())
            .map(|content| async move {
                match self.platform.send_message(channel_id, content).await {
                    Ok(()) => true,
                    Err(e) => {
                        error!(channel = %channel_id, error = %e, "Could not send message");
                        false
                    }
                }
            });

        let results = join_all(sends).await;
        let report = SendReport {
            attempted: results.len(),
            failed: results.iter().filter(|ok| !**ok).count(),
        };
        debug!(channel = %channel_id, attempted = report.attempted, failed = report.failed, "Fan-out complete");
        report
    }
}
