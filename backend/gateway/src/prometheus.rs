//! Prometheus-backed `MetricsSink` built on the `metrics` facade.

use anyhow::{Context, Result};
use buzzbot_core::MetricsSink;
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const MESSAGE_COUNTER: &str = "discord_message_counter";
pub const BOT_USAGE_COUNTER: &str = "discord_bot_usage_counter";

/// Install the global Prometheus recorder. Call once at startup.
pub fn install_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    PrometheusMetrics::describe();
    Ok(handle)
}

/// Records message counters through the `metrics` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusMetrics;

impl PrometheusMetrics {
    fn describe() {
        describe_counter!(MESSAGE_COUNTER, "Messages seen, per channel and user");
        describe_counter!(BOT_USAGE_COUNTER, "Messages the bot replied to, per channel and user");
    }
}

impl MetricsSink for PrometheusMetrics {
    fn record_message(&self, channel: &str, user: &str) {
        counter!(MESSAGE_COUNTER, "channel" => channel.to_string(), "user" => user.to_string())
            .increment(1);
    }

    fn record_bot_usage(&self, channel: &str, user: &str) {
        counter!(BOT_USAGE_COUNTER, "channel" => channel.to_string(), "user" => user.to_string())
            .increment(1);
    }
}
