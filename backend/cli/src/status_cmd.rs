//! CLI Status Command
//!
//! Queries `/api/health` of a running instance.

use std::time::Duration;

use anyhow::{Context, Result};
use buzzbot_gateway::HealthReport;

pub async fn run(base_url: &str) -> Result<()> {
    let url = format!("{}/api/health", base_url.trim_end_matches('/'));
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("buzzbot is not running at {base_url}"))?
        .error_for_status()?;
    let report: HealthReport = response
        .json()
        .await
        .context("Unexpected health payload")?;

    let icon = if report.discord_connected { "🟢" } else { "🔴" };
    println!("\n📊 buzzbot status: {}\n", report.status);
    println!("  {icon} Discord connected: {}", report.discord_connected);
    println!("  ⏱  Uptime: {}", format_uptime(report.uptime_seconds));
    println!("  🕒 Checked at: {}\n", report.timestamp);

    Ok(())
}

fn format_uptime(seconds: u64) -> String {
    let (days, rest) = (seconds / 86_400, seconds % 86_400);
    let (hours, rest) = (rest / 3_600, rest % 3_600);
    let (minutes, secs) = (rest / 60, rest % 60);
    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else {
        format!("{minutes}m {secs}s")
    }
}
