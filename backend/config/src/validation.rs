//! Config validation with field paths and user-friendly messages.

use crate::defaults::MIN_RECOMMENDED_REFRESH_SECS;
use crate::schema::BotConfig;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &BotConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_discord(config, &mut report);
    validate_intervals(config, &mut report);
    validate_endpoints(config, &mut report);
    report
}

fn validate_discord(config: &BotConfig, report: &mut ValidationReport) {
    if config.token.trim().is_empty() {
        report.error("token", "Discord bot token is required");
    }
}

fn validate_intervals(config: &BotConfig, report: &mut ValidationReport) {
    if config.pinned_refresh_secs == 0 {
        report.error("pinnedRefreshSecs", "pinnedRefreshSecs must be >= 1");
    } else if config.pinned_refresh_secs < MIN_RECOMMENDED_REFRESH_SECS {
        report.warn(
            "pinnedRefreshSecs",
            format!(
                "Refreshing pins every {}s may hit Discord rate limits; consider >= {MIN_RECOMMENDED_REFRESH_SECS}s",
                config.pinned_refresh_secs
            ),
        );
    }
    if config.upstream_timeout_secs == 0 {
        report.error("upstreamTimeoutSecs", "upstreamTimeoutSecs must be >= 1");
    }
}

fn validate_endpoints(config: &BotConfig, report: &mut ValidationReport) {
    if config.listen_address.parse::<std::net::SocketAddr>().is_err() {
        report.error(
            "listenAddress",
            format!("'{}' is not a valid host:port socket address", config.listen_address),
        );
    }
    if !(config.joke_api_url.starts_with("http://") || config.joke_api_url.starts_with("https://")) {
        report.error("jokeApiUrl", "jokeApiUrl must be an http(s) URL");
    }
}
