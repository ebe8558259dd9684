//! Runtime configuration schema for buzzbot.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields a usable config apart from the bot token.

use crate::defaults::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const REDACTED: &str = "***";

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BotConfig {
    /// Discord bot token. Usually given as `${DISCORD_TOKEN}` or via flag.
    pub token: String,

    /// Path to the JSON/YAML keyword dictionary.
    pub dictionary_path: PathBuf,

    /// Bind address for `/health`, `/api/health` and `/metrics`.
    pub listen_address: String,

    pub pinned_refresh_secs: u64,

    pub joke_api_url: String,

    pub upstream_timeout_secs: u64,

    /// Treat edited messages like new ones.
    pub handle_message_updates: bool,

    pub log_level: String,

    /// When set, a daily-rolling JSON log file is written here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Replaces the built-in help text shown before the keyword list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_preamble: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            dictionary_path: PathBuf::from(DEFAULT_DICTIONARY_PATH),
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
            pinned_refresh_secs: DEFAULT_PINNED_REFRESH_SECS,
            joke_api_url: DEFAULT_JOKE_API_URL.to_string(),
            upstream_timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            handle_message_updates: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_dir: None,
            help_preamble: None,
        }
    }
}

impl BotConfig {
    pub fn pinned_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.pinned_refresh_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// Copy safe to log or print: the token is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.token.is_empty() {
            copy.token = REDACTED.to_string();
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let cfg: BotConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, BotConfig::default());
        assert_eq!(cfg.pinned_refresh_secs, 300);
        assert_eq!(cfg.upstream_timeout(), Duration::from_secs(10));
        assert!(!cfg.handle_message_updates);
    }

    #[test]
    fn camel_case_fields_parse() {
        let yaml = "token: abc\npinnedRefreshSecs: 60\nhandleMessageUpdates: true\nlogDir: /var/log/buzzbot\n";
        let cfg: BotConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.token, "abc");
        assert_eq!(cfg.pinned_refresh_interval(), Duration::from_secs(60));
        assert!(cfg.handle_message_updates);
        assert_eq!(cfg.log_dir, Some(PathBuf::from("/var/log/buzzbot")));
        assert_eq!(cfg.listen_address, DEFAULT_LISTEN_ADDRESS);
    }

    #[test]
    fn redacted_masks_token_only() {
        let cfg = BotConfig {
            token: "secret-token".into(),
            ..Default::default()
        };
        let safe = cfg.redacted();
        assert_eq!(safe.token, "***");
        assert_eq!(safe.joke_api_url, cfg.joke_api_url);
        assert_eq!(BotConfig::default().redacted().token, "");
    }
}
