//! Config file loading.

use crate::env::resolve_env_vars_with;
use crate::schema::BotConfig;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Load a YAML config file and resolve its `${VAR}` references.
///
/// With no path the defaults are returned. An explicit path that does not
/// exist is an error.
pub async fn load_config(path: Option<&Path>) -> Result<BotConfig> {
    let Some(path) = path else {
        debug!("No config file given; using defaults");
        return Ok(BotConfig::default());
    };

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config_with(&raw, &std::env::vars().collect())
        .with_context(|| format!("Failed to load config at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Parse YAML config text, substituting `${VAR}` from `env`.
pub fn parse_config_with(raw: &str, env: &HashMap<String, String>) -> Result<BotConfig> {
    let value: Value = serde_yaml::from_str(raw).context("Failed to parse config YAML")?;
    // An empty document parses as null.
    let value = if value.is_null() {
        Value::Object(Default::default())
    } else {
        value
    };
    let value = resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;
    serde_json::from_value(value).context("Config does not match the expected schema")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_with_substitution() {
        let env = HashMap::from([("DISCORD_TOKEN".to_string(), "abc".to_string())]);
        let cfg = parse_config_with("token: ${DISCORD_TOKEN}\nlistenAddress: 127.0.0.1:9000\n", &env)
            .unwrap();
        assert_eq!(cfg.token, "abc");
        assert_eq!(cfg.listen_address, "127.0.0.1:9000");
    }

    #[test]
    fn empty_document_is_default() {
        let cfg = parse_config_with("", &HashMap::new()).unwrap();
        assert_eq!(cfg, BotConfig::default());
    }

    #[test]
    fn wrong_types_are_rejected() {
        let err = parse_config_with("pinnedRefreshSecs: often\n", &HashMap::new()).unwrap_err();
        assert!(format!("{err:#}").contains("schema"));
    }

    #[tokio::test]
    async fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "upstreamTimeoutSecs: 3").unwrap();
        let cfg = load_config(Some(file.path())).await.unwrap();
        assert_eq!(cfg.upstream_timeout_secs, 3);
    }

    #[tokio::test]
    async fn missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(load_config(Some(&missing)).await.is_err());
        assert_eq!(load_config(None).await.unwrap(), BotConfig::default());
    }
}
