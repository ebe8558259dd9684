//! Environment handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` references inside string values, resolved at load time
//!   (uppercase `[A-Z_][A-Z0-9_]*` names only; `$${VAR}` escapes to a
//!   literal `${VAR}`).
//! - `BUZZBOT_*` variables overriding whole fields after the file is read.

use crate::schema::BotConfig;
use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// Matches `${VAR}` and the escaped form `$${VAR}`.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Prefix of field-override variables.
pub const ENV_PREFIX: &str = "BUZZBOT_";

/// Holds inline dictionary content instead of a file path.
pub const DICTIONARY_ENV_VAR: &str = "BUZZBOT_DICTIONARY";

#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config value tree. Missing or empty
/// variables are errors.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Apply `BUZZBOT_*` overrides from the process environment.
pub fn apply_env_overrides(config: &mut BotConfig) -> Result<()> {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply `BUZZBOT_*` overrides from an explicit variable map.
pub fn apply_env_overrides_with(
    config: &mut BotConfig,
    env: &HashMap<String, String>,
) -> Result<()> {
    let get = |field: &str| {
        env.get(&format!("{ENV_PREFIX}{field}"))
            .filter(|v| !v.is_empty())
            .map(String::as_str)
    };

    if let Some(v) = get("TOKEN") {
        config.token = v.to_string();
    }
    if let Some(v) = get("DICTIONARY_PATH") {
        config.dictionary_path = PathBuf::from(v);
    }
    if let Some(v) = get("LISTEN_ADDRESS") {
        config.listen_address = v.to_string();
    }
    if let Some(v) = get("PINNED_REFRESH_SECS") {
        config.pinned_refresh_secs = parse_u64("PINNED_REFRESH_SECS", v)?;
    }
    if let Some(v) = get("JOKE_API_URL") {
        config.joke_api_url = v.to_string();
    }
    if let Some(v) = get("UPSTREAM_TIMEOUT_SECS") {
        config.upstream_timeout_secs = parse_u64("UPSTREAM_TIMEOUT_SECS", v)?;
    }
    if let Some(v) = get("HANDLE_MESSAGE_UPDATES") {
        config.handle_message_updates = parse_bool("HANDLE_MESSAGE_UPDATES", v)?;
    }
    if let Some(v) = get("LOG_LEVEL") {
        config.log_level = v.to_string();
    }
    if let Some(v) = get("LOG_DIR") {
        config.log_dir = Some(PathBuf::from(v));
    }
    if let Some(v) = get("HELP_PREAMBLE") {
        config.help_preamble = Some(v.to_string());
    }
    Ok(())
}

fn parse_u64(field: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .with_context(|| format!("{ENV_PREFIX}{field} must be a non-negative integer, got {raw:?}"))
}

fn parse_bool(field: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("{ENV_PREFIX}{field} must be a boolean, got {raw:?}"),
    }
}
