//! `buzzbot-config`: runtime configuration and dictionary loading.
//!
//! Provides:
//! - Typed config schema with defaults
//! - YAML loading with `${ENV_VAR}` substitution
//! - `BUZZBOT_*` environment overrides
//! - JSON/YAML keyword dictionaries
//! - Validation with errors and warnings

pub mod defaults;
pub mod dictionary;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use dictionary::{
    load_dictionary, load_inline_dictionary, parse_dictionary, resolve_dictionary,
    validate_dictionary, DictionaryError, DictionaryFormat, RawDictionary,
};
pub use env::{
    apply_env_overrides, apply_env_overrides_with, resolve_env_vars_with, MissingEnvVarError,
    DICTIONARY_ENV_VAR, ENV_PREFIX,
};
pub use io::{load_config, parse_config_with};
pub use schema::BotConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use std::path::Path;

/// Load the optional config file, then apply `BUZZBOT_*` overrides.
///
/// Command-line flags are layered on top by the caller; run [`check`] after.
pub async fn load_and_prepare(path: Option<&Path>) -> Result<BotConfig> {
    let mut config = load_config(path).await?;
    apply_env_overrides(&mut config).context("Failed to apply environment overrides")?;
    Ok(config)
}

/// Validate and log the report. Fails when any error was found.
pub fn check(config: &BotConfig) -> Result<ValidationReport> {
    let report = validate(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.first() {
        anyhow::bail!("{first} ({} error(s) in total)", report.errors.len());
    }
    Ok(report)
}
