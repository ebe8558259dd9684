//! CLI Check Command
//!
//! Validates the config and the keyword dictionary without connecting to
//! Discord, then lists the keywords the bot would answer to.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, bail};
use buzzbot_commands::DictionaryIndex;
use buzzbot_config::{load_and_prepare, resolve_dictionary, validate};
use buzzbot_core::ThreadRandom;

pub async fn run(config_path: Option<&Path>, dictionary: Option<PathBuf>) -> Result<()> {
    println!("\n🔍 Checking buzzbot configuration...\n");

    let mut config = load_and_prepare(config_path).await?;
    if let Some(path) = dictionary {
        config.dictionary_path = path;
    }

    let report = validate(&config);
    println!("Config:");
    for warning in &report.warnings {
        println!("  🟡 {}: {}", warning.path, warning.message);
    }
    for error in &report.errors {
        println!("  🔴 {}: {}", error.path, error.message);
    }
    if report.warnings.is_empty() && report.errors.is_empty() {
        println!("  🟢 ok");
    }

    println!("\nDictionary ({}):", config.dictionary_path.display());
    let raw = match resolve_dictionary(&config.dictionary_path).await {
        Ok(raw) => raw,
        Err(e) => {
            println!("  🔴 {e:#}");
            bail!("dictionary check failed");
        }
    };
    let index = DictionaryIndex::new(&raw, Arc::new(ThreadRandom))?;
    println!("  🟢 {} keyword(s):", index.len());
    for entry in index.entries() {
        println!("    !{} ({} quote(s))", entry.keyword(), entry.responses().len());
    }

    println!();
    if !report.is_valid() {
        bail!("{} config error(s) found", report.errors.len());
    }
    println!("✅ All checks passed.");
    Ok(())
}
