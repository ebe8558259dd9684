//! Keyword dictionary loading.
//!
//! The dictionary maps a keyword (used in chat as `!keyword`) to the list of
//! quotes one of which is sent back. It comes from a JSON or YAML file, or
//! inline from `BUZZBOT_DICTIONARY`.

use crate::env::DICTIONARY_ENV_VAR;
use anyhow::{bail, Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::info;

pub type RawDictionary = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryFormat {
    Json,
    Yaml,
}

impl DictionaryFormat {
    /// `.yaml`/`.yml` files are YAML, everything else JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }

    /// Guess the format of inline content.
    pub fn sniff(raw: &str) -> Self {
        if raw.trim_start().starts_with('{') {
            Self::Json
        } else {
            Self::Yaml
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictionaryError {
    #[error("keyword must not be empty")]
    EmptyKeyword,
    #[error("keyword {0:?} must not contain whitespace or '!'")]
    InvalidKeyword(String),
    #[error("keyword {0:?} has no quotes")]
    NoQuotes(String),
    #[error("keyword {0:?} is defined more than once (keywords are case-insensitive)")]
    Duplicate(String),
}

pub fn parse_dictionary(raw: &str, format: DictionaryFormat) -> Result<RawDictionary> {
    let dictionary = match format {
        DictionaryFormat::Json => {
            serde_json::from_str(raw).context("Dictionary is not a JSON object of string lists")?
        }
        DictionaryFormat::Yaml => {
            serde_yaml::from_str(raw).context("Dictionary is not a YAML mapping of string lists")?
        }
    };
    Ok(dictionary)
}

/// Every problem found in the dictionary; empty means valid.
pub fn validate_dictionary(dictionary: &RawDictionary) -> Vec<DictionaryError> {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();

    for (keyword, quotes) in dictionary {
        if keyword.is_empty() {
            problems.push(DictionaryError::EmptyKeyword);
            continue;
        }
        if keyword.chars().any(|c| c.is_whitespace() || c == '!') {
            problems.push(DictionaryError::InvalidKeyword(keyword.clone()));
        }
        if quotes.is_empty() {
            problems.push(DictionaryError::NoQuotes(keyword.clone()));
        }
        if !seen.insert(keyword.to_lowercase()) {
            problems.push(DictionaryError::Duplicate(keyword.clone()));
        }
    }
    problems
}

fn ensure_valid(dictionary: RawDictionary, origin: &str) -> Result<RawDictionary> {
    let problems = validate_dictionary(&dictionary);
    if let Some(first) = problems.first() {
        bail!(
            "Invalid dictionary from {origin}: {first} ({} problem(s) in total)",
            problems.len()
        );
    }
    Ok(dictionary)
}

/// Load and validate a dictionary file.
pub async fn load_dictionary(path: &Path) -> Result<RawDictionary> {
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read dictionary: {}", path.display()))?;
    let dictionary = parse_dictionary(&raw, DictionaryFormat::from_path(path))
        .with_context(|| format!("Failed to parse dictionary: {}", path.display()))?;
    let dictionary = ensure_valid(dictionary, &path.display().to_string())?;
    info!(path = %path.display(), keywords = dictionary.len(), "Loaded dictionary");
    Ok(dictionary)
}

/// Inline content from `BUZZBOT_DICTIONARY` wins over the file at `path`.
pub async fn resolve_dictionary(path: &Path) -> Result<RawDictionary> {
    match std::env::var(DICTIONARY_ENV_VAR) {
        Ok(raw) if !raw.trim().is_empty() => load_inline_dictionary(&raw),
        _ => load_dictionary(path).await,
    }
}

pub fn load_inline_dictionary(raw: &str) -> Result<RawDictionary> {
    let dictionary = parse_dictionary(raw, DictionaryFormat::sniff(raw))
        .with_context(|| format!("Failed to parse {DICTIONARY_ENV_VAR}"))?;
    let dictionary = ensure_valid(dictionary, DICTIONARY_ENV_VAR)?;
    info!(keywords = dictionary.len(), "Loaded inline dictionary");
    Ok(dictionary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_json_and_yaml() {
        let json = r#"{"linus": ["Talk is cheap."], "yoda": ["Do or do not.", "Hmm."]}"#;
        let from_json = parse_dictionary(json, DictionaryFormat::Json).unwrap();
        assert_eq!(from_json["yoda"].len(), 2);

        let yaml = "linus:\n  - Talk is cheap.\nyoda:\n  - Do or do not.\n  - Hmm.\n";
        let from_yaml = parse_dictionary(yaml, DictionaryFormat::Yaml).unwrap();
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn malformed_content_is_error() {
        assert!(parse_dictionary(r#"{"a": "not a list"}"#, DictionaryFormat::Json).is_err());
        assert!(parse_dictionary("[1, 2]", DictionaryFormat::Json).is_err());
    }

    #[test]
    fn format_detection() {
        assert_eq!(DictionaryFormat::from_path(Path::new("d.yml")), DictionaryFormat::Yaml);
        assert_eq!(DictionaryFormat::from_path(Path::new("d.json")), DictionaryFormat::Json);
        assert_eq!(DictionaryFormat::sniff("  {\"a\": []}"), DictionaryFormat::Json);
        assert_eq!(DictionaryFormat::sniff("a:\n  - b"), DictionaryFormat::Yaml);
    }

    #[test]
    fn validation_reports_every_problem() {
        let dictionary = RawDictionary::from([
            (String::new(), vec!["x".into()]),
            ("two words".into(), vec!["x".into()]),
            ("bang!".into(), vec!["x".into()]),
            ("empty".into(), vec![]),
            ("Yoda".into(), vec!["x".into()]),
            ("yoda".into(), vec!["y".into()]),
        ]);
        let problems = validate_dictionary(&dictionary);
        assert!(problems.contains(&DictionaryError::EmptyKeyword));
        assert!(problems.contains(&DictionaryError::InvalidKeyword("two words".into())));
        assert!(problems.contains(&DictionaryError::InvalidKeyword("bang!".into())));
        assert!(problems.contains(&DictionaryError::NoQuotes("empty".into())));
        assert!(problems.contains(&DictionaryError::Duplicate("yoda".into())));
        assert_eq!(problems.len(), 5);
    }

    #[tokio::test]
    async fn loads_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "gandalf:\n  - You shall not pass!").unwrap();
        let dictionary = load_dictionary(file.path()).await.unwrap();
        assert_eq!(dictionary["gandalf"], vec!["You shall not pass!"]);
    }

    #[tokio::test]
    async fn invalid_file_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"empty": []}}"#).unwrap();
        let err = load_dictionary(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("no quotes"));
    }

    #[test]
    fn inline_dictionary_is_sniffed() {
        let dictionary = load_inline_dictionary(r#"{"linus": ["Talk is cheap."]}"#).unwrap();
        assert_eq!(dictionary.len(), 1);
        assert!(load_inline_dictionary("linus: []").is_err());
    }
}
