//! Keyword dictionary index: the configured `!keyword` → quotes table.
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use buzzbot_core::{BotError, RandomSource, Result, pick};
use tracing::{debug, error};

use crate::detection::KeywordDetector;
use crate::formatter::format_quote;

/// Keyword → candidate responses, as loaded from configuration.
pub type Dictionary = BTreeMap<String, Vec<String>>;

#[derive(Debug)]
pub struct DictionaryEntry {
    detector: KeywordDetector,
    responses: Vec<String>,
}

impl DictionaryEntry {
    pub fn keyword(&self) -> &str {
        self.detector.keyword()
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }
}

/// Immutable, lock-free index over the dictionary.
///
/// Entries are kept in the dictionary's sorted key order, so iteration is
/// deterministic for the lifetime of the process.
pub struct DictionaryIndex {
    entries: Vec<DictionaryEntry>,
    random: Arc<dyn RandomSource>,
}

impl DictionaryIndex {
    /// Build the index. Empty keywords, case-insensitive duplicates, and
    /// keywords without candidates are configuration errors.
    pub fn new(dictionary: &Dictionary, random: Arc<dyn RandomSource>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(dictionary.len());

        for (keyword, responses) in dictionary {
            if keyword.trim().is_empty() {
                return Err(BotError::Configuration("dictionary contains an empty keyword".into()));
            }
            if responses.is_empty() {
                return Err(BotError::Configuration(format!(
                    "keyword {keyword:?} has no responses"
                )));
            }
            let detector = KeywordDetector::new(keyword)?;
            if !seen.insert(detector.keyword().to_string()) {
                return Err(BotError::Configuration(format!(
                    "keyword {keyword:?} is defined more than once"
                )));
            }
            entries.push(DictionaryEntry {
                detector,
                responses: responses.clone(),
            });
        }

        debug!(keywords = entries.len(), "Dictionary index built");
        Ok(Self { entries, random })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(DictionaryEntry::keyword)
    }

    pub fn matches_any(&self, text: &str) -> bool {
        self.entries.iter().any(|entry| entry.detector.matches(text))
    }

    /// One formatted, randomly chosen quote per matching keyword.
    ///
    /// Re-rolled on every call; an empty result means nothing matched.
    pub fn collect_responses(&self, text: &str) -> Vec<String> {
        let normalized = text.to_lowercase();
        if !normalized.contains('!') {
            return Vec::new();
        }

        self.entries
            .iter()
            .filter(|entry| entry.detector.matches(&normalized))
            .filter_map(|entry| match pick(self.random.as_ref(), &entry.responses) {
                Some(quote) => Some(format_quote(quote, entry.keyword())),
                None => {
                    error!(keyword = entry.keyword(), "Dictionary entry matched but has no candidates");
                    None
                }
            })
            .collect()
    }

    /// Newline-joined keyword listing for help text.
    pub fn describe(&self) -> String {
        self.keywords().collect::<Vec<_>>().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buzzbot_core::{ScriptedRandom, ThreadRandom};

    fn dictionary(pairs: &[(&str, &[&str])]) -> Dictionary {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    fn index(pairs: &[(&str, &[&str])]) -> DictionaryIndex {
        DictionaryIndex::new(&dictionary(pairs), Arc::new(ThreadRandom)).unwrap()
    }

    #[test]
    fn single_candidate_is_always_chosen() {
        let index = index(&[("foo", &["bar"])]);
        for _ in 0..10 {
            assert_eq!(index.collect_responses("!foo"), vec!["> bar \n > - foo"]);
        }
    }

    #[test]
    fn every_matching_keyword_contributes_one_line() {
        let index = index(&[("foo", &["bar"]), ("baz", &["qux"]), ("zap", &["no"])]);
        let lines = index.collect_responses("!FOO and !baz");
        assert_eq!(lines, vec!["> qux \n > - baz", "> bar \n > - foo"]);
        assert!(index.matches_any("!baz"));
        assert!(!index.matches_any("baz"));
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let index = index(&[("foo", &["bar"])]);
        assert!(index.collect_responses("nothing here").is_empty());
        assert!(index.collect_responses("!foobar").is_empty());
        assert!(index.collect_responses("").is_empty());
    }

    #[test]
    fn candidates_are_rerolled_per_call() {
        let dict = dictionary(&[("foo", &["one", "two", "three"])]);
        let index = DictionaryIndex::new(&dict, Arc::new(ScriptedRandom::new(vec![0, 2, 1]))).unwrap();
        assert_eq!(index.collect_responses("!foo"), vec!["> one \n > - foo"]);
        assert_eq!(index.collect_responses("!foo"), vec!["> three \n > - foo"]);
        assert_eq!(index.collect_responses("!foo"), vec!["> two \n > - foo"]);
    }

    #[test]
    fn gif_keyword_passes_links_through() {
        let index = index(&[("gif", &["https://x/y.gif"])]);
        assert_eq!(index.collect_responses("!gif"), vec!["https://x/y.gif"]);
    }

    #[test]
    fn describe_lists_keywords_in_order() {
        let index = index(&[("Zeta", &["z"]), ("alpha", &["a"])]);
        assert_eq!(index.describe(), "zeta\nalpha");
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn rejects_invalid_dictionaries() {
        let random: Arc<dyn RandomSource> = Arc::new(ThreadRandom);
        assert!(DictionaryIndex::new(&dictionary(&[("foo", &[])]), random.clone()).is_err());
        assert!(DictionaryIndex::new(&dictionary(&[("  ", &["x"])]), random.clone()).is_err());
        assert!(DictionaryIndex::new(&dictionary(&[("Foo", &["x"]), ("foo", &["y"])]), random).is_err());
    }

    #[test]
    fn entry_without_candidates_contributes_nothing() {
        let index = DictionaryIndex {
            entries: vec![DictionaryEntry {
                detector: KeywordDetector::new("foo").unwrap(),
                responses: Vec::new(),
            }],
            random: Arc::new(ThreadRandom),
        };
        assert!(index.matches_any("!foo"));
        assert!(index.collect_responses("!foo").is_empty());
    }
}
