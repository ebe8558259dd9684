//! Keyword detection: recognise `!keyword` tokens inside free text.
use buzzbot_core::{BotError, Result};
use regex::Regex;

use crate::types::Route;

/// Matches one dictionary keyword used as a `!keyword` command token.
///
/// The token must be bounded on both sides by a string edge or a non-word
/// character, so `!foo` matches `"say !foo!"` but not `"!foobar"`.
#[derive(Debug, Clone)]
pub struct KeywordDetector {
    keyword: String,
    pattern: Regex,
}

impl KeywordDetector {
    /// Compile a detector. The keyword is lowercased and matched literally.
    pub fn new(keyword: &str) -> Result<Self> {
        let keyword = keyword.to_lowercase();
        let pattern = Regex::new(&format!(r"(?:^|\W)!{}(?:$|\W)", regex::escape(&keyword)))
            .map_err(|e| BotError::Configuration(format!("keyword {keyword:?}: {e}")))?;
        Ok(Self { keyword, pattern })
    }

    /// The lowercased keyword, without the `!` prefix.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn matches(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        self.pattern.is_match(&text.to_lowercase())
    }
}

/// Plain containment check for a built-in `!command`.
///
/// `normalized` must already be lowercased.
pub fn contains_command(normalized: &str, command: &str) -> bool {
    normalized.contains(&format!("!{command}"))
}

/// Pick the response path for a lowercased message, in priority order.
pub fn detect_route(normalized: &str) -> Route {
    let hits = |route: Route| route.commands().iter().any(|c| contains_command(normalized, c));
    [Route::Help, Route::Joke, Route::Pin]
        .into_iter()
        .find(|route| hits(*route))
        .unwrap_or(Route::Quote)
}
