use std::fmt;

use serde::{Deserialize, Serialize};

/// A joke fetched from an upstream API.
///
/// Upstreams answer either with a setup/punchline pair or with a single
/// `joke` field, so both shapes deserialize into this enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Joke {
    TwoPart { setup: String, punchline: String },
    Single {
        #[serde(alias = "joke")]
        content: String,
    },
}

impl Joke {
    /// Render for chat: quoted setup and a spoiler-tagged punchline.
    pub fn render(&self) -> String {
        match self {
            Joke::TwoPart { setup, punchline } => format!("> {setup} \n || {punchline} ||"),
            Joke::Single { content } => format!("> {content}"),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Joke::TwoPart { setup, punchline } => setup.is_empty() && punchline.is_empty(),
            Joke::Single { content } => content.is_empty(),
        }
    }
}

impl fmt::Display for Joke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
