//! Default values for `BotConfig` fields.

/// Address the health and metrics server binds to.
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:8080";

/// Dictionary file used when neither a path nor inline content is given.
pub const DEFAULT_DICTIONARY_PATH: &str = "./resources/dictionary.json";

/// Pinned-message cache refresh period, in seconds.
pub const DEFAULT_PINNED_REFRESH_SECS: u64 = 300;

/// Joke API base URL; the client appends `/random`.
pub const DEFAULT_JOKE_API_URL: &str = "https://official-joke-api.appspot.com/jokes";

/// Bound on a single joke fetch or on-demand `!pin` lookup, in seconds.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Refresh periods below this are allowed but flagged.
pub const MIN_RECOMMENDED_REFRESH_SECS: u64 = 30;
