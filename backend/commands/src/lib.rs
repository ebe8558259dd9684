pub mod detection;
pub mod dispatch;
pub mod formatter;
pub mod handlers;
pub mod outbound;
pub mod pinned;
pub mod registry;
pub mod types;

pub use detection::{KeywordDetector, contains_command, detect_route};
pub use dispatch::{ResponseRouter, RouteHandler, RouterParts, RouterSettings};
pub use formatter::format_quote;
pub use handlers::{DEFAULT_HELP_PREAMBLE, HelpHandler, JokeHandler, PinHandler, QuoteHandler};
pub use outbound::OutboundSender;
pub use pinned::{EMPTY_EXCERPT_PLACEHOLDER, PinnedMessageCache, excerpt_for};
pub use registry::{Dictionary, DictionaryEntry, DictionaryIndex};
pub use types::{DispatchContext, DispatchOutcome, IgnoreReason, Route, SendReport};
