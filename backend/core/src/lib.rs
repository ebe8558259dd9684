pub mod channel;
pub mod error;
pub mod message;
pub mod random;
pub mod traits;
pub mod types;

pub use channel::EventBus;
pub use error::{BotError, Result};
pub use message::{IncomingMessage, MessageKind, PinnedMessage};
pub use random::{pick, RandomSource, ThreadRandom};
#[cfg(any(test, feature = "test-util"))]
pub use random::ScriptedRandom;
pub use traits::{JokeSource, MetricsSink, PlatformConnection};
pub use types::Joke;
