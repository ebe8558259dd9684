//! Injectable randomness for quote and pin selection.

use rand::Rng;

/// Source of uniform indices.
pub trait RandomSource: Send + Sync {
    /// Return an index in `0..len`, or `None` when `len == 0`.
    fn pick_index(&self, len: usize) -> Option<usize>;
}

/// Production source backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(rand::thread_rng().gen_range(0..len))
    }
}

/// Pick one element of `items` uniformly.
pub fn pick<'a, T>(random: &dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    random.pick_index(items.len()).and_then(|i| items.get(i))
}

#[cfg(any(test, feature = "test-util"))]
pub use scripted::ScriptedRandom;

#[cfg(any(test, feature = "test-util"))]
mod scripted {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::RandomSource;

    /// Deterministic source that replays a fixed sequence, wrapping around.
    ///
    /// Each value is reduced modulo the requested length.
    #[derive(Debug)]
    pub struct ScriptedRandom {
        sequence: Vec<usize>,
        cursor: AtomicUsize,
    }

    impl ScriptedRandom {
        pub fn new(sequence: impl Into<Vec<usize>>) -> Self {
            Self {
                sequence: sequence.into(),
                cursor: AtomicUsize::new(0),
            }
        }

        /// Always picks the first candidate.
        pub fn first() -> Self {
            Self::new(vec![0])
        }
    }

    impl RandomSource for ScriptedRandom {
        fn pick_index(&self, len: usize) -> Option<usize> {
            if len == 0 {
                return None;
            }
            if self.sequence.is_empty() {
                return Some(0);
            }
            let step = self.cursor.fetch_add(1, Ordering::Relaxed);
            Some(self.sequence[step % self.sequence.len()] % len)
        }
    }
}
