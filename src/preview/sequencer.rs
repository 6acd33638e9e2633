//! Preview request generations
//!
//! Every preview request takes a strictly increasing generation. A response
//! is only applied while its generation is still the latest one issued.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic generation counter for preview requests.
///
/// Generations start at 1; 0 means "nothing issued yet".
#[derive(Debug, Default)]
pub struct PreviewSequencer {
    counter: AtomicU64,
}

impl PreviewSequencer {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Issue the next generation (atomic increment)
    pub fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Latest generation issued, without incrementing
    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation != 0 && generation == self.current()
    }

    /// Make every outstanding generation stale
    pub fn invalidate(&self) {
        self.next();
    }
}
