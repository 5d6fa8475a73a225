use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of uniform picks for canned content.
///
/// Shared across request handlers, hence `&self` and `Send + Sync`.
pub trait RandomSource: Send + Sync {
    /// Uniform index in `0..len`. `len` is never zero.
    fn pick_index(&self, len: usize) -> usize;
}

/// Always picks the same index, wrapped into range.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedIndex(pub usize);

impl RandomSource for FixedIndex {
    fn pick_index(&self, len: usize) -> usize {
        self.0 % len
    }
}

/// Replays a fixed list of indices in a loop, each wrapped into range.
#[derive(Debug)]
pub struct SequenceIndex {
    picks: Vec<usize>,
    cursor: AtomicUsize,
}

impl SequenceIndex {
    pub fn new(picks: Vec<usize>) -> Self {
        assert!(!picks.is_empty(), "SequenceIndex needs at least one pick");
        Self {
            picks,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for SequenceIndex {
    fn pick_index(&self, len: usize) -> usize {
        let n = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.picks[n % self.picks.len()] % len
    }
}
