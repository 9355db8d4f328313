use crate::time::Timestamp;

/// One time-aligned accumulator of event counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    start: Timestamp,
    count: i64,
}

impl Bucket {
    /// Empty bucket for an already aligned window start.
    pub fn new(start: Timestamp) -> Self {
        Self { start, count: 0 }
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    /// Add `delta` to the count.
    ///
    /// Negative deltas are accepted and lower the count; nothing upstream
    /// rejects them.
    pub fn add_count(&mut self, delta: i64) {
        self.count = self.count.saturating_add(delta);
    }
}
