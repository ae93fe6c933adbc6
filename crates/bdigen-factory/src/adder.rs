use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Running total shared between the cohorts that hold a clone of it.
///
/// Cloning does not copy the total: every clone advances the same counter,
/// which is how two independently created cohorts keep their naming in step.
#[derive(Debug, Clone, Default)]
pub struct Adder {
    total: Arc<AtomicI64>,
}

impl Adder {
    pub fn new(start: i64) -> Self {
        Self {
            total: Arc::new(AtomicI64::new(start)),
        }
    }

    /// Add `value` and return the new total.
    pub fn next(&self, value: i64) -> i64 {
        self.total.fetch_add(value, Ordering::SeqCst) + value
    }

    pub fn reset(&self, start: i64) {
        self.total.store(start, Ordering::SeqCst);
    }

    pub fn current(&self) -> i64 {
        self.total.load(Ordering::SeqCst)
    }
}

/// 1-based id sequence owned by a single factory.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    issued: Adder,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> i64 {
        self.issued.next(1)
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> i64 {
        self.issued.current()
    }
}
