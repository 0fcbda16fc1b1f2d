use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use chrono::Utc;
use configs::IdStrategy;
use uuid::Uuid;

/// Source of identifiers for newly created items.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Decimal epoch milliseconds, strictly increasing within the process.
#[derive(Debug, Default)]
pub struct TimestampIds {
    last: AtomicI64,
}

impl TimestampIds {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_at(&self, now_ms: i64) -> i64 {
        // fetch_update only fails when the closure returns None
        let prev = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now_ms.max(last + 1)))
            .unwrap_or_else(|last| last);
        now_ms.max(prev + 1)
    }
}

impl IdGenerator for TimestampIds {
    fn next_id(&self) -> String {
        self.next_at(Utc::now().timestamp_millis()).to_string()
    }
}

pub fn from_strategy(strategy: IdStrategy) -> Arc<dyn IdGenerator> {
    match strategy {
        IdStrategy::Uuid => Arc::new(UuidIds),
        IdStrategy::Timestamp => Arc::new(TimestampIds::new()),
    }
}
