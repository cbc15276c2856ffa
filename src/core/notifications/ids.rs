//! Notification id allocation

use crate::core::models::Notification;
use std::sync::Mutex;

/// Hands out ids that stay unique even when several are requested within one millisecond
///
/// Each id is the largest of the current time in milliseconds, the previous id plus one,
/// and the largest id already in the target list plus one. Ids therefore keep sorting by
/// creation time while never repeating within a list.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: Mutex<i64>,
}

impl IdGenerator {
    /// Create a generator with no history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for a notification joining `existing`
    pub fn next_id(&self, existing: &[Notification]) -> i64 {
        self.next_at(chrono::Utc::now().timestamp_millis(), existing)
    }

    fn next_at(&self, now_ms: i64, existing: &[Notification]) -> i64 {
        let max_existing = existing.iter().map(|n| n.id).max().unwrap_or(0);
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let id = now_ms.max(*last + 1).max(max_existing + 1);
        *last = id;
        id
    }
}
