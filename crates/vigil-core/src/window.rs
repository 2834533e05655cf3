//! Bounded per-target history of poll outcomes.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::outcome::Outcome;

/// Fixed-capacity FIFO of the most recent [`Outcome`]s for one target.
///
/// Shared between exactly one writer (the poll task) and one reader (the
/// anomaly-detection task). Writers and readers are mutually exclusive;
/// the reader takes a point-in-time copy so it never holds the lock while
/// computing.
pub struct HistoryWindow {
    capacity: usize,
    entries: RwLock<VecDeque<Outcome>>,
}

impl HistoryWindow {
    /// A window holding at most `capacity` outcomes. Capacity is clamped
    /// to at least one entry.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// A window sized for a poll cadence: `floor(retention / period)`
    /// entries cover the configured monitoring history.
    pub fn for_cadence(retention: Duration, period: Duration) -> Self {
        let capacity = if period.is_zero() {
            1
        } else {
            (retention.as_millis() / period.as_millis()) as usize
        };
        Self::new(capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an outcome, evicting the oldest entry when full. O(1).
    pub async fn record(&self, outcome: Outcome) {
        let mut entries = self.entries.write().await;
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(outcome);
    }

    /// A consistent point-in-time copy of the window, oldest first.
    pub async fn snapshot(&self) -> Vec<Outcome> {
        let entries = self.entries.read().await;
        entries.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
