// Bounded Queue Domain Model

use super::error::{DomainError, Result};
use super::item::Item;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

/// Queue identifier (caller-supplied, case-sensitive)
pub type QueueName = String;

/// A named, capacity-bounded FIFO buffer of opaque items
///
/// The queue carries no lock of its own: every mutation happens while the
/// caller holds the registry lock of the owning `QueueStore`.
#[derive(Debug)]
pub struct BoundedQueue {
    name: QueueName,
    items: VecDeque<Item>,
    capacity: usize,
    /// Provider millis of the last accepted append (None = unset)
    last_write: Option<i64>,
    purge_count: u64,
    /// One-shot marker: capacity reached, capacity purge pending
    full_signal: AtomicBool,
}

impl BoundedQueue {
    /// Create an empty queue
    ///
    /// Fails with `InvalidCapacity` when `capacity` is zero.
    pub fn new(name: impl Into<QueueName>, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(DomainError::InvalidCapacity(capacity));
        }

        Ok(Self {
            name: name.into(),
            items: VecDeque::with_capacity(capacity),
            capacity,
            last_write: None,
            purge_count: 0,
            full_signal: AtomicBool::new(false),
        })
    }

    /// Append an item stamped with `now_millis`
    ///
    /// Fails fast with `QueueFull` when the queue already holds `capacity`
    /// items; a rejected append leaves items, timestamp and signal untouched.
    ///
    /// Returns `true` when this append brought the queue to capacity and
    /// raised the full signal.
    pub fn append(&mut self, item: Item, now_millis: i64) -> Result<bool> {
        if self.items.len() >= self.capacity {
            return Err(DomainError::QueueFull {
                queue: self.name.clone(),
                capacity: self.capacity,
            });
        }

        self.items.push_back(item);
        self.last_write = Some(now_millis);

        if self.items.len() == self.capacity {
            // Already raised => no-op, at most one pending signal
            let raised = self
                .full_signal
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok();
            return Ok(raised);
        }

        Ok(false)
    }

    /// Consume the full signal (compare-and-clear)
    ///
    /// Returns `true` if the signal was raised.
    pub fn take_full_signal(&self) -> bool {
        self.full_signal
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Clear all items and bump the purge counter
    ///
    /// The counter is bumped even when the queue was already empty.
    /// `last_write` is kept; the idle sweeper resets it separately.
    pub fn drain(&mut self) {
        self.items.clear();
        self.purge_count += 1;
    }

    pub fn reset_last_write(&mut self) {
        self.last_write = None;
    }

    /// True when the queue was written to and has been quiet for longer
    /// than `threshold_millis`
    pub fn is_idle(&self, now_millis: i64, threshold_millis: i64) -> bool {
        match self.last_write {
            Some(written_at) => now_millis.saturating_sub(written_at) > threshold_millis,
            None => false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn purge_count(&self) -> u64 {
        self.purge_count
    }

    pub fn last_write(&self) -> Option<i64> {
        self.last_write
    }

    pub fn is_full_signaled(&self) -> bool {
        self.full_signal.load(Ordering::Acquire)
    }

    /// Items in delivery (FIFO) order
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            name: self.name.clone(),
            length: self.items.len(),
            purge_count: self.purge_count,
        }
    }
}

/// Read-only view of a queue for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub name: QueueName,
    pub length: usize,
    pub purge_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(queue: &mut BoundedQueue, count: usize, now: i64) {
        for i in 0..count {
            queue.append(Item::from(format!("item-{}", i)), now).unwrap();
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = BoundedQueue::new("a", 0);
        assert_eq!(result.unwrap_err(), DomainError::InvalidCapacity(0));
    }

    #[test]
    fn test_new_queue_is_empty_and_unwritten() {
        let queue = BoundedQueue::new("a", 10).unwrap();
        assert!(queue.is_empty());
        assert_eq!(queue.capacity(), 10);
        assert_eq!(queue.purge_count(), 0);
        assert!(queue.last_write().is_none());
        assert!(!queue.is_full_signaled());
    }

    #[test]
    fn test_signal_raised_only_on_reaching_capacity() {
        let mut queue = BoundedQueue::new("a", 10).unwrap();

        fill(&mut queue, 9, 1000);
        assert_eq!(queue.len(), 9);
        assert!(!queue.is_full_signaled());

        let raised = queue.append(Item::from("last"), 1001).unwrap();
        assert!(raised);
        assert_eq!(queue.len(), 10);
        assert!(queue.is_full_signaled());
        assert_eq!(queue.last_write(), Some(1001));
    }

    #[test]
    fn test_append_on_full_queue_mutates_nothing() {
        let mut queue = BoundedQueue::new("a", 3).unwrap();
        fill(&mut queue, 3, 1000);

        let err = queue.append(Item::from("overflow"), 5000).unwrap_err();
        assert_eq!(
            err,
            DomainError::QueueFull {
                queue: "a".to_string(),
                capacity: 3
            }
        );
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.last_write(), Some(1000));

        // Still exactly one pending signal
        assert!(queue.take_full_signal());
        assert!(!queue.take_full_signal());
    }

    #[test]
    fn test_items_kept_in_fifo_order() {
        let mut queue = BoundedQueue::new("a", 5).unwrap();
        fill(&mut queue, 3, 0);

        let order: Vec<_> = queue
            .items()
            .map(|item| item.as_value().as_str().unwrap().to_string())
            .collect();
        assert_eq!(order, vec!["item-0", "item-1", "item-2"]);
    }

    #[test]
    fn test_drain_clears_items_and_keeps_timestamp() {
        let mut queue = BoundedQueue::new("a", 5).unwrap();
        fill(&mut queue, 4, 2000);

        queue.drain();
        assert!(queue.is_empty());
        assert_eq!(queue.purge_count(), 1);
        assert_eq!(queue.last_write(), Some(2000));
    }

    #[test]
    fn test_drain_empty_queue_still_counts() {
        let mut queue = BoundedQueue::new("a", 5).unwrap();
        queue.drain();
        queue.drain();
        assert_eq!(queue.purge_count(), 2);
    }

    #[test]
    fn test_refill_after_drain_raises_signal_again() {
        let mut queue = BoundedQueue::new("a", 2).unwrap();
        fill(&mut queue, 2, 0);
        assert!(queue.take_full_signal());
        queue.drain();

        fill(&mut queue, 1, 10);
        assert!(queue.append(Item::from("x"), 11).unwrap());
        assert!(queue.is_full_signaled());
    }

    #[test]
    fn test_is_idle_strictly_after_threshold() {
        let mut queue = BoundedQueue::new("a", 5).unwrap();
        assert!(!queue.is_idle(1_000_000, 30_000));

        queue.append(Item::from("x"), 0).unwrap();
        assert!(!queue.is_idle(30_000, 30_000));
        assert!(queue.is_idle(30_001, 30_000));

        queue.reset_last_write();
        assert!(!queue.is_idle(1_000_000, 30_000));
    }

    #[test]
    fn test_snapshot() {
        let mut queue = BoundedQueue::new("Orders", 5).unwrap();
        fill(&mut queue, 2, 0);
        queue.drain();
        fill(&mut queue, 1, 0);

        let snapshot = queue.snapshot();
        assert_eq!(
            snapshot,
            QueueSnapshot {
                name: "Orders".to_string(),
                length: 1,
                purge_count: 1
            }
        );
    }
}
