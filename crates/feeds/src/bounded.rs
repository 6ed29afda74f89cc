//! Fixed-capacity, newest-first feed.

use std::collections::VecDeque;

/// Newest-first collection that never holds more than `capacity` items.
///
/// Inserting into a full feed evicts the oldest item from the tail.
#[derive(Debug, Clone)]
pub struct BoundedFeed<T> {
    /// Items, head = newest
    items: VecDeque<T>,

    /// Maximum number of items retained
    capacity: usize,
}

impl<T> BoundedFeed<T> {
    /// Create an empty feed.
    ///
    /// A capacity of zero is clamped to one so the head always reflects the
    /// latest insert.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the head, returning the evicted tail item if the feed
    /// overflowed.
    pub fn push(&mut self, item: T) -> Option<T> {
        self.items.push_front(item);
        if self.items.len() > self.capacity {
            self.items.pop_back()
        } else {
            None
        }
    }

    /// Most recently inserted item
    pub fn head(&self) -> Option<&T> {
        self.items.front()
    }

    /// Oldest retained item
    pub fn tail(&self) -> Option<&T> {
        self.items.back()
    }

    /// Iterate newest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Up to `count` newest items
    pub fn recent(&self, count: usize) -> Vec<&T> {
        self.items.iter().take(count).collect()
    }

    /// Number of items retained
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the feed is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every item
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
