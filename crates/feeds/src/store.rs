//! Per-classification view store.

use crate::bounded::BoundedFeed;
use fleetglass_core::Classification;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Live row counts for both views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewCounts {
    /// Rows in the normal view
    pub normal: usize,
    /// Rows in the anomaly view
    pub anomaly: usize,
}

impl ViewCounts {
    /// Count for one classification
    pub fn get(&self, target: Classification) -> usize {
        match target {
            Classification::Normal => self.normal,
            Classification::Anomaly => self.anomaly,
        }
    }
}

/// Two independent bounded feeds, one per [`Classification`].
///
/// Pushing into one view never changes the other.
#[derive(Debug, Clone)]
pub struct ViewStore<R> {
    normal: BoundedFeed<R>,
    anomaly: BoundedFeed<R>,
}

impl<R> ViewStore<R> {
    /// Create a store whose views each hold at most `max_rows` rows
    pub fn new(max_rows: usize) -> Self {
        Self {
            normal: BoundedFeed::new(max_rows),
            anomaly: BoundedFeed::new(max_rows),
        }
    }

    fn feed(&self, target: Classification) -> &BoundedFeed<R> {
        match target {
            Classification::Normal => &self.normal,
            Classification::Anomaly => &self.anomaly,
        }
    }

    fn feed_mut(&mut self, target: Classification) -> &mut BoundedFeed<R> {
        match target {
            Classification::Normal => &mut self.normal,
            Classification::Anomaly => &mut self.anomaly,
        }
    }

    /// Insert `row` at the head of `target`, returning the evicted row if any
    pub fn push(&mut self, target: Classification, row: R) -> Option<R> {
        let evicted = self.feed_mut(target).push(row);
        if evicted.is_some() {
            trace!(view = %target, "evicted oldest row");
        }
        evicted
    }

    /// Rows in `target`
    pub fn size(&self, target: Classification) -> usize {
        self.feed(target).len()
    }

    /// Both sizes at once
    pub fn counts(&self) -> ViewCounts {
        ViewCounts {
            normal: self.normal.len(),
            anomaly: self.anomaly.len(),
        }
    }

    /// Newest row of `target`
    pub fn head(&self, target: Classification) -> Option<&R> {
        self.feed(target).head()
    }

    /// Rows of `target`, newest first
    pub fn rows(&self, target: Classification) -> impl Iterator<Item = &R> {
        self.feed(target).iter()
    }

    /// Capacity of each view
    pub fn max_rows(&self) -> usize {
        self.normal.capacity()
    }
}
