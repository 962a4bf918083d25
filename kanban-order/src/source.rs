//! Item source: push-based feed of flat item collections

use crate::types::Item;
use tokio::sync::broadcast;
use tracing::trace;

/// Default number of snapshots buffered per subscriber
pub const DEFAULT_CAPACITY: usize = 16;

/// Trait for feeds of item collections
///
/// Every emission is a complete snapshot that replaces the previous one.
pub trait ItemSource: Send + Sync {
    /// Subscribe to snapshots
    ///
    /// Dropping the receiver releases the subscription.
    fn subscribe(&self) -> broadcast::Receiver<Vec<Item>>;
}

/// In-process item source backed by a broadcast channel
#[derive(Debug, Clone)]
pub struct MemorySource {
    sender: broadcast::Sender<Vec<Item>>,
}

impl MemorySource {
    /// Create a source buffering up to `capacity` snapshots per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit a snapshot, returning the number of subscribers that received it
    pub fn publish(&self, items: Vec<Item>) -> usize {
        let count = items.len();
        match self.sender.send(items) {
            Ok(receivers) => {
                trace!(count, receivers, "published snapshot");
                receivers
            }
            Err(_) => {
                trace!(count, "published snapshot with no subscribers");
                0
            }
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ItemSource for MemorySource {
    fn subscribe(&self) -> broadcast::Receiver<Vec<Item>> {
        self.sender.subscribe()
    }
}
