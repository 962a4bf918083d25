//! Item sink: receives change sets for persistence

use crate::error::{OrderError, Result};
use crate::types::Item;
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Trait for receivers of changed items
///
/// Retrying and durability are the sink's business. The board session hands
/// over each change set once and reports failures.
#[async_trait]
pub trait ItemSink: Send + Sync + 'static {
    /// Persist the items whose positions changed
    async fn persist(&self, changed: Vec<Item>) -> Result<()>;
}

/// In-memory sink recording every change set it receives
#[derive(Debug, Default)]
pub struct MemorySink {
    batches: Mutex<Vec<Vec<Item>>>,
    failure: Mutex<Option<String>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent persists fail with `message`, or succeed again with `None`
    pub fn set_failure(&self, message: Option<String>) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = message;
    }

    /// Change sets received so far, oldest first
    pub fn batches(&self) -> Vec<Vec<Item>> {
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Total number of items received
    pub fn item_count(&self) -> usize {
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(Vec::len)
            .sum()
    }
}

#[async_trait]
impl ItemSink for MemorySink {
    async fn persist(&self, changed: Vec<Item>) -> Result<()> {
        let failure = self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(message) = failure {
            return Err(OrderError::sink(changed.len(), message));
        }

        debug!(count = changed.len(), "persisting change set");
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(changed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_batches() {
        let sink = MemorySink::new();
        sink.persist(vec![Item::new("1", 1.0)]).await.unwrap();
        sink.persist(vec![Item::new("2", 2.0), Item::new("3", 3.0)])
            .await
            .unwrap();

        assert_eq!(sink.batches().len(), 2);
        assert_eq!(sink.item_count(), 3);
    }

    #[tokio::test]
    async fn test_failure() {
        let sink = MemorySink::new();
        sink.set_failure(Some("offline".to_string()));

        let err = sink.persist(vec![Item::new("1", 1.0)]).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("offline"));
        assert!(sink.batches().is_empty());

        sink.set_failure(None);
        sink.persist(vec![Item::new("1", 1.0)]).await.unwrap();
        assert_eq!(sink.batches().len(), 1);
    }
}
