//! Move events delivered by the drag-drop surface

use super::ids::GroupKey;
use serde::{Deserialize, Serialize};

/// One drag-drop operation.
///
/// Both indices refer to the ordered lists as they look once the move is
/// done: `dest_index` is where the item ends up in the destination list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEvent {
    pub source: GroupKey,
    pub dest: GroupKey,
    pub source_index: usize,
    pub dest_index: usize,
}

impl MoveEvent {
    /// Create a move between two lists
    pub fn new(
        source: impl Into<GroupKey>,
        dest: impl Into<GroupKey>,
        source_index: usize,
        dest_index: usize,
    ) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            source_index,
            dest_index,
        }
    }

    /// Create a reorder within one list
    pub fn within(list: impl Into<GroupKey>, source_index: usize, dest_index: usize) -> Self {
        let list = list.into();
        Self {
            source: list.clone(),
            dest: list,
            source_index,
            dest_index,
        }
    }

    /// Check if the item changes lists
    pub fn is_transfer(&self) -> bool {
        self.source != self.dest
    }

    /// Check if the item is dropped back into its own slot
    pub fn is_noop(&self) -> bool {
        !self.is_transfer() && self.source_index == self.dest_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_is_not_transfer() {
        let event = MoveEvent::within("todo", 0, 2);
        assert!(!event.is_transfer());
        assert!(!event.is_noop());
    }

    #[test]
    fn test_noop() {
        assert!(MoveEvent::within("todo", 1, 1).is_noop());
        assert!(!MoveEvent::new("todo", "done", 1, 1).is_noop());
    }

    #[test]
    fn test_deserialize() {
        let event: MoveEvent = serde_json::from_str(
            r#"{"source": "todo", "dest": null, "source_index": 0, "dest_index": 3}"#,
        )
        .unwrap();
        assert!(event.is_transfer());
        assert!(event.dest.is_null());
        assert_eq!(event.dest_index, 3);
    }
}
