//! Board: items grouped into named lists

use super::ids::{GroupKey, ItemId};
use super::item::Item;
use super::move_event::MoveEvent;
use crate::allocate::{Allocation, PositionAllocator};
use crate::error::{OrderError, Result};
use crate::group::group_by;
use indexmap::IndexMap;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use tracing::debug;

/// Items partitioned into lists by one grouping attribute.
///
/// A board is a view, rebuilt from the flat item collection on every
/// refresh. Between refreshes only positions (and, on cross-list moves, the
/// grouping attribute) of its items change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    group_by: String,
    lists: IndexMap<GroupKey, Vec<Item>>,
}

/// Two or more items of one list sharing a position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionCollision {
    pub key: GroupKey,
    pub position: f64,
    pub ids: Vec<ItemId>,
}

impl Board {
    /// Group items by the named attribute, keeping input order within lists
    pub fn group(items: impl IntoIterator<Item = Item>, attribute: impl Into<String>) -> Self {
        let group_by = attribute.into();
        let lists = group_by_attribute(items, &group_by);
        Self { group_by, lists }
    }

    /// The attribute lists are keyed by
    pub fn group_by(&self) -> &str {
        &self.group_by
    }

    /// Regroup every item under a different attribute.
    ///
    /// Items are taken list by list in key order, so relative order within
    /// each new list follows the old board's order.
    pub fn regroup(&mut self, attribute: impl Into<String>) {
        let attribute = attribute.into();
        let items = std::mem::take(&mut self.lists).into_values().flatten();
        self.lists = group_by_attribute(items, &attribute);
        self.group_by = attribute;
    }

    /// Sort every list by ascending position.
    ///
    /// The sort is stable, so tied positions keep their input order.
    pub fn sort_by_position(&mut self) {
        for list in self.lists.values_mut() {
            list.sort_by(|a, b| a.position.total_cmp(&b.position));
        }
    }

    /// Get a list by key
    pub fn get(&self, key: &GroupKey) -> Option<&[Item]> {
        self.lists.get(key).map(Vec::as_slice)
    }

    /// List keys in discovery order
    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.lists.keys()
    }

    /// Lists in discovery order
    pub fn lists(&self) -> impl Iterator<Item = (&GroupKey, &[Item])> {
        self.lists.iter().map(|(key, list)| (key, list.as_slice()))
    }

    /// Number of lists
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Check if the board has no lists
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Total number of items across all lists
    pub fn item_count(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }

    /// Flatten back into a single collection, list by list
    pub fn into_items(self) -> Vec<Item> {
        self.lists.into_values().flatten().collect()
    }

    /// Report positions shared by more than one item in the same list
    pub fn duplicate_positions(&self) -> Vec<PositionCollision> {
        let mut collisions = Vec::new();
        for (key, list) in &self.lists {
            let mut sorted: Vec<&Item> = list.iter().collect();
            sorted.sort_by(|a, b| a.position.total_cmp(&b.position));

            for run in sorted.chunk_by(|a, b| a.position == b.position) {
                if run.len() > 1 {
                    collisions.push(PositionCollision {
                        key: key.clone(),
                        position: run[0].position,
                        ids: run.iter().map(|item| item.id.clone()).collect(),
                    });
                }
            }
        }
        collisions
    }

    /// Apply a drag-drop move and allocate the moved item's position.
    ///
    /// The item is spliced out of the source list and into the destination
    /// list at `dest_index`. A cross-list move rewrites the item's grouping
    /// attribute to the destination key and creates the destination list if
    /// the board does not have it yet. Dropping an item back into its own
    /// slot changes nothing.
    ///
    /// The event is validated before anything is touched, so an error leaves
    /// the board unchanged.
    pub fn apply_move(
        &mut self,
        event: &MoveEvent,
        allocator: &PositionAllocator,
    ) -> Result<Allocation<Item>> {
        let source_len = self
            .lists
            .get(&event.source)
            .map(Vec::len)
            .ok_or_else(|| OrderError::ListNotFound {
                key: event.source.clone(),
            })?;
        check_index(&event.source, event.source_index, source_len)?;

        if event.is_noop() {
            debug!(
                list = %event.source,
                index = event.source_index,
                "move to own slot ignored"
            );
            return Ok(Allocation::empty());
        }

        if !event.is_transfer() {
            check_index(&event.dest, event.dest_index, source_len)?;
            let list = self.list_mut(&event.source)?;
            let item = list.remove(event.source_index);
            list.insert(event.dest_index, item);
            return Ok(allocator.allocate(list, event.dest_index));
        }

        let dest_len = self.lists.get(&event.dest).map_or(0, Vec::len);
        check_insert_index(&event.dest, event.dest_index, dest_len)?;

        let mut item = self.list_mut(&event.source)?.remove(event.source_index);
        // Keep the attribute's JSON type (e.g. numeric list ids) when the
        // destination list already holds items
        match self.key_value(&event.dest) {
            Some(value) => item.set_field(&self.group_by, value),
            None => item.set_group_key(&self.group_by, &event.dest),
        }

        let dest = self.lists.entry(event.dest.clone()).or_default();
        dest.insert(event.dest_index, item);
        debug!(
            from = %event.source,
            to = %event.dest,
            index = event.dest_index,
            "item transferred"
        );
        Ok(allocator.allocate(dest, event.dest_index))
    }

    /// Raw attribute value carried by the items of a list
    fn key_value(&self, key: &GroupKey) -> Option<serde_json::Value> {
        self.lists
            .get(key)?
            .first()?
            .field(&self.group_by)
            .cloned()
    }

    fn list_mut(&mut self, key: &GroupKey) -> Result<&mut Vec<Item>> {
        self.lists
            .get_mut(key)
            .ok_or_else(|| OrderError::ListNotFound { key: key.clone() })
    }
}

fn group_by_attribute(
    items: impl IntoIterator<Item = Item>,
    attribute: &str,
) -> IndexMap<GroupKey, Vec<Item>> {
    group_by(items, |item| item.group_key(attribute))
}

fn check_index(key: &GroupKey, index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(OrderError::IndexOutOfBounds {
            key: key.clone(),
            index,
            len,
        });
    }
    Ok(())
}

/// Like `check_index`, but one past the end is a valid insertion point
fn check_insert_index(key: &GroupKey, index: usize, len: usize) -> Result<()> {
    if index > len {
        return Err(OrderError::IndexOutOfBounds {
            key: key.clone(),
            index,
            len,
        });
    }
    Ok(())
}

/// Lists serialize as a sequence of `{key, items}` entries so the null key
/// and key order survive formats that only allow string map keys.
impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct ListEntry<'a> {
            key: &'a GroupKey,
            items: &'a [Item],
        }

        let lists: Vec<ListEntry<'_>> = self
            .lists
            .iter()
            .map(|(key, items)| ListEntry { key, items })
            .collect();

        let mut state = serializer.serialize_struct("Board", 2)?;
        state.serialize_field("group_by", &self.group_by)?;
        state.serialize_field("lists", &lists)?;
        state.end()
    }
}
