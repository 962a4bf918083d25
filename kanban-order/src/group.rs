//! Stable partition of a flat collection into keyed lists

use indexmap::IndexMap;
use std::hash::Hash;

/// Partition `items` into lists by `key_fn`.
///
/// Keys appear in the order they are first seen and items sharing a key keep
/// their input order. Nothing is sorted, so callers that want lists ordered
/// by position must pass position-ordered input or sort each list afterwards.
///
/// ```
/// use kanban_order::group::group_by;
///
/// let lists = group_by(vec![("a", 1), ("b", 2), ("a", 3)], |(key, _)| *key);
/// assert_eq!(lists.keys().copied().collect::<Vec<_>>(), vec!["a", "b"]);
/// assert_eq!(lists["a"], vec![("a", 1), ("a", 3)]);
/// ```
pub fn group_by<T, K, F>(items: impl IntoIterator<Item = T>, mut key_fn: F) -> IndexMap<K, Vec<T>>
where
    K: Hash + Eq,
    F: FnMut(&T) -> K,
{
    let mut lists: IndexMap<K, Vec<T>> = IndexMap::new();
    for item in items {
        lists.entry(key_fn(&item)).or_default().push(item);
    }
    lists
}
