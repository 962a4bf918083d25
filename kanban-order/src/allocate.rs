//! Position allocation for moved items
//!
//! A moved item normally gets a single new position computed from its
//! neighbors: the midpoint between them, half of the first position at the
//! top, or one step past the last position at the bottom. Only that item has
//! to be persisted.
//!
//! Repeated bisection eventually runs out of integer room between two
//! neighbors, and repeated appends drift towards the ceiling. Either case
//! renumbers the whole list to evenly spaced steps, and every item in it has
//! to be persisted.

use crate::config::OrderConfig;
use crate::types::position::{is_integral, Positioned};
use tracing::{debug, warn};

/// Default spacing between adjacent items after renumbering
pub const STEP: f64 = 65536.0;

/// Expected upper bound on list length, used to size [`MAX_POSITION`]
pub const MAX_LIST_LEN: usize = 200;

/// Positions at or above this ceiling force a renumber
pub const MAX_POSITION: f64 = STEP * 500.0;

/// Outcome of a single allocation
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation<T> {
    changed: Vec<T>,
    renumbered: bool,
}

impl<T> Allocation<T> {
    /// Nothing moved
    pub fn empty() -> Self {
        Self {
            changed: Vec::new(),
            renumbered: false,
        }
    }

    /// Items whose position has to be persisted
    pub fn changed(&self) -> &[T] {
        &self.changed
    }

    /// Take the changed items
    pub fn into_changed(self) -> Vec<T> {
        self.changed
    }

    /// Whether the whole list was renumbered
    pub fn is_renumbered(&self) -> bool {
        self.renumbered
    }

    /// Number of changed items
    pub fn len(&self) -> usize {
        self.changed.len()
    }

    /// Check if nothing changed
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Computes positions for moved items.
///
/// Holds only tuning values. Every call is a pure function of the list and
/// the moved index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionAllocator {
    step: f64,
    max_position: f64,
    max_list_len: usize,
}

impl PositionAllocator {
    /// Create an allocator with explicit step and ceiling
    pub fn new(step: f64, max_position: f64) -> Self {
        Self {
            step,
            max_position,
            max_list_len: MAX_LIST_LEN,
        }
    }

    /// Create an allocator from validated configuration
    pub fn from_config(config: &OrderConfig) -> Self {
        Self {
            step: config.step,
            max_position: config.max_position(),
            max_list_len: config.max_list_len,
        }
    }

    /// Set the list length above which renumbering logs a warning
    pub fn with_max_list_len(mut self, max_list_len: usize) -> Self {
        self.max_list_len = max_list_len;
        self
    }

    /// Assign a position to the item at `moved_index`.
    ///
    /// `list` must already contain the moved item at its final index. Returns
    /// either that single item or, when a renumber was needed, the whole list
    /// with fresh positions.
    ///
    /// # Panics
    ///
    /// Panics if `moved_index` is not a valid index into `list`.
    pub fn allocate<T>(&self, list: &mut [T], moved_index: usize) -> Allocation<T>
    where
        T: Positioned + Clone,
    {
        assert!(
            moved_index < list.len(),
            "moved index {} out of bounds for list of length {}",
            moved_index,
            list.len()
        );

        let prev = moved_index
            .checked_sub(1)
            .map(|index| list[index].position());
        let next = list.get(moved_index + 1).map(Positioned::position);

        let position = match (prev, next) {
            (None, None) => self.step,
            (None, Some(next)) => next / 2.0,
            (Some(prev), None) => prev + self.step,
            (Some(prev), Some(next)) => (prev + next) / 2.0,
        };
        list[moved_index].set_position(position);

        if self.needs_renumber(position, prev, next) {
            debug!(
                moved_index,
                position,
                len = list.len(),
                "position out of room, renumbering list"
            );
            self.renumber(list);
            return Allocation {
                changed: list.to_vec(),
                renumbered: true,
            };
        }

        debug!(moved_index, position, "allocated position");
        Allocation {
            changed: vec![list[moved_index].clone()],
            renumbered: false,
        }
    }

    /// Assign every item `(index + 1) * step`, in list order
    pub fn renumber<T: Positioned>(&self, list: &mut [T]) {
        if list.len() > self.max_list_len {
            warn!(
                len = list.len(),
                max_list_len = self.max_list_len,
                "renumbering a list longer than expected; appends will renumber often"
            );
        }
        for (index, item) in list.iter_mut().enumerate() {
            item.set_position((index + 1) as f64 * self.step);
        }
    }

    /// A fractional position means bisection ran out of room. A position
    /// that does not sit strictly between its neighbors would tie with one of
    /// them, which can happen with a zero-valued first item or with positions
    /// too large for the midpoint to be represented.
    fn needs_renumber(&self, position: f64, prev: Option<f64>, next: Option<f64>) -> bool {
        !is_integral(position)
            || position >= self.max_position
            || prev.is_some_and(|prev| position <= prev)
            || next.is_some_and(|next| position >= next)
    }
}

impl Default for PositionAllocator {
    fn default() -> Self {
        Self::new(STEP, MAX_POSITION)
    }
}
