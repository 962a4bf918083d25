//! Integration tests for position allocation
//!
//! Covers the literal boundary scenarios plus property tests for the
//! single-update, renumbering and bisection-exhaustion behaviors.

use kanban_order::{Item, PositionAllocator, MAX_POSITION, STEP};
use proptest::prelude::*;

fn items(positions: &[f64]) -> Vec<Item> {
    positions
        .iter()
        .enumerate()
        .map(|(i, p)| Item::new(format!("item-{}", i), *p))
        .collect()
}

fn positions(items: &[Item]) -> Vec<f64> {
    items.iter().map(|i| i.position).collect()
}

/// Insert a fresh item at `index` and allocate it
fn insert(list: &mut Vec<Item>, index: usize, id: &str) -> kanban_order::Allocation<Item> {
    list.insert(index, Item::new(id, 0.0));
    PositionAllocator::default().allocate(list, index)
}

#[test]
fn test_scenario_move_into_empty_list() {
    let mut list = Vec::new();
    let allocation = insert(&mut list, 0, "new");
    assert_eq!(allocation.len(), 1);
    assert_eq!(allocation.changed()[0].position, 65536.0);
}

#[test]
fn test_scenario_insert_between_steps() {
    let mut list = items(&[65536.0, 131072.0]);
    let allocation = insert(&mut list, 1, "new");
    assert_eq!(allocation.len(), 1);
    assert_eq!(allocation.changed()[0].id.as_str(), "new");
    assert_eq!(allocation.changed()[0].position, 98304.0);
}

#[test]
fn test_scenario_exhausted_gap_renumbers() {
    let mut list = items(&[65536.0, 65536.5]);
    let allocation = insert(&mut list, 1, "new");
    assert!(allocation.is_renumbered());
    assert_eq!(allocation.len(), 3);
    assert_eq!(
        positions(allocation.changed()),
        vec![65536.0, 131072.0, 196608.0]
    );
    assert_eq!(allocation.changed()[1].id.as_str(), "new");
}

#[test]
fn test_scenario_append_near_ceiling_renumbers() {
    assert_eq!(MAX_POSITION, 32_768_000.0);
    let mut list = items(&[32_702_464.0]);
    let allocation = insert(&mut list, 1, "new");
    assert!(allocation.is_renumbered());
    assert_eq!(positions(allocation.changed()), vec![65536.0, 131072.0]);
}

#[test]
fn test_append_below_ceiling_keeps_positions() {
    let mut list = items(&[32_000_000.0]);
    let allocation = insert(&mut list, 1, "new");
    assert!(!allocation.is_renumbered());
    assert_eq!(positions(allocation.changed()), vec![32_065_536.0]);
}

#[test]
fn test_renumbered_list_has_room_again() {
    let mut list = items(&[65536.0, 65536.5]);
    insert(&mut list, 1, "first");
    let allocation = insert(&mut list, 1, "second");
    assert!(!allocation.is_renumbered());
    assert_eq!(allocation.changed()[0].position, 98304.0);
}

/// Sorted, distinct, even positions so every midpoint is a whole number
fn even_positions() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::btree_set(1u32..50_000, 2..40).prop_map(|set| {
        set.into_iter()
            .map(|n| f64::from(n) * 4.0)
            .collect::<Vec<f64>>()
    })
}

proptest! {
    #[test]
    fn prop_middle_insert_changes_one_item(
        base in even_positions(),
        slot in any::<prop::sample::Index>(),
    ) {
        let index = 1 + slot.index(base.len() - 1);
        let mut list = items(&base);
        let allocation = insert(&mut list, index, "moved");

        prop_assert!(!allocation.is_renumbered());
        prop_assert_eq!(allocation.len(), 1);
        let moved = &allocation.changed()[0];
        prop_assert_eq!(moved.id.as_str(), "moved");
        prop_assert!(moved.position > list[index - 1].position);
        prop_assert!(moved.position < list[index + 1].position);
    }

    #[test]
    fn prop_renumbering_is_complete(
        base in prop::collection::vec(0.0f64..1_000_000.0, 1..40),
        slot in any::<prop::sample::Index>(),
    ) {
        let mut list = items(&base);
        let index = slot.index(list.len());
        let allocation = PositionAllocator::default().allocate(&mut list, index);

        if allocation.is_renumbered() {
            prop_assert_eq!(allocation.len(), list.len());
            for (i, item) in allocation.changed().iter().enumerate() {
                prop_assert_eq!(item.position, (i + 1) as f64 * STEP);
            }
            for pair in allocation.changed().windows(2) {
                prop_assert_eq!(pair[1].position - pair[0].position, STEP);
            }
        } else {
            prop_assert_eq!(allocation.len(), 1);
        }
    }

    #[test]
    fn prop_allocation_is_pure(
        base in prop::collection::vec(0.0f64..40_000_000.0, 1..20),
        slot in any::<prop::sample::Index>(),
    ) {
        let index = slot.index(base.len());
        let allocator = PositionAllocator::default();

        let mut first = items(&base);
        let mut second = items(&base);
        prop_assert_eq!(
            allocator.allocate(&mut first, index),
            allocator.allocate(&mut second, index)
        );
        prop_assert_eq!(first, second);
    }

    /// Keep inserting into the same shrinking gap. Renumbering must fire
    /// before any two positions in the list become equal.
    #[test]
    fn prop_bisection_renumbers_before_collision(
        start in 1u32..400,
        toward_prev in any::<bool>(),
    ) {
        let low = f64::from(start) * STEP;
        let mut list = items(&[low, low + STEP]);
        let allocator = PositionAllocator::default();

        let mut renumbered = false;
        for round in 0..64 {
            // Gap between the first item and the newest, or the newest and the last
            let index = if toward_prev || round == 0 { 1 } else { list.len() - 1 };
            list.insert(index, Item::new(format!("moved-{}", round), 0.0));
            let allocation = allocator.allocate(&mut list, index);

            for pair in list.windows(2) {
                prop_assert!(
                    pair[0].position < pair[1].position,
                    "positions collided at round {}: {:?}",
                    round,
                    positions(&list)
                );
            }

            if allocation.is_renumbered() {
                renumbered = true;
                // 65536 = 2^16, so the gap runs out after 16 whole halvings
                prop_assert!(round <= 16, "renumbered late, at round {}", round);
                break;
            }
        }
        prop_assert!(renumbered);
    }
}
