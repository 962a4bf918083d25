//! Board grouping and fractional position allocation
//!
//! This crate keeps a stable, mutable ordering over items spread across the
//! named lists (columns) of a board. Moving one item normally rewrites one
//! position; only when the positions around it run out of room is the whole
//! destination list renumbered.
//!
//! ## Overview
//!
//! - **Grouping** - [`group::group_by`] partitions a flat collection by a key
//!   function, keeping input order; [`Board`] does the same for items keyed by
//!   a named attribute
//! - **Allocation** - [`PositionAllocator`] assigns the moved item a midpoint,
//!   half-of-first or last-plus-step position and renumbers on precision loss
//! - **Ingestion** - [`ingest`] validates raw JSON records into [`Item`]s
//! - **Session** - [`BoardSession`] keeps a board current from an
//!   [`ItemSource`] and hands change sets to an [`ItemSink`]
//!
//! ## Basic Usage
//!
//! ```rust
//! use kanban_order::{Board, Item, MoveEvent, PositionAllocator};
//!
//! # fn example() -> kanban_order::Result<()> {
//! let items = vec![
//!     Item::new("1", 65536.0).with_field("status", "todo"),
//!     Item::new("2", 131072.0).with_field("status", "todo"),
//!     Item::new("3", 65536.0).with_field("status", "done"),
//! ];
//! let mut board = Board::group(items, "status");
//! board.sort_by_position();
//!
//! // Drag the first todo card to the bottom of done
//! let allocation = board.apply_move(
//!     &MoveEvent::new("todo", "done", 0, 1),
//!     &PositionAllocator::default(),
//! )?;
//! assert_eq!(allocation.changed()[0].position, 131072.0);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod allocate;
pub mod config;
mod error;
pub mod group;
pub mod ingest;
mod session;
pub mod sink;
pub mod source;
pub mod types;

pub use allocate::{Allocation, PositionAllocator, MAX_LIST_LEN, MAX_POSITION, STEP};
pub use config::{ConfigError, OrderConfig};
pub use error::{OrderError, Result};
pub use ingest::ItemSchema;
pub use session::BoardSession;
pub use sink::{ItemSink, MemorySink};
pub use source::{ItemSource, MemorySource};

// Re-export commonly used types
pub use types::{Board, GroupKey, Item, ItemId, MoveEvent, PositionCollision, Positioned};
