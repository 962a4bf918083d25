//! Core types for board ordering

mod board;
mod ids;
mod item;
mod move_event;
pub mod position;

// Re-export all types
pub use board::{Board, PositionCollision};
pub use ids::{GroupKey, ItemId};
pub use item::Item;
pub use move_event::MoveEvent;
pub use position::Positioned;
