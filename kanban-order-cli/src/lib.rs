//! Command line front end for the kanban-order library
//!
//! The binary reads a JSON file of item records, groups them into lists and
//! either prints the board, applies a single move, or checks the lists for
//! items sharing a position.

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::{Cli, Commands, MoveArgs, OutputFormat};
pub use error::{CliError, Result};
