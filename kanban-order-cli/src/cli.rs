//! CLI definition for the kanban-order command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// kanban-order - Group board items into lists and compute positions for moves.
///
/// Items are read from a JSON file holding an array of records (or an object
/// with an `items` array). Each record needs an id and a numeric position;
/// every other field is carried through untouched.
#[derive(Parser, Debug)]
#[command(name = "kanban-order")]
#[command(version)]
#[command(about = "Group board items into lists and compute positions for moves")]
#[command(
    long_about = "Groups board items into lists by a configurable attribute and computes \
    the new position of a moved item, renumbering the destination list when the \
    positions around it run out of room.\n\n\
    Environment variables:\n  \
    KANBAN_ORDER_GROUP_BY        Attribute items are grouped by (default: status)\n  \
    KANBAN_ORDER_STEP            Spacing between renumbered items (default: 65536)\n  \
    KANBAN_ORDER_ID_FIELD        Record field holding the id (default: id)\n  \
    KANBAN_ORDER_POSITION_FIELD  Record field holding the position (default: position)"
)]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Attribute to group items by, overriding configuration
    #[arg(long = "by", global = true, value_name = "ATTRIBUTE")]
    pub group_by: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Group items into lists, ordered by position
    Group {
        /// Items file
        file: PathBuf,
    },

    /// Apply one move and print the items whose positions changed
    Move(MoveArgs),

    /// Report lists where two items share a position
    Check {
        /// Items file
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Items file
    pub file: PathBuf,

    /// List the item is taken from
    #[arg(long, value_name = "KEY")]
    pub from: String,

    /// List the item is dropped into (defaults to the source list)
    #[arg(long, value_name = "KEY")]
    pub to: Option<String>,

    /// Index of the item in the source list
    #[arg(long, value_name = "INDEX")]
    pub from_index: usize,

    /// Index of the item in the destination list after the move
    #[arg(long, value_name = "INDEX")]
    pub to_index: usize,

    /// Print the whole board after the move instead of the changed items
    #[arg(long)]
    pub board: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}
