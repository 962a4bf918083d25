//! Command implementations
//!
//! Each command writes its result to the given writer so the binary can point
//! it at stdout and tests can capture it.

use std::io::Write;
use std::path::Path;

use kanban_order::ingest::parse_items_str;
use kanban_order::{Board, GroupKey, Item, ItemSchema, MoveEvent, OrderConfig};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::cli::{MoveArgs, OutputFormat};
use crate::error::{CliError, Result};

/// Load configuration and apply the `--by` override
pub fn load_config(path: Option<&Path>, group_by: Option<&str>) -> Result<OrderConfig> {
    let mut config = OrderConfig::load(path)?;
    if let Some(attribute) = group_by {
        config.group_by = attribute.to_string();
        config.validate()?;
    }
    Ok(config)
}

/// Read an items file and group it into a position-sorted board
pub fn load_board(file: &Path, config: &OrderConfig) -> Result<Board> {
    let text = std::fs::read_to_string(file).map_err(|source| CliError::Read {
        path: file.to_path_buf(),
        source,
    })?;
    let items = parse_items_str(&text, &config.schema())?;
    debug!(count = items.len(), file = %file.display(), "Read items");

    let mut board = Board::group(items, config.group_by.clone());
    board.sort_by_position();
    Ok(board)
}

/// Print every list of the board
pub fn run_group(
    file: &Path,
    config: &OrderConfig,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let board = load_board(file, config)?;
    emit(&board_value(&board, &config.schema()), format, out)
}

/// Apply one move and print what changed
pub fn run_move(
    args: &MoveArgs,
    config: &OrderConfig,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let mut board = load_board(&args.file, config)?;
    let source = resolve_key(&board, &args.from)
        .ok_or_else(|| CliError::UnknownList(args.from.clone()))?;
    let dest = match &args.to {
        // The destination list may not exist yet
        Some(to) => resolve_key(&board, to).unwrap_or_else(|| GroupKey::new(to.as_str())),
        None => source.clone(),
    };

    let event = MoveEvent::new(source, dest, args.from_index, args.to_index);
    let allocation = board.apply_move(&event, &config.allocator())?;
    info!(
        changed = allocation.len(),
        renumbered = allocation.is_renumbered(),
        "Applied move"
    );

    let schema = config.schema();
    let value = if args.board {
        board_value(&board, &schema)
    } else {
        json!({
            "renumbered": allocation.is_renumbered(),
            "changed": records(allocation.changed(), &schema),
        })
    };
    emit(&value, format, out)
}

/// Report position collisions. Returns `true` when the board is clean.
pub fn run_check(
    file: &Path,
    config: &OrderConfig,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<bool> {
    let board = load_board(file, config)?;
    let collisions = board.duplicate_positions();

    let value: Vec<Value> = collisions
        .iter()
        .map(|collision| {
            json!({
                "key": collision.key.to_value(),
                "position": collision.position,
                "ids": collision.ids.iter().map(|id| id.as_str()).collect::<Vec<_>>(),
            })
        })
        .collect();
    emit(&Value::Array(value), format, out)?;

    Ok(collisions.is_empty())
}

/// Map a command line list name to a board key.
///
/// `null` names the list of items without the attribute unless the board has
/// a list literally called "null".
fn resolve_key(board: &Board, raw: &str) -> Option<GroupKey> {
    let named = GroupKey::new(raw);
    if board.get(&named).is_some() {
        return Some(named);
    }
    if raw == "null" && board.get(&GroupKey::null()).is_some() {
        return Some(GroupKey::null());
    }
    None
}

fn records(items: &[Item], schema: &ItemSchema) -> Vec<Value> {
    items.iter().map(|item| item.to_record(schema)).collect()
}

fn board_value(board: &Board, schema: &ItemSchema) -> Value {
    let lists: Vec<Value> = board
        .lists()
        .map(|(key, items)| {
            json!({
                "key": key.to_value(),
                "items": records(items, schema),
            })
        })
        .collect();
    json!({
        "group_by": board.group_by(),
        "lists": lists,
    })
}

fn emit(value: &Value, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => {
            write!(out, "{}", serde_yaml_ng::to_string(value)?)?;
        }
    }
    Ok(())
}
