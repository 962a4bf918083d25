//! kanban-order CLI - Group board items and compute positions for moves.
//!
//! Commands:
//! - `kanban-order group <file>`: Print the board, one list per group key
//! - `kanban-order move <file> --from <key> [--to <key>] --from-index <n> --to-index <n>`:
//!   Apply a move and print the items whose positions changed
//! - `kanban-order check <file>`: Report items sharing a position
//!
//! Environment variables:
//! - KANBAN_ORDER_*: Override any configuration key (e.g. KANBAN_ORDER_GROUP_BY)
//! - RUST_LOG: Log filter when `--debug` is not given
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error, or `check` found collisions

use std::io::Write;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kanban_order_cli::{commands, Cli, Commands, Result};

fn run(cli: &Cli) -> Result<i32> {
    let config = commands::load_config(cli.config.as_deref(), cli.group_by.as_deref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let code = match &cli.command {
        Commands::Group { file } => {
            commands::run_group(file, &config, cli.format, &mut out)?;
            0
        }
        Commands::Move(args) => {
            commands::run_move(args, &config, cli.format, &mut out)?;
            0
        }
        Commands::Check { file } => {
            if commands::run_check(file, &config, cli.format, &mut out)? {
                0
            } else {
                1
            }
        }
    };
    out.flush()?;
    Ok(code)
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let filter = if cli.debug {
        EnvFilter::new("kanban_order=debug,kanban_order_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    std::process::exit(exit_code);
}
