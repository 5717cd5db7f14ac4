//! Terminal query CLI.
//!
//! Exposes the two terminal queries as zero-argument subcommands:
//! - `tq cursor-position` prints `row column`
//! - `tq cell-size` prints `width height`
//!
//! A query the terminal cannot answer prints `nil` (or `null` with `--json`)
//! and still exits successfully.

use std::path::PathBuf;
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;
use terminal_query::{
    CellSize, CursorPosition, QueryOptions,
    options::{DEFAULT_DEVICE, DEFAULT_GRACE_PERIOD, DEFAULT_READ_TIMEOUT},
    query::query_with,
};

/// Terminal query utility
#[derive(Parser, Debug)]
#[command(name = "tq")]
#[command(author, version, about = "Query the terminal for cursor position and cell size")]
#[command(after_help = "\
OUTPUT:
  cursor-position   row column     (1-based)
  cell-size         width height   (pixels)

  A terminal that does not answer prints nil.

SHELL COMPLETIONS:
  # Bash
  tq --completions bash >> ~/.bashrc

  # Zsh (ensure fpath includes the directory)
  tq --completions zsh > ~/.zfunc/_tq

  # Fish
  tq --completions fish > ~/.config/fish/completions/tq.fish
")]
struct Args {
    /// Output in JSON format
    #[arg(long, global = true, conflicts_with = "sexp")]
    json: bool,

    /// Output as a Lisp dotted pair, e.g. (24 . 80)
    #[arg(long, global = true)]
    sexp: bool,

    /// Terminal device to query
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_DEVICE)]
    device: PathBuf,

    /// Milliseconds to wait after sending the request before reading
    #[arg(long, global = true, value_name = "MS", default_value_t = DEFAULT_GRACE_PERIOD.as_millis() as u64)]
    grace_ms: u64,

    /// Milliseconds the read waits for a reply (rounded up to 100ms steps)
    #[arg(long, global = true, value_name = "MS", default_value_t = DEFAULT_READ_TIMEOUT.as_millis() as u64)]
    timeout_ms: u64,

    /// Generate shell completions and exit.
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Report the cursor position as `row column`
    CursorPosition,

    /// Report the character cell size in pixels as `width height`
    CellSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Plain,
    Json,
    Sexp,
}

#[derive(Debug, Serialize)]
struct Report {
    cursor_position: Option<CursorPosition>,
    cell_size: Option<CellSize>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Setup logging if RUST_LOG is set; stderr keeps stdout parseable
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let args = Args::parse();

    if let Some(shell) = args.completions {
        let mut cmd = Args::command();
        clap_complete::generate(shell, &mut cmd, "tq", &mut std::io::stdout());
        return Ok(());
    }

    let options = QueryOptions::default()
        .with_device(&args.device)
        .with_grace_period(Duration::from_millis(args.grace_ms))
        .with_read_timeout(Duration::from_millis(args.timeout_ms));
    tracing::debug!(
        "querying {} (grace {:?}, read timeout {:?})",
        options.device.display(),
        options.grace_period,
        options.read_timeout
    );

    let format = if args.json {
        Format::Json
    } else if args.sexp {
        Format::Sexp
    } else {
        Format::Plain
    };

    match args.command {
        Some(Command::CursorPosition) => {
            let pos = query_with::<CursorPosition>(&options);
            print_pair(pos.map(|p| p.as_pair()), &pos, format)?;
        }
        Some(Command::CellSize) => {
            let cell = query_with::<CellSize>(&options);
            print_pair(cell.map(|c| c.as_pair()), &cell, format)?;
        }
        None => {
            let report = Report {
                cursor_position: query_with(&options),
                cell_size: query_with(&options),
            };
            print_report(&report, format)?;
        }
    }

    Ok(())
}

/// Prints one query result in the requested format.
fn print_pair<T: Serialize>(
    pair: Option<(u32, u32)>,
    value: &Option<T>,
    format: Format,
) -> color_eyre::Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(value)?),
        Format::Sexp => println!("{}", format_sexp(pair)),
        Format::Plain => println!("{}", format_plain(pair)),
    }
    Ok(())
}

/// Prints both query results in the requested format.
fn print_report(report: &Report, format: Format) -> color_eyre::Result<()> {
    let cursor = report.cursor_position.map(|p| p.as_pair());
    let cell = report.cell_size.map(|c| c.as_pair());

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(report)?),
        Format::Sexp => println!(
            "((cursor-position . {}) (cell-size . {}))",
            format_sexp(cursor),
            format_sexp(cell)
        ),
        Format::Plain => {
            println!("Cursor position: {}", format_plain(cursor));
            println!("Cell size:       {}", format_plain(cell));
        }
    }
    Ok(())
}

fn format_plain(pair: Option<(u32, u32)>) -> String {
    match pair {
        Some((a, b)) => format!("{} {}", a, b),
        None => "nil".to_string(),
    }
}

fn format_sexp(pair: Option<(u32, u32)>) -> String {
    match pair {
        Some((a, b)) => format!("({} . {})", a, b),
        None => "nil".to_string(),
    }
}
