//! Print the cursor position and cell size of the current terminal.
//!
//! Run with: `cargo run -p terminal-query --example query_terminal`
//! Set `RUST_LOG=terminal_query=debug` to see why a query came back empty.

use terminal_query::{QueryOptions, try_query_cell_size, try_query_cursor_position};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opts = QueryOptions::default();

    match try_query_cursor_position(&opts) {
        Ok(pos) => println!("cursor: row {}, column {}", pos.row, pos.column),
        Err(e) => println!("cursor: unavailable ({})", e),
    }

    match try_query_cell_size(&opts) {
        Ok(cell) => println!("cell:   {}x{} px", cell.width, cell.height),
        Err(e) => println!("cell:   unavailable ({})", e),
    }
}
