//! # terminal-query
//!
//! Ask the controlling terminal about itself and read back its answer.
//!
//! Two queries are provided, each returning a pair or `None`:
//!
//! - **Cursor position**: `(row, column)`, 1-based, via `CSI 6 n`
//! - **Cell size**: `(width, height)` in pixels, via `CSI 16 t`
//!
//! Each call puts the terminal into non-canonical, no-echo mode, writes the
//! request, waits a bounded time for the reply and restores the previous
//! mode on every exit path before closing the device.
//!
//! ## Quick Start
//!
//! ```no_run
//! use terminal_query::{query_cell_size, query_cursor_position};
//!
//! if let Some(pos) = query_cursor_position() {
//!     println!("row {} column {}", pos.row, pos.column);
//! }
//! if let Some(cell) = query_cell_size() {
//!     println!("{}x{} px per cell", cell.width, cell.height);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`query`] - Public entry points, serialized process-wide
//! - [`probe`] - The shared request/reply skeleton and the [`Probe`] trait
//! - [`device`] - The [`TerminalDevice`] seam and the RAII [`ModeGuard`]
//! - [`tty`] - POSIX controlling terminal via termios
//! - [`reply`] - Anchored parsers for the CSI reply grammar
//! - [`options`] - Device path and timing
//! - [`error`] - [`QueryError`]

pub mod device;
pub mod error;
pub mod options;
pub mod probe;
pub mod query;
pub mod reply;
pub mod tty;

#[cfg(test)]
mod sim;

pub use device::{ModeGuard, TerminalDevice};
pub use error::QueryError;
pub use options::QueryOptions;
pub use probe::Probe;
pub use query::{
    query_cell_size, query_cursor_position, try_query_cell_size, try_query_cursor_position,
};
pub use reply::{CellSize, CursorPosition};
