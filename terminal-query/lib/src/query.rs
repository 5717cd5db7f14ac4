//! Cursor position and cell size queries against the controlling terminal.
//!
//! ## Detection Method
//!
//! The terminal is opened directly (`/dev/tty`), switched out of canonical
//! mode, sent a control sequence and given a short window to reply:
//!
//! | Function | Request | Reply | Result |
//! |----------|---------|-------|--------|
//! | [`query_cursor_position`] | `CSI 6 n` | `CSI row ; col R` | `(row, column)` |
//! | [`query_cell_size`] | `CSI 16 t` | `CSI 6 ; height ; width t` | `(width, height)` |
//!
//! A call blocks for up to the grace period plus the read timeout (about
//! 600ms with defaults). The terminal mode is restored before every return.
//!
//! Calls are serialized process-wide: two queries never have their request
//! and reply windows interleaved on the device.
//!
//! ## Examples
//!
//! ```no_run
//! use terminal_query::query::{query_cell_size, query_cursor_position};
//!
//! if let Some(pos) = query_cursor_position() {
//!     println!("cursor at row {}, column {}", pos.row, pos.column);
//! }
//!
//! match query_cell_size() {
//!     Some(cell) => println!("cells are {}x{} pixels", cell.width, cell.height),
//!     None => println!("cell size unavailable"),
//! }
//! ```

use std::sync::{Mutex, MutexGuard};

use crate::device::TerminalDevice;
use crate::error::QueryError;
use crate::options::QueryOptions;
use crate::probe::{self, Probe};
use crate::reply::{CellSize, CursorPosition};
use crate::tty::Tty;

/// Held for the whole open-write-read-restore-close sequence.
static TERMINAL_LOCK: Mutex<()> = Mutex::new(());

fn lock_terminal() -> MutexGuard<'static, ()> {
    // A panic mid-query has already restored the mode via the guard.
    TERMINAL_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Query the cursor position of the controlling terminal.
///
/// ## Returns
///
/// - `Some(CursorPosition)` with 1-based row and column
/// - `None` if there is no terminal, it did not reply in time, or the reply
///   was not a Cursor Position Report
pub fn query_cursor_position() -> Option<CursorPosition> {
    query_with(&QueryOptions::default())
}

/// Query the character cell size of the controlling terminal in pixels.
///
/// ## Returns
///
/// - `Some(CellSize)` if the terminal reported its cell size in pixels
/// - `None` on any failure, including terminals that answer `CSI 16 t`
///   with a report kind other than 6
pub fn query_cell_size() -> Option<CellSize> {
    query_with(&QueryOptions::default())
}

/// Like [`query_cursor_position`], with explicit options and a typed error.
pub fn try_query_cursor_position(options: &QueryOptions) -> Result<CursorPosition, QueryError> {
    try_query(options)
}

/// Like [`query_cell_size`], with explicit options and a typed error.
pub fn try_query_cell_size(options: &QueryOptions) -> Result<CellSize, QueryError> {
    try_query(options)
}

/// Run any probe against the configured device, collapsing failure to `None`.
pub fn query_with<P: Probe>(options: &QueryOptions) -> Option<P> {
    match try_query::<P>(options) {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::debug!("{}: {}", P::NAME, e);
            None
        }
    }
}

/// Run any probe against the configured device.
pub fn try_query<P: Probe>(options: &QueryOptions) -> Result<P, QueryError> {
    run_locked::<P, Tty, _>(|| Tty::open(&options.device), options)
}

/// [`probe::run`] with the terminal lock held from open to close.
pub(crate) fn run_locked<P, D, F>(open: F, options: &QueryOptions) -> Result<P, QueryError>
where
    P: Probe,
    D: TerminalDevice,
    F: FnOnce() -> Result<D, QueryError>,
{
    let _lock = lock_terminal();
    probe::run::<P, D, _>(open, options)
}
