//! Errors produced while running a terminal query.
//!
//! Every variant collapses to `None` at the public boundary
//! ([`query_cursor_position`](crate::query::query_cursor_position),
//! [`query_cell_size`](crate::query::query_cell_size)). The `try_*` variants
//! of those functions surface them for diagnostics.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during a single request/reply round trip.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The terminal device could not be opened.
    #[error("terminal device {} unavailable: {source}", path.display())]
    DeviceUnavailable {
        /// The device path that was opened
        path: PathBuf,
        /// The underlying open failure
        #[source]
        source: std::io::Error,
    },

    /// Reading or applying terminal attributes failed.
    #[error("terminal mode transition failed: {0}")]
    ModeTransitionFailed(#[source] std::io::Error),

    /// The device stopped accepting the request before all of it was written.
    #[error("short write: {written} of {expected} request bytes delivered")]
    ShortWrite {
        /// Bytes accepted by the device
        written: usize,
        /// Length of the request
        expected: usize,
    },

    /// Writing the request failed.
    #[error("failed to write request: {0}")]
    WriteFailed(#[source] std::io::Error),

    /// The read deadline elapsed with no bytes received.
    #[error("terminal did not reply before the read timeout")]
    Timeout,

    /// Reading the reply failed.
    #[error("failed to read reply: {0}")]
    ReadFailed(#[source] std::io::Error),

    /// The reply ended before the grammar's terminator was seen.
    #[error("reply truncated after {received} bytes")]
    ShortReply {
        /// Bytes of reply that were available
        received: usize,
    },

    /// The reply did not match the anchored grammar.
    #[error("malformed reply: unexpected byte {byte:#04x} at offset {offset}")]
    MalformedReply {
        /// Offset of the first byte that broke the grammar
        offset: usize,
        /// The offending byte
        byte: u8,
    },

    /// A cell-size reply carried a report kind other than 6 (pixels).
    #[error("unexpected report subtype {found} (expected 6)")]
    WrongSubtype {
        /// The subtype the terminal reported
        found: u32,
    },
}
