//! One request/reply round trip against a terminal device.
//!
//! Both queries share the same skeleton and differ only in the request bytes
//! and the reply grammar, which [`Probe`] supplies:
//!
//! 1. open the device (failure returns before anything else happens)
//! 2. capture the current mode and arm a [`ModeGuard`]
//! 3. apply the query mode (no canonical input, no echo, timed reads)
//! 4. write the request
//! 5. sleep for the grace period
//! 6. one bounded read
//! 7. restore the mode and close the device
//! 8. parse the reply
//!
//! Step 7 is the guard's and the device's `Drop`, so no early return in
//! steps 2-6 can skip it.

use crate::device::{ModeGuard, TerminalDevice};
use crate::error::QueryError;
use crate::options::QueryOptions;
use crate::reply::{self, CellSize, CursorPosition};

/// Size of the reply buffer. Both replies fit comfortably.
pub const REPLY_BUFFER_SIZE: usize = 64;

/// A terminal report that can be requested and parsed.
pub trait Probe: Sized {
    /// Name used in diagnostics.
    const NAME: &'static str;

    /// The control sequence that asks for the report.
    const REQUEST: &'static [u8];

    /// Parse the terminal's reply.
    fn parse(reply: &[u8]) -> Result<Self, QueryError>;
}

impl Probe for CursorPosition {
    const NAME: &'static str = "cursor-position";
    /// Device Status Report 6 (Cursor Position Report).
    const REQUEST: &'static [u8] = b"\x1b[6n";

    fn parse(reply: &[u8]) -> Result<Self, QueryError> {
        reply::parse_cursor_position(reply)
    }
}

impl Probe for CellSize {
    const NAME: &'static str = "cell-size";
    /// XTWINOPS 16: report character cell size in pixels.
    const REQUEST: &'static [u8] = b"\x1b[16t";

    fn parse(reply: &[u8]) -> Result<Self, QueryError> {
        reply::parse_cell_size(reply)
    }
}

/// Run probe `P` against the device returned by `open`.
///
/// The caller is responsible for serializing access to the device; see
/// [`crate::query`] for the serialized public entry points.
pub fn run<P, D, F>(open: F, options: &QueryOptions) -> Result<P, QueryError>
where
    P: Probe,
    D: TerminalDevice,
    F: FnOnce() -> Result<D, QueryError>,
{
    let mut device = open()?;

    let original = device
        .get_mode()
        .map_err(QueryError::ModeTransitionFailed)?;
    let query_mode = D::query_mode(&original, options.read_timeout_deciseconds());

    let mut buf = [0u8; REPLY_BUFFER_SIZE];
    let n = {
        let mut guard = ModeGuard::new(&mut device, original);
        exchange::<P, D>(guard.device(), &query_mode, options, &mut buf)?
    };
    drop(device);

    let reply = &buf[..n];
    tracing::trace!(
        "{}: reply {:?}",
        P::NAME,
        String::from_utf8_lossy(reply)
    );

    P::parse(reply)
}

/// Steps 3-6: runs entirely inside the mode guard.
fn exchange<P: Probe, D: TerminalDevice>(
    device: &mut D,
    query_mode: &D::Mode,
    options: &QueryOptions,
    buf: &mut [u8; REPLY_BUFFER_SIZE],
) -> Result<usize, QueryError> {
    device
        .set_mode(query_mode)
        .map_err(QueryError::ModeTransitionFailed)?;

    write_request(device, P::REQUEST)?;

    std::thread::sleep(options.grace_period);

    // One slot is kept back so the buffer always holds a NUL after the reply.
    let n = device
        .read(&mut buf[..REPLY_BUFFER_SIZE - 1])
        .map_err(QueryError::ReadFailed)?;
    if n == 0 {
        tracing::debug!("{}: no reply within {:?}", P::NAME, options.read_timeout);
        return Err(QueryError::Timeout);
    }

    Ok(n)
}

/// Write the whole request, or report how far it got.
fn write_request<D: TerminalDevice>(device: &mut D, request: &[u8]) -> Result<(), QueryError> {
    let mut written = 0;
    while written < request.len() {
        match device.write(&request[written..]) {
            Ok(0) => {
                return Err(QueryError::ShortWrite {
                    written,
                    expected: request.len(),
                });
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(QueryError::WriteFailed(e)),
        }
    }
    Ok(())
}
