//! Parsers for the terminal's CSI report replies.
//!
//! | Query | Reply |
//! |-------|-------|
//! | Cursor Position Report | `ESC [ <row> ; <col> R` |
//! | Text area size in pixels | `ESC [ 6 ; <height> ; <width> t` |
//!
//! Matching is anchored at the first byte: a reply preceded by anything other
//! than `ESC [` is rejected, even if a valid report follows later in the
//! buffer. Bytes after the terminator are ignored, and a NUL byte ends the
//! reply.
//!
//! ## Examples
//!
//! ```
//! use terminal_query::reply::{parse_cell_size, parse_cursor_position};
//!
//! let pos = parse_cursor_position(b"\x1b[24;80R").unwrap();
//! assert_eq!((pos.row, pos.column), (24, 80));
//!
//! let cell = parse_cell_size(b"\x1b[6;16;8t").unwrap();
//! assert_eq!((cell.width, cell.height), (8, 16));
//!
//! assert!(parse_cursor_position(b"garbage\x1b[12;34R").is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

const ESC: u8 = 0x1b;

/// Report kind for "text area size in pixels" replies to `CSI 16 t`.
pub const CELL_SIZE_SUBTYPE: u32 = 6;

/// Cursor location as reported by the terminal (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CursorPosition {
    /// Row, counting from 1 at the top
    pub row: u32,
    /// Column, counting from 1 at the left
    pub column: u32,
}

impl CursorPosition {
    /// The boundary pair, ordered `(row, column)`.
    pub const fn as_pair(&self) -> (u32, u32) {
        (self.row, self.column)
    }
}

/// Character cell dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellSize {
    /// Cell width in pixels
    pub width: u32,
    /// Cell height in pixels
    pub height: u32,
}

impl CellSize {
    /// The boundary pair, ordered `(width, height)`.
    ///
    /// Note this is the reverse of the reply's field order, and of the
    /// `(row, column)` ordering used by [`CursorPosition::as_pair`].
    pub const fn as_pair(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Parse a Cursor Position Report: `ESC [ <row> ; <col> R`.
pub fn parse_cursor_position(reply: &[u8]) -> Result<CursorPosition, QueryError> {
    let mut scanner = Scanner::new(reply);
    scanner.csi()?;
    let row = scanner.number()?;
    scanner.expect(b';')?;
    let column = scanner.number()?;
    scanner.expect(b'R')?;

    Ok(CursorPosition { row, column })
}

/// Parse a text-area-size report: `ESC [ <type> ; <height> ; <width> t`.
///
/// The report kind must be [`CELL_SIZE_SUBTYPE`]; any other kind is
/// [`QueryError::WrongSubtype`] even when every field parses.
pub fn parse_cell_size(reply: &[u8]) -> Result<CellSize, QueryError> {
    let mut scanner = Scanner::new(reply);
    scanner.csi()?;
    let kind = scanner.number()?;
    scanner.expect(b';')?;
    let height = scanner.number()?;
    scanner.expect(b';')?;
    let width = scanner.number()?;
    scanner.expect(b't')?;

    if kind != CELL_SIZE_SUBTYPE {
        return Err(QueryError::WrongSubtype { found: kind });
    }

    Ok(CellSize { width, height })
}

/// Forward-only cursor over a reply buffer.
struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(reply: &'a [u8]) -> Self {
        let end = reply.iter().position(|&b| b == 0).unwrap_or(reply.len());
        Self {
            bytes: &reply[..end],
            pos: 0,
        }
    }

    fn short(&self) -> QueryError {
        QueryError::ShortReply {
            received: self.bytes.len(),
        }
    }

    fn malformed(&self, byte: u8) -> QueryError {
        QueryError::MalformedReply {
            offset: self.pos,
            byte,
        }
    }

    /// Control Sequence Introducer, which must start the reply.
    fn csi(&mut self) -> Result<(), QueryError> {
        self.expect(ESC)?;
        self.expect(b'[')
    }

    fn expect(&mut self, want: u8) -> Result<(), QueryError> {
        match self.bytes.get(self.pos) {
            None => Err(self.short()),
            Some(&b) if b == want => {
                self.pos += 1;
                Ok(())
            }
            Some(&b) => Err(self.malformed(b)),
        }
    }

    /// One or more ASCII digits. No sign, no leading whitespace.
    fn number(&mut self) -> Result<u32, QueryError> {
        let start = self.pos;
        let mut value: u32 = 0;

        while let Some(&b) = self.bytes.get(self.pos) {
            if !b.is_ascii_digit() {
                break;
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(b - b'0')))
                .ok_or_else(|| self.malformed(b))?;
            self.pos += 1;
        }

        if self.pos == start {
            return match self.bytes.get(self.pos) {
                None => Err(self.short()),
                Some(&b) => Err(self.malformed(b)),
            };
        }

        Ok(value)
    }
}
