//! Tunables for a terminal query.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// The controlling terminal of the calling process.
pub const DEFAULT_DEVICE: &str = "/dev/tty";

/// Pause between writing the request and reading the reply.
///
/// Gives slow emulators and PTY hops time to answer before the read starts.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(100);

/// How long the read waits for the first reply byte (`VTIME`).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Options for a single terminal query.
///
/// ## Examples
///
/// ```
/// use std::time::Duration;
/// use terminal_query::options::QueryOptions;
///
/// let opts = QueryOptions::default().with_read_timeout(Duration::from_millis(200));
/// assert_eq!(opts.read_timeout_deciseconds(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Terminal device to open
    pub device: PathBuf,
    /// Fixed sleep between writing the request and reading the reply
    pub grace_period: Duration,
    /// Deadline for the read, rounded up to whole deciseconds
    pub read_timeout: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            device: PathBuf::from(DEFAULT_DEVICE),
            grace_period: DEFAULT_GRACE_PERIOD,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl QueryOptions {
    /// Query a different terminal device.
    pub fn with_device(mut self, device: impl AsRef<Path>) -> Self {
        self.device = device.as_ref().to_path_buf();
        self
    }

    /// Override the grace period.
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Override the read timeout.
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// The read timeout as a `VTIME` value: deciseconds, rounded up and
    /// clamped to `1..=255`.
    ///
    /// `VTIME = 0` with `VMIN = 0` would make the read a pure poll, so the
    /// lower bound is one decisecond.
    pub fn read_timeout_deciseconds(&self) -> u8 {
        let ds = self.read_timeout.as_millis().div_ceil(100);
        ds.clamp(1, u128::from(u8::MAX)) as u8
    }
}
