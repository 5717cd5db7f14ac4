//! The terminal device seam.
//!
//! [`TerminalDevice`] is the minimal contract a query needs from a character
//! device: read and apply its attributes, write a request, read a reply.
//! Closing the device is dropping it. [`Tty`](crate::tty::Tty) implements it
//! for the POSIX controlling terminal; tests implement it with a simulated
//! device.

use std::io;

/// A character device with a raw-mode control interface.
pub trait TerminalDevice {
    /// A snapshot of the device's attribute state.
    type Mode: Clone;

    /// Capture the current attributes.
    fn get_mode(&mut self) -> io::Result<Self::Mode>;

    /// Apply `mode` immediately.
    fn set_mode(&mut self, mode: &Self::Mode) -> io::Result<()>;

    /// Derive the attributes used while a query is in flight: canonical input
    /// processing and echo disabled, and reads that return as soon as any
    /// byte is available or after `timeout_deciseconds` with nothing read.
    fn query_mode(original: &Self::Mode, timeout_deciseconds: u8) -> Self::Mode;

    /// Write some prefix of `buf`, returning how many bytes were accepted.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Read whatever is available into `buf`, waiting at most the configured
    /// read timeout. Returns 0 when the timeout elapses with nothing read.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// RAII guard that restores a captured mode on drop.
///
/// Borrows the device for its whole lifetime, so the device cannot be
/// dropped (closed) until the original mode has been put back.
pub struct ModeGuard<'a, D: TerminalDevice> {
    device: &'a mut D,
    original: D::Mode,
}

impl<'a, D: TerminalDevice> ModeGuard<'a, D> {
    /// Take ownership of a captured `original` mode.
    ///
    /// From this point on `original` is restored when the guard is dropped,
    /// whether or not any later mode change succeeds.
    pub fn new(device: &'a mut D, original: D::Mode) -> Self {
        Self { device, original }
    }

    /// The mode that will be restored.
    pub fn original(&self) -> &D::Mode {
        &self.original
    }

    /// The guarded device.
    pub fn device(&mut self) -> &mut D {
        self.device
    }
}

impl<D: TerminalDevice> Drop for ModeGuard<'_, D> {
    fn drop(&mut self) {
        if let Err(e) = self.device.set_mode(&self.original) {
            tracing::warn!("failed to restore terminal mode: {}", e);
        } else {
            tracing::trace!("terminal mode restored");
        }
    }
}
