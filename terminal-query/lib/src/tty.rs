//! The POSIX controlling terminal as a [`TerminalDevice`].

use std::fs::File;
use std::io;
use std::path::Path;

use crate::device::TerminalDevice;
use crate::error::QueryError;

/// An open terminal character device.
///
/// Opened read-write without becoming the controlling terminal of the
/// calling process. The descriptor is closed when the `Tty` is dropped.
#[derive(Debug)]
pub struct Tty {
    file: File,
}

#[cfg(unix)]
impl Tty {
    /// Open the terminal device at `path`.
    pub fn open(path: &Path) -> Result<Self, QueryError> {
        use std::os::unix::fs::OpenOptionsExt;

        match std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY)
            .open(path)
        {
            Ok(file) => Ok(Self { file }),
            Err(source) => Err(QueryError::DeviceUnavailable {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

#[cfg(not(unix))]
impl Tty {
    /// Open the terminal device at `path` (not supported on this platform).
    pub fn open(path: &Path) -> Result<Self, QueryError> {
        tracing::debug!("Tty::open(): not supported on this platform");
        Err(QueryError::DeviceUnavailable {
            path: path.to_path_buf(),
            source: io::Error::from(io::ErrorKind::Unsupported),
        })
    }
}

#[cfg(unix)]
impl TerminalDevice for Tty {
    type Mode = libc::termios;

    fn get_mode(&mut self) -> io::Result<libc::termios> {
        use std::os::unix::io::AsRawFd;

        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(self.file.as_raw_fd(), &mut termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(termios)
    }

    fn set_mode(&mut self, mode: &libc::termios) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        if unsafe { libc::tcsetattr(self.file.as_raw_fd(), libc::TCSANOW, mode) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn query_mode(original: &libc::termios, timeout_deciseconds: u8) -> libc::termios {
        let mut raw = *original;
        raw.c_lflag &= !(libc::ICANON | libc::ECHO);
        raw.c_cc[libc::VMIN] = 0;
        raw.c_cc[libc::VTIME] = timeout_deciseconds as libc::cc_t;
        raw
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::Write::write(&mut self.file, buf)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut self.file, buf)
    }
}

#[cfg(not(unix))]
impl TerminalDevice for Tty {
    type Mode = ();

    fn get_mode(&mut self) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }

    fn set_mode(&mut self, _mode: &()) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }

    fn query_mode(_original: &(), _timeout_deciseconds: u8) {}

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::Write::write(&mut self.file, buf)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut self.file, buf)
    }
}
