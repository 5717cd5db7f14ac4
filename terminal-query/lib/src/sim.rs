//! In-memory terminal for unit tests.
//!
//! Clones share state, so a test keeps one handle for inspection and hands
//! clones to the code under test as "opened" devices. Dropping a clone is a
//! close. Reads follow `VMIN = 0` semantics: return what is queued, or wait
//! `VTIME` deciseconds and return 0.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::device::TerminalDevice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimMode {
    pub canonical: bool,
    pub echo: bool,
    pub vmin: u8,
    pub vtime: u8,
}

impl Default for SimMode {
    fn default() -> Self {
        Self {
            canonical: true,
            echo: true,
            vmin: 1,
            vtime: 0,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    mode: SimMode,
    history: Vec<SimMode>,
    reply: Vec<u8>,
    written: Vec<u8>,
    write_capacity: Option<usize>,
    write_chunk: Option<usize>,
    largest_read: usize,
    fail_get: bool,
    fail_first_set: bool,
    fail_read: bool,
    no_read_delay: bool,
    answer: Option<Vec<u8>>,
    awaiting_read: bool,
    interleaved: bool,
    closed: bool,
    restored_at_close: Option<bool>,
}

#[derive(Debug)]
pub struct SimTerminal {
    state: Arc<Mutex<State>>,
}

impl Clone for SimTerminal {
    fn clone(&self) -> Self {
        self.lock().closed = false;
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl Drop for SimTerminal {
    fn drop(&mut self) {
        let mut state = self.lock();
        state.closed = true;
        state.restored_at_close = Some(state.mode == SimMode::default());
    }
}

impl SimTerminal {
    pub fn replying(reply: &[u8]) -> Self {
        let sim = Self::silent();
        sim.set_reply(reply);
        sim
    }

    pub fn silent() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn without_read_delay(self) -> Self {
        self.lock().no_read_delay = true;
        self
    }

    pub fn failing_get_mode(self) -> Self {
        self.lock().fail_get = true;
        self
    }

    pub fn failing_first_set_mode(self) -> Self {
        self.lock().fail_first_set = true;
        self
    }

    pub fn failing_read(self) -> Self {
        self.lock().fail_read = true;
        self
    }

    pub fn accepting_only(self, bytes: usize) -> Self {
        self.lock().write_capacity = Some(bytes);
        self
    }

    pub fn writing_in_chunks(self, bytes: usize) -> Self {
        self.lock().write_chunk = Some(bytes);
        self
    }

    /// Queue `reply` after every write, like a terminal answering a request.
    pub fn answering(self, reply: &[u8]) -> Self {
        self.lock().answer = Some(reply.to_vec());
        self
    }

    pub fn set_reply(&self, reply: &[u8]) {
        self.lock().reply = reply.to_vec();
    }

    pub fn mode(&self) -> SimMode {
        self.lock().mode
    }

    pub fn mode_history(&self) -> Vec<SimMode> {
        self.lock().history.clone()
    }

    pub fn written(&self) -> Vec<u8> {
        self.lock().written.clone()
    }

    pub fn largest_read_request(&self) -> usize {
        self.lock().largest_read
    }

    /// Whether a request was written while an earlier one was still
    /// waiting for its read.
    pub fn saw_interleaving(&self) -> bool {
        self.lock().interleaved
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn restored_before_close(&self) -> bool {
        self.lock().restored_at_close == Some(true)
    }
}

impl TerminalDevice for SimTerminal {
    type Mode = SimMode;

    fn get_mode(&mut self) -> io::Result<SimMode> {
        let state = self.lock();
        if state.fail_get {
            return Err(io::Error::other("not a terminal"));
        }
        Ok(state.mode)
    }

    fn set_mode(&mut self, mode: &SimMode) -> io::Result<()> {
        let mut state = self.lock();
        if state.fail_first_set {
            state.fail_first_set = false;
            return Err(io::Error::other("tcsetattr failed"));
        }
        state.mode = *mode;
        state.history.push(*mode);
        Ok(())
    }

    fn query_mode(_original: &SimMode, timeout_deciseconds: u8) -> SimMode {
        SimMode {
            canonical: false,
            echo: false,
            vmin: 0,
            vtime: timeout_deciseconds,
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.lock();
        let mut n = buf.len();
        if let Some(chunk) = state.write_chunk {
            n = n.min(chunk);
        }
        if let Some(capacity) = state.write_capacity {
            n = n.min(capacity.saturating_sub(state.written.len()));
        }
        state.written.extend_from_slice(&buf[..n]);
        if n > 0 {
            if state.awaiting_read {
                state.interleaved = true;
            }
            state.awaiting_read = true;
            if let Some(answer) = state.answer.clone() {
                state.reply.extend_from_slice(&answer);
            }
        }
        Ok(n)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let (delay, n) = {
            let mut state = self.lock();
            state.awaiting_read = false;
            state.largest_read = state.largest_read.max(buf.len());
            if state.fail_read {
                return Err(io::Error::other("read failed"));
            }
            let n = state.reply.len().min(buf.len());
            buf[..n].copy_from_slice(&state.reply[..n]);
            state.reply.drain(..n);

            let delay = if n == 0 && !state.no_read_delay {
                Duration::from_millis(u64::from(state.mode.vtime) * 100)
            } else {
                Duration::ZERO
            };
            (delay, n)
        };
        std::thread::sleep(delay);
        Ok(n)
    }
}
