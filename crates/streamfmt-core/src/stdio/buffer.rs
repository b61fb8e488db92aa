//! Stream buffering.
//!
//! Three modes: fully buffered, line buffered, and unbuffered. Writes are
//! staged until the mode says they must reach the device; reads are served
//! from a refillable window.
//!
//! Invariants:
//! - `pos <= filled <= data.len()` for the read window
//! - `pending.len() <= capacity` between writes in `Full` mode

use std::io;

/// Default buffer size.
pub const BUFSIZ: usize = 8192;

/// Buffering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufMode {
    /// Spill when the buffer is full.
    Full,
    /// Spill on newline or when full.
    Line,
    /// Every write goes straight to the device.
    None,
}

/// Staging buffer for one stream direction.
#[derive(Debug)]
pub struct StreamBuffer {
    data: Vec<u8>,
    /// Read cursor into `data[..filled]`.
    pos: usize,
    /// Valid bytes in the read window.
    filled: usize,
    /// Staged output not yet handed to the device.
    pending: Vec<u8>,
    capacity: usize,
    mode: BufMode,
    io_started: bool,
}

impl StreamBuffer {
    /// Create a new buffer with the given mode and capacity.
    #[must_use]
    pub fn new(mode: BufMode, capacity: usize) -> Self {
        let capacity = if matches!(mode, BufMode::None) {
            0
        } else {
            capacity.max(1)
        };
        Self {
            data: Vec::new(),
            pos: 0,
            filled: 0,
            pending: Vec::with_capacity(capacity),
            capacity,
            mode,
            io_started: false,
        }
    }

    /// Current buffering mode.
    #[must_use]
    pub fn mode(&self) -> BufMode {
        self.mode
    }

    /// Buffer capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change buffering mode and size.
    ///
    /// Returns `false` once any I/O has gone through this buffer.
    pub fn set_mode(&mut self, mode: BufMode, size: usize) -> bool {
        if self.io_started {
            return false;
        }
        *self = Self::new(mode, size);
        true
    }

    // -----------------------------------------------------------------------
    // Write side
    // -----------------------------------------------------------------------

    /// Stage `bytes`. Returns the bytes the caller must now write to the
    /// device, or `None` if everything was absorbed.
    pub fn write(&mut self, bytes: &[u8]) -> Option<Vec<u8>> {
        self.io_started = true;
        match self.mode {
            BufMode::None => Some(bytes.to_vec()),
            BufMode::Full => self.write_full(bytes),
            BufMode::Line => self.write_line(bytes),
        }
    }

    /// Staged bytes not yet written to the device.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Remove and return all staged bytes.
    pub fn take_pending(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.pending)
    }

    fn write_full(&mut self, bytes: &[u8]) -> Option<Vec<u8>> {
        if self.pending.len() + bytes.len() <= self.capacity {
            self.pending.extend_from_slice(bytes);
            return None;
        }
        let mut spill = self.take_pending();
        spill.extend_from_slice(bytes);
        Some(spill)
    }

    fn write_line(&mut self, bytes: &[u8]) -> Option<Vec<u8>> {
        let Some(nl) = bytes.iter().rposition(|&b| b == b'\n') else {
            return self.write_full(bytes);
        };
        let mut spill = self.take_pending();
        spill.extend_from_slice(&bytes[..=nl]);
        let rest = &bytes[nl + 1..];
        if rest.len() <= self.capacity {
            self.pending.extend_from_slice(rest);
        } else {
            spill.extend_from_slice(rest);
        }
        Some(spill)
    }

    // -----------------------------------------------------------------------
    // Read side
    // -----------------------------------------------------------------------

    /// Refill the read window in place from `source`, which receives the
    /// whole window and returns how many bytes it wrote. The window is
    /// allocated once and reused.
    pub fn refill(
        &mut self,
        source: impl FnOnce(&mut [u8]) -> io::Result<usize>,
    ) -> io::Result<usize> {
        self.io_started = true;
        let window = self.capacity.max(1);
        if self.data.len() != window {
            self.data.resize(window, 0);
        }
        self.pos = 0;
        self.filled = 0;
        let n = source(&mut self.data)?;
        self.filled = n.min(window);
        Ok(self.filled)
    }

    /// Bytes available in the read window.
    #[must_use]
    pub fn readable(&self) -> usize {
        self.filled.saturating_sub(self.pos)
    }

    /// Next byte without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        (self.pos < self.filled).then(|| self.data[self.pos])
    }

    /// Consume and return the next byte.
    pub fn next_byte(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Drop the next byte, if any.
    pub fn consume(&mut self) {
        if self.pos < self.filled {
            self.pos += 1;
        }
    }

    /// Discard the read window.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.filled = 0;
    }
}
