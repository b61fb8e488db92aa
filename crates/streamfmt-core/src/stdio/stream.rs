//! Status-checked text streams.
//!
//! [`TextStream`] is one handle over a file or an in-memory buffer. Its
//! lifecycle is `Unopened -> Open -> Closed`. Every read and open returns a
//! `Result` and mirrors the outcome in [`StreamFlags`]; nothing here panics
//! on a missing file or on end of input.
//!
//! Once `fail` is set, later reads and writes are refused until [`clear`]
//! is called. File output is fully buffered: bytes reach the file on
//! overflow, [`flush`], [`close`], or drop.
//!
//! [`clear`]: TextStream::clear
//! [`flush`]: TextStream::flush
//! [`close`]: TextStream::close

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::buffer::{BUFSIZ, BufMode, StreamBuffer};
use super::file::{AccessMode, Disposition, HandleState, OpenMode, StreamFlags};
use super::format::{FormatArg, FormatState, Manip};
use super::scan::FromToken;
use crate::error::StreamError;

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

/// In-memory backing: writes append, reads advance their own cursor.
#[derive(Debug, Default)]
struct MemoryBuffer {
    data: Vec<u8>,
    read_pos: usize,
}

#[derive(Debug)]
enum Device {
    File(File),
    Memory(MemoryBuffer),
}

impl Device {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::File(f) => f.read(buf),
            Self::Memory(m) => {
                let rest = &m.data[m.read_pos..];
                let n = rest.len().min(buf.len());
                buf[..n].copy_from_slice(&rest[..n]);
                m.read_pos += n;
                Ok(n)
            }
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self {
            Self::File(f) => f.write_all(bytes),
            Self::Memory(m) => {
                m.data.extend_from_slice(bytes);
                Ok(())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::File(f) => f.flush(),
            Self::Memory(_) => Ok(()),
        }
    }

    /// Move the file cursor back over bytes read ahead but not consumed.
    fn unread(&mut self, count: usize) -> io::Result<()> {
        match self {
            Self::File(f) if count > 0 => f.seek(SeekFrom::Current(-(count as i64))).map(|_| ()),
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Stream
// ---------------------------------------------------------------------------

/// A text handle over a file or memory buffer.
#[derive(Debug)]
pub struct TextStream {
    device: Option<Device>,
    state: HandleState,
    mode: OpenMode,
    flags: StreamFlags,
    read_buf: StreamBuffer,
    write_buf: StreamBuffer,
    fmt: FormatState,
    path: Option<PathBuf>,
}

impl Default for TextStream {
    fn default() -> Self {
        Self::new()
    }
}

impl TextStream {
    /// An unopened handle. Every read or write fails until [`open`] succeeds.
    ///
    /// [`open`]: TextStream::open
    #[must_use]
    pub fn new() -> Self {
        Self {
            device: None,
            state: HandleState::Unopened,
            mode: OpenMode::read(),
            flags: StreamFlags::default(),
            read_buf: StreamBuffer::new(BufMode::Full, BUFSIZ),
            write_buf: StreamBuffer::new(BufMode::Full, BUFSIZ),
            fmt: FormatState::default(),
            path: None,
        }
    }

    /// Construct and open in one step. Check [`ok`](Self::ok) afterwards.
    #[must_use]
    pub fn opened(path: impl AsRef<Path>, mode: OpenMode) -> Self {
        let mut stream = Self::new();
        // The failure is recorded in the flags.
        let _ = stream.open(path, mode);
        stream
    }

    /// Construct and open, returning the open failure as an error.
    pub fn try_open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self, StreamError> {
        let mut stream = Self::new();
        stream.open(path, mode)?;
        Ok(stream)
    }

    /// A read-only stream over `text`.
    #[must_use]
    pub fn from_string(text: impl Into<String>) -> Self {
        Self::memory_with(
            text.into().into_bytes(),
            OpenMode::new(AccessMode::Read, Disposition::OpenExisting),
        )
    }

    /// An empty read-write memory stream.
    #[must_use]
    pub fn memory() -> Self {
        Self::memory_with(
            Vec::new(),
            OpenMode::new(AccessMode::ReadWrite, Disposition::CreateIfMissing),
        )
    }

    fn memory_with(data: Vec<u8>, mode: OpenMode) -> Self {
        let mut stream = Self::new();
        stream.device = Some(Device::Memory(MemoryBuffer { data, read_pos: 0 }));
        stream.state = HandleState::Open;
        stream.mode = mode;
        stream.write_buf = StreamBuffer::new(BufMode::None, 0);
        stream
    }

    /// Bind this handle to `path`.
    ///
    /// On failure the handle stays unopened with `fail` set.
    pub fn open(&mut self, path: impl AsRef<Path>, mode: OpenMode) -> Result<(), StreamError> {
        let path = path.as_ref();
        if self.state == HandleState::Open {
            self.flags.fail = true;
            return Err(StreamError::AlreadyOpen);
        }
        match mode.to_open_options().open(path) {
            Ok(file) => {
                self.device = Some(Device::File(file));
                self.state = HandleState::Open;
                self.mode = mode;
                self.flags = StreamFlags::default();
                self.read_buf.reset();
                self.path = Some(path.to_path_buf());
                Ok(())
            }
            Err(source) => {
                self.flags.fail = true;
                Err(StreamError::ResourceUnavailable {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    // -----------------------------------------------------------------------
    // Status
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn state(&self) -> HandleState {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == HandleState::Open
    }

    #[must_use]
    pub fn flags(&self) -> StreamFlags {
        self.flags
    }

    /// No status flag is set.
    #[must_use]
    pub fn good(&self) -> bool {
        self.flags.good()
    }

    /// No operation has failed; end of input alone keeps this true.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.flags.ok()
    }

    #[must_use]
    pub fn eof(&self) -> bool {
        self.flags.eof
    }

    #[must_use]
    pub fn fail(&self) -> bool {
        !self.flags.ok()
    }

    /// Reset all status flags.
    pub fn clear(&mut self) {
        self.flags = StreamFlags::default();
    }

    #[must_use]
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Change output buffering. Only allowed before the first write.
    pub fn set_buffering(&mut self, mode: BufMode, size: usize) -> bool {
        self.write_buf.set_mode(mode, size)
    }

    /// Formatting state used by [`write`](Self::write).
    #[must_use]
    pub fn format_state(&self) -> &FormatState {
        &self.fmt
    }

    pub fn format_state_mut(&mut self) -> &mut FormatState {
        &mut self.fmt
    }

    /// Apply a manipulator to this stream's formatting state.
    pub fn manip(&mut self, manip: Manip) -> &mut Self {
        self.fmt.apply(manip);
        self
    }

    /// Everything written to a memory stream; `None` for files.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        match &self.device {
            Some(Device::Memory(m)) => Some(String::from_utf8_lossy(&m.data).into_owned()),
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Next raw byte, whitespace included.
    pub fn read_char(&mut self) -> Result<u8, StreamError> {
        self.check_readable()?;
        match self.next_byte()? {
            Some(b) => Ok(b),
            None => Err(self.hit_end()),
        }
    }

    /// Bytes up to the next `\n` (consumed, not returned) or end of input.
    ///
    /// Fails only when called with nothing left to read.
    pub fn read_line_bytes(&mut self) -> Result<Vec<u8>, StreamError> {
        self.check_readable()?;
        let mut line = Vec::new();
        loop {
            match self.next_byte()? {
                Some(b'\n') => return Ok(line),
                Some(b) => line.push(b),
                None if line.is_empty() => return Err(self.hit_end()),
                None => {
                    self.flags.eof = true;
                    return Ok(line);
                }
            }
        }
    }

    /// [`read_line_bytes`](Self::read_line_bytes) decoded as UTF-8
    /// (invalid sequences are replaced).
    pub fn read_line(&mut self) -> Result<String, StreamError> {
        self.read_line_bytes()
            .map(|line| String::from_utf8_lossy(&line).into_owned())
    }

    /// Skip whitespace, read one token, and convert all of it to `T`.
    ///
    /// Integers are read in the stream's current base, so `Manip::Hex`
    /// makes `ff` and `0xff` both read as 255.
    pub fn read_token<T: FromToken>(&mut self) -> Result<T, StreamError> {
        self.check_readable()?;
        loop {
            match self.peek_byte()? {
                Some(b) if b.is_ascii_whitespace() => self.read_buf.consume(),
                Some(_) => break,
                None => return Err(self.hit_end()),
            }
        }

        let mut raw = Vec::new();
        loop {
            match self.peek_byte()? {
                Some(b) if !b.is_ascii_whitespace() => {
                    raw.push(b);
                    self.read_buf.consume();
                }
                Some(_) => break,
                None => {
                    self.flags.eof = true;
                    break;
                }
            }
        }

        let token = String::from_utf8_lossy(&raw);
        match T::from_token_in(&token, self.fmt.base()) {
            Some(value) => Ok(value),
            None => {
                self.flags.fail = true;
                Err(StreamError::TypeMismatch {
                    token: token.into_owned(),
                    expected: T::EXPECTED,
                })
            }
        }
    }

    /// Iterate over the remaining lines; stops at end of input or after the
    /// first error.
    pub fn lines(&mut self) -> Lines<'_> {
        Lines {
            stream: self,
            done: false,
        }
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Render `value` with the stream's formatting state and write it.
    pub fn write<'a>(&mut self, value: impl Into<FormatArg<'a>>) -> Result<&mut Self, StreamError> {
        let mut text = String::new();
        self.fmt.render(value, &mut text);
        self.write_bytes(text.as_bytes())?;
        Ok(self)
    }

    /// Write `s` verbatim, bypassing width and fill.
    pub fn write_str(&mut self, s: &str) -> Result<&mut Self, StreamError> {
        self.write_bytes(s.as_bytes())?;
        Ok(self)
    }

    /// Write one raw byte.
    pub fn put(&mut self, byte: u8) -> Result<&mut Self, StreamError> {
        self.write_bytes(&[byte])?;
        Ok(self)
    }

    /// Write `\n` and flush.
    pub fn end_line(&mut self) -> Result<&mut Self, StreamError> {
        self.write_bytes(b"\n")?;
        self.flush()?;
        Ok(self)
    }

    /// Push buffered output to the device.
    pub fn flush(&mut self) -> Result<(), StreamError> {
        if self.state != HandleState::Open {
            self.flags.fail = true;
            return Err(StreamError::NotOpen);
        }
        self.flush_pending()
    }

    /// Flush and release the device. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<(), StreamError> {
        if self.state != HandleState::Open {
            return Ok(());
        }
        let flushed = self.flush_pending();
        // Memory streams keep their buffer so `contents` still works.
        if matches!(self.device, Some(Device::File(_))) {
            self.device = None;
        }
        self.read_buf.reset();
        self.state = HandleState::Closed;
        flushed
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn check_readable(&mut self) -> Result<(), StreamError> {
        let refused = if self.state != HandleState::Open {
            Some(StreamError::NotOpen)
        } else if !self.mode.access.readable() {
            Some(StreamError::NotReadable)
        } else if !self.flags.ok() {
            Some(StreamError::StatusFailed)
        } else if self.flags.eof {
            Some(StreamError::EndOfInput)
        } else {
            None
        };
        match refused {
            Some(err) => {
                self.flags.fail = true;
                Err(err)
            }
            None => {
                // Pending output must land before reading the same device.
                self.flush_pending()
            }
        }
    }

    fn check_writable(&mut self) -> Result<(), StreamError> {
        let refused = if self.state != HandleState::Open {
            Some(StreamError::NotOpen)
        } else if !self.mode.access.writable() {
            Some(StreamError::NotWritable)
        } else if !self.flags.ok() {
            Some(StreamError::StatusFailed)
        } else {
            None
        };
        if let Some(err) = refused {
            self.flags.fail = true;
            return Err(err);
        }
        // File cursor sits past the read-ahead; put it back before writing.
        let unread = self.read_buf.readable();
        if unread > 0 && matches!(self.device, Some(Device::File(_))) {
            self.read_buf.reset();
            return self.with_device(|d| d.unread(unread));
        }
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), StreamError> {
        self.check_writable()?;
        match self.write_buf.write(bytes) {
            Some(spill) => self.with_device(|d| d.write_all(&spill)),
            None => Ok(()),
        }
    }

    fn flush_pending(&mut self) -> Result<(), StreamError> {
        let pending = self.write_buf.take_pending();
        self.with_device(|d| {
            if !pending.is_empty() {
                d.write_all(&pending)?;
            }
            d.flush()
        })
    }

    /// Run a device operation, turning I/O errors into the `bad` state.
    fn with_device<T>(
        &mut self,
        op: impl FnOnce(&mut Device) -> io::Result<T>,
    ) -> Result<T, StreamError> {
        let Some(device) = self.device.as_mut() else {
            self.flags.fail = true;
            return Err(StreamError::NotOpen);
        };
        op(device).map_err(|e| {
            self.flags.bad = true;
            StreamError::Device(e)
        })
    }

    /// Make sure the read window has data. `false` means end of input.
    fn fill_read(&mut self) -> Result<bool, StreamError> {
        if self.read_buf.readable() > 0 {
            return Ok(true);
        }
        let Some(device) = self.device.as_mut() else {
            self.flags.fail = true;
            return Err(StreamError::NotOpen);
        };
        match self.read_buf.refill(|window| device.read_chunk(window)) {
            Ok(n) => Ok(n > 0),
            Err(e) => {
                self.flags.bad = true;
                Err(StreamError::Device(e))
            }
        }
    }

    fn peek_byte(&mut self) -> Result<Option<u8>, StreamError> {
        if !self.fill_read()? {
            return Ok(None);
        }
        Ok(self.read_buf.peek())
    }

    fn next_byte(&mut self) -> Result<Option<u8>, StreamError> {
        if !self.fill_read()? {
            return Ok(None);
        }
        Ok(self.read_buf.next_byte())
    }

    fn hit_end(&mut self) -> StreamError {
        self.flags.eof = true;
        self.flags.fail = true;
        StreamError::EndOfInput
    }
}

impl Drop for TextStream {
    fn drop(&mut self) {
        if self.state == HandleState::Open {
            let _ = self.flush_pending();
        }
    }
}

/// Iterator returned by [`TextStream::lines`].
#[derive(Debug)]
pub struct Lines<'a> {
    stream: &'a mut TextStream,
    done: bool,
}

impl Iterator for Lines<'_> {
    type Item = Result<String, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.stream.read_line() {
            Ok(line) => Some(Ok(line)),
            Err(e) => {
                self.done = true;
                if e.is_end_of_input() { None } else { Some(Err(e)) }
            }
        }
    }
}
