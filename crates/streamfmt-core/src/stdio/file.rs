//! Open modes and handle state.
//!
//! An [`OpenMode`] pairs an access mode with a disposition. Disposition
//! decides what happens to existing content and only matters for writable
//! handles; a read-only handle always requires an existing file.

use std::fs::OpenOptions;

// ---------------------------------------------------------------------------
// Open mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
    ReadWrite,
}

impl AccessMode {
    #[must_use]
    pub const fn readable(self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    #[must_use]
    pub const fn writable(self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }
}

/// Policy for existing content when opening for writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Create if missing; keep existing content and write from the start.
    CreateIfMissing,
    /// Create if missing; discard existing content.
    Truncate,
    /// Create if missing; every write goes to the end.
    Append,
    /// Fail if the file does not exist.
    OpenExisting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenMode {
    pub access: AccessMode,
    pub disposition: Disposition,
}

impl OpenMode {
    #[must_use]
    pub const fn new(access: AccessMode, disposition: Disposition) -> Self {
        Self {
            access,
            disposition,
        }
    }

    /// Read an existing file.
    #[must_use]
    pub const fn read() -> Self {
        Self::new(AccessMode::Read, Disposition::OpenExisting)
    }

    /// Create or overwrite.
    #[must_use]
    pub const fn write() -> Self {
        Self::new(AccessMode::Write, Disposition::Truncate)
    }

    /// Create or extend.
    #[must_use]
    pub const fn append() -> Self {
        Self::new(AccessMode::Write, Disposition::Append)
    }

    /// Build the `std::fs::OpenOptions` for this mode.
    #[must_use]
    pub fn to_open_options(&self) -> OpenOptions {
        let mut opts = OpenOptions::new();
        opts.read(self.access.readable());
        if !self.access.writable() {
            return opts;
        }
        match self.disposition {
            Disposition::CreateIfMissing => {
                opts.write(true).create(true);
            }
            Disposition::Truncate => {
                opts.write(true).create(true).truncate(true);
            }
            Disposition::Append => {
                opts.append(true).create(true);
            }
            Disposition::OpenExisting => {
                opts.write(true);
            }
        }
        opts
    }
}

/// Parse an fopen-style mode string (`r`, `w+`, `ab`, ...).
///
/// Exclusive create (`x`) has no matching disposition and is rejected.
/// Returns `None` for invalid strings.
#[must_use]
pub fn parse_mode(mode: &str) -> Option<OpenMode> {
    let mut bytes = mode.bytes();
    let (mut access, disposition) = match bytes.next()? {
        b'r' => (AccessMode::Read, Disposition::OpenExisting),
        b'w' => (AccessMode::Write, Disposition::Truncate),
        b'a' => (AccessMode::Write, Disposition::Append),
        _ => return None,
    };
    for b in bytes {
        match b {
            b'+' => access = AccessMode::ReadWrite,
            // Text and binary are identical here.
            b'b' | b't' => {}
            _ => return None,
        }
    }
    Some(OpenMode::new(access, disposition))
}

// ---------------------------------------------------------------------------
// Handle state
// ---------------------------------------------------------------------------

/// Lifecycle of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleState {
    #[default]
    Unopened,
    Open,
    Closed,
}

/// Checkable status flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamFlags {
    /// End of input was reached.
    pub eof: bool,
    /// An operation failed (open failure, no data, conversion failure).
    pub fail: bool,
    /// The device reported an error or the handle was misused.
    pub bad: bool,
}

impl StreamFlags {
    /// No flag set.
    #[must_use]
    pub fn good(&self) -> bool {
        !self.eof && !self.fail && !self.bad
    }

    /// The boolean-convertible status: false after any failed operation.
    #[must_use]
    pub fn ok(&self) -> bool {
        !self.fail && !self.bad
    }
}
