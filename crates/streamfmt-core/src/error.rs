//! Stream error taxonomy.
//!
//! Three ordinary outcomes (resource unavailable, end of input, type
//! mismatch) plus handle-state misuse and device faults. None of them
//! aborts the process; every read/open returns one of these through a
//! `Result` and mirrors it in the handle's status flags.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamError {
    /// The path could not be opened or created.
    #[error("cannot open {}: {source}", path.display())]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The handle was never opened, failed to open, or is already closed.
    #[error("stream is not open")]
    NotOpen,
    #[error("stream is already open")]
    AlreadyOpen,
    #[error("stream was not opened for reading")]
    NotReadable,
    #[error("stream was not opened for writing")]
    NotWritable,
    /// No data left before a token/line/character was found.
    #[error("end of input")]
    EndOfInput,
    /// A token was read but does not convert to the requested type.
    #[error("token {token:?} is not a valid {expected}")]
    TypeMismatch {
        token: String,
        expected: &'static str,
    },
    /// A previous operation left the stream in the fail state.
    #[error("stream is in a failed state")]
    StatusFailed,
    #[error("device error: {0}")]
    Device(#[from] io::Error),
}

impl StreamError {
    /// True for the ordinary end-of-data outcome that terminates read loops.
    #[must_use]
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, Self::EndOfInput)
    }

    /// True when the failure came from the open step.
    #[must_use]
    pub fn is_open_failure(&self) -> bool {
        matches!(self, Self::ResourceUnavailable { .. })
    }
}
