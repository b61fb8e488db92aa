//! Text stream I/O.
//!
//! - [`format`]: persistent formatting state and value rendering.
//! - [`stream`]: the status-checked [`TextStream`] handle.
//! - [`scan`]: token conversion for formatted reads.
//! - [`copy`]: line- and character-granularity file copy.
//! - [`buffer`] / [`file`]: buffering, open modes and handle state.

pub mod buffer;
pub mod copy;
pub mod file;
pub mod format;
pub mod scan;
pub mod stream;

pub use buffer::{BUFSIZ, BufMode};
pub use copy::{CopyGranularity, CopyReport, copy_file};
pub use file::{AccessMode, Disposition, HandleState, OpenMode, StreamFlags, parse_mode};
pub use format::{Alignment, Base, FloatNotation, FormatArg, FormatField, FormatState, Manip};
pub use scan::{FromToken, validate_integer};
pub use stream::TextStream;
