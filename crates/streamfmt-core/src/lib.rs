//! # streamfmt-core
//!
//! Safe Rust rendition of iostream-style text I/O.
//!
//! - [`types`]: host sizes of the C/C++ primitive kinds.
//! - [`stdio::format`]: formatting state with persistent flags and a
//!   single-use field width.
//! - [`stdio::stream`]: status-checked text handles over files or memory.
//!
//! No `unsafe` code is permitted at the crate level.

#![deny(unsafe_code)]

pub mod error;
pub mod stdio;
pub mod types;

pub use error::StreamError;
