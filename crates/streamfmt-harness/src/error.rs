//! Harness error type.

use std::path::PathBuf;

use streamfmt_core::StreamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no fixture JSON files found in {}", .0.display())]
    NoFixtures(PathBuf),
    #[error("{failed} of {total} fixture cases failed")]
    VerificationFailed { failed: usize, total: usize },
    #[error("copy verification failed: {src} != {dst}")]
    DigestMismatch { src: String, dst: String },
}
