//! Command-line harness for streamfmt.
//!
//! This crate provides:
//! - Format conformance fixtures: manipulator/value sequences with expected
//!   rendered text, run against `streamfmt_core::stdio::format`
//! - Verification summaries and markdown/JSON reports
//! - The formatting walkthrough printed by `streamfmt tour`
//! - Structured JSONL logging and environment-driven configuration

#![forbid(unsafe_code)]

pub mod config;
pub mod diff;
pub mod error;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod tour;
pub mod verify;

pub use config::HarnessConfig;
pub use error::HarnessError;
pub use fixtures::{FixtureCase, FixtureSet, Step};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::{VerificationResult, VerificationSummary};
