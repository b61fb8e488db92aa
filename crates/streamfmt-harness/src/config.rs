//! Harness configuration.
//!
//! Resolved from the environment, then overridden by CLI flags:
//! - `STREAMFMT_LOG_LEVEL`: minimum log level (`info` by default).
//! - `STREAMFMT_LOG_PATH`: append JSONL logs to this file instead of stderr.
//! - `STREAMFMT_FIXTURE_DIR`: default fixture directory for `verify`.

use std::path::PathBuf;

use crate::structured_log::{LogEmitter, LogLevel};

pub const ENV_LOG_LEVEL: &str = "STREAMFMT_LOG_LEVEL";
pub const ENV_LOG_PATH: &str = "STREAMFMT_LOG_PATH";
pub const ENV_FIXTURE_DIR: &str = "STREAMFMT_FIXTURE_DIR";

/// Fixture directory used when neither the flag nor the environment names one.
/// Absolute, so `streamfmt verify` works from any directory.
pub const DEFAULT_FIXTURE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub log_level: LogLevel,
    pub log_path: Option<PathBuf>,
    pub fixture_dir: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_path: None,
            fixture_dir: PathBuf::from(DEFAULT_FIXTURE_DIR),
        }
    }
}

impl HarnessConfig {
    /// Read the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from any key lookup. Empty values count as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            log_level: get(ENV_LOG_LEVEL)
                .map_or(defaults.log_level, |v| LogLevel::from_str_loose(&v)),
            log_path: get(ENV_LOG_PATH).map(PathBuf::from),
            fixture_dir: get(ENV_FIXTURE_DIR).map_or(defaults.fixture_dir, PathBuf::from),
        }
    }

    /// Apply CLI overrides on top of the resolved values.
    #[must_use]
    pub fn with_overrides(mut self, log_level: Option<&str>, log_path: Option<PathBuf>) -> Self {
        if let Some(level) = log_level {
            self.log_level = LogLevel::from_str_loose(level);
        }
        if log_path.is_some() {
            self.log_path = log_path;
        }
        self
    }

    /// Build the emitter this configuration describes.
    pub fn emitter(&self, run_id: &str) -> std::io::Result<LogEmitter> {
        let emitter = match &self.log_path {
            Some(path) => LogEmitter::to_file(path, "streamfmt", run_id)?,
            None => LogEmitter::to_stderr("streamfmt", run_id),
        };
        Ok(emitter.with_min_level(self.log_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = HarnessConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, HarnessConfig::default());
    }

    #[test]
    fn default_fixture_dir_is_absolute_and_bundled() {
        let dir = HarnessConfig::default().fixture_dir;
        assert!(dir.is_absolute());
        assert!(dir.join("iomanip.v1.json").is_file());
    }

    #[test]
    fn environment_values_are_parsed() {
        let cfg = HarnessConfig::from_lookup(lookup(&[
            (ENV_LOG_LEVEL, "Debug"),
            (ENV_LOG_PATH, "/tmp/streamfmt.jsonl"),
            (ENV_FIXTURE_DIR, "fixtures"),
        ]));
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.log_path, Some(PathBuf::from("/tmp/streamfmt.jsonl")));
        assert_eq!(cfg.fixture_dir, PathBuf::from("fixtures"));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let cfg = HarnessConfig::from_lookup(lookup(&[(ENV_LOG_PATH, "  ")]));
        assert_eq!(cfg.log_path, None);
    }

    #[test]
    fn cli_overrides_win() {
        let cfg = HarnessConfig::from_lookup(lookup(&[(ENV_LOG_LEVEL, "error")]))
            .with_overrides(Some("trace"), Some(PathBuf::from("run.jsonl")));
        assert_eq!(cfg.log_level, LogLevel::Trace);
        assert_eq!(cfg.log_path, Some(PathBuf::from("run.jsonl")));

        let kept = HarnessConfig::default().with_overrides(None, None);
        assert_eq!(kept, HarnessConfig::default());
    }
}
