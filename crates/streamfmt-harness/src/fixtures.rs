//! Fixture loading and management.
//!
//! A fixture case is a sequence of steps applied to a fresh
//! [`FormatState`](streamfmt_core::stdio::FormatState): manipulators,
//! field resets, and values to render. The concatenated rendering must equal
//! `expected`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use streamfmt_core::stdio::{FormatField, Manip};

use crate::error::HarnessError;

/// One step of a fixture case.
///
/// Serialized externally tagged: `{"manip": "setw(10)"}`, `{"int": 255}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    /// Manipulator in iomanip spelling (`hex`, `setfill(*)`, ...).
    Manip(String),
    /// `resetiosflags` field name (`basefield`, `floatfield`, ...).
    Reset(String),
    /// 32-bit `int`.
    Int(i32),
    /// 64-bit `long long`.
    Long(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Str(String),
    Char(char),
}

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// Formatting area exercised (bases, precision, fill, ...).
    pub section: String,
    pub steps: Vec<Step>,
    /// Expected concatenated output.
    pub expected: String,
}

/// A collection of fixture cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    pub family: String,
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}

/// Sorted `*.json` files directly under `dir`.
pub fn fixture_paths(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();
    Ok(paths)
}

/// Parse a manipulator written the iomanip way.
#[must_use]
pub fn parse_manip(s: &str) -> Option<Manip> {
    let s = s.trim();
    if let Some((name, rest)) = s.split_once('(') {
        let arg = rest.strip_suffix(')')?.trim();
        return match name.trim() {
            "setw" => arg.parse().ok().map(Manip::SetW),
            "setprecision" => arg.parse().ok().map(Manip::SetPrecision),
            "setfill" => {
                let arg = arg
                    .strip_prefix('\'')
                    .and_then(|a| a.strip_suffix('\''))
                    .unwrap_or(arg);
                let mut chars = arg.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Manip::SetFill(c)),
                    _ => None,
                }
            }
            _ => None,
        };
    }
    let manip = match s {
        "dec" => Manip::Dec,
        "hex" => Manip::Hex,
        "oct" => Manip::Oct,
        "showbase" => Manip::ShowBase,
        "noshowbase" => Manip::NoShowBase,
        "uppercase" => Manip::Uppercase,
        "nouppercase" => Manip::NoUppercase,
        "showpos" => Manip::ShowPos,
        "noshowpos" => Manip::NoShowPos,
        "boolalpha" => Manip::BoolAlpha,
        "noboolalpha" => Manip::NoBoolAlpha,
        "fixed" => Manip::Fixed,
        "scientific" => Manip::Scientific,
        "defaultfloat" => Manip::DefaultFloat,
        "showpoint" => Manip::ShowPoint,
        "noshowpoint" => Manip::NoShowPoint,
        "left" => Manip::Left,
        "right" => Manip::Right,
        "internal" => Manip::Internal,
        _ => return None,
    };
    Some(manip)
}

/// Parse a `resetiosflags` field name.
#[must_use]
pub fn parse_field(s: &str) -> Option<FormatField> {
    let field = match s.trim() {
        "basefield" => FormatField::Base,
        "showbase" => FormatField::ShowBase,
        "uppercase" => FormatField::Uppercase,
        "showpos" => FormatField::ShowPos,
        "boolalpha" => FormatField::BoolAlpha,
        "floatfield" => FormatField::Notation,
        "precision" => FormatField::Precision,
        "showpoint" => FormatField::ShowPoint,
        "width" => FormatField::Width,
        "adjustfield" => FormatField::Alignment,
        "fill" => FormatField::Fill,
        _ => return None,
    };
    Some(field)
}
