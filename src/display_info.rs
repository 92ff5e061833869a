//! `.display_info` marker files.
//!
//! A directory can carry a hidden `.display_info` file describing how it
//! should appear in the navigation tree. The format is one `key: value` pair
//! per line:
//!
//! ```text
//! display_order: 2
//! ```
//!
//! Parsing rules:
//!
//! - Each line is split on its first `:`; key and value are trimmed.
//! - Lines without a `:` (blank lines, stray text) are ignored.
//! - Unknown keys are ignored.
//! - The first `display_order` line wins.
//! - The value may be wrapped in single or double quotes.
//!
//! A value that is not a non-negative integer is a [`MarkerError`]. The
//! lenient [`read_display_info`] used during scans logs it and carries on as
//! if the key were absent; one bad marker never aborts a build.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fixed name of the marker file inside a directory.
pub const MARKER_FILENAME: &str = ".display_info";

#[derive(Error, Debug)]
pub enum MarkerError {
    #[error("display_order must be a non-negative integer, got {0:?}")]
    InvalidDisplayOrder(String),
}

/// Typed contents of a marker file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayInfo {
    pub display_order: Option<u32>,
}

impl DisplayInfo {
    /// Parse marker file contents.
    pub fn parse(content: &str) -> Result<Self, MarkerError> {
        let mut info = DisplayInfo::default();
        for (key, value) in records(content) {
            if key == "display_order" && info.display_order.is_none() {
                let order = parse_display_order(value)
                    .ok_or_else(|| MarkerError::InvalidDisplayOrder(value.to_string()))?;
                info.display_order = Some(order);
            }
        }
        Ok(info)
    }
}

/// Split content into trimmed `(key, value)` records, skipping lines without a colon.
fn records(content: &str) -> impl Iterator<Item = (&str, &str)> {
    content
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim(), v.trim()))
}

/// Parse a display order value, accepting optional surrounding quotes.
///
/// Shared with the front matter lookup so both sources accept the same values.
pub fn parse_display_order(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    let unquoted = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(raw);
    unquoted.trim().parse().ok()
}

/// Path of the marker file for a directory.
pub fn marker_path(dir: &Path) -> PathBuf {
    dir.join(MARKER_FILENAME)
}

/// Read and parse a directory's marker file, degrading to the default.
///
/// - No marker file → default, silently.
/// - Unreadable marker or invalid value → default, with a warning naming the file.
pub fn read_display_info(dir: &Path) -> DisplayInfo {
    let path = marker_path(dir);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return DisplayInfo::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not read marker file");
            return DisplayInfo::default();
        }
    };
    match DisplayInfo::parse(&content) {
        Ok(info) => info,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed marker file");
            DisplayInfo::default()
        }
    }
}
