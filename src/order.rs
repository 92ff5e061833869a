//! Display order lookups.
//!
//! The tree builder never decides on its own where a page or directory goes;
//! it asks two injected capabilities:
//!
//! - [`FileOrder`]: given a page's root-relative path (leading `/`, spaces
//!   not yet encoded), return its display order.
//! - [`DirectoryOrder`]: given a directory on disk, return its display order.
//!
//! Stock implementations:
//!
//! | Type | Files | Directories |
//! |------|-------|-------------|
//! | [`NoOrder`] | always `None` | always `None` |
//! | [`FrontmatterOrder`] | `display_order` from YAML front matter | n/a |
//! | [`MarkerFile`] | n/a | `display_order` from `.display_info` |
//! | any `Fn(&str) -> Option<u32>` | the closure | n/a |
//! | any `Fn(&Path) -> Option<u32>` | n/a | the closure |
//!
//! Lookups never fail: a missing file, missing metadata or a malformed value
//! all mean "no explicit order". Malformed values are logged as warnings.

use crate::display_info::{parse_display_order, read_display_info};
use serde_yaml::Value;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

pub trait FileOrder: Send + Sync {
    fn display_order(&self, rel_path: &str) -> Option<u32>;
}

pub trait DirectoryOrder: Send + Sync {
    fn display_order(&self, dir: &Path) -> Option<u32>;
}

impl<F> FileOrder for F
where
    F: Fn(&str) -> Option<u32> + Send + Sync,
{
    fn display_order(&self, rel_path: &str) -> Option<u32> {
        self(rel_path)
    }
}

impl<F> DirectoryOrder for F
where
    F: Fn(&Path) -> Option<u32> + Send + Sync,
{
    fn display_order(&self, dir: &Path) -> Option<u32> {
        self(dir)
    }
}

/// Lookup that never assigns an order; everything sorts by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOrder;

impl FileOrder for NoOrder {
    fn display_order(&self, _rel_path: &str) -> Option<u32> {
        None
    }
}

impl DirectoryOrder for NoOrder {
    fn display_order(&self, _dir: &Path) -> Option<u32> {
        None
    }
}

/// Directory order from the `.display_info` marker file.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerFile;

impl DirectoryOrder for MarkerFile {
    fn display_order(&self, dir: &Path) -> Option<u32> {
        read_display_info(dir).display_order
    }
}

/// Page order from the `display_order` key of a file's YAML front matter.
///
/// ```text
/// ---
/// title: Installing
/// display_order: 3
/// ---
/// # Installing
/// ```
#[derive(Debug, Clone)]
pub struct FrontmatterOrder {
    root: PathBuf,
}

impl FrontmatterOrder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileOrder for FrontmatterOrder {
    fn display_order(&self, rel_path: &str) -> Option<u32> {
        let path = self.root.join(rel_path.trim_start_matches('/'));
        let yaml = match read_front_matter(&path) {
            Ok(Some(yaml)) => yaml,
            Ok(None) => return None,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No front matter read");
                return None;
            }
        };
        let data: Value = match serde_yaml::from_str(&yaml) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed front matter");
                return None;
            }
        };
        let value = data.get("display_order").filter(|v| !v.is_null())?;
        let order = order_from_value(value);
        if order.is_none() {
            tracing::warn!(
                path = %path.display(),
                value = ?value,
                "display_order must be a non-negative integer; ignoring it"
            );
        }
        order
    }
}

/// Interpret a front matter value as a display order.
fn order_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => parse_display_order(s),
        _ => None,
    }
}

/// Upper bound on bytes read while looking for a closing fence.
const MAX_FRONT_MATTER_BYTES: u64 = 64 * 1024;

/// Read the leading YAML front matter block of a file.
///
/// The first line must be `---`; the block ends at the next `---` or `...`
/// line. Returns `Ok(None)` when the file has no front matter, or when the
/// block is not closed within the first [`MAX_FRONT_MATTER_BYTES`]. Files
/// that do not start with `---` cost a three-byte read.
pub fn read_front_matter(path: &Path) -> io::Result<Option<String>> {
    let mut reader = BufReader::new(File::open(path)?.take(MAX_FRONT_MATTER_BYTES));

    let mut fence = [0u8; 3];
    match reader.read_exact(&mut fence) {
        Ok(()) if &fence == b"---" => {}
        Ok(()) => return Ok(None),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }

    let mut lines = reader.lines();
    let Some(rest) = lines.next() else {
        return Ok(None);
    };
    if !rest?.trim_end().is_empty() {
        return Ok(None);
    }

    let mut yaml = String::new();
    for line in lines {
        let line = line?;
        let fence = line.trim_end();
        if fence == "---" || fence == "..." {
            return Ok(Some(yaml));
        }
        yaml.push_str(&line);
        yaml.push('\n');
    }
    Ok(None)
}
