//! Reading and writing the tree data file.
//!
//! The built tree is persisted to a single data file (default
//! `data/tree.yml`) that site templates load to render navigation. The
//! format follows the file extension:
//!
//! | Extension | Format |
//! |-----------|--------|
//! | `.yml`, `.yaml` | YAML mapping (default) |
//! | `.json` | pretty-printed JSON object |
//!
//! Both formats keep sort keys verbatim and emit mappings in key order, so
//! reading the file back yields the same tree.
//!
//! ## Writes
//!
//! The file is always regenerated in full, never patched. Before writing,
//! the SHA-256 of the new content is compared against the file on disk; an
//! identical file is left untouched so its mtime does not change and file
//! watchers downstream are not woken. Otherwise the content goes to a hidden
//! sibling temp file that is renamed over the target, so readers see either
//! the old tree or the new one.

use crate::tree::Directory;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataFileError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported data file extension: {0} (expected .yml, .yaml or .json)")]
    UnsupportedFormat(String),
}

/// Serialization format of the data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Yaml,
    Json,
}

impl DataFormat {
    /// Pick the format from a data file name or path.
    pub fn from_path(path: &Path) -> Result<Self, DataFileError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "yml" | "yaml" => Ok(DataFormat::Yaml),
            "json" => Ok(DataFormat::Json),
            _ => Err(DataFileError::UnsupportedFormat(
                path.file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
            )),
        }
    }

    pub fn render(self, tree: &Directory) -> Result<String, DataFileError> {
        Ok(match self {
            DataFormat::Yaml => serde_yaml::to_string(tree)?,
            DataFormat::Json => {
                let mut json = serde_json::to_string_pretty(tree)?;
                json.push('\n');
                json
            }
        })
    }

    pub fn parse(self, content: &str) -> Result<Directory, DataFileError> {
        Ok(match self {
            DataFormat::Yaml if content.trim().is_empty() => Directory::new(),
            DataFormat::Yaml => serde_yaml::from_str(content)?,
            DataFormat::Json => serde_json::from_str(content)?,
        })
    }
}

/// What [`write_data_file`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was created or replaced.
    Written { digest: String },
    /// The file already held identical content.
    Unchanged { digest: String },
}

impl WriteOutcome {
    pub fn digest(&self) -> &str {
        match self {
            WriteOutcome::Written { digest } | WriteOutcome::Unchanged { digest } => digest,
        }
    }
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.digest().get(..12).unwrap_or(self.digest());
        match self {
            WriteOutcome::Written { .. } => write!(f, "written (sha256 {short})"),
            WriteOutcome::Unchanged { .. } => write!(f, "unchanged (sha256 {short})"),
        }
    }
}

/// SHA-256 of some bytes, as a hex string.
pub fn content_digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Serialize `tree` into `path`, creating parent directories as needed.
pub fn write_data_file(path: &Path, tree: &Directory) -> Result<WriteOutcome, DataFileError> {
    let content = DataFormat::from_path(path)?.render(tree)?;
    let digest = content_digest(content.as_bytes());

    match fs::read(path) {
        Ok(existing) if content_digest(&existing) == digest => {
            tracing::debug!(path = %path.display(), "Data file unchanged");
            return Ok(WriteOutcome::Unchanged { digest });
        }
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(DataFileError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| DataFileError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, &content).map_err(|source| DataFileError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| DataFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), bytes = content.len(), "Data file written");
    Ok(WriteOutcome::Written { digest })
}

/// Load a previously written data file.
pub fn read_data_file(path: &Path) -> Result<Directory, DataFileError> {
    let format = DataFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|source| DataFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    format.parse(&content)
}

/// `data/tree.yml` → `data/.tree.yml.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
