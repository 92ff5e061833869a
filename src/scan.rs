//! Filesystem scanning into a navigation tree.
//!
//! Walks a site's source directory depth-first and produces a [`Directory`]:
//! every visible page becomes a leaf holding its root-relative path, every
//! visible subdirectory becomes a nested directory.
//!
//! ## Example
//!
//! ```text
//! source/                          # Scan root
//! ├── index.html                   # display_order: 1 in front matter
//! ├── about.html
//! ├── sitemap.xml                  # ignored file
//! ├── assets/                      # ignored directory
//! ├── .drafts/                     # hidden
//! └── docs/
//!     ├── .display_info            # display_order: 2
//!     ├── my notes.html
//!     └── intro.html               # display_order: 1
//! ```
//!
//! becomes
//!
//! ```yaml
//! 0001-index.html: /index.html
//! 0002-docs:
//!   0001-intro.html: /docs/intro.html
//!   my%20notes.html: /docs/my%20notes.html
//! about.html: /about.html
//! ```
//!
//! ## Filtering
//!
//! - Names starting with `.` are skipped, files and directories alike.
//! - Files named in `ignore_files` are skipped.
//! - Directories named in `ignore_dirs` are skipped along with their contents.
//! - When `ext_whitelist` is non-empty, files whose extension (with its dot,
//!   e.g. `.html`) is not listed are skipped.
//! - Files listed in `exclude_paths` are skipped, and so is a directory left
//!   empty only because of them. The CLI puts its own data file there.
//!
//! Entries are visited in byte order of their names, so the result never
//! depends on the order the filesystem lists them.
//!
//! ## Failure policy
//!
//! Only the root matters: if it cannot be read the scan fails with
//! [`ScanError`]. Anything wrong below the root (an unreadable subdirectory, a
//! name that is not UTF-8, a malformed marker file) is logged and that single
//! entry is dropped or left unordered.

use crate::naming::{dotted_extension, encode_spaces, sort_key};
use crate::order::{DirectoryOrder, FileOrder, FrontmatterOrder, MarkerFile, NoOrder};
use crate::tree::{Directory, TreeNode};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot read source directory {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Source path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Fully resolved filtering rules for one scan.
///
/// The caller assembles these before scanning (see
/// [`NavTreeConfig::scan_options`](crate::config::NavTreeConfig::scan_options));
/// the builder never augments them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Exact filenames to skip.
    pub ignore_files: BTreeSet<String>,
    /// Exact directory names to skip.
    pub ignore_dirs: BTreeSet<String>,
    /// Allowed extensions including the dot (`.html`); empty allows everything.
    pub ext_whitelist: BTreeSet<String>,
    /// Root-relative paths (leading `/`, spaces unencoded) of files that are
    /// never part of the tree, e.g. the data file when it lives under the root.
    pub exclude_paths: BTreeSet<String>,
}

impl ScanOptions {
    fn allows_file(&self, name: &str) -> bool {
        if self.ignore_files.contains(name) {
            return false;
        }
        if self.ext_whitelist.is_empty() {
            return true;
        }
        dotted_extension(name).is_some_and(|ext| self.ext_whitelist.contains(&ext))
    }

    fn allows_dir(&self, name: &str) -> bool {
        !self.ignore_dirs.contains(name)
    }

    /// Whether an excluded file lives somewhere below `rel_dir`.
    fn holds_excluded(&self, rel_dir: &str) -> bool {
        self.exclude_paths
            .iter()
            .any(|path| path.strip_prefix(rel_dir).is_some_and(|rest| rest.starts_with('/')))
    }
}

/// Builds navigation trees for one source root.
///
/// Defaults to [`NoOrder`] for pages and [`MarkerFile`] for directories;
/// swap either with [`with_file_order`](Self::with_file_order) /
/// [`with_directory_order`](Self::with_directory_order).
pub struct TreeBuilder {
    root: PathBuf,
    options: ScanOptions,
    file_order: Box<dyn FileOrder>,
    dir_order: Box<dyn DirectoryOrder>,
}

impl TreeBuilder {
    pub fn new(root: impl Into<PathBuf>, options: ScanOptions) -> Self {
        Self {
            root: root.into(),
            options,
            file_order: Box::new(NoOrder),
            dir_order: Box::new(MarkerFile),
        }
    }

    /// Builder preset used by the CLI: page order from front matter,
    /// directory order from marker files.
    pub fn with_front_matter(root: impl Into<PathBuf>, options: ScanOptions) -> Self {
        let root = root.into();
        let lookup = FrontmatterOrder::new(root.clone());
        Self::new(root, options).with_file_order(lookup)
    }

    pub fn with_file_order(mut self, lookup: impl FileOrder + 'static) -> Self {
        self.file_order = Box::new(lookup);
        self
    }

    pub fn with_directory_order(mut self, lookup: impl DirectoryOrder + 'static) -> Self {
        self.dir_order = Box::new(lookup);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan the root and return a freshly built tree.
    ///
    /// Nothing is cached between calls; every call re-reads the filesystem.
    pub fn build(&self) -> Result<Directory, ScanError> {
        let metadata = fs::metadata(&self.root).map_err(|source| ScanError::RootUnreadable {
            path: self.root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }
        let entries = fs::read_dir(&self.root).map_err(|source| ScanError::RootUnreadable {
            path: self.root.clone(),
            source,
        })?;
        let tree = self.scan_entries(entries, "");
        tracing::debug!(root = %self.root.display(), entries = tree.len(), "Scan completed");
        Ok(tree)
    }

    /// Scan a subdirectory. `rel_dir` is its root-relative path with a
    /// leading `/`, or empty for the root itself.
    fn scan_directory(&self, path: &Path, rel_dir: &str) -> Directory {
        match fs::read_dir(path) {
            Ok(entries) => self.scan_entries(entries, rel_dir),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable directory contents");
                Directory::new()
            }
        }
    }

    fn scan_entries(&self, entries: fs::ReadDir, rel_dir: &str) -> Directory {
        let mut entries: Vec<fs::DirEntry> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(dir = rel_dir, error = %e, "Skipping unreadable entry");
                    None
                }
            })
            .collect();
        entries.sort_by_key(fs::DirEntry::file_name);

        let mut data = Directory::new();
        let mut literal_keys = BTreeSet::new();

        for entry in entries {
            let path = entry.path();
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!(path = %path.display(), "Skipping entry with non UTF-8 name");
                continue;
            };

            if name.starts_with('.') {
                continue;
            }

            // fs::metadata follows symlinks, so linked directories are walked.
            let is_dir = match fs::metadata(&path) {
                Ok(metadata) => metadata.is_dir(),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping entry without metadata");
                    continue;
                }
            };

            let rel_path = format!("{rel_dir}/{name}");

            let (key, node) = if is_dir {
                if !self.options.allows_dir(&name) {
                    tracing::debug!(dir = %rel_path, "Ignored directory");
                    continue;
                }
                let children = self.scan_directory(&path, &rel_path);
                if children.is_empty() && self.options.holds_excluded(&rel_path) {
                    tracing::debug!(dir = %rel_path, "Skipping directory holding only excluded files");
                    continue;
                }
                let order = self.dir_order.display_order(&path);
                (sort_key(&name, order), TreeNode::Directory(children))
            } else {
                if !self.options.allows_file(&name) {
                    tracing::debug!(file = %rel_path, "Ignored file");
                    continue;
                }
                if self.options.exclude_paths.contains(&rel_path) {
                    tracing::debug!(file = %rel_path, "Excluded file");
                    continue;
                }
                let order = self.file_order.display_order(&rel_path);
                (sort_key(&name, order), TreeNode::Leaf(encode_spaces(&rel_path)))
            };

            // Siblings collide only when an ordered name spells out another
            // sibling's literal name (`a` at order 1 vs `0001-a`). The literal
            // name keeps the key; otherwise the first name in byte order does.
            let literal = key == encode_spaces(&name);
            if literal_keys.contains(&key) || (data.contains_key(&key) && !literal) {
                tracing::warn!(key = %key, dir = rel_dir, dropped = %rel_path, "Duplicate sort key");
                continue;
            }
            if literal {
                literal_keys.insert(key.clone());
            }
            if let Some(previous) = data.insert(key.clone(), node) {
                tracing::warn!(key = %key, dir = rel_dir, dropped = ?previous, "Duplicate sort key");
            }
        }

        data
    }
}
