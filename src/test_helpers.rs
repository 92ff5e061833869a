//! Shared test utilities for the navtree test suite.
//!
//! Provides fixture setup, small filesystem builders, and tree assertions
//! that work with [`Directory`] values.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let tree = TreeBuilder::with_front_matter(tmp.path(), ScanOptions::default())
//!     .build()
//!     .unwrap();
//!
//! assert_tree_shape(&tree, &[
//!     ("0001-index.html.erb", &[]),
//!     ("0002-getting%20started", &["0001-install.html.md", "0002-configure.html.md"]),
//! ]);
//! ```

use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use tempfile::TempDir;

use crate::tree::Directory;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

// =========================================================================
// Tree helpers
// =========================================================================

/// Sort keys of one directory level, in order.
pub fn keys(dir: &Directory) -> Vec<&str> {
    dir.keys().map(String::as_str).collect()
}

/// Assert that a tree matches an expected two-level shape.
///
/// Each entry is `(key, child_keys)`. Use `&[]` for leaves; a directory
/// expected with `&[]` must be empty.
pub fn assert_tree_shape(tree: &Directory, expected: &[(&str, &[&str])]) {
    let expected_keys: Vec<&str> = expected.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys(tree), expected_keys, "top-level keys mismatch");

    for (key, children) in expected {
        let actual_children = tree[*key].as_directory().map(keys).unwrap_or_default();
        assert_eq!(
            actual_children,
            children.to_vec(),
            "children of '{key}' mismatch"
        );
    }
}

// =========================================================================
// Log capture
// =========================================================================

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return its result together
/// with every WARN-or-worse line it logged.
pub fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .without_time()
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let logged = buffer.0.lock().unwrap().clone();
    (result, String::from_utf8(logged).unwrap())
}
