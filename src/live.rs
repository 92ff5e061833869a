//! Shared, rebuildable tree snapshot.
//!
//! [`TreeHandle`] is what long-running callers (watch mode, an embedding
//! server) hold instead of a bare [`Directory`]. Readers take a cheap
//! `Arc` clone of the current snapshot and never block on a rebuild; a
//! rebuild scans into a fresh tree and swaps the pointer, so a reader sees
//! either the complete old tree or the complete new one.
//!
//! # Thread Safety
//!
//! - `RwLock<Arc<Directory>>` holds the current snapshot
//! - `Mutex<()>` serializes rebuilds, so two concurrent rebuilds never
//!   scan at the same time
//!
//! A poisoned lock is recovered rather than propagated: the data behind it
//! is a plain immutable snapshot, always valid.

use crate::scan::{ScanError, TreeBuilder};
use crate::tree::Directory;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

pub struct TreeHandle {
    builder: TreeBuilder,
    rebuild_lock: Mutex<()>,
    current: RwLock<Arc<Directory>>,
}

impl TreeHandle {
    /// Create a handle holding an empty tree. Nothing is scanned until
    /// [`rebuild`](Self::rebuild) is called.
    pub fn new(builder: TreeBuilder) -> Self {
        Self {
            builder,
            rebuild_lock: Mutex::new(()),
            current: RwLock::new(Arc::new(Directory::new())),
        }
    }

    /// Create a handle and perform the initial scan.
    pub fn load(builder: TreeBuilder) -> Result<Self, ScanError> {
        let handle = Self::new(builder);
        handle.rebuild()?;
        Ok(handle)
    }

    pub fn builder(&self) -> &TreeBuilder {
        &self.builder
    }

    /// Current snapshot.
    pub fn get(&self) -> Arc<Directory> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Rescan the source root and publish the result.
    ///
    /// On error the previous snapshot stays in place.
    pub fn rebuild(&self) -> Result<Arc<Directory>, ScanError> {
        let _guard = self
            .rebuild_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let start = Instant::now();
        let tree = Arc::new(self.builder.build()?);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&tree);

        tracing::info!(
            root = %self.builder.root().display(),
            entries = tree.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Tree rebuilt"
        );
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::ScanOptions;
    use crate::test_helpers::*;
    use std::fs;
    use std::thread;

    #[test]
    fn new_handle_starts_empty() {
        let tmp = setup_fixtures();
        let handle = TreeHandle::new(TreeBuilder::new(tmp.path(), ScanOptions::default()));
        assert!(handle.get().is_empty());
    }

    #[test]
    fn load_performs_initial_scan() {
        let tmp = setup_fixtures();
        let handle = TreeHandle::load(TreeBuilder::new(tmp.path(), ScanOptions::default())).unwrap();
        assert!(handle.get().contains_key("about.html.md"));
    }

    #[test]
    fn rebuild_picks_up_new_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        write_file(tmp.path(), "a.html", "");
        let handle = TreeHandle::load(TreeBuilder::new(tmp.path(), ScanOptions::default())).unwrap();
        let before = handle.get();

        write_file(tmp.path(), "b.html", "");
        let after = handle.rebuild().unwrap();

        assert_eq!(keys(&before), vec!["a.html"]);
        assert_eq!(keys(&after), vec!["a.html", "b.html"]);
        assert_eq!(keys(&handle.get()), vec!["a.html", "b.html"]);
    }

    #[test]
    fn failed_rebuild_keeps_previous_snapshot() {
        let tmp = tempfile::TempDir::new().unwrap();
        let root = tmp.path().join("source");
        write_file(&root, "a.html", "");
        let handle = TreeHandle::load(TreeBuilder::new(&root, ScanOptions::default())).unwrap();

        fs::remove_dir_all(&root).unwrap();
        assert!(matches!(
            handle.rebuild(),
            Err(ScanError::RootUnreadable { .. })
        ));
        assert_eq!(keys(&handle.get()), vec!["a.html"]);
    }

    #[test]
    fn concurrent_readers_see_complete_trees() {
        let tmp = setup_fixtures();
        let handle = Arc::new(
            TreeHandle::load(TreeBuilder::with_front_matter(tmp.path(), ScanOptions::default()))
                .unwrap(),
        );
        let expected = handle.get();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let handle = Arc::clone(&handle);
                let expected = Arc::clone(&expected);
                thread::spawn(move || {
                    for _ in 0..20 {
                        assert_eq!(*handle.get(), *expected);
                    }
                })
            })
            .collect();
        for _ in 0..5 {
            handle.rebuild().unwrap();
        }
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
