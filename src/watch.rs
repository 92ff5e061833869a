//! Watch mode: rebuild the tree whenever the source directory changes.
//!
//! ```text
//! initial build ─▶ write data file
//!       │
//!       ▼
//! notify events ─▶ filter ─▶ quiet for debounce_ms? ─▶ rebuild ─▶ write data file
//! ```
//!
//! Editors and `git checkout` produce bursts of events; they are collapsed
//! into a single rebuild once the source has been quiet for
//! `[watch] debounce_ms`. Events for hidden paths are dropped, except for
//! `.display_info` marker files, which change directory order. Events for
//! the data file itself are dropped too, so a data file inside the source
//! directory does not trigger its own rebuild.
//!
//! A failed rebuild is logged and the previous tree stays published; the
//! watcher keeps running.

use crate::config::NavTreeConfig;
use crate::datafile::{DataFileError, WriteOutcome, write_data_file};
use crate::display_info::MARKER_FILENAME;
use crate::live::TreeHandle;
use crate::scan::{ScanError, TreeBuilder};
use crate::tree::Directory;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Watcher error: {0}")]
    Notify(#[from] notify::Error),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    DataFile(#[from] DataFileError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decides which filesystem events can change the tree.
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    source: PathBuf,
    data_path: PathBuf,
}

impl ChangeFilter {
    pub fn new(source: impl Into<PathBuf>, data_path: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            data_path: data_path.into(),
        }
    }

    pub fn is_relevant(&self, event: &Event) -> bool {
        if matches!(event.kind, EventKind::Access(_)) {
            return false;
        }
        // Path-less events (overflow, rescan hints) can hide anything.
        if event.paths.is_empty() {
            return true;
        }
        event.paths.iter().any(|path| self.is_relevant_path(path))
    }

    fn is_relevant_path(&self, path: &Path) -> bool {
        if path == self.data_path {
            return false;
        }
        let Ok(rel) = path.strip_prefix(&self.source) else {
            return false;
        };
        let names: Vec<_> = rel.iter().collect();
        names.iter().enumerate().all(|(i, name)| {
            let name = name.to_string_lossy();
            !name.starts_with('.') || (i + 1 == names.len() && name == MARKER_FILENAME)
        })
    }
}

/// Block until a burst of relevant events has settled.
///
/// Returns the number of relevant events in the burst, or `None` once the
/// channel is closed. Watcher errors are logged and skipped.
pub fn next_batch(
    rx: &Receiver<notify::Result<Event>>,
    filter: &ChangeFilter,
    debounce: Duration,
) -> Option<usize> {
    let mut pending = 0;
    loop {
        let received = if pending == 0 {
            rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
        } else {
            rx.recv_timeout(debounce)
        };
        match received {
            Ok(Ok(event)) => {
                if filter.is_relevant(&event) {
                    tracing::debug!(kind = ?event.kind, paths = ?event.paths, "Source changed");
                    pending += 1;
                }
            }
            Ok(Err(e)) => tracing::warn!(error = %e, "Watch error"),
            Err(RecvTimeoutError::Timeout) => return Some(pending),
            Err(RecvTimeoutError::Disconnected) => {
                return (pending > 0).then_some(pending);
            }
        }
    }
}

/// Rebuild the tree and, if `write` is set, rewrite the data file.
pub fn refresh(
    handle: &TreeHandle,
    data_path: &Path,
    write: bool,
) -> Result<(Arc<Directory>, Option<WriteOutcome>), WatchError> {
    let tree = handle.rebuild()?;
    let outcome = if write {
        Some(write_data_file(data_path, &tree)?)
    } else {
        None
    };
    Ok((tree, outcome))
}

/// Build once, then keep the data file in sync with the source directory.
///
/// `on_refresh` is called after the initial build and after every
/// successful rebuild. Returns only on setup errors or when the watcher
/// shuts down.
pub fn watch(
    project: &Path,
    config: &NavTreeConfig,
    mut on_refresh: impl FnMut(&Directory, Option<&WriteOutcome>),
) -> Result<(), WatchError> {
    let project = fs::canonicalize(project)?;
    let source = config.source_path(&project);
    let data_path = config.data_path(&project);
    let write = config.automatic_updates;

    let handle = TreeHandle::new(TreeBuilder::with_front_matter(
        &source,
        config.scan_options(),
    ));
    let (tree, outcome) = refresh(&handle, &data_path, write)?;
    on_refresh(&tree, outcome.as_ref());

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if tx.send(res).is_err() {
            tracing::debug!("Watch channel closed");
        }
    })?;
    watcher.watch(&source, RecursiveMode::Recursive)?;
    tracing::info!(source = %source.display(), "Watching for changes");

    // Notify reports canonical paths.
    let filter = ChangeFilter::new(fs::canonicalize(&source)?, data_path.clone());
    let debounce = config.watch.debounce();

    while let Some(changes) = next_batch(&rx, &filter, debounce) {
        tracing::info!(changes, "Rebuilding tree");
        match refresh(&handle, &data_path, write) {
            Ok((tree, outcome)) => on_refresh(&tree, outcome.as_ref()),
            Err(e) => tracing::error!(error = %e, "Rebuild failed; keeping previous tree"),
        }
    }

    tracing::info!("Watcher stopped");
    Ok(())
}
