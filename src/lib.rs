//! # navtree
//!
//! Builds a navigation tree from a static site's source directory. Your
//! filesystem is the data source: directories become nested sections, pages
//! become leaves, and an optional display order moves entries to the front.
//! The tree is written to a data file (`data/tree.yml` by default) that site
//! templates read to render menus and sidebars.
//!
//! # Pipeline
//!
//! ```text
//! 1. Configure  navtree.toml  →  ScanOptions        (resolved ignore sets)
//! 2. Scan       source/       →  Directory          (sorted, ordered tree)
//! 3. Persist    Directory     →  data/tree.yml      (skipped when unchanged)
//! ```
//!
//! Each step is usable on its own: the scan needs nothing but a root and a
//! [`scan::ScanOptions`], and the data file helpers work on any
//! [`tree::Directory`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the source directory and builds the tree ([`scan::TreeBuilder`]) |
//! | [`tree`] | The tree data model: `Directory` = sorted map of sort key → `TreeNode` |
//! | [`naming`] | Sort key construction (`0002-getting%20started`) and extension helpers |
//! | [`order`] | Injected display order lookups for pages and directories |
//! | [`display_info`] | The `.display_info` directory marker file |
//! | [`datafile`] | YAML/JSON data file rendering, parsing and idempotent writes |
//! | [`config`] | `navtree.toml` loading, validation and merging |
//! | [`live`] | Shared tree snapshot that can be rebuilt while readers hold the old one |
//! | [`watch`] | Rebuild on filesystem changes |
//! | [`output`] | CLI output formatting |
//!
//! # Sort Keys
//!
//! Every entry is keyed by a string that sorts correctly under plain byte
//! order. Entries with a display order get a zero-padded prefix, so they come
//! before every unordered entry and among themselves sort numerically:
//!
//! ```text
//! 0001-index.html            display_order 1
//! 0002-getting%20started     display_order 2 (from .display_info)
//! about.html                 no order, sorted by name
//! ```
//!
//! Spaces are percent-encoded in keys and leaf paths alike; nothing else is
//! escaped.
//!
//! # Where Orders Come From
//!
//! The scanner never reads page content itself. Pages are ordered by a
//! [`order::FileOrder`] and directories by a [`order::DirectoryOrder`]. The
//! CLI uses YAML front matter for pages and `.display_info` marker files for
//! directories; library callers can plug in any closure.

pub mod config;
pub mod datafile;
pub mod display_info;
pub mod live;
pub mod naming;
pub mod order;
pub mod output;
pub mod scan;
pub mod tree;
pub mod watch;

#[cfg(test)]
pub(crate) mod test_helpers;
