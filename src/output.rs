//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Tree
//!
//! Every entry is shown by its sort key, which is exactly what templates see.
//! Pages point at their root-relative path; directories end with `/` and list
//! their children one level deeper:
//!
//! ```text
//! 0001-index.html.erb → /index.html.erb
//! 0002-getting%20started/
//!     0001-install.html.md → /getting%20started/install.html.md
//!     0002-configure.html.md → /getting%20started/configure.html.md
//! about.html.md → /about.html.md
//! ```
//!
//! ## Summary
//!
//! ```text
//! Tree: 6 pages in 3 directories
//! Data file: data/tree.yml written (sha256 3f2a9c01b7de)
//! ```
//!
//! # Architecture
//!
//! Each display has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::datafile::WriteOutcome;
use crate::tree::{Directory, TreeNode, directory_count, page_count};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

/// Format a tree, one line per entry, depth-first in key order.
pub fn format_tree(tree: &Directory) -> Vec<String> {
    let mut lines = Vec::new();
    format_level(tree, 0, &mut lines);
    lines
}

fn format_level(dir: &Directory, depth: usize, lines: &mut Vec<String>) {
    for (key, node) in dir {
        match node {
            TreeNode::Leaf(path) => lines.push(format!("{}{} → {}", indent(depth), key, path)),
            TreeNode::Directory(children) => {
                lines.push(format!("{}{}/", indent(depth), key));
                format_level(children, depth + 1, lines);
            }
        }
    }
}

/// Format the counts line and, when a write was attempted, its outcome.
///
/// `outcome` is `None` when the data file was not touched (`check`, or
/// `build` with automatic updates disabled).
pub fn format_summary(
    tree: &Directory,
    data_path: &Path,
    outcome: Option<&WriteOutcome>,
) -> Vec<String> {
    let mut lines = vec![format!(
        "Tree: {} in {}",
        plural(page_count(tree), "page", "pages"),
        plural(directory_count(tree), "directory", "directories"),
    )];
    match outcome {
        Some(outcome) => lines.push(format!("Data file: {} {}", data_path.display(), outcome)),
        None => lines.push(format!("Data file: {} not written", data_path.display())),
    }
    lines
}

/// Print a tree to stdout.
pub fn print_tree(tree: &Directory) {
    for line in format_tree(tree) {
        println!("{}", line);
    }
}

/// Print the summary to stdout.
pub fn print_summary(tree: &Directory, data_path: &Path, outcome: Option<&WriteOutcome>) {
    for line in format_summary(tree, data_path, outcome) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Directory {
        let mut guides = Directory::new();
        guides.insert(
            "0001-install.html".into(),
            TreeNode::Leaf("/getting%20started/install.html".into()),
        );
        let mut root = Directory::new();
        root.insert("0001-index.html".into(), TreeNode::Leaf("/index.html".into()));
        root.insert("0002-getting%20started".into(), TreeNode::Directory(guides));
        root.insert("empty".into(), TreeNode::Directory(Directory::new()));
        root
    }

    #[test]
    fn indent_is_four_spaces_per_level() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn format_tree_nests_directories() {
        assert_eq!(
            format_tree(&sample()),
            vec![
                "0001-index.html → /index.html",
                "0002-getting%20started/",
                "    0001-install.html → /getting%20started/install.html",
                "empty/",
            ]
        );
    }

    #[test]
    fn format_tree_empty() {
        assert!(format_tree(&Directory::new()).is_empty());
    }

    #[test]
    fn summary_with_written_outcome() {
        let outcome = WriteOutcome::Written {
            digest: "abcdef0123456789".into(),
        };
        let lines = format_summary(&sample(), Path::new("data/tree.yml"), Some(&outcome));
        assert_eq!(
            lines,
            vec![
                "Tree: 2 pages in 2 directories",
                "Data file: data/tree.yml written (sha256 abcdef012345)",
            ]
        );
    }

    #[test]
    fn summary_without_write() {
        let mut tree = Directory::new();
        tree.insert("a.html".into(), TreeNode::Leaf("/a.html".into()));
        let lines = format_summary(&tree, Path::new("data/tree.json"), None);
        assert_eq!(
            lines,
            vec![
                "Tree: 1 page in 0 directories",
                "Data file: data/tree.json not written",
            ]
        );
    }
}
