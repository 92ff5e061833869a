//! The navigation tree data model.
//!
//! A tree is a [`Directory`]: an ordered map from sort key to [`TreeNode`].
//! Leaves hold the root-relative source path of a page; inner nodes hold the
//! children of a subdirectory.
//!
//! Serialized with serde, a directory becomes a plain mapping and a leaf a
//! plain string, so the data file reads naturally from templates:
//!
//! ```yaml
//! 0001-index.html: /index.html
//! 0002-docs:
//!   0001-intro.html: /docs/intro.html
//!   my%20notes.html: /docs/my%20notes.html
//! about.html: /about.html
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Children of one directory, sorted by sort key.
///
/// `BTreeMap<String, _>` orders keys by bytes, which is exactly the
/// case-sensitive lexicographic order the data file promises.
pub type Directory = BTreeMap<String, TreeNode>;

/// One entry of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Percent-encoded root-relative path of a source file, e.g. `/docs/my%20file.html`.
    Leaf(String),
    Directory(Directory),
}

impl TreeNode {
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            TreeNode::Leaf(path) => Some(path),
            TreeNode::Directory(_) => None,
        }
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            TreeNode::Leaf(_) => None,
            TreeNode::Directory(children) => Some(children),
        }
    }
}

/// Every leaf path in depth-first key order.
pub fn leaf_paths(dir: &Directory) -> Vec<&str> {
    let mut paths = Vec::new();
    collect_leaves(dir, &mut paths);
    paths
}

fn collect_leaves<'a>(dir: &'a Directory, paths: &mut Vec<&'a str>) {
    for node in dir.values() {
        match node {
            TreeNode::Leaf(path) => paths.push(path),
            TreeNode::Directory(children) => collect_leaves(children, paths),
        }
    }
}

/// Number of leaves anywhere below `dir`.
pub fn page_count(dir: &Directory) -> usize {
    dir.values()
        .map(|node| match node {
            TreeNode::Leaf(_) => 1,
            TreeNode::Directory(children) => page_count(children),
        })
        .sum()
}

/// Number of directories anywhere below `dir` (not counting `dir` itself).
pub fn directory_count(dir: &Directory) -> usize {
    dir.values()
        .filter_map(TreeNode::as_directory)
        .map(|children| 1 + directory_count(children))
        .sum()
}

/// Follow a sequence of sort keys down the tree.
pub fn lookup<'a>(dir: &'a Directory, keys: &[&str]) -> Option<&'a TreeNode> {
    let (first, rest) = keys.split_first()?;
    let node = dir.get(*first)?;
    if rest.is_empty() {
        Some(node)
    } else {
        lookup(node.as_directory()?, rest)
    }
}
