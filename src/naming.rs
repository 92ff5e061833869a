//! Sort-key construction for tree entries.
//!
//! Every entry in the tree (page or directory) is stored under a key built
//! from its filename and an optional display order:
//!
//! - `docs` with display order 2 → `0002-docs`
//! - `a.html` with display order 1 → `0001-a.html`
//! - `b.html` without a display order → `b.html`
//! - `my file.html` without a display order → `my%20file.html`
//!
//! The zero padding makes numeric ordering agree with plain string ordering,
//! so sibling keys can live in a `BTreeMap` and come out in display order.
//! Digits sort before letters, which places ordered entries ahead of
//! unordered ones (unless an unordered name itself starts with a digit).

use std::path::Path;

/// Width of the zero-padded order prefix.
pub const ORDER_WIDTH: usize = 4;

/// Replace every space with `%20`.
///
/// Only spaces are encoded; the data file consumers expect every other
/// character verbatim.
pub fn encode_spaces(name: &str) -> String {
    name.replace(' ', "%20")
}

/// Build the sort key for an entry.
///
/// Orders wider than [`ORDER_WIDTH`] digits are written in full, which means
/// they no longer sort numerically against narrower ones.
pub fn sort_key(name: &str, order: Option<u32>) -> String {
    match order {
        Some(n) => format!("{:0width$}-{}", n, encode_spaces(name), width = ORDER_WIDTH),
        None => encode_spaces(name),
    }
}

/// The extension of a filename including its leading dot (`"index.html"` →
/// `".html"`). Returns `None` for names without an extension.
pub fn dotted_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{e}"))
}
