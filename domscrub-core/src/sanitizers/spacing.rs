//! Collapses runs of spaces inside text nodes.
//!
//! Only the space character is touched; tabs and newlines survive, and
//! attribute values are never visited.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

use crate::dom::HtmlTree;

static SPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" {2,}").expect("SPACE_RUN: hardcoded regex is valid"));

/// Replaces every run of two or more spaces in `text` with a single space.
pub fn collapse_spaces(text: &str) -> Cow<'_, str> {
    SPACE_RUN.replace_all(text, " ")
}

/// Applies [`collapse_spaces`] to every text node of `tree`.
pub fn normalize_spacing(tree: &HtmlTree) {
    let mut touched = 0usize;
    for text in tree.text_nodes() {
        let collapsed = match collapse_spaces(&text.borrow()) {
            Cow::Borrowed(_) => continue,
            Cow::Owned(collapsed) => collapsed,
        };
        *text.borrow_mut() = collapsed;
        touched += 1;
    }
    debug!("Collapsed spacing in {} text node(s).", touched);
}
