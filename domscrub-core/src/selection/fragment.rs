//! Replaces the tree with the elements a selector matches.
//!
//! The result is always a fragment: any doctype and all surrounding structure
//! are discarded. A match nested inside another match travels with its
//! ancestor rather than being pulled out of it.

use kuchiki::NodeRef;
use log::debug;

use crate::dom::HtmlTree;
use crate::errors::Result;

pub fn select_fragment(tree: HtmlTree, selector: &str) -> Result<HtmlTree> {
    let matches = tree.select(selector)?;
    let mut kept: Vec<NodeRef> = Vec::with_capacity(matches.len());
    for node in matches {
        if node.ancestors().any(|ancestor| kept.contains(&ancestor)) {
            continue;
        }
        kept.push(node);
    }
    debug!("Selector '{}' kept {} top-level element(s).", selector, kept.len());
    Ok(HtmlTree::fragment_from(kept))
}
