//! dom.rs - The working document tree for one sanitization run.
//!
//! Wraps a `kuchiki` node so the rest of the engine only deals with a handful
//! of primitives: parse, select by CSS, iterate text nodes and build fresh
//! fragments. A tree is either a full document (it was parsed from input that
//! carried a doctype or `<html>` tag) or a fragment: a document node whose
//! children are the top-level nodes, with no doctype and no `<html>` wrapper.
//!
//! License: MIT OR APACHE 2.0

use html5ever::{LocalName, Namespace, QualName};
use kuchiki::traits::*;
use kuchiki::{Attribute, ExpandedName, NodeDataRef, NodeRef};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;

use crate::errors::{DomScrubError, Result};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Input is treated as a full document when it opens with a doctype or an
/// `<html>` tag, optionally preceded by an XML declaration or comments.
static DOCUMENT_PROLOGUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\A\s*(?:<\?xml[^>]*>\s*)?(?:<!--.*?-->\s*)*(?:<!doctype|<html[\s>])")
        .expect("DOCUMENT_PROLOGUE: hardcoded regex is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeShape {
    Document,
    Fragment,
}

/// The mutable working tree.
#[derive(Debug, Clone)]
pub struct HtmlTree {
    root: NodeRef,
    shape: TreeShape,
}

impl HtmlTree {
    /// Parses `html` as a document or a fragment, depending on its prologue.
    ///
    /// Malformed markup is tolerated by the parser.
    pub fn parse(html: &str) -> Self {
        let document = kuchiki::parse_html().one(html);
        if DOCUMENT_PROLOGUE.is_match(html) {
            debug!("Parsed input as a full document.");
            return Self {
                root: document,
                shape: TreeShape::Document,
            };
        }

        // The parser always builds html/head/body; a fragment keeps only what
        // landed inside head and body, in that order.
        let fragment = HtmlTree::empty_fragment();
        for container in ["head", "body"] {
            if let Ok(found) = document.select_first(container) {
                let children: Vec<NodeRef> = found.as_node().children().collect();
                for child in children {
                    fragment.root.append(child);
                }
            }
        }
        debug!("Parsed input as a fragment.");
        fragment
    }

    /// A fragment with no children.
    pub fn empty_fragment() -> Self {
        Self {
            root: NodeRef::new_document(),
            shape: TreeShape::Fragment,
        }
    }

    /// A fragment whose top-level nodes are `nodes`, moved in order.
    pub fn fragment_from<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = NodeRef>,
    {
        let fragment = Self::empty_fragment();
        for node in nodes {
            fragment.root.append(node);
        }
        fragment
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    pub fn shape(&self) -> TreeShape {
        self.shape
    }

    pub fn is_fragment(&self) -> bool {
        self.shape == TreeShape::Fragment
    }

    /// Elements matching `selector`, in document order.
    pub fn select(&self, selector: &str) -> Result<Vec<NodeRef>> {
        select_nodes(&self.root, selector)
    }

    /// Every text node in the tree, in document order.
    pub fn text_nodes(&self) -> Vec<NodeDataRef<RefCell<String>>> {
        self.root.descendants().text_nodes().collect()
    }
}

/// Elements under (and including) `node` matching `selector`, in document order.
pub fn select_nodes(node: &NodeRef, selector: &str) -> Result<Vec<NodeRef>> {
    let matches = node
        .select(selector)
        .map_err(|()| DomScrubError::InvalidSelector(selector.to_string()))?;
    Ok(matches.map(|m| m.as_node().clone()).collect())
}

/// Creates a detached HTML element with no attributes.
pub fn new_element(tag: &str) -> NodeRef {
    let name = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag));
    NodeRef::new_element(name, Vec::<(ExpandedName, Attribute)>::new())
}

/// Replaces `node` by its children, which keep their order.
pub fn unwrap_node(node: &NodeRef) {
    let children: Vec<NodeRef> = node.children().collect();
    for child in children {
        node.insert_before(child);
    }
    node.detach();
}

/// Serializes `node` with the parser's own serializer.
pub fn outer_html(node: &NodeRef) -> Result<String> {
    let mut output = Vec::new();
    node.serialize(&mut output)
        .map_err(|e| DomScrubError::Serialization(e.to_string()))?;
    String::from_utf8(output).map_err(|e| DomScrubError::Serialization(e.to_string()))
}
