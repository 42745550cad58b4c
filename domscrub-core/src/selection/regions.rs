//! Rebuilds the document from named regions in a caller-chosen order.
//!
//! The `regions` rule value is a list of `{ name, selector }` entries. When the
//! run also asks for an `output` ordering in which every name is a declared
//! region, the tree is replaced by one wrapper element per requested name
//! (tagged with that name) holding every element the region's selector matches.
//!
//! Matched elements are moved, not copied. An element matched by several
//! requested regions ends up in the last one to claim it.

use log::debug;
use serde_yml::Value;
use std::collections::HashMap;
use thiserror::Error;

use crate::dom::{self, HtmlTree};
use crate::errors::Result;

/// A named, selector-addressed slice of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub selector: String,
}

/// Why region composition was skipped. Never fatal: the pipeline falls back to
/// plain selector-based root replacement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidRegionConfiguration {
    #[error("no regions are configured")]
    NotConfigured,
    #[error("no output ordering was requested")]
    NoOutput,
    #[error("regions must be a list of {{ name, selector }} entries")]
    NotAList,
    #[error("region entry {0} is missing a `name` or `selector`")]
    MalformedEntry(usize),
    #[error("region name '{0}' is declared more than once")]
    DuplicateName(String),
    #[error("requested output '{0}' has no matching region")]
    UnknownOutput(String),
}

fn entry_field<'a>(entry: &'a Value, field: &str) -> Option<&'a str> {
    entry
        .as_mapping()?
        .get(field)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Parses the `regions` value into declared regions.
pub fn parse_regions(value: &Value) -> std::result::Result<Vec<Region>, InvalidRegionConfiguration> {
    let entries = value.as_sequence().ok_or(InvalidRegionConfiguration::NotAList)?;
    if entries.is_empty() {
        return Err(InvalidRegionConfiguration::NotConfigured);
    }
    let mut regions: Vec<Region> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let (Some(name), Some(selector)) = (entry_field(entry, "name"), entry_field(entry, "selector"))
        else {
            return Err(InvalidRegionConfiguration::MalformedEntry(index));
        };
        if name.contains(char::is_whitespace) {
            return Err(InvalidRegionConfiguration::MalformedEntry(index));
        }
        if regions.iter().any(|r| r.name == name) {
            return Err(InvalidRegionConfiguration::DuplicateName(name.to_string()));
        }
        regions.push(Region {
            name: name.to_string(),
            selector: selector.to_string(),
        });
    }
    Ok(regions)
}

/// Validates the configured regions against the requested output ordering.
///
/// Returns the regions to emit, in output order, duplicates included.
pub fn plan_regions(
    value: Option<&Value>,
    output: Option<&[String]>,
) -> std::result::Result<Vec<Region>, InvalidRegionConfiguration> {
    let value = value.ok_or(InvalidRegionConfiguration::NotConfigured)?;
    let regions = parse_regions(value)?;
    let output = output
        .filter(|names| !names.is_empty())
        .ok_or(InvalidRegionConfiguration::NoOutput)?;

    let by_name: HashMap<&str, &Region> = regions.iter().map(|r| (r.name.as_str(), r)).collect();
    output
        .iter()
        .map(|name| {
            by_name
                .get(name.as_str())
                .map(|region| (*region).clone())
                .ok_or_else(|| InvalidRegionConfiguration::UnknownOutput(name.clone()))
        })
        .collect()
}

/// Builds a new fragment from `plan`, moving matched elements out of `tree`.
pub fn compose_regions(tree: HtmlTree, plan: &[Region]) -> Result<HtmlTree> {
    let composed = HtmlTree::empty_fragment();
    for region in plan {
        let wrapper = dom::new_element(&region.name);
        // The contents of earlier wrappers are searched too, so a later claim
        // takes the element. The wrappers themselves are never claimed.
        let mut found = tree.select(&region.selector)?;
        found.extend(
            composed
                .select(&region.selector)?
                .into_iter()
                .filter(|node| node.parent().as_ref() != Some(composed.root())),
        );
        debug!(
            "Region '{}' ('{}') claims {} element(s).",
            region.name,
            region.selector,
            found.len()
        );
        for node in found {
            wrapper.append(node);
        }
        composed.root().append(wrapper);
    }
    Ok(composed)
}
