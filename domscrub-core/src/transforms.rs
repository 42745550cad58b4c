//! Structural edits applied to the working tree.
//!
//! `dom_transform` records are parsed into [`DomTransform`] values and applied
//! in configuration order. A record value is a mapping
//! `{ kind, selector, class }`, a list `[kind, selector, class]`, or a
//! list of those.
//!
//! License: MIT OR Apache-2.0

use log::debug;
use serde_yml::Value;
use std::str::FromStr;

use crate::dom::{self, HtmlTree};
use crate::errors::{DomScrubError, Result};
use crate::rules::{check_value_keys, RuleKind, RuleRecord};

/// The closed set of transform kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Remove,
    Strip,
    UnwrapRoot,
    Unwrap,
    RemoveClass,
}

impl FromStr for TransformKind {
    type Err = DomScrubError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "remove" => Ok(TransformKind::Remove),
            "strip" => Ok(TransformKind::Strip),
            "unwrap_root" => Ok(TransformKind::UnwrapRoot),
            "unwrap" => Ok(TransformKind::Unwrap),
            "remove_class" => Ok(TransformKind::RemoveClass),
            other => Err(DomScrubError::UnknownTransformKind(other.to_string())),
        }
    }
}

/// One parsed structural edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomTransform {
    /// Detach and discard every match.
    Remove(String),
    /// Replace every match with its children.
    Strip(String),
    /// Replace the whole tree with the children of the first match.
    UnwrapRoot(String),
    /// Same as `Strip`.
    Unwrap(String),
    /// Remove one class token from every match.
    RemoveClass { selector: String, class: String },
}

impl DomTransform {
    pub fn new(kind: TransformKind, selector: String, class: Option<String>) -> Result<Self> {
        Ok(match kind {
            TransformKind::Remove => DomTransform::Remove(selector),
            TransformKind::Strip => DomTransform::Strip(selector),
            TransformKind::UnwrapRoot => DomTransform::UnwrapRoot(selector),
            TransformKind::Unwrap => DomTransform::Unwrap(selector),
            TransformKind::RemoveClass => {
                let class = class.filter(|c| !c.trim().is_empty()).ok_or_else(|| {
                    DomScrubError::invalid_rule(kind_name(), "remove_class needs a class name")
                })?;
                DomTransform::RemoveClass { selector, class }
            }
        })
    }

    pub fn selector(&self) -> &str {
        match self {
            DomTransform::Remove(s)
            | DomTransform::Strip(s)
            | DomTransform::UnwrapRoot(s)
            | DomTransform::Unwrap(s) => s,
            DomTransform::RemoveClass { selector, .. } => selector,
        }
    }
}

fn kind_name() -> &'static str {
    RuleKind::DomTransform.as_str()
}

fn string_field(value: Option<&Value>, field: &str) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(DomScrubError::invalid_rule(
            kind_name(),
            format!("`{}` must be a string, found {:?}", field, other),
        )),
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value.ok_or_else(|| DomScrubError::invalid_rule(kind_name(), format!("missing `{}`", field)))
}

fn collect_specs(value: &Value, specs: &mut Vec<DomTransform>) -> Result<()> {
    match value {
        Value::Mapping(map) => {
            check_value_keys(RuleKind::DomTransform, map, &["kind", "selector", "class"])?;
            let kind = required(string_field(map.get("kind"), "kind")?, "kind")?;
            let selector = required(string_field(map.get("selector"), "selector")?, "selector")?;
            let class = string_field(map.get("class"), "class")?;
            specs.push(DomTransform::new(kind.parse()?, selector, class)?);
        }
        Value::Sequence(items) => match items.first() {
            None => {}
            Some(Value::Sequence(_) | Value::Mapping(_)) => {
                for item in items {
                    collect_specs(item, specs)?;
                }
            }
            Some(_) => {
                if items.len() > 3 {
                    return Err(DomScrubError::invalid_rule(
                        kind_name(),
                        format!("expected [kind, selector, class], found {} items", items.len()),
                    ));
                }
                let kind = required(string_field(items.first(), "kind")?, "kind")?;
                let selector = required(string_field(items.get(1), "selector")?, "selector")?;
                let class = string_field(items.get(2), "class")?;
                specs.push(DomTransform::new(kind.parse()?, selector, class)?);
            }
        },
        Value::Tagged(tagged) => collect_specs(&tagged.value, specs)?,
        other => {
            return Err(DomScrubError::invalid_rule(
                kind_name(),
                format!("unsupported transform value {:?}", other),
            ));
        }
    }
    Ok(())
}

/// Parses applicable `dom_transform` records, keeping their order.
pub fn parse_transforms(records: &[RuleRecord]) -> Result<Vec<DomTransform>> {
    let mut specs = Vec::new();
    for record in records {
        collect_specs(&record.value, &mut specs)?;
    }
    Ok(specs)
}

fn remove_class_token(node: &kuchiki::NodeRef, class: &str) {
    let Some(element) = node.as_element() else {
        return;
    };
    let mut attributes = element.attributes.borrow_mut();
    let Some(current) = attributes.get("class") else {
        return;
    };
    let remaining: Vec<&str> = current.split_whitespace().filter(|token| *token != class).collect();
    let remaining = remaining.join(" ");
    if remaining.is_empty() {
        attributes.remove("class");
    } else {
        attributes.insert("class", remaining);
    }
}

/// Applies one transform. Consumes the tree since `unwrap_root` replaces it.
pub fn apply_transform(tree: HtmlTree, transform: &DomTransform) -> Result<HtmlTree> {
    let matches = tree.select(transform.selector())?;
    debug!("Applying {:?} to {} element(s).", transform, matches.len());

    match transform {
        DomTransform::Remove(_) => {
            for node in &matches {
                node.detach();
            }
        }
        DomTransform::Strip(_) | DomTransform::Unwrap(_) => {
            for node in &matches {
                dom::unwrap_node(node);
            }
        }
        DomTransform::UnwrapRoot(selector) => {
            let Some(root) = matches.first() else {
                debug!("unwrap_root: nothing matches '{}'; tree unchanged.", selector);
                return Ok(tree);
            };
            return Ok(HtmlTree::fragment_from(root.children().collect::<Vec<_>>()));
        }
        DomTransform::RemoveClass { class, .. } => {
            for node in &matches {
                remove_class_token(node, class);
            }
        }
    }
    Ok(tree)
}

/// Applies `transforms` in order.
pub fn apply_transforms(mut tree: HtmlTree, transforms: &[DomTransform]) -> Result<HtmlTree> {
    for transform in transforms {
        tree = apply_transform(tree, transform)?;
    }
    Ok(tree)
}
