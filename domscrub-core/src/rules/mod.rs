//! Rule records and the kinds of rule a configuration can declare.
//!
//! A configuration entry may be written as a bare scalar, a single record or a
//! list of records. [`normalizer`] canonicalizes all three shapes into a list of
//! [`RuleRecord`]s; [`selector`] decides which of those records apply to a run.
//!
//! License: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use serde_yml::{Mapping, Value};
use std::fmt;

use crate::errors::{DomScrubError, Result};

pub mod normalizer;
pub mod selector;

pub use normalizer::normalize;
pub use selector::{select, select_all, want};

/// The rule kinds understood by the engine, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Selector,
    RemoveSpacing,
    Regions,
    DomTransform,
    Sanitization,
}

impl RuleKind {
    pub const ALL: [RuleKind; 5] = [
        RuleKind::Selector,
        RuleKind::RemoveSpacing,
        RuleKind::Regions,
        RuleKind::DomTransform,
        RuleKind::Sanitization,
    ];

    /// Configuration key for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Selector => "selector",
            RuleKind::RemoveSpacing => "remove_spacing",
            RuleKind::Regions => "regions",
            RuleKind::DomTransform => "dom_transform",
            RuleKind::Sanitization => "sanitization",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == key)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One canonicalized configuration entry.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RuleRecord {
    /// The rule payload; its meaning depends on the kind.
    pub value: Value,
    /// Regular expression searched for in the run's document path.
    #[serde(default)]
    pub path: Option<String>,
    /// Explicitly disables the record when true.
    #[serde(default)]
    pub disabled: Option<bool>,
    /// CSS selector binding a `sanitization` record to the tree.
    #[serde(default)]
    pub selector: Option<String>,
}

impl RuleRecord {
    /// Wraps a bare value with no filters.
    pub fn bare(value: Value) -> Self {
        Self {
            value,
            path: None,
            disabled: None,
            selector: None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled == Some(true)
    }
}

/// Truthiness of a configuration scalar: `false`, `null`, `0`, `""` and empty
/// collections are false, everything else is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(seq) => !seq.is_empty(),
        Value::Mapping(map) => !map.is_empty(),
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

/// Rejects any key of a rule value mapping outside `allowed`.
///
/// Record fields (`selector`, `path`, `disabled`) only apply next to a `value`
/// key; inside the value they would otherwise be dropped without a trace.
pub(crate) fn check_value_keys(kind: RuleKind, map: &Mapping, allowed: &[&str]) -> Result<()> {
    for key in map.keys() {
        let name = match key.as_str() {
            Some(name) => name.to_string(),
            None => format!("{:?}", key),
        };
        if !allowed.contains(&name.as_str()) {
            return Err(DomScrubError::invalid_rule(
                kind.as_str(),
                format!("unexpected key `{}` (expected one of: {})", name, allowed.join(", ")),
            ));
        }
    }
    Ok(())
}
