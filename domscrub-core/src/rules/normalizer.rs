//! Canonicalizes a raw configuration value into an ordered list of rule records.
//!
//! The shape is classified exactly once per lookup:
//!
//! 1. a sequence whose first element is record-shaped is used as-is,
//! 2. a single record-shaped mapping is wrapped in a one-element list,
//! 3. anything else is a bare scalar and becomes `[{ value: raw }]`.
//!
//! A mapping is record-shaped when it carries a `value` key.

use log::debug;
use serde_yml::Value;

use super::{RuleKind, RuleRecord};
use crate::errors::{DomScrubError, Result};

/// The three configuration shapes a rule kind may be written in.
#[derive(Debug)]
enum RawShape<'a> {
    Records(&'a [Value]),
    Record(&'a Value),
    Scalar(&'a Value),
}

impl<'a> RawShape<'a> {
    fn classify(raw: &'a Value) -> Self {
        match raw {
            Value::Sequence(items) if items.first().is_some_and(is_record_shaped) => {
                RawShape::Records(items)
            }
            value if is_record_shaped(value) => RawShape::Record(value),
            value => RawShape::Scalar(value),
        }
    }
}

fn is_record_shaped(value: &Value) -> bool {
    value.as_mapping().is_some_and(|map| map.contains_key("value"))
}

fn to_record(kind: RuleKind, value: &Value) -> Result<RuleRecord> {
    serde_yml::from_value(value.clone())
        .map_err(|e| DomScrubError::invalid_rule(kind.as_str(), e.to_string()))
}

/// Normalizes the raw value configured for `kind`.
///
/// Returns `Ok(None)` when the kind is absent from the configuration.
pub fn normalize(kind: RuleKind, raw: Option<&Value>) -> Result<Option<Vec<RuleRecord>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let records = match RawShape::classify(raw) {
        RawShape::Records(items) => items
            .iter()
            .map(|item| {
                if is_record_shaped(item) {
                    to_record(kind, item)
                } else {
                    // Later entries in a record list may still be written bare.
                    Ok(RuleRecord::bare(item.clone()))
                }
            })
            .collect::<Result<Vec<_>>>()?,
        RawShape::Record(value) => vec![to_record(kind, value)?],
        RawShape::Scalar(value) => vec![RuleRecord::bare(value.clone())],
    };

    debug!("Normalized '{}' into {} record(s).", kind, records.len());
    Ok(Some(records))
}
