//! compiler.rs - Compiles `sanitization` rule records into text rules.
//!
//! A record's value is a `[pattern, replacement]` pair, a
//! `{ pattern, replacement }` mapping, a bare pattern (matches are deleted), or
//! a list of any of those. A record-level `selector` binds every rule it yields
//! to the tree; rules without one run on the serialized string.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::{Regex, RegexBuilder};
use serde_yml::Value;

use crate::config::MAX_PATTERN_LENGTH;
use crate::errors::{DomScrubError, Result};
use crate::rules::{check_value_keys, RuleKind, RuleRecord};

/// A single compiled substitution.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    /// Replacement text; `$1` and `${name}` refer to capture groups.
    pub replace_with: String,
    /// CSS selector scoping the rule to matched tree content.
    pub selector: Option<String>,
}

impl CompiledRule {
    pub fn is_scoped(&self) -> bool {
        self.selector.is_some()
    }
}

/// Compiled text rules, partitioned by scope.
///
/// Each half keeps the relative order the rules were configured in.
#[derive(Debug, Default)]
pub struct CompiledTextRules {
    /// Rules applied to tree content before serialization.
    pub scoped: Vec<CompiledRule>,
    /// Rules applied to the whole serialized string.
    pub global: Vec<CompiledRule>,
}

impl CompiledTextRules {
    pub fn len(&self) -> usize {
        self.scoped.len() + self.global.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn kind() -> &'static str {
    RuleKind::Sanitization.as_str()
}

fn scalar_string(value: &Value, what: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(DomScrubError::invalid_rule(
            kind(),
            format!("{} must be a string, found {:?}", what, other),
        )),
    }
}

const PAIR_KEYS: [&str; 3] = ["pattern", "replacement", "replace_with"];

/// Flattens a record value into `(pattern, replacement)` pairs.
fn collect_pairs(value: &Value, pairs: &mut Vec<(String, String)>) -> Result<()> {
    match value {
        Value::String(pattern) => pairs.push((pattern.clone(), String::new())),
        Value::Sequence(items) => match items.first() {
            None => {}
            Some(Value::Sequence(_) | Value::Mapping(_)) => {
                for item in items {
                    collect_pairs(item, pairs)?;
                }
            }
            Some(_) if items.len() <= 2 => {
                let pattern = scalar_string(&items[0], "pattern")?;
                let replacement = match items.get(1) {
                    Some(r) => scalar_string(r, "replacement")?,
                    None => String::new(),
                };
                pairs.push((pattern, replacement));
            }
            Some(_) => {
                return Err(DomScrubError::invalid_rule(
                    kind(),
                    format!("expected [pattern, replacement], found {} items", items.len()),
                ));
            }
        },
        Value::Mapping(map) => {
            check_value_keys(RuleKind::Sanitization, map, &PAIR_KEYS)?;
            let pattern = map
                .get("pattern")
                .ok_or_else(|| DomScrubError::invalid_rule(kind(), "mapping is missing `pattern`"))?;
            let replacement = map
                .get("replacement")
                .or_else(|| map.get("replace_with"))
                .unwrap_or(&Value::Null);
            pairs.push((
                scalar_string(pattern, "pattern")?,
                scalar_string(replacement, "replacement")?,
            ));
        }
        Value::Tagged(tagged) => collect_pairs(&tagged.value, pairs)?,
        other => {
            return Err(DomScrubError::invalid_rule(
                kind(),
                format!("unsupported rule value {:?}", other),
            ));
        }
    }
    Ok(())
}

/// Compiles one pattern under the engine's size limits.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(DomScrubError::PatternLengthExceeded(
            pattern.to_string(),
            pattern.len(),
            MAX_PATTERN_LENGTH,
        ));
    }
    RegexBuilder::new(pattern)
        .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
        .build()
        .map_err(|e| DomScrubError::RuleCompilationError(pattern.to_string(), e))
}

/// Compiles applicable `sanitization` records into partitioned text rules.
pub fn compile_text_rules(records: &[RuleRecord]) -> Result<CompiledTextRules> {
    debug!("Starting compilation of {} sanitization record(s).", records.len());

    let mut compiled = CompiledTextRules::default();
    for record in records {
        let mut pairs = Vec::new();
        collect_pairs(&record.value, &mut pairs)?;
        for (pattern, replace_with) in pairs {
            let rule = CompiledRule {
                regex: compile_pattern(&pattern)?,
                replace_with,
                selector: record.selector.clone(),
            };
            log::debug!(
                target: "domscrub_core::sanitizer",
                "Compiled pattern '{}' (scoped: {}).",
                pattern,
                rule.is_scoped()
            );
            if rule.is_scoped() {
                compiled.scoped.push(rule);
            } else {
                compiled.global.push(rule);
            }
        }
    }

    debug!(
        "Finished compiling text rules: {} scoped, {} global.",
        compiled.scoped.len(),
        compiled.global.len()
    );
    Ok(compiled)
}
