//! Configuration management for `domscrub-core`.
//!
//! This module defines the sanitization configuration (an ordered mapping from
//! rule-kind name to a raw rule value) and the per-invocation [`RunOptions`].
//! It handles YAML deserialization and eager validation of the rules a
//! configuration declares.
//!
//! License: MIT OR Apache-2.0

use anyhow::Context;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_yml::{Mapping, Value};
use std::path::Path;

use crate::errors::{DomScrubError, Result};
use crate::rules::{normalize, RuleKind};
use crate::sanitizers::compiler::compile_text_rules;
use crate::transforms::parse_transforms;

/// Maximum allowed length for a text-rule pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// The top-level sanitization configuration.
///
/// Each key is a rule-kind name (`selector`, `remove_spacing`, `regions`,
/// `dom_transform`, `sanitization`); each value may be a bare scalar, a single
/// rule record or a list of rule records. Declaration order is preserved.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SanitizeConfig {
    entries: Mapping,
}

/// Options supplied per invocation. Never persisted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Path of the document being sanitized, matched against rule `path` patterns.
    pub path: Option<String>,
    /// Region names to emit, in order.
    pub output: Option<Vec<String>>,
}

impl RunOptions {
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_output<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

impl SanitizeConfig {
    /// Builds a configuration from an already-parsed mapping.
    pub fn from_mapping(entries: Mapping) -> Self {
        for key in entries.keys() {
            match key.as_str() {
                Some(name) if RuleKind::from_key(name).is_some() => {}
                Some(name) => warn!("Ignoring unknown configuration key '{}'.", name),
                None => warn!("Ignoring non-string configuration key {:?}.", key),
            }
        }
        Self { entries }
    }

    /// Parses a configuration from YAML text. An empty document is an empty configuration.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let value: Value = serde_yml::from_str(text)?;
        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(entries) => Ok(Self::from_mapping(entries)),
            other => Err(DomScrubError::invalid_rule(
                "configuration",
                format!("expected a mapping of rule kinds, found {:?}", other),
            )),
        }
    }

    /// Loads a configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        info!("Loading sanitization config from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded {} rule kind(s) from file {}.", config.entries.len(), path.display());
        Ok(config)
    }

    /// The raw, un-normalized value configured for `kind`.
    pub fn raw(&self, kind: RuleKind) -> Option<&Value> {
        self.entries.get(kind.as_str())
    }

    /// Sets the raw value for `kind`, keeping its position if already declared.
    pub fn set(&mut self, kind: RuleKind, value: Value) {
        self.entries.insert(Value::String(kind.as_str().to_string()), value);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks every declared rule independently of run options.
    ///
    /// Compiles all `sanitization` patterns and `path` filters, and parses all
    /// `dom_transform` specs, so that faults surface before any document is
    /// processed. Region problems are not reported here; they only cause a
    /// fallback at run time.
    pub fn validate(&self) -> Result<()> {
        for kind in RuleKind::ALL {
            let Some(records) = normalize(kind, self.raw(kind))? else {
                continue;
            };
            for record in &records {
                if let Some(pattern) = record.path.as_deref() {
                    regex::Regex::new(pattern)
                        .map_err(|e| DomScrubError::RuleCompilationError(pattern.to_string(), e))?;
                }
            }
            match kind {
                RuleKind::Sanitization => {
                    compile_text_rules(&records)?;
                }
                RuleKind::DomTransform => {
                    parse_transforms(&records)?;
                }
                RuleKind::Selector => {
                    for record in &records {
                        if !(record.value.is_string() || record.value.is_null()) {
                            return Err(DomScrubError::invalid_rule(
                                kind.as_str(),
                                "value must be a CSS selector string",
                            ));
                        }
                    }
                }
                RuleKind::RemoveSpacing | RuleKind::Regions => {}
            }
            debug!("Validated {} '{}' record(s).", records.len(), kind);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_is_empty_config() {
        let config = SanitizeConfig::from_yaml_str("").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_non_mapping_is_rejected() {
        let err = SanitizeConfig::from_yaml_str("- a\n- b").unwrap_err();
        assert!(matches!(err, DomScrubError::InvalidRule { .. }));
    }

    #[test]
    fn test_raw_lookup_preserves_shape() {
        let config = SanitizeConfig::from_yaml_str("selector: main\nremove_spacing: true").unwrap();
        assert_eq!(config.raw(RuleKind::Selector).and_then(Value::as_str), Some("main"));
        assert_eq!(config.raw(RuleKind::RemoveSpacing), Some(&Value::Bool(true)));
        assert!(config.raw(RuleKind::Regions).is_none());
    }

    #[test]
    fn test_set_overrides_value() {
        let mut config = SanitizeConfig::default();
        config.set(RuleKind::Selector, Value::String("article".into()));
        assert_eq!(config.raw(RuleKind::Selector).and_then(Value::as_str), Some("article"));
    }

    #[test]
    fn test_validate_reports_bad_transform_kind() {
        let config = SanitizeConfig::from_yaml_str(
            "dom_transform: { value: { kind: explode, selector: div } }",
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, DomScrubError::UnknownTransformKind(ref k) if k == "explode"));
    }

    #[test]
    fn test_validate_reports_bad_pattern() {
        let config = SanitizeConfig::from_yaml_str(r#"sanitization: ['(unclosed', 'x']"#).unwrap();
        assert!(matches!(
            config.validate().unwrap_err(),
            DomScrubError::RuleCompilationError(..)
        ));
    }

    #[test]
    fn test_validate_accepts_full_config() {
        let config = SanitizeConfig::from_yaml_str(
            r#"
selector: div.content
remove_spacing: true
regions:
  - { name: header, selector: h1 }
dom_transform:
  - { value: { kind: remove, selector: script } }
  - { value: [remove_class, p, lead], path: '^/blog' }
sanitization:
  - { selector: span.ts, value: ['\d+', 'TIMESTAMP'] }
  - { value: ['\s+$', ''] }
"#,
        )
        .unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_run_options_builders() {
        let options = RunOptions::default().with_path("/a").with_output(["header", "body"]);
        assert_eq!(options.path.as_deref(), Some("/a"));
        assert_eq!(options.output, Some(vec!["header".to_string(), "body".to_string()]));
    }
}
