//! Selects the rule records that apply to one run.
//!
//! A record applies unless it is disabled, or it carries a `path` pattern and
//! the run's path does not contain a match for it. For single-winner kinds
//! (`selector`, `remove_spacing`) more than one applicable record is refused
//! rather than resolved.

use log::debug;
use regex::Regex;

use super::{normalize, RuleKind, RuleRecord};
use crate::config::{RunOptions, SanitizeConfig};
use crate::errors::{DomScrubError, Result};

/// Decides whether `record` applies to a run with `options`.
///
/// Path patterns are searched for, not anchored: `blog` matches `/en/blog/1`.
pub fn want(record: Option<&RuleRecord>, options: &RunOptions) -> Result<bool> {
    let Some(record) = record else {
        return Ok(false);
    };
    if record.is_disabled() {
        return Ok(false);
    }
    match (record.path.as_deref(), options.path.as_deref()) {
        (Some(pattern), Some(path)) => {
            let regex = Regex::new(pattern)
                .map_err(|e| DomScrubError::RuleCompilationError(pattern.to_string(), e))?;
            Ok(regex.is_match(path))
        }
        _ => Ok(true),
    }
}

/// Returns every applicable record of `kind`, in configuration order.
///
/// An absent kind yields an empty list.
pub fn select_all(
    config: &SanitizeConfig,
    kind: RuleKind,
    options: &RunOptions,
) -> Result<Vec<RuleRecord>> {
    let Some(records) = normalize(kind, config.raw(kind))? else {
        return Ok(Vec::new());
    };

    let mut applicable = Vec::with_capacity(records.len());
    for record in records {
        if want(Some(&record), options)? {
            applicable.push(record);
        }
    }
    debug!("{} applicable '{}' record(s).", applicable.len(), kind);
    Ok(applicable)
}

/// Returns the single applicable record of `kind`, if any.
///
/// Fails with [`DomScrubError::ConfigurationAmbiguity`] when several apply.
pub fn select(
    config: &SanitizeConfig,
    kind: RuleKind,
    options: &RunOptions,
) -> Result<Option<RuleRecord>> {
    let mut applicable = select_all(config, kind, options)?;
    match applicable.len() {
        0 => Ok(None),
        1 => Ok(applicable.pop()),
        _ => Err(DomScrubError::ConfigurationAmbiguity {
            kind: kind.as_str().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yml::Value;

    fn options(path: Option<&str>) -> RunOptions {
        RunOptions {
            path: path.map(str::to_string),
            output: None,
        }
    }

    fn config(src: &str) -> SanitizeConfig {
        SanitizeConfig::from_yaml_str(src).unwrap()
    }

    #[test]
    fn test_want_absent_and_disabled() {
        assert!(!want(None, &options(None)).unwrap());
        let mut record = RuleRecord::bare(Value::Bool(true));
        record.disabled = Some(true);
        assert!(!want(Some(&record), &options(None)).unwrap());
        record.disabled = Some(false);
        assert!(want(Some(&record), &options(None)).unwrap());
    }

    #[test]
    fn test_want_path_is_searched() {
        let mut record = RuleRecord::bare(Value::Bool(true));
        record.path = Some("blog".into());
        assert!(want(Some(&record), &options(Some("/en/blog/1"))).unwrap());
        assert!(!want(Some(&record), &options(Some("/en/news/1"))).unwrap());
        // No run path means the filter cannot exclude.
        assert!(want(Some(&record), &options(None)).unwrap());
    }

    #[test]
    fn test_want_invalid_path_pattern() {
        let mut record = RuleRecord::bare(Value::Bool(true));
        record.path = Some("(".into());
        let err = want(Some(&record), &options(Some("/"))).unwrap_err();
        assert!(matches!(err, DomScrubError::RuleCompilationError(..)));
    }

    #[test]
    fn test_select_single_winner() {
        let cfg = config("selector: div.content");
        let record = select(&cfg, RuleKind::Selector, &options(None)).unwrap().unwrap();
        assert_eq!(record.value.as_str(), Some("div.content"));
    }

    #[test]
    fn test_select_absent() {
        let cfg = config("remove_spacing: true");
        assert!(select(&cfg, RuleKind::Selector, &options(None)).unwrap().is_none());
    }

    #[test]
    fn test_select_ambiguous() {
        let cfg = config(
            r#"
selector:
  - value: main
  - value: article
"#,
        );
        let err = select(&cfg, RuleKind::Selector, &options(None)).unwrap_err();
        assert_eq!(err.to_string(), "too many matching rules of type selector");
    }

    #[test]
    fn test_select_path_disambiguates() {
        let cfg = config(
            r#"
selector:
  - { value: main, path: '^/docs/' }
  - { value: article, path: '^/blog/' }
"#,
        );
        let record = select(&cfg, RuleKind::Selector, &options(Some("/blog/post")))
            .unwrap()
            .unwrap();
        assert_eq!(record.value.as_str(), Some("article"));

        // Both match when no path is supplied.
        assert!(select(&cfg, RuleKind::Selector, &options(None)).is_err());
    }

    #[test]
    fn test_select_all_keeps_order() {
        let cfg = config(
            r#"
sanitization:
  - { value: ['a', 'A'] }
  - { value: ['b', 'B'], disabled: true }
  - { value: ['c', 'C'] }
"#,
        );
        let records = select_all(&cfg, RuleKind::Sanitization, &options(None)).unwrap();
        let firsts: Vec<_> = records
            .iter()
            .map(|r| r.value.as_sequence().unwrap()[0].as_str().unwrap().to_string())
            .collect();
        assert_eq!(firsts, vec!["a", "c"]);
    }
}
