//! The process-wide pretty-printing template.
//!
//! Parsed from the embedded `config/pretty_print.yaml` the first time it is
//! needed and shared read-only afterwards.

use log::debug;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Deserialize)]
pub struct PrettyPrintTemplate {
    /// One indentation unit.
    pub indent: String,
    /// Tag of the shell element a fragment is wrapped in before printing.
    pub document_wrapper: String,
    /// Elements printed without a closing tag.
    pub void_elements: HashSet<String>,
    /// Elements whose content is emitted exactly as serialized.
    pub verbatim_elements: HashSet<String>,
}

impl PrettyPrintTemplate {
    pub fn is_void(&self, tag: &str) -> bool {
        self.void_elements.contains(tag)
    }

    pub fn is_verbatim(&self, tag: &str) -> bool {
        self.verbatim_elements.contains(tag)
    }
}

static TEMPLATE: Lazy<PrettyPrintTemplate> = Lazy::new(|| {
    let template: PrettyPrintTemplate =
        serde_yml::from_str(include_str!("../../config/pretty_print.yaml"))
            .expect("embedded pretty-print template is valid");
    debug!("Loaded pretty-print template (indent {:?}).", template.indent);
    template
});

/// The shared template. Initialized exactly once per process.
pub fn template() -> &'static PrettyPrintTemplate {
    &TEMPLATE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_template_loads() {
        let template = template();
        assert_eq!(template.indent, "  ");
        assert_eq!(template.document_wrapper, "html");
        assert!(template.is_void("br"));
        assert!(template.is_verbatim("pre"));
        assert!(!template.is_verbatim("div"));
    }

    #[test]
    fn test_template_is_shared() {
        assert!(std::ptr::eq(template(), template()));
    }
}
