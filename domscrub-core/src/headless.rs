// domscrub-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for one-shot sanitization without holding an engine.
//!
//! Both functions build a throwaway `HtmlEngine` over the given configuration
//! and run it once.

use crate::config::{RunOptions, SanitizeConfig};
use crate::encoding::repair_bytes;
use crate::engine::SanitizationEngine;
use crate::engines::html_engine::HtmlEngine;
use crate::errors::Result;

/// Sanitizes `html` under `config` for a run described by `options`.
///
/// This is the primary entry point for non-interactive use. Empty input
/// returns an empty string without consulting the configuration.
pub fn sanitize(html: &str, config: &SanitizeConfig, options: &RunOptions) -> Result<String> {
    if html.is_empty() {
        return Ok(String::new());
    }
    HtmlEngine::new(config.clone()).sanitize(html, options)
}

/// Like [`sanitize`], for raw bytes that may not be valid UTF-8.
///
/// Undecodable byte sequences are dropped before parsing.
pub fn sanitize_bytes(bytes: &[u8], config: &SanitizeConfig, options: &RunOptions) -> Result<String> {
    sanitize(&repair_bytes(bytes), config, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_sanitize_selector_and_scoped_rule() -> Result<()> {
        let config = SanitizeConfig::from_yaml_str(
            r#"
selector: div.content
sanitization:
  - { selector: span.ts, value: ['\d+', TIMESTAMP] }
"#,
        )?;
        let html = r#"<div class="content"><span class="ts">12345</span> hi</div>"#;
        let sanitized = sanitize(html, &config, &RunOptions::default())?;
        assert_eq!(
            sanitized,
            "<div class=\"content\">\n  <span class=\"ts\">TIMESTAMP</span>\n  hi\n</div>"
        );
        Ok(())
    }

    #[test]
    fn test_sanitize_bytes_drops_invalid_sequences() -> Result<()> {
        let config = SanitizeConfig::default();
        let input = b"<p title=\"a\xffb\">x\xc3\x28y</p>";
        let sanitized = sanitize_bytes(input, &config, &RunOptions::default())?;
        assert_eq!(sanitized, "<p title=\"ab\">x(y</p>");
        Ok(())
    }
}
