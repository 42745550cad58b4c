// domscrub-core/src/lib.rs
//! # DomScrub Core Library
//!
//! `domscrub-core` normalizes raw HTML into a canonical, diff-friendly form
//! according to a declarative rule set, so that two snapshots of the same page
//! can be compared without noise from whitespace, markup variance, volatile
//! fragments or irrelevant regions.
//!
//! The library does no I/O beyond optional config-file loading. It takes markup
//! plus an already-parsed configuration and returns a string.
//!
//! ## Modules
//!
//! * `config`: `SanitizeConfig` (rule kind → raw value) and per-run `RunOptions`.
//! * `rules`: Canonicalizes rule values into records and selects the applicable ones.
//! * `dom`: The working tree: parsing, CSS selection, fragments.
//! * `selection`: Root replacement by named regions or by a selector.
//! * `transforms`: Structural `dom_transform` edits.
//! * `sanitizers`: Spacing normalization and regex text rules.
//! * `format`: The canonical pretty-printed string form.
//! * `encoding`: Repair of undecodable bytes and unrepresentable characters.
//! * `engine`: The `SanitizationEngine` trait.
//! * `engines`: Concrete engines (`HtmlEngine`).
//! * `headless`: One-shot convenience wrappers.
//!
//! ## Pipeline
//!
//! parse → spacing → regions **or** selector → dom transforms → scoped text
//! rules → serialize → encoding repair → global text rules.
//!
//! ## Usage Example
//!
//! ```rust
//! use domscrub_core::{sanitize, RunOptions, SanitizeConfig};
//!
//! fn main() -> Result<(), domscrub_core::DomScrubError> {
//!     let config = SanitizeConfig::from_yaml_str(
//!         r#"
//! selector: div.content
//! remove_spacing: true
//! sanitization:
//!   - { selector: span.ts, value: ['\d+', TIMESTAMP] }
//! "#,
//!     )?;
//!
//!     let html = r#"<nav>menu</nav><div class="content"><span class="ts">1700000000</span>  hi</div>"#;
//!     let output = sanitize(html, &config, &RunOptions::default())?;
//!     assert!(output.contains("TIMESTAMP"));
//!     assert!(!output.contains("menu"));
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`DomScrubError`]. Ambiguous single-winner rules
//! and unknown transform kinds are reported as distinct variants so callers can
//! name the faulty rule. Invalid region setups are not errors: the engine falls
//! back to the `selector` rule.
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod config;
pub mod dom;
pub mod encoding;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod format;
pub mod headless;
pub mod rules;
pub mod sanitizers;
pub mod selection;
pub mod transforms;

/// Re-exports the configuration types.
pub use config::{RunOptions, SanitizeConfig, MAX_PATTERN_LENGTH};

/// Re-exports the error type for clear error reporting.
pub use errors::DomScrubError;

/// Re-exports the engine trait and its tree-based implementation.
pub use engine::SanitizationEngine;
pub use engines::html_engine::{HtmlEngine, PipelineState};

/// Re-exports rule canonicalization and selection.
pub use rules::{normalize, select, select_all, want, RuleKind, RuleRecord};

/// Re-exports the structural and textual rule types for advanced usage.
pub use sanitizers::compiler::{compile_text_rules, CompiledRule, CompiledTextRules};
pub use selection::{InvalidRegionConfiguration, Region};
pub use transforms::{DomTransform, TransformKind};

/// Re-exports the one-shot entry points.
pub use headless::{sanitize, sanitize_bytes};
