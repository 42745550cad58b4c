// domscrub-core/src/engine.rs
//! Defines the core SanitizationEngine trait.
//!
//! The trait is the seam between callers (the CLI, headless helpers, tests)
//! and a concrete pipeline. An engine owns its configuration and can be reused
//! for any number of runs; everything that varies per run travels in
//! [`RunOptions`].
//!
//! License: MIT OR APACHE 2.0

use crate::config::{RunOptions, SanitizeConfig};
use crate::errors::Result;

/// A trait that defines the core functionality of a sanitization engine.
pub trait SanitizationEngine: Send + Sync {
    /// Sanitizes one HTML document.
    ///
    /// Returns the canonical string form, or a named configuration error if
    /// the rules that apply to this run cannot be resolved. Empty input yields
    /// empty output.
    ///
    /// # Arguments
    /// * `html` - The raw markup.
    /// * `options` - The document path and requested region ordering for this run.
    fn sanitize(&self, html: &str, options: &RunOptions) -> Result<String>;

    /// Returns a reference to the engine's configuration.
    fn config(&self) -> &SanitizeConfig;
}
