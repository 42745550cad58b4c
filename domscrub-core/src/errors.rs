//! errors.rs - Custom error types for the domscrub-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//! Configuration faults are kept as distinct variants so the caller can
//! report which rule is at fault.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `domscrub-core` library.
///
/// Marked `#[non_exhaustive]` so new variants can be added without breaking
/// downstream matches.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DomScrubError {
    /// More than one applicable rule was found for a kind that allows a single winner.
    #[error("too many matching rules of type {kind}")]
    ConfigurationAmbiguity { kind: String },

    #[error("Unknown dom_transform kind '{0}'")]
    UnknownTransformKind(String),

    #[error("Invalid {kind} rule: {reason}")]
    InvalidRule { kind: String, reason: String },

    #[error("Failed to compile pattern '{0}': {1}")]
    RuleCompilationError(String, regex::Error),

    #[error("Pattern '{0}': length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Invalid CSS selector: '{0}'")]
    InvalidSelector(String),

    #[error("Failed to serialize document: {0}")]
    Serialization(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yml::Error),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),
}

impl DomScrubError {
    pub(crate) fn invalid_rule(kind: &str, reason: impl Into<String>) -> Self {
        DomScrubError::InvalidRule {
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the engine.
pub type Result<T, E = DomScrubError> = std::result::Result<T, E>;
