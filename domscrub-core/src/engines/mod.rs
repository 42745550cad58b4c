// domscrub-core/src/engines/mod.rs
//! Sanitization engine implementations.
//!
//! Each engine lives in its own file and implements the `SanitizationEngine`
//! trait. `HtmlEngine` is the tree-based rule pipeline.
//!
//! License: MIT OR APACHE 2.0

pub mod html_engine;
