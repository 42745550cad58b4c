// domscrub/src/lib.rs
//! # DomScrub CLI Application
//!
//! This crate provides the command-line front end for `domscrub-core`: it
//! loads a YAML rule set, reads one HTML document from a file or stdin and
//! writes its canonical form.

pub mod cli;
pub mod commands;
pub mod logger;

pub use commands::scrub::{load_engine, run_scrub, ScrubOptions};
