// domscrub/src/cli.rs
//! This file defines the command-line interface (CLI) for the domscrub application.
//! License: MIT OR APACHE 2.0

use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "domscrub",
    author = "Obscura Team (Relay)",
    version = env!("CARGO_PKG_VERSION"),
    about = "Normalize HTML snapshots into a canonical, diff-friendly form",
    long_about = "DomScrub rewrites an HTML document according to a YAML rule set: it selects the relevant part of the page, applies structural edits and regex substitutions, and pretty-prints the result so two snapshots of the same page can be diffed without noise."
)]
pub struct Cli {
    /// Path to the sanitization configuration file (YAML).
    #[arg(long, short = 'c', value_name = "FILE", env = "DOMSCRUB_CONFIG")]
    pub config: PathBuf,

    /// Read HTML from this file instead of stdin.
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write the result to this file instead of stdout.
    #[arg(long = "output-file", short = 'o', value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Document path (usually the page URL) matched against rule `path` patterns.
    #[arg(long, short = 'p', value_name = "PATH")]
    pub path: Option<String>,

    /// Region names to emit, in order (comma-separated).
    #[arg(long, short = 'r', value_delimiter = ',', value_name = "NAMES")]
    pub regions: Vec<String>,

    /// Suppress all log output.
    #[arg(long, short = 'q', conflicts_with = "debug")]
    pub quiet: bool,

    /// Enable debug logging, overriding RUST_LOG.
    #[arg(long, short = 'd')]
    pub debug: bool,
}

impl Cli {
    /// The log level forced by flags, if any.
    pub fn log_level(&self) -> Option<LevelFilter> {
        if self.quiet {
            Some(LevelFilter::Off)
        } else if self.debug {
            Some(LevelFilter::Debug)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_split_on_commas() {
        let cli = Cli::try_parse_from(["domscrub", "--config", "c.yaml", "--regions", "title,body,title"]).unwrap();
        assert_eq!(cli.regions, vec!["title", "body", "title"]);
        assert_eq!(cli.log_level(), None);
    }

    #[test]
    fn test_quiet_and_debug_conflict() {
        assert!(Cli::try_parse_from(["domscrub", "-c", "c.yaml", "-q", "-d"]).is_err());
        let cli = Cli::try_parse_from(["domscrub", "-c", "c.yaml", "-q"]).unwrap();
        assert_eq!(cli.log_level(), Some(LevelFilter::Off));
    }
}
