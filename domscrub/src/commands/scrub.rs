// domscrub/src/commands/scrub.rs
//! The scrub command: load rules, read one document, sanitize it, write it out.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use domscrub_core::encoding::repair_bytes;
use domscrub_core::{HtmlEngine, RunOptions, SanitizationEngine, SanitizeConfig};

/// Options for one scrub run.
#[derive(Debug, Clone, Default)]
pub struct ScrubOptions {
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub run: RunOptions,
}

/// Builds a validated engine from the configuration file.
pub fn load_engine(config_path: &Path) -> Result<HtmlEngine> {
    let config = SanitizeConfig::load_from_file(config_path)?;
    HtmlEngine::validated(config)
        .with_context(|| format!("Invalid rule in config file {}", config_path.display()))
}

fn read_input(input_path: Option<&PathBuf>) -> Result<String> {
    let mut bytes = Vec::new();
    match input_path {
        Some(path) => {
            info!("Reading input from file: {}", path.display());
            bytes = fs::read(path)
                .with_context(|| format!("Failed to read input file {}", path.display()))?;
        }
        None => {
            info!("Reading input from stdin.");
            io::stdin()
                .read_to_end(&mut bytes)
                .context("Failed to read input from stdin")?;
        }
    }
    Ok(repair_bytes(&bytes))
}

fn write_output(output_path: Option<&PathBuf>, content: &str) -> Result<()> {
    match output_path {
        Some(path) => {
            info!("Writing sanitized content to file: {}", path.display());
            let mut file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            writeln!(file, "{}", content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            writeln!(writer, "{}", content)?;
        }
    }
    Ok(())
}

/// Runs the engine once over the configured input.
pub fn run_scrub(engine: &dyn SanitizationEngine, opts: &ScrubOptions) -> Result<()> {
    let input = read_input(opts.input_path.as_ref())?;
    let sanitized = engine
        .sanitize(&input, &opts.run)
        .context("Sanitization failed")?;
    debug!(
        "Content sanitized. Original length: {}, Sanitized length: {}",
        input.len(),
        sanitized.len()
    );
    write_output(opts.output_path.as_ref(), &sanitized)
}
