// domscrub/src/main.rs
//! DomScrub entry point.
//!
//! Parses arguments, sets up logging, builds the engine and runs it once.

use anyhow::Result;
use clap::Parser;
use log::debug;

use domscrub::cli::Cli;
use domscrub::logger;
use domscrub::{load_engine, run_scrub, ScrubOptions};
use domscrub_core::RunOptions;

fn main() -> Result<()> {
    let args = Cli::parse();
    logger::init_logger(args.log_level());
    debug!("Parsed arguments: {:?}", args);

    let engine = load_engine(&args.config)?;

    let mut run = RunOptions::default();
    if let Some(path) = args.path {
        run = run.with_path(path);
    }
    if !args.regions.is_empty() {
        run = run.with_output(args.regions);
    }

    let opts = ScrubOptions {
        input_path: args.input,
        output_path: args.output_file,
        run,
    };
    run_scrub(&engine, &opts)
}
