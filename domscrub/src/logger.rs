// domscrub/src/logger.rs
//! Logging setup for the `domscrub` binary.
//!
//! License: MIT OR APACHE 2.0

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes `env_logger` once for the process.
///
/// An explicit `level` overrides `RUST_LOG`; otherwise `RUST_LOG` applies,
/// defaulting to `warn`. Calling this a second time is a no-op.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).format_target(false);
    let _ = builder.try_init();
}
