//! Diagnostic logging for the command line tool
//!
//! The library emits `tracing` events (one debug span per call, warnings for
//! service errors). This module installs the subscriber that prints them.
//! Logs go to stderr so command output on stdout stays machine readable.

use crate::error::{ClientError, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const CRATE_TARGET: &str = "ecr_client";

/// Filter used when `RUST_LOG` is not set
pub fn default_directives(verbose: bool, quiet: bool) -> String {
    if quiet {
        "error".to_string()
    } else if verbose {
        format!("{}=debug,warn", CRATE_TARGET)
    } else {
        "warn".to_string()
    }
}

pub fn init_logger(verbose: bool, quiet: bool, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose, quiet)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry.with(fmt_layer.json()).try_init()
    } else {
        registry.with(fmt_layer.compact()).try_init()
    };

    result.map_err(|e| ClientError::Config(format!("Failed to initialize logging: {}", e)))
}
