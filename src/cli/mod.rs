//! Command line interface module
//!
//! Argument parsing for every registry operation and the runner that executes
//! the parsed command and prints its result.

pub mod args;
pub mod runner;

pub use args::{Args, Command};
pub use runner::Runner;
