//! Caevo CLI library.
//!
//! Argument parsing, command execution and output formatting for the
//! `caevo` binary: relation vocabulary listing, closure and reduction of
//! link files, and batch runs of the sieve pipeline over document corpora.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, CliFormat, Command};
pub use config::load_pipeline_config;
pub use error::{CliError, Result};
pub use output::Formatter;
