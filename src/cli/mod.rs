//! CLI module for planlens
//!
//! Provides command-line interface for:
//! - annotate: one explain request in, one framed report out
//! - inspect: decode a framed report for reading

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    annotate, annotate_request, inspect, inspect_message, run, run_command, ExplainRequest,
};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_input, write_output, write_response};
