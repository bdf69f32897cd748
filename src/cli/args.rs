//! CLI argument definitions using clap
//!
//! Commands:
//! - planlens annotate [--config <path>] [--input <path>] [--output <path>]
//! - planlens inspect [--input <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// planlens - readable, source-correlated explain reports
#[derive(Parser, Debug)]
#[command(name = "planlens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Annotate one explain request and emit the framed report
    Annotate {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read the request from a file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,

        /// Write the framed message to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Decode a framed analyzed-explain message
    Inspect {
        /// Read the message from a file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
