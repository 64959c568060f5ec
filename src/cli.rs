//! Command-line interface definitions for dirtrack.
//!
//! This module contains all CLI argument parsing structures using clap's
//! derive macros. The definitions are shared between the main binary and
//! build tools (like xtask) for man page generation.
//!
//! Note: Field-level documentation is provided via clap attributes, so we
//! allow missing_docs for this module to avoid redundant documentation.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Main CLI structure for dirtrack.
#[derive(Parser)]
#[command(
    name = "dtr",
    version = crate::VERSION,
    about = "Track recently modified directories",
    long_about = "Periodically scans configured roots and reports directories \
                  containing files modified since the last successful scan"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Execute a scan pass (no-op inside the run interval unless forced)
    Run {
        /// Scan immediately, bypassing the run interval
        #[arg(short, long)]
        force: bool,
    },

    /// Show last run time and tracking counts
    Status,

    /// Print the accumulated modified-directories log
    Report {
        /// Print joined paths only, one per line
        #[arg(short, long)]
        paths_only: bool,
    },

    /// Get and set configuration options
    Config {
        /// Configuration key (section.key)
        key: Option<String>,

        /// Configuration value to set
        value: Option<String>,

        /// List all configuration values
        #[arg(short, long)]
        list: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
