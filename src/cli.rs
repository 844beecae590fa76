//! Command-line interface definitions.
//!
//! All CLI arguments are defined here using the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # Find duplicates under one or more directories
//! lazydup ~/Downloads ~/Documents
//!
//! # Read an explicit path list from stdin
//! find /data -name '*.iso' | lazydup --stdin
//!
//! # Machine-readable output for scripting
//! lazydup ~/Downloads --output json
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Duplicate file finder with lazy incremental hashing.
///
/// lazydup groups byte-identical files by comparing cheap content
/// indicators first (size, then sampled 4 KiB blocks) and hashing a
/// file in full only when everything cheaper already matches. The
/// resulting groups are exactly those an exhaustive full-content
/// comparison would produce.
#[derive(Debug, Parser)]
#[command(name = "lazydup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to search for duplicate files
    #[arg(value_name = "ROOT_DIR", required_unless_present = "stdin")]
    pub root_dirs: Vec<PathBuf>,

    /// Read newline-separated file paths from stdin instead of walking
    /// directories
    #[arg(short = 'i', long, conflicts_with = "root_dirs")]
    pub stdin: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the status line and all output except errors and results
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

/// Available output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Blank-line separated groups of paths
    Text,
    /// JSON report with groups and summary
    Json,
}
