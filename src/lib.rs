//! lazydup - duplicate file finder with lazy incremental hashing.
//!
//! Finds groups of byte-identical files by comparing cheap content
//! indicators first (size, then sampled 4 KiB blocks at exponentially
//! spaced offsets) and hashing a file in full only when everything
//! cheaper already matches. Grouping is guaranteed to equal what
//! exhaustive full-content comparison would produce.

pub mod cli;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use crate::cli::{Cli, OutputFormat};
use crate::duplicates::{DuplicateFinder, DuplicateGroup, RunSummary};
use crate::error::ExitCode;
use crate::progress::StatusLine;

/// Run the application with parsed CLI arguments.
///
/// Returns the exit code for a completed run; fatal setup failures
/// (unreadable stdin, unwritable stdout) surface as errors.
///
/// # Errors
///
/// Returns an error if the path list cannot be read or results cannot
/// be written. Per-file failures during the run are not fatal; they are
/// reported and reflected in the exit code instead.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let (paths, walk_failures) = collect_paths(&cli)?;
    log::debug!("{} unique paths to examine", paths.len());

    let status = Arc::new(StatusLine::new(cli.quiet));
    let finder = DuplicateFinder::new(status.clone());
    let (groups, summary) = finder.find_duplicates(paths);
    status.clear();

    for error in &summary.errors {
        log::warn!("Skipped: {}", error);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.output {
        OutputFormat::Text => {
            output::write_text(&mut out, &groups).context("Failed to write results")?;
        }
        OutputFormat::Json => {
            output::write_json(&mut out, &groups, &summary)
                .context("Failed to write results")?;
        }
    }
    out.flush().context("Failed to write results")?;

    Ok(decide_exit_code(walk_failures, &summary, &groups))
}

/// Map the outcome of a completed run to an exit code.
///
/// Files skipped during enumeration count as non-fatal failures just
/// like files that turned unreadable mid-run: either makes the result
/// a partial success, even when groups were found.
fn decide_exit_code(
    walk_failures: usize,
    summary: &RunSummary,
    groups: &[DuplicateGroup],
) -> ExitCode {
    if walk_failures > 0 || !summary.is_clean() {
        ExitCode::PartialSuccess
    } else if groups.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    }
}

/// Gather the input path set: either a list from stdin or all regular
/// files under the root directories.
///
/// Paths are deduplicated and sorted. Enumeration errors are logged
/// and skipped so one unreadable subtree does not abort the run, but
/// their count is returned so the exit code can reflect an incomplete
/// result.
fn collect_paths(cli: &Cli) -> anyhow::Result<(Vec<PathBuf>, usize)> {
    let mut paths = BTreeSet::new();
    let mut walk_failures = 0;

    if cli.stdin {
        let stdin = std::io::stdin();
        let listed = scanner::read_paths(stdin.lock())
            .context("Failed to read path list from stdin")?;
        paths.extend(listed);
    } else {
        for root in &cli.root_dirs {
            for entry in scanner::iter_regular_files(root) {
                match entry {
                    Ok(path) => {
                        paths.insert(path);
                    }
                    Err(e) => {
                        walk_failures += 1;
                        log::warn!("Skipped during walk: {}", e);
                    }
                }
            }
        }
    }

    Ok((paths.into_iter().collect(), walk_failures))
}
