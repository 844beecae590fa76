//! Progress reporting for the duplicate finding run.
//!
//! The core reports three kinds of events through the [`ProgressSink`]
//! trait: a file reaching its terminal placement, bytes streamed through
//! the hasher, and a path being appended to a duplicate bucket. The
//! [`StatusLine`] implementation renders these as a single live line on
//! stderr using indicatif; [`NullSink`] discards them for library use
//! and tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use bytesize::ByteSize;
use indicatif::{ProgressBar, ProgressStyle};

/// Sink for progress events fired during a duplicate finding run.
///
/// Implementations must be non-blocking and must not panic; every hook
/// has an empty default so a sink may observe only the events it cares
/// about.
pub trait ProgressSink: Send + Sync {
    /// Called once per input path, when the file reaches its terminal
    /// placement in the index (owned prefix, bucket membership, or a
    /// file-scoped error).
    fn on_file_processed(&self) {}

    /// Called for every chunk of file content streamed through the
    /// hasher. This is the sole source of "bytes read" telemetry.
    fn on_bytes_read(&self, _bytes: u64) {}

    /// Called once per path appended to a duplicate bucket, at append
    /// time. This includes the first path of a newly formed bucket, so
    /// the count is per-append, not per completed group.
    fn on_duplicate_found(&self) {}
}

/// Sink that ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {}

/// Single-line terminal status display.
///
/// Renders `"{files} files, {bytes} read, {duplicates} duplicates ..."`
/// on stderr, redrawing as events arrive. indicatif throttles redraws
/// internally and hides the line entirely when stderr is not a terminal,
/// so log output to non-tty destinations stays clean.
pub struct StatusLine {
    bar: ProgressBar,
    files: AtomicU64,
    bytes: AtomicU64,
    duplicates: AtomicU64,
}

impl StatusLine {
    /// Create a new status line.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, the line is never drawn.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(200));
            bar
        };

        Self {
            bar,
            files: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            duplicates: AtomicU64::new(0),
        }
    }

    /// Remove the status line from the terminal.
    ///
    /// Call before printing final results so the groups are not
    /// interleaved with a stale spinner.
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }

    fn redraw(&self) {
        let files = self.files.load(Ordering::Relaxed);
        let bytes = self.bytes.load(Ordering::Relaxed);
        let duplicates = self.duplicates.load(Ordering::Relaxed);
        self.bar.set_message(format!(
            "{} files, {} read, {} duplicates ...",
            files,
            ByteSize::b(bytes),
            duplicates
        ));
    }
}

impl ProgressSink for StatusLine {
    fn on_file_processed(&self) {
        self.files.fetch_add(1, Ordering::Relaxed);
        self.redraw();
    }

    fn on_bytes_read(&self, bytes: u64) {
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
        self.redraw();
    }

    fn on_duplicate_found(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
        self.redraw();
    }
}
