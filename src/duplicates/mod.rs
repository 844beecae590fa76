//! Incremental duplicate detection.
//!
//! # Overview
//!
//! Files are told apart by a lazily computed sequence of *indicators*:
//! cheap facts first (size), then hashes of sampled content blocks at
//! exponentially spaced offsets, and finally a hash of the whole file.
//! The [`index::DisambiguationIndex`] inserts one file at a time,
//! deepening the comparison only where files actually collide, so most
//! files are settled after the size or the first block hash while true
//! duplicates are proven equal at the full hash.
//!
//! The grouping is exactly what exhaustive full-content comparison
//! would produce: paths share a group only when their complete
//! indicator tuples, full hash included, are equal.

pub mod candidate;
pub mod finder;
pub mod index;
pub mod indicator;

use std::sync::Arc;

use crate::progress::{NullSink, ProgressSink};

pub use candidate::CandidateFile;
pub use finder::{DuplicateFinder, DuplicateGroup, RunSummary};
pub use index::DisambiguationIndex;
pub use indicator::{Indicator, IndicatorSource};

/// Run-scoped context threaded through the index and the hasher.
///
/// Holds the progress sink for the run; counters live behind the sink,
/// not in ambient state.
#[derive(Clone)]
pub struct RunContext {
    progress: Arc<dyn ProgressSink>,
}

impl RunContext {
    /// Create a context reporting to the given sink.
    #[must_use]
    pub fn new(progress: Arc<dyn ProgressSink>) -> Self {
        Self { progress }
    }

    /// Create a context that discards all progress events.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            progress: Arc::new(NullSink),
        }
    }

    /// The progress sink for this run.
    #[must_use]
    pub fn progress(&self) -> &dyn ProgressSink {
        self.progress.as_ref()
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("progress", &"<sink>")
            .finish()
    }
}
