//! Run orchestration and duplicate group construction.
//!
//! # Overview
//!
//! [`DuplicateFinder`] drives one run: each supplied path becomes a
//! [`CandidateFile`] inserted into a shared [`DisambiguationIndex`];
//! once the path supply is exhausted, terminal buckets with at least
//! two paths are turned into sorted, deterministic [`DuplicateGroup`]s.
//!
//! # Example
//!
//! ```no_run
//! use lazydup::duplicates::DuplicateFinder;
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let paths = vec![PathBuf::from("/data/a"), PathBuf::from("/data/b")];
//! let (groups, summary) = finder.find_duplicates(paths);
//!
//! for group in &groups {
//!     println!("{} files of {} bytes", group.paths.len(), group.size);
//! }
//! println!("{} files processed", summary.total_files);
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::duplicates::candidate::CandidateFile;
use crate::duplicates::index::DisambiguationIndex;
use crate::duplicates::indicator::Indicator;
use crate::duplicates::RunContext;
use crate::progress::ProgressSink;
use crate::scanner::HashError;

/// A group of byte-identical files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Paths of all files in the group, sorted.
    pub paths: Vec<PathBuf>,
    /// Size shared by every file in the group, in bytes.
    pub size: u64,
    /// Lowercase hex digest of the shared content.
    pub hash: String,
}

impl DuplicateGroup {
    /// Space reclaimable by keeping a single copy.
    #[must_use]
    pub fn reclaimable_space(&self) -> u64 {
        self.size * (self.paths.len() as u64 - 1)
    }
}

/// Statistics and per-file failures from one run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Number of input paths attempted.
    pub total_files: usize,
    /// Number of duplicate groups found.
    pub duplicate_groups: usize,
    /// Number of redundant copies across all groups (originals not
    /// counted).
    pub duplicate_files: usize,
    /// Bytes reclaimable by keeping one copy per group.
    pub reclaimable_space: u64,
    /// File-scoped failures; each excluded exactly one file from
    /// grouping.
    pub errors: Vec<HashError>,
}

impl RunSummary {
    /// Whether the run completed without per-file failures.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Duplicate finder for one run over a set of paths.
pub struct DuplicateFinder {
    ctx: RunContext,
}

impl DuplicateFinder {
    /// Create a finder reporting progress to the given sink.
    #[must_use]
    pub fn new(progress: Arc<dyn ProgressSink>) -> Self {
        Self {
            ctx: RunContext::new(progress),
        }
    }

    /// Create a finder that discards progress events.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            ctx: RunContext::silent(),
        }
    }

    /// Find groups of byte-identical files among the supplied paths.
    ///
    /// The supplier is expected to yield already-deduplicated paths to
    /// regular files; order is irrelevant to the result. Unreadable
    /// files are excluded from grouping and reported in the summary,
    /// never aborting the run.
    ///
    /// Groups are deterministic: paths within a group are sorted and
    /// groups are ordered lexicographically by their path lists.
    pub fn find_duplicates(
        &self,
        paths: impl IntoIterator<Item = PathBuf>,
    ) -> (Vec<DuplicateGroup>, RunSummary) {
        let mut index = DisambiguationIndex::new();
        let mut summary = RunSummary::default();

        for path in paths {
            let errors = index.insert(CandidateFile::new(path), &self.ctx);
            summary.errors.extend(errors);
            summary.total_files += 1;
            self.ctx.progress().on_file_processed();
        }

        let groups = build_groups(index);

        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(|g| g.paths.len() - 1).sum();
        summary.reclaimable_space = groups.iter().map(DuplicateGroup::reclaimable_space).sum();

        log::info!("{} groups of identical files have been found.", groups.len());

        (groups, summary)
    }
}

/// Convert terminal buckets into final output groups.
///
/// Buckets holding a single path are files that matched another file on
/// every sampled block but diverged at the full hash; they are not
/// duplicates and are discarded here.
fn build_groups(index: DisambiguationIndex) -> Vec<DuplicateGroup> {
    let mut groups: Vec<DuplicateGroup> = index
        .into_buckets()
        .into_iter()
        .filter(|(_, paths)| paths.len() >= 2)
        .map(|(key, mut paths)| {
            // Bucket keys are complete indicator tuples: the first
            // element is always the size, the last the full hash.
            let size = match key.first() {
                Some(Indicator::Size(size)) => *size,
                _ => unreachable!("bucket key must start with a size indicator"),
            };
            let hash = match key.last() {
                Some(Indicator::FullHash(digest)) => digest.clone(),
                _ => unreachable!("bucket key must end with a full hash"),
            };

            paths.sort();
            DuplicateGroup { paths, size, hash }
        })
        .collect();

    groups.sort_by(|a, b| a.paths.cmp(&b.paths));
    groups
}
