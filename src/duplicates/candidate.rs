//! A file under disambiguation, with its memoized indicator prefix.

use std::path::{Path, PathBuf};

use crate::duplicates::indicator::{Indicator, IndicatorSource};
use crate::progress::ProgressSink;
use crate::scanner::HashError;

/// Wraps a path and its [`IndicatorSource`], caching every indicator
/// computed so far.
///
/// The cache is append-only: an indicator is computed at most once for
/// the life of the candidate, and successive [`try_prefix`] calls with
/// growing depths always agree on the shared prefix.
///
/// [`try_prefix`]: CandidateFile::try_prefix
#[derive(Debug)]
pub struct CandidateFile {
    source: IndicatorSource,
    cached: Vec<Indicator>,
}

impl CandidateFile {
    /// Create a candidate for the given path. No I/O happens here.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            source: IndicatorSource::new(path),
            cached: Vec::new(),
        }
    }

    /// The path this candidate wraps.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.source.path()
    }

    /// Consume the candidate, keeping only its path.
    #[must_use]
    pub fn into_path(self) -> PathBuf {
        self.source.into_path()
    }

    /// Number of indicators computed so far.
    #[must_use]
    pub fn depth_reached(&self) -> usize {
        self.cached.len()
    }

    /// Return the first `depth` indicators, computing only the ones not
    /// yet cached.
    ///
    /// The returned flag is `true` iff the source ran out before
    /// reaching `depth`; the prefix then contains fewer than `depth`
    /// indicators and already ends in `FullHash`, meaning this file's
    /// identity is fully determined.
    ///
    /// # Errors
    ///
    /// Returns a file-scoped [`HashError`] if an indicator cannot be
    /// computed. Previously cached indicators remain valid.
    pub fn try_prefix(
        &mut self,
        depth: usize,
        progress: &dyn ProgressSink,
    ) -> Result<(Vec<Indicator>, bool), HashError> {
        while self.cached.len() < depth {
            match self.source.next_indicator(progress)? {
                Some(indicator) => self.cached.push(indicator),
                None => break,
            }
        }

        let available = self.cached.len().min(depth);
        Ok((self.cached[..available].to_vec(), available < depth))
    }
}
