//! Adaptive prefix-keyed index that disambiguates files one insertion
//! at a time.
//!
//! # Overview
//!
//! The index maps indicator prefixes to their state: a prefix is either
//! provisionally owned by a single file, or *spilled* because at least
//! two files reached it, in which case deeper prefixes are
//! authoritative. Inserting a file walks its prefixes from depth 1
//! downward; on a collision with a provisional owner, both files are
//! pushed one level deeper, so hashing cost grows only where content
//! actually agrees. A file whose indicator sequence runs out lands in a
//! terminal bucket keyed by its complete tuple, which by construction
//! ends in the full-content hash - two paths can share a bucket only if
//! their entire content hashes match.
//!
//! Most files diverge at the size or the first block hash, so the
//! common case costs a constant amount of work per insertion; only
//! files sharing long identical prefixes pay for deeper blocks, bounded
//! by the file length.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::duplicates::candidate::CandidateFile;
use crate::duplicates::indicator::Indicator;
use crate::duplicates::RunContext;
use crate::scanner::HashError;

/// State of one provisional prefix entry.
#[derive(Debug)]
enum Slot {
    /// Exactly one file has reached this prefix so far; it parks here
    /// until a collision displaces it deeper.
    Owned(CandidateFile),
    /// Two or more files reached this prefix; deeper prefixes decide.
    Spilled,
}

/// Prefix-keyed disambiguation structure.
///
/// Mutated only by [`insert`]; read once at finalization through
/// [`into_buckets`].
///
/// [`insert`]: DisambiguationIndex::insert
/// [`into_buckets`]: DisambiguationIndex::into_buckets
#[derive(Debug, Default)]
pub struct DisambiguationIndex {
    provisional: HashMap<Vec<Indicator>, Slot>,
    buckets: HashMap<Vec<Indicator>, Vec<PathBuf>>,
}

impl DisambiguationIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one file, deepening comparisons until it either uniquely
    /// owns a prefix or lands in a terminal bucket.
    ///
    /// Placement is iterative over an explicit work stack, so collision
    /// chains on pathologically similar files cannot overflow the call
    /// stack. Displacing a provisional owner pushes it back onto the
    /// stack to be re-examined one level deeper.
    ///
    /// I/O failures are file-scoped: a failed work item is dropped and
    /// returned in the error list while every other file's placement,
    /// including a displaced owner's, proceeds normally. A failed file
    /// leaves no bucket entry and no provisional entry behind.
    pub fn insert(&mut self, file: CandidateFile, ctx: &RunContext) -> Vec<HashError> {
        let mut errors = Vec::new();
        let mut stack = vec![(file, 1usize)];

        while let Some((mut file, depth)) = stack.pop() {
            let (prefix, exhausted) = match file.try_prefix(depth, ctx.progress()) {
                Ok(result) => result,
                Err(e) => {
                    errors.push(e);
                    continue;
                }
            };

            if exhausted {
                // The tuple ends in the full hash; this placement is
                // terminal.
                self.buckets.entry(prefix).or_default().push(file.into_path());
                ctx.progress().on_duplicate_found();
                continue;
            }

            match self.provisional.entry(prefix) {
                Entry::Vacant(slot) => {
                    slot.insert(Slot::Owned(file));
                }
                Entry::Occupied(mut slot) => {
                    match std::mem::replace(slot.get_mut(), Slot::Spilled) {
                        Slot::Owned(existing) => {
                            // The displaced owner is re-examined one
                            // level deeper, after the incoming file.
                            stack.push((existing, depth + 1));
                            stack.push((file, depth + 1));
                        }
                        Slot::Spilled => {
                            stack.push((file, depth + 1));
                        }
                    }
                }
            }
        }

        errors
    }

    /// Number of terminal buckets formed so far.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Consume the index, yielding each terminal bucket as its complete
    /// indicator tuple and the paths that reached it, in insertion
    /// order.
    #[must_use]
    pub fn into_buckets(self) -> HashMap<Vec<Indicator>, Vec<PathBuf>> {
        self.buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressSink;
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct EventCounter {
        bytes: AtomicU64,
        duplicates: AtomicU64,
    }

    impl ProgressSink for EventCounter {
        fn on_bytes_read(&self, bytes: u64) {
            self.bytes.fetch_add(bytes, Ordering::Relaxed);
        }
        fn on_duplicate_found(&self) {
            self.duplicates.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap().write_all(content).unwrap();
        path
    }

    fn insert_all(index: &mut DisambiguationIndex, paths: &[PathBuf], ctx: &RunContext) {
        for path in paths {
            let errors = index.insert(CandidateFile::new(path.clone()), ctx);
            assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        }
    }

    #[test]
    fn test_distinct_sizes_never_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a", b"x");
        let b = write_file(dir.path(), "b", b"xy");

        let counter = Arc::new(EventCounter::default());
        let ctx = RunContext::new(counter.clone());
        let mut index = DisambiguationIndex::new();
        insert_all(&mut index, &[a, b], &ctx);

        assert_eq!(index.bucket_count(), 0);
        // Distinct sizes are settled from metadata alone.
        assert_eq!(counter.bytes.load(Ordering::Relaxed), 0);
        assert_eq!(counter.duplicates.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_identical_files_share_one_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a", &[3u8; 6000]);
        let b = write_file(dir.path(), "b", &[3u8; 6000]);

        let counter = Arc::new(EventCounter::default());
        let ctx = RunContext::new(counter.clone());
        let mut index = DisambiguationIndex::new();
        insert_all(&mut index, &[a.clone(), b.clone()], &ctx);

        let buckets = index.into_buckets();
        assert_eq!(buckets.len(), 1);
        let (key, paths) = buckets.into_iter().next().unwrap();
        assert_eq!(paths, vec![a, b]);
        assert_eq!(key.first(), Some(&Indicator::Size(6000)));
        assert!(matches!(key.last(), Some(Indicator::FullHash(_))));
        // One append per path reaching the bucket.
        assert_eq!(counter.duplicates.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_same_size_different_content_stay_apart() {
        let dir = tempfile::tempdir().unwrap();
        let mut tail = vec![7u8; 16];
        let a = write_file(dir.path(), "a", &tail);
        tail[15] = 8;
        let b = write_file(dir.path(), "b", &tail);

        let ctx = RunContext::silent();
        let mut index = DisambiguationIndex::new();
        insert_all(&mut index, &[a, b], &ctx);

        assert_eq!(index.bucket_count(), 0);
    }

    #[test]
    fn test_shared_leading_block_forces_deep_comparison() {
        // Ten files sharing the first 4096 bytes but with distinct
        // tails: no duplicates, but every file must be compared past
        // the shared leading block before that can be concluded.
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for i in 0..10u8 {
            let mut content = vec![0u8; 5000];
            content[4999] = i;
            paths.push(write_file(dir.path(), &format!("f{i}"), &content));
        }

        let counter = Arc::new(EventCounter::default());
        let ctx = RunContext::new(counter.clone());
        let mut index = DisambiguationIndex::new();
        insert_all(&mut index, &paths, &ctx);

        assert_eq!(index.bucket_count(), 0);
        // Each file paid for block@0 and the 904-byte tail block at
        // 4096, where the contents finally diverge. Nothing was hashed
        // in full.
        assert_eq!(counter.bytes.load(Ordering::Relaxed), 10 * (4096 + 904));
    }

    #[test]
    fn test_unique_owner_pays_minimum_cost() {
        // Three files of distinct sizes plus one pair: the pair is
        // fully hashed, the singletons never read past their first
        // collision depth.
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a", &[1u8; 100]);
        let b = write_file(dir.path(), "b", &[1u8; 200]);
        let c = write_file(dir.path(), "c", &[1u8; 300]);
        let d1 = write_file(dir.path(), "d1", &[9u8; 400]);
        let d2 = write_file(dir.path(), "d2", &[9u8; 400]);

        let counter = Arc::new(EventCounter::default());
        let ctx = RunContext::new(counter.clone());
        let mut index = DisambiguationIndex::new();
        insert_all(&mut index, &[a, b, c, d1, d2], &ctx);

        assert_eq!(index.bucket_count(), 1);
        // Only the colliding pair is read: block@0 (400 bytes each)
        // plus the full hash (400 bytes each).
        assert_eq!(counter.bytes.load(Ordering::Relaxed), 2 * (400 + 400));
    }

    #[test]
    fn test_empty_files_group_together() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a", b"");
        let b = write_file(dir.path(), "b", b"");

        let ctx = RunContext::silent();
        let mut index = DisambiguationIndex::new();
        insert_all(&mut index, &[a.clone(), b.clone()], &ctx);

        let buckets = index.into_buckets();
        let (key, paths) = buckets.into_iter().next().unwrap();
        assert_eq!(paths, vec![a, b]);
        assert_eq!(
            key,
            vec![
                Indicator::Size(0),
                Indicator::FullHash(blake3::hash(b"").to_hex().to_string())
            ]
        );
    }

    #[test]
    fn test_failed_file_leaves_index_intact() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a", &[4u8; 512]);
        let b = write_file(dir.path(), "b", &[4u8; 512]);
        let ghost = dir.path().join("ghost");

        let ctx = RunContext::silent();
        let mut index = DisambiguationIndex::new();

        let errors = index.insert(CandidateFile::new(ghost.clone()), &ctx);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], HashError::NotFound(_)));

        insert_all(&mut index, &[a.clone(), b.clone()], &ctx);

        let buckets = index.into_buckets();
        assert_eq!(buckets.len(), 1);
        let paths = buckets.into_values().next().unwrap();
        assert_eq!(paths, vec![a, b]);
    }

    #[test]
    fn test_bucket_keys_always_end_in_full_hash() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for (i, content) in [&b"same"[..], b"same", b"also", b"also"].iter().enumerate() {
            paths.push(write_file(dir.path(), &format!("f{i}"), content));
        }

        let ctx = RunContext::silent();
        let mut index = DisambiguationIndex::new();
        insert_all(&mut index, &paths, &ctx);

        for key in index.into_buckets().keys() {
            assert!(matches!(key.last(), Some(Indicator::FullHash(_))));
        }
    }
}
