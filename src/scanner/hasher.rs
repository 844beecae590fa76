//! BLAKE3 region hashing with streaming progress.
//!
//! # Overview
//!
//! [`hash_region`] streams a byte range of a file through a BLAKE3
//! hasher in fixed-size chunks. It is the only place the crate reads
//! file content, and every chunk read is reported to the progress sink,
//! making the sink's byte counter an exact account of I/O spent.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::progress::ProgressSink;
use crate::scanner::HashError;

/// Size of the content blocks sampled by the indicator sequence.
pub const BLOCK_SIZE: u64 = 4096;

/// Chunk size used when streaming file content through the hasher.
pub const READ_CHUNK_SIZE: usize = 16 * 1024;

/// Files at least this large get an advisory log line before being
/// hashed in full.
pub const FULL_HASH_LOG_THRESHOLD: u64 = 16 * 1024 * 1024;

/// Hash up to `len` bytes of `path` starting at `offset`.
///
/// The file is opened, seeked, streamed, and closed within this call;
/// no handle outlives it. If the file is shorter than `offset + len`,
/// the stream simply stops at EOF without an error, so callers may ask
/// for a full block at the tail of a file. Each chunk read is reported
/// via [`ProgressSink::on_bytes_read`].
///
/// Returns the lowercase hex digest of the bytes actually read.
///
/// # Errors
///
/// Returns a file-scoped [`HashError`] if the file cannot be opened,
/// seeked, or read.
pub fn hash_region(
    path: &Path,
    offset: u64,
    len: u64,
    progress: &dyn ProgressSink,
) -> Result<String, HashError> {
    let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
    file.seek(SeekFrom::Start(offset))
        .map_err(|e| HashError::from_io(path, e))?;

    let mut hasher = blake3::Hasher::new();
    let mut remaining = len;
    let mut buf = vec![0u8; READ_CHUNK_SIZE];

    while remaining > 0 {
        let want = remaining.min(READ_CHUNK_SIZE as u64) as usize;
        let read = file
            .read(&mut buf[..want])
            .map_err(|e| HashError::from_io(path, e))?;

        if read == 0 {
            break;
        }

        hasher.update(&buf[..read]);
        remaining -= read as u64;
        progress.on_bytes_read(read as u64);
    }

    Ok(hasher.finalize().to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullSink;
    use std::io::Write;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct ByteCounter(AtomicU64);

    impl ProgressSink for ByteCounter {
        fn on_bytes_read(&self, bytes: u64) {
            self.0.fetch_add(bytes, Ordering::Relaxed);
        }
    }

    fn write_temp(content: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        File::create(&path).unwrap().write_all(content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_hash_region_is_deterministic() {
        let (_dir, path) = write_temp(b"hello world");

        let a = hash_region(&path, 0, 11, &NullSink).unwrap();
        let b = hash_region(&path, 0, 11, &NullSink).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_eq!(a, a.to_lowercase());
    }

    #[test]
    fn test_hash_region_matches_reference_digest() {
        let (_dir, path) = write_temp(b"hello world");

        let digest = hash_region(&path, 0, 11, &NullSink).unwrap();
        assert_eq!(digest, blake3::hash(b"hello world").to_hex().to_string());
    }

    #[test]
    fn test_hash_region_respects_offset() {
        let (_dir, path) = write_temp(b"hello world");

        let digest = hash_region(&path, 6, 5, &NullSink).unwrap();
        assert_eq!(digest, blake3::hash(b"world").to_hex().to_string());
    }

    #[test]
    fn test_hash_region_stops_silently_at_eof() {
        let (_dir, path) = write_temp(b"short");

        // Asking for far more than the file holds hashes just the tail.
        let digest = hash_region(&path, 2, BLOCK_SIZE, &NullSink).unwrap();
        assert_eq!(digest, blake3::hash(b"ort").to_hex().to_string());

        // Offset past EOF hashes zero bytes.
        let digest = hash_region(&path, 100, BLOCK_SIZE, &NullSink).unwrap();
        assert_eq!(digest, blake3::hash(b"").to_hex().to_string());
    }

    #[test]
    fn test_hash_region_reports_every_byte() {
        let content = vec![0xabu8; READ_CHUNK_SIZE * 2 + 100];
        let (_dir, path) = write_temp(&content);

        let counter = ByteCounter(AtomicU64::new(0));
        hash_region(&path, 0, content.len() as u64, &counter).unwrap();
        assert_eq!(counter.0.load(Ordering::Relaxed), content.len() as u64);
    }

    #[test]
    fn test_hash_region_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bin");

        let err = hash_region(&path, 0, 16, &NullSink).unwrap_err();
        assert!(matches!(err, HashError::NotFound(_)));
    }
}
