//! Lazily computed identity indicators for a single file.
//!
//! # Overview
//!
//! An [`IndicatorSource`] yields a finite, strictly ordered sequence of
//! increasingly expensive facts about one file's content:
//!
//! 1. `Size` - the byte count, from metadata alone
//! 2. `Block` - the hash of the 4 KiB region at offset `((2^i)-1) * 4096`
//!    for `i = 0, 1, 2, ...` while the offset is inside the file
//! 3. `FullHash` - the hash of the entire content, always last
//!
//! Nothing is computed until pulled, so a file that diverges from all
//! others at the size or the first block never pays for deeper reads.
//! Every indicator is a pure function of the file's content, which is
//! what makes the sequence safe as a comparison key: equal content
//! always produces equal indicators at every position.

use std::path::{Path, PathBuf};

use bytesize::ByteSize;

use crate::progress::ProgressSink;
use crate::scanner::hasher::{hash_region, BLOCK_SIZE, FULL_HASH_LOG_THRESHOLD};
use crate::scanner::HashError;

/// One (kind, value) fact about a file's content.
///
/// Indicators of the same position in two files' sequences are directly
/// comparable; files of equal size produce identical kind sequences.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Indicator {
    /// File size in bytes.
    Size(u64),
    /// Hex digest of the 4 KiB block at `offset` (truncated at EOF).
    Block {
        /// Byte offset of the sampled block.
        offset: u64,
        /// Lowercase hex digest of the block.
        digest: String,
    },
    /// Hex digest of the entire file content.
    FullHash(String),
}

/// Pull-based generator of a file's indicator sequence.
#[derive(Debug)]
pub struct IndicatorSource {
    path: PathBuf,
    state: State,
}

#[derive(Debug)]
enum State {
    /// Size not yet read from metadata.
    Start,
    /// Emitting block hashes; `index` is the next exponent `i`.
    Blocks { size: u64, index: u32 },
    /// Block offsets ran past EOF; the full hash is next.
    Full { size: u64 },
    /// Sequence exhausted.
    Done,
}

impl IndicatorSource {
    /// Create a source for the given path. No I/O happens here.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: State::Start,
        }
    }

    /// The path this source reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consume the source, keeping only its path.
    #[must_use]
    pub fn into_path(self) -> PathBuf {
        self.path
    }

    /// Advance the generator by one indicator.
    ///
    /// Returns `Ok(None)` once the sequence is exhausted, which happens
    /// exactly one step after `FullHash` was yielded. Bytes read while
    /// hashing are reported through `progress`.
    ///
    /// # Errors
    ///
    /// Returns a file-scoped [`HashError`] if metadata or content
    /// cannot be read. The source is not usable for further indicators
    /// after an error.
    pub fn next_indicator(
        &mut self,
        progress: &dyn ProgressSink,
    ) -> Result<Option<Indicator>, HashError> {
        match self.state {
            State::Start => {
                let size = std::fs::metadata(&self.path)
                    .map_err(|e| HashError::from_io(&self.path, e))?
                    .len();
                self.state = State::Blocks { size, index: 0 };
                Ok(Some(Indicator::Size(size)))
            }
            State::Blocks { size, index } => {
                let offset = ((1u64 << index) - 1) * BLOCK_SIZE;
                if offset >= size {
                    self.state = State::Full { size };
                    return self.next_indicator(progress);
                }

                self.state = State::Blocks {
                    size,
                    index: index + 1,
                };
                let digest = hash_region(&self.path, offset, BLOCK_SIZE, progress)?;
                Ok(Some(Indicator::Block { offset, digest }))
            }
            State::Full { size } => {
                if size >= FULL_HASH_LOG_THRESHOLD {
                    log::info!(
                        "Fully hashing {} ({}) ...",
                        self.path.display(),
                        ByteSize::b(size)
                    );
                }

                self.state = State::Done;
                let digest = hash_region(&self.path, 0, size, progress)?;
                Ok(Some(Indicator::FullHash(digest)))
            }
            State::Done => Ok(None),
        }
    }
}
