//! Regular-file enumeration and path-list input.
//!
//! # Overview
//!
//! [`iter_regular_files`] walks a directory tree and yields every
//! regular file, never following or yielding symlinks. [`read_paths`]
//! reads a newline-separated path list from an input stream, for runs
//! driven by `--stdin`.
//!
//! Both are path *suppliers* only: the content of each path is read
//! later by the hasher, not here. Enumeration errors are yielded inline
//! as [`ScanError`] so a single unreadable subdirectory does not abort
//! the walk.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::scanner::ScanError;

/// Iterate over all regular files under `root`.
///
/// Symlinks are neither followed nor yielded, so each file's content is
/// visited at most once per root. Directory entries that cannot be read
/// are reported as `Err` items and the walk continues.
///
/// # Example
///
/// ```no_run
/// use lazydup::scanner::iter_regular_files;
/// use std::path::Path;
///
/// for entry in iter_regular_files(Path::new(".")) {
///     match entry {
///         Ok(path) => println!("{}", path.display()),
///         Err(e) => eprintln!("Warning: {}", e),
///     }
/// }
/// ```
pub fn iter_regular_files(root: &Path) -> impl Iterator<Item = Result<PathBuf, ScanError>> {
    let root = root.to_path_buf();
    WalkDir::new(&root)
        .follow_links(false)
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                // With follow_links disabled, file_type() describes the
                // symlink itself, so symlinks to files are excluded here.
                if entry.file_type().is_file() {
                    Some(Ok(entry.into_path()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(map_walk_error(&root, e))),
        })
}

/// Read a newline-separated list of paths from a stream.
///
/// Empty lines are skipped. A trailing newline on the final entry is
/// handled like any other line terminator.
///
/// # Errors
///
/// Returns the underlying I/O error if the stream cannot be read.
pub fn read_paths(reader: impl BufRead) -> std::io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if !line.is_empty() {
            paths.push(PathBuf::from(line));
        }
    }

    Ok(paths)
}

fn map_walk_error(root: &Path, e: walkdir::Error) -> ScanError {
    let path = e
        .path()
        .map_or_else(|| root.to_path_buf(), Path::to_path_buf);

    match e.io_error().map(std::io::Error::kind) {
        Some(std::io::ErrorKind::NotFound) => ScanError::NotFound(path),
        Some(std::io::ErrorKind::PermissionDenied) => ScanError::PermissionDenied(path),
        _ => ScanError::Io {
            path,
            source: e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
        },
    }
}
