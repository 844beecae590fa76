//! JSON output formatter for duplicate finding results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "hash": "abc123...",
//!       "size": 1024,
//!       "files": ["/path/to/file1.txt", "/path/to/file2.txt"]
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 100,
//!     "duplicate_groups": 5,
//!     "duplicate_files": 10,
//!     "reclaimable_space": 51200,
//!     "errors": ["File not found: /gone.txt"]
//!   }
//! }
//! ```

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, RunSummary};

/// Top-level JSON report.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    duplicates: Vec<JsonGroup<'a>>,
    summary: JsonSummary,
}

/// A single duplicate group in JSON format.
#[derive(Debug, Serialize)]
struct JsonGroup<'a> {
    /// Lowercase hex digest of the shared content
    hash: &'a str,
    /// File size in bytes
    size: u64,
    /// Paths of all files in the group, sorted
    files: &'a [PathBuf],
}

impl<'a> JsonGroup<'a> {
    fn from_duplicate_group(group: &'a DuplicateGroup) -> Self {
        Self {
            hash: &group.hash,
            size: group.size,
            files: &group.paths,
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Serialize)]
struct JsonSummary {
    /// Total number of input paths
    total_files: usize,
    /// Number of confirmed duplicate groups
    duplicate_groups: usize,
    /// Total number of redundant copies (excluding originals)
    duplicate_files: usize,
    /// Space reclaimable by keeping one copy per group (bytes)
    reclaimable_space: u64,
    /// Rendered file-scoped errors, one per excluded file
    errors: Vec<String>,
}

impl JsonSummary {
    fn from_run_summary(summary: &RunSummary) -> Self {
        Self {
            total_files: summary.total_files,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            errors: summary.errors.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Write groups and summary as a pretty-printed JSON report.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_json(
    mut writer: impl Write,
    groups: &[DuplicateGroup],
    summary: &RunSummary,
) -> anyhow::Result<()> {
    let report = JsonReport {
        duplicates: groups.iter().map(JsonGroup::from_duplicate_group).collect(),
        summary: JsonSummary::from_run_summary(summary),
    };

    serde_json::to_writer_pretty(&mut writer, &report)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_report_schema() {
        let groups = vec![DuplicateGroup {
            paths: vec![PathBuf::from("/a/1"), PathBuf::from("/a/2")],
            size: 1024,
            hash: "cafe".to_string(),
        }];
        let summary = RunSummary {
            total_files: 3,
            duplicate_groups: 1,
            duplicate_files: 1,
            reclaimable_space: 1024,
            errors: Vec::new(),
        };

        let mut out = Vec::new();
        write_json(&mut out, &groups, &summary).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["duplicates"][0]["hash"], "cafe");
        assert_eq!(value["duplicates"][0]["size"], 1024);
        assert_eq!(value["duplicates"][0]["files"][1], "/a/2");
        assert_eq!(value["summary"]["total_files"], 3);
        assert_eq!(value["summary"]["reclaimable_space"], 1024);
        assert_eq!(value["summary"]["errors"], serde_json::json!([]));
    }

    #[test]
    fn test_json_group_uses_files_key() {
        let groups = vec![DuplicateGroup {
            paths: vec![PathBuf::from("/x/1"), PathBuf::from("/x/2")],
            size: 2,
            hash: "beef".to_string(),
        }];

        let mut out = Vec::new();
        write_json(&mut out, &groups, &RunSummary::default()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let group = value["duplicates"][0].as_object().unwrap();
        assert!(group.contains_key("files"));
        assert!(!group.contains_key("paths"));
        assert_eq!(group["files"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_json_report_includes_errors() {
        let summary = RunSummary {
            total_files: 1,
            errors: vec![crate::scanner::HashError::NotFound(PathBuf::from("/gone"))],
            ..Default::default()
        };

        let mut out = Vec::new();
        write_json(&mut out, &[], &summary).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["summary"]["errors"][0], "File not found: /gone");
    }
}
