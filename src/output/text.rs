//! Plain-text output: one path per line, groups separated by blank
//! lines.

use std::io::Write;

use crate::duplicates::DuplicateGroup;

/// Write groups as blank-line separated path lists.
///
/// Groups arrive pre-sorted from the finder, so the output is stable
/// across runs and diff-friendly.
///
/// # Errors
///
/// Returns the underlying I/O error if the writer fails.
pub fn write_text(mut writer: impl Write, groups: &[DuplicateGroup]) -> std::io::Result<()> {
    for group in groups {
        writeln!(writer)?;
        for path in &group.paths {
            writeln!(writer, "{}", path.display())?;
        }
    }

    Ok(())
}
