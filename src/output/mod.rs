//! Output formatters for duplicate finding results.
//!
//! The core produces plain [`DuplicateGroup`] values; these writers
//! render them for consumption:
//! - [`text`]: blank-line separated path lists for humans and shell
//!   pipelines
//! - [`json`]: machine-readable report with groups and summary
//!
//! [`DuplicateGroup`]: crate::duplicates::DuplicateGroup

pub mod json;
pub mod text;

pub use json::write_json;
pub use text::write_text;
