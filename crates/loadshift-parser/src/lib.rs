//! # loadshift-parser
//!
//! MSPDI (MS Project XML) ingestion for loadshift.
//!
//! This crate provides:
//! - MSPDI task/resource/assignment extraction
//! - Date and ISO-8601 work-duration field parsing
//! - UID resolution into the core's (name, start, finish) join contract
//!
//! Records that cannot participate in analysis — tasks or resources with
//! empty identity, assignments referencing unknown UIDs — are dropped and
//! counted in a [`ParseSummary`], never raised as errors.
//!
//! ## Example
//!
//! ```rust
//! use loadshift_parser::parse_mspdi;
//!
//! let xml = r#"
//! <Project xmlns="http://schemas.microsoft.com/project">
//!   <Name>Demo</Name>
//!   <Tasks>
//!     <Task><UID>1</UID><Name>Build</Name>
//!       <Start>2024-01-01T08:00:00</Start>
//!       <Finish>2024-01-14T17:00:00</Finish></Task>
//!   </Tasks>
//!   <Resources>
//!     <Resource><UID>1</UID><Name>Alice</Name><MaxUnits>1.0</MaxUnits></Resource>
//!   </Resources>
//!   <Assignments>
//!     <Assignment><TaskUID>1</TaskUID><ResourceUID>1</ResourceUID>
//!       <Work>PT112H0M0S</Work></Assignment>
//!   </Assignments>
//! </Project>
//! "#;
//!
//! let (project, summary) = parse_mspdi(xml).unwrap();
//! assert_eq!(project.tasks.len(), 1);
//! assert_eq!(project.assignments[0].work_hours, 112.0);
//! assert!(summary.is_clean());
//! ```

pub mod mspdi;
pub mod values;

use loadshift_core::Project;
use thiserror::Error;

pub use values::{parse_date, parse_max_units, parse_work_hours};

/// Parsing error
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed MSPDI document: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Records dropped during ingestion.
///
/// Non-zero counts are a data-quality signal for the caller to log; they
/// never fail the parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseSummary {
    /// Tasks discarded for an empty UID or name
    pub dropped_tasks: usize,
    /// Resources discarded for an empty UID or name
    pub dropped_resources: usize,
    /// Assignments referencing an unknown task or resource UID
    pub dropped_assignments: usize,
}

impl ParseSummary {
    pub fn is_clean(&self) -> bool {
        self.dropped_tasks == 0 && self.dropped_resources == 0 && self.dropped_assignments == 0
    }
}

/// Parse an MSPDI document from a string.
pub fn parse_mspdi(xml: &str) -> Result<(Project, ParseSummary), ParseError> {
    mspdi::parse(xml)
}

/// Parse an MSPDI file from a path.
///
/// When the document carries no `<Name>`, the file stem is used as the
/// project name.
pub fn parse_file(path: &std::path::Path) -> Result<(Project, ParseSummary), ParseError> {
    let content = std::fs::read_to_string(path)?;
    let (mut project, summary) = parse_mspdi(&content)?;
    if project.name.is_empty() {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            project.name = stem.to_string();
        }
    }
    Ok((project, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
<Project xmlns="http://schemas.microsoft.com/project">
  <Tasks>
    <Task><UID>1</UID><Name>Build</Name>
      <Start>2024-01-01T08:00:00</Start>
      <Finish>2024-01-14T17:00:00</Finish></Task>
  </Tasks>
  <Resources>
    <Resource><UID>1</UID><Name>Alice</Name></Resource>
  </Resources>
  <Assignments>
    <Assignment><TaskUID>1</TaskUID><ResourceUID>1</ResourceUID>
      <Work>PT40H0M0S</Work></Assignment>
  </Assignments>
</Project>
"#;

    #[test]
    fn parse_file_uses_stem_as_fallback_name() {
        let mut file = tempfile::NamedTempFile::with_suffix(".xml").unwrap();
        write!(file, "{MINIMAL}").unwrap();

        let (project, summary) = parse_file(file.path()).unwrap();
        assert!(!project.name.is_empty());
        assert_eq!(project.tasks.len(), 1);
        assert!(summary.is_clean());
    }

    #[test]
    fn parse_file_missing_path_is_io_error() {
        let result = parse_file(std::path::Path::new("/nonexistent/schedule.xml"));
        assert!(matches!(result, Err(ParseError::Io(_))));
    }

    #[test]
    fn parse_garbage_is_xml_error() {
        let result = parse_mspdi("not xml at all <<<");
        assert!(matches!(result, Err(ParseError::Xml(_))));
    }

    #[test]
    fn summary_clean_flag() {
        let clean = ParseSummary::default();
        assert!(clean.is_clean());

        let dirty = ParseSummary {
            dropped_assignments: 1,
            ..ParseSummary::default()
        };
        assert!(!dirty.is_clean());
    }
}
