//! # loadshift-render
//!
//! Rendering backends for loadshift analysis output.
//!
//! This crate provides:
//! - CSV export of workload records and shift suggestions
//! - A plain-text analysis report
//!
//! All renderers are pure string builders over the solver's output
//! records; empty inputs produce a valid "nothing to show" document, never
//! an error.

pub mod csv;
pub mod report;

pub use csv::{suggestions_csv, workload_csv};
pub use report::render_report;
