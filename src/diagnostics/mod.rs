//! Diagnostics module for error collection and reporting

mod parse_errors;

pub use parse_errors::{DiagnosticCollector, DIAGNOSTIC_SOURCE};
