//! INI parse error diagnostics

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range};

use crate::error::ParseError;

/// Name reported as the source of every diagnostic
pub const DIAGNOSTIC_SOURCE: &str = "ini-inspect";

/// Collects diagnostics for one document
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error covering the line the parser rejected in `text`
    pub fn add_parse_error(&mut self, error: &ParseError, text: &str) {
        let width = text
            .lines()
            .nth(error.line as usize)
            .map(|line| line.encode_utf16().count() as u32)
            .unwrap_or(0);

        self.diagnostics.push(Diagnostic {
            range: Range {
                start: Position {
                    line: error.line,
                    character: 0,
                },
                end: Position {
                    line: error.line,
                    character: width,
                },
            },
            severity: Some(DiagnosticSeverity::ERROR),
            code: Some(NumberOrString::String(error.kind.code().to_string())),
            code_description: None,
            source: Some(DIAGNOSTIC_SOURCE.to_string()),
            message: error.kind.to_string(),
            related_information: None,
            tags: None,
            data: None,
        });
    }

    /// Convert into the final list of diagnostics
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
