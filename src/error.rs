//! Error types for document edits and INI parsing

use thiserror::Error;

use crate::document::Direction;

/// Failure of an operation on an [`OrderedIniDocument`](crate::document::OrderedIniDocument).
///
/// Every variant is recoverable: the document is left exactly as it was
/// before the failing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// A section or key with this name already exists in its scope.
    #[error("name already in use: '{name}'")]
    DuplicateName { name: String },

    /// The referenced section does not exist.
    #[error("section not found: '{section}'")]
    SectionNotFound { section: String },

    /// The referenced key does not exist in an existing section.
    #[error("key '{key}' not found in section '{section}'")]
    KeyNotFound { section: String, key: String },

    /// The element already sits at the edge it was asked to move past.
    #[error("'{name}' cannot move {direction}: already at the boundary")]
    Boundary { name: String, direction: Direction },

    /// Every numbered candidate for a unique name is taken.
    #[error("no unique name available for '{base}'")]
    Exhausted { base: String },

    /// The INI dialect cannot write this name or value back as text.
    #[error("{text:?} cannot be written as INI: {reason}")]
    InvalidText { text: String, reason: &'static str },
}

impl DocumentError {
    /// True for both missing sections and missing keys.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DocumentError::SectionNotFound { .. } | DocumentError::KeyNotFound { .. }
        )
    }
}

/// What went wrong on a rejected INI line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected a section header, a comment or a key-value pair")]
    InvalidLine,

    #[error("malformed section header")]
    InvalidSectionHeader,

    #[error("section name is empty")]
    EmptySectionName,

    #[error("key is empty")]
    EmptyKey,

    #[error("key-value pair appears before any section")]
    PairOutsideSection,

    #[error("duplicate section '{0}'")]
    DuplicateSection(String),

    #[error("duplicate key '{key}' in section '{section}'")]
    DuplicateKey { section: String, key: String },
}

impl ParseErrorKind {
    /// Stable identifier reported as the diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            ParseErrorKind::InvalidLine => "invalid-line",
            ParseErrorKind::InvalidSectionHeader => "invalid-section-header",
            ParseErrorKind::EmptySectionName => "empty-section-name",
            ParseErrorKind::EmptyKey => "empty-key",
            ParseErrorKind::PairOutsideSection => "pair-outside-section",
            ParseErrorKind::DuplicateSection(_) => "duplicate-section",
            ParseErrorKind::DuplicateKey { .. } => "duplicate-key",
        }
    }
}

/// INI text rejected by the parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {}: {}", .line + 1, .kind)]
pub struct ParseError {
    /// Offending line (0-indexed)
    pub line: u32,
    /// Why the line was rejected
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line: u32, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}
