//! Editing session over one INI text
//!
//! Text that parses is edited structurally through [`Command`]s. Text that does
//! not parse stays editable as raw text until it becomes valid again.

use thiserror::Error;

use crate::document::{Command, CommandOutcome, OrderedIniDocument};
use crate::error::{DocumentError, ParseError};
use crate::parser::IniParser;

/// How the session's content is currently edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Structured,
    Raw,
}

/// Failure of [`EditSession::apply`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("document is in raw text mode: {0}")]
    NotStructured(ParseError),

    #[error("edit cannot be written back as INI text")]
    Unrepresentable,
}

#[derive(Debug, Clone)]
enum Content {
    Structured(OrderedIniDocument),
    Raw { text: String, error: ParseError },
}

/// One INI text being edited
#[derive(Debug, Clone)]
pub struct EditSession {
    parser: IniParser,
    content: Content,
    dirty: bool,
}

impl EditSession {
    /// Start editing `text`, structured if it parses
    pub fn open(text: &str, parser: IniParser) -> Self {
        let content = Self::load(text, &parser);
        Self {
            parser,
            content,
            dirty: false,
        }
    }

    fn load(text: &str, parser: &IniParser) -> Content {
        match parser.parse(text) {
            Ok(document) => Content::Structured(document),
            Err(error) => {
                tracing::debug!("Falling back to raw text mode: {}", error);
                Content::Raw {
                    text: text.to_string(),
                    error,
                }
            }
        }
    }

    pub fn mode(&self) -> EditMode {
        match self.content {
            Content::Structured(_) => EditMode::Structured,
            Content::Raw { .. } => EditMode::Raw,
        }
    }

    /// The parsed document, in structured mode
    pub fn document(&self) -> Option<&OrderedIniDocument> {
        match &self.content {
            Content::Structured(document) => Some(document),
            Content::Raw { .. } => None,
        }
    }

    /// Why the text did not parse, in raw mode
    pub fn parse_error(&self) -> Option<&ParseError> {
        match &self.content {
            Content::Structured(_) => None,
            Content::Raw { error, .. } => Some(error),
        }
    }

    /// Whether the content changed since opening or the last `mark_saved`
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Apply a structural edit.
    ///
    /// The edit is kept only if the result formats to text that parses back
    /// to the same content.
    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome, SessionError> {
        match &mut self.content {
            Content::Structured(document) => {
                tracing::debug!(?command, "Applying command");
                self.parser.check_command(&command)?;
                let mut edited = document.clone();
                let outcome = edited.apply(command)?;
                if !self.parser.round_trips(&edited) {
                    return Err(SessionError::Unrepresentable);
                }
                *document = edited;
                self.dirty = true;
                Ok(outcome)
            }
            Content::Raw { error, .. } => Err(SessionError::NotStructured(error.clone())),
        }
    }

    /// Replace the content with edited raw text, re-deciding the mode
    pub fn set_text(&mut self, text: &str) {
        self.content = Self::load(text, &self.parser);
        self.dirty = true;
    }

    /// Current content as INI text
    pub fn text(&self) -> String {
        match &self.content {
            Content::Structured(document) => self.parser.format(document),
            Content::Raw { text, .. } => text.clone(),
        }
    }
}
