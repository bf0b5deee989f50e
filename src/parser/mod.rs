//! Parser module: INI text to and from [`OrderedIniDocument`]

mod config;
mod format;
mod ini;

pub use config::ParserConfig;
pub use format::format_ini;
pub use ini::parse_ini;

use crate::document::{Command, OrderedIniDocument};
use crate::error::{DocumentError, ParseError};

/// Parse / format / validate bundle for one dialect configuration
#[derive(Debug, Clone, Default)]
pub struct IniParser {
    config: ParserConfig,
}

impl IniParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn parse(&self, text: &str) -> Result<OrderedIniDocument, ParseError> {
        parse_ini(text, &self.config)
    }

    pub fn format(&self, document: &OrderedIniDocument) -> String {
        format_ini(document, &self.config)
    }

    /// Whether `parse` would accept `text`
    pub fn validate(&self, text: &str) -> bool {
        self.parse(text).is_ok()
    }

    /// Reject a command that would put a name or value into the document
    /// which this dialect cannot write back.
    pub fn check_command(&self, command: &Command) -> Result<(), DocumentError> {
        let config = &self.config;
        match command {
            Command::AddSection { name } | Command::RenameSection { to: name, .. } => {
                config.check_section_name(name)
            }
            Command::AddPair { key, value, .. } => {
                config.check_key(key)?;
                config.check_value(value)
            }
            Command::RenamePair { to, .. } => config.check_key(to),
            Command::SetValue { value, .. } => config.check_value(value),
            _ => Ok(()),
        }
    }

    /// Whether formatting `document` and parsing the text gives the same content
    pub fn round_trips(&self, document: &OrderedIniDocument) -> bool {
        self.parse(&self.format(document))
            .is_ok_and(|reparsed| reparsed.same_content(document))
    }
}
