//! Parser and formatter settings

use serde::Deserialize;

use crate::error::DocumentError;

/// Settings of the INI dialect, as sent in the client's `initializationOptions`.
///
/// Every field is optional; missing fields keep their default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserConfig {
    /// Line prefixes that start a comment. The first one is used when formatting.
    pub comment_prefixes: Vec<String>,
    /// Separator between key and value
    pub delimiter: char,
    /// Write `key = value` instead of `key=value`
    pub spaces_around_delimiter: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            comment_prefixes: vec![";".to_string(), "#".to_string()],
            delimiter: '=',
            spaces_around_delimiter: true,
        }
    }
}

impl ParserConfig {
    /// Text following a comment prefix, if `line` is a comment
    pub(crate) fn strip_comment<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.comment_prefixes
            .iter()
            .filter(|prefix| !prefix.is_empty())
            .find_map(|prefix| line.strip_prefix(prefix.as_str()))
            .map(str::trim)
    }

    /// Prefix used when writing comments
    pub(crate) fn comment_prefix(&self) -> &str {
        self.comment_prefixes
            .iter()
            .map(String::as_str)
            .find(|prefix| !prefix.is_empty())
            .unwrap_or(";")
    }

    /// Reject a section name that would not read back as the same name
    pub(crate) fn check_section_name(&self, name: &str) -> Result<(), DocumentError> {
        check_line(name)?;
        if name.is_empty() {
            return Err(invalid(name, "section name is empty"));
        }
        Ok(())
    }

    /// Reject a key that would not read back as the same key
    pub(crate) fn check_key(&self, key: &str) -> Result<(), DocumentError> {
        check_line(key)?;
        if key.is_empty() {
            return Err(invalid(key, "key is empty"));
        }
        if key.contains(self.delimiter) {
            return Err(invalid(key, "key contains the delimiter"));
        }
        if key.starts_with('[') {
            return Err(invalid(key, "key starts with '['"));
        }
        if self.strip_comment(key).is_some() {
            return Err(invalid(key, "key starts with a comment prefix"));
        }
        Ok(())
    }

    /// Reject a value that would not read back as the same value
    pub(crate) fn check_value(&self, value: &str) -> Result<(), DocumentError> {
        check_line(value)
    }
}

fn check_line(text: &str) -> Result<(), DocumentError> {
    if text.contains(['\n', '\r']) {
        return Err(invalid(text, "contains a line break"));
    }
    if text.trim() != text {
        return Err(invalid(text, "has leading or trailing whitespace"));
    }
    Ok(())
}

fn invalid(text: &str, reason: &'static str) -> DocumentError {
    DocumentError::InvalidText {
        text: text.to_string(),
        reason,
    }
}
