//! INI text to ordered document
//!
//! The dialect is line oriented: blank lines are skipped, comment lines attach
//! to the next section or pair, `[name]` opens a section and `key=value` adds a
//! pair to the open section. Anything else rejects the whole text.

use std::mem;

use lazy_static::lazy_static;
use regex::Regex;

use crate::document::OrderedIniDocument;
use crate::error::{ParseError, ParseErrorKind};

use super::config::ParserConfig;

lazy_static! {
    static ref SECTION_HEADER_RE: Regex = Regex::new(r"^\[(.*)\]$").unwrap();
}

/// Parse INI text, keeping sections and pairs in source order.
///
/// Fails on the first rejected line.
pub fn parse_ini(text: &str, config: &ParserConfig) -> Result<OrderedIniDocument, ParseError> {
    let mut document = OrderedIniDocument::new();
    let mut current_section: Option<String> = None;
    let mut pending_comments = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line_number = index as u32;
        let line = raw_line.trim();
        let fail = |kind: ParseErrorKind| ParseError::new(line_number, kind);

        if line.is_empty() {
            continue;
        }

        if let Some(comment) = config.strip_comment(line) {
            pending_comments.push(comment.to_string());
            continue;
        }

        if line.starts_with('[') {
            let caps = SECTION_HEADER_RE
                .captures(line)
                .ok_or_else(|| fail(ParseErrorKind::InvalidSectionHeader))?;
            let name = caps[1].trim();
            if name.is_empty() {
                return Err(fail(ParseErrorKind::EmptySectionName));
            }
            document
                .push_section(name, mem::take(&mut pending_comments))
                .map_err(|_| fail(ParseErrorKind::DuplicateSection(name.to_string())))?;
            current_section = Some(name.to_string());
            continue;
        }

        let Some((key, value)) = line.split_once(config.delimiter) else {
            return Err(fail(ParseErrorKind::InvalidLine));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(fail(ParseErrorKind::EmptyKey));
        }
        let Some(section) = current_section.as_deref() else {
            return Err(fail(ParseErrorKind::PairOutsideSection));
        };
        document
            .push_pair(section, key, value.trim(), mem::take(&mut pending_comments))
            .map_err(|_| {
                fail(ParseErrorKind::DuplicateKey {
                    section: section.to_string(),
                    key: key.to_string(),
                })
            })?;
    }

    document.set_trailing_comments(pending_comments);
    Ok(document)
}
