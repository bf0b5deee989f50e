//! Ordered document to INI text

use crate::document::OrderedIniDocument;

use super::config::ParserConfig;

/// Write a document as INI text in document order.
///
/// Sections are separated by a blank line; comments are written on their own
/// line before the element they belong to.
pub fn format_ini(document: &OrderedIniDocument, config: &ParserConfig) -> String {
    let prefix = config.comment_prefix();
    let separator = if config.spaces_around_delimiter {
        format!(" {} ", config.delimiter)
    } else {
        config.delimiter.to_string()
    };

    let mut out = String::new();
    for (index, section) in document.sections().iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        push_comments(&mut out, prefix, section.comments());
        out.push('[');
        out.push_str(section.name());
        out.push_str("]\n");

        for pair in section.pairs() {
            push_comments(&mut out, prefix, pair.comments());
            let line = format!("{}{}{}", pair.key(), separator, pair.value());
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }

    if !document.trailing_comments().is_empty() {
        if !document.is_empty() {
            out.push('\n');
        }
        push_comments(&mut out, prefix, document.trailing_comments());
    }
    out
}

fn push_comments(out: &mut String, prefix: &str, comments: &[String]) {
    for comment in comments {
        out.push_str(prefix);
        if !comment.is_empty() {
            out.push(' ');
            out.push_str(comment);
        }
        out.push('\n');
    }
}
