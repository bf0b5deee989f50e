//! ini-inspect: ordered INI documents with validated reordering
//!
//! This library provides:
//! - An ordered INI document model whose sections and pairs can be moved up and
//!   down without disturbing the order of anything else
//! - Document edits as serializable commands
//! - An INI parser and formatter that preserve order and comments
//! - An editing session that falls back to raw text when the INI does not parse
//! - A language server backend exposing all of the above to editors
//!
//! # Example
//!
//! ```
//! use ini_inspect::document::Direction;
//! use ini_inspect::parser::IniParser;
//!
//! let parser = IniParser::default();
//! let mut doc = parser.parse("[A]\nx = 1\n\n[B]\ny = 2\n").unwrap();
//!
//! assert!(doc.can_move_section("A", Direction::Down));
//! doc.move_section("A", Direction::Down).unwrap();
//!
//! assert_eq!(parser.format(&doc), "[B]\ny = 2\n\n[A]\nx = 1\n");
//! ```

pub mod diagnostics;
pub mod document;
pub mod error;
pub mod parser;
pub mod session;

mod backend;

pub use backend::{Backend, APPLY_COMMAND};
pub use document::OrderedIniDocument;
pub use error::{DocumentError, ParseError};
