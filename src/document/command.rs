//! Document edits as explicit command values
//!
//! Hosts build a [`Command`] (or deserialize one from a client request) and hand
//! it to [`OrderedIniDocument::apply`], instead of mutating the document from
//! UI callbacks.

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

use super::{Direction, OrderedIniDocument};

/// A single edit of an [`OrderedIniDocument`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Command {
    AddSection {
        name: String,
    },
    AddPair {
        section: String,
        key: String,
        #[serde(default)]
        value: String,
    },
    /// Append `New Section` (uniquified) holding an empty `NewKey`
    AddNewSection,
    /// Append an empty `NewKey` (uniquified) to a section
    AddNewPair {
        section: String,
    },
    RemoveSection {
        name: String,
    },
    RemovePair {
        section: String,
        key: String,
    },
    RenameSection {
        from: String,
        to: String,
    },
    RenamePair {
        section: String,
        from: String,
        to: String,
    },
    SetValue {
        section: String,
        key: String,
        value: String,
    },
    MoveSection {
        name: String,
        direction: Direction,
    },
    MovePair {
        section: String,
        key: String,
        direction: Direction,
    },
    DuplicateSection {
        name: String,
    },
    DuplicatePair {
        section: String,
        key: String,
    },
    Clear,
}

/// Result of a successfully applied [`Command`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum CommandOutcome {
    /// The edit was made
    Applied,
    /// The edit created an element under a generated name
    Created { name: String },
}

impl OrderedIniDocument {
    /// Run a command against the document.
    ///
    /// A failing command leaves the document unchanged.
    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome, DocumentError> {
        let created = |name: String| CommandOutcome::Created { name };
        match command {
            Command::AddSection { name } => self.add_section(&name).map(|_| CommandOutcome::Applied),
            Command::AddPair {
                section,
                key,
                value,
            } => self
                .add_pair(&section, &key, &value)
                .map(|_| CommandOutcome::Applied),
            Command::AddNewSection => self.add_new_section().map(created),
            Command::AddNewPair { section } => self.add_new_pair(&section).map(created),
            Command::RemoveSection { name } => {
                self.remove_section(&name).map(|_| CommandOutcome::Applied)
            }
            Command::RemovePair { section, key } => self
                .remove_pair(&section, &key)
                .map(|_| CommandOutcome::Applied),
            Command::RenameSection { from, to } => self
                .rename_section(&from, &to)
                .map(|()| CommandOutcome::Applied),
            Command::RenamePair { section, from, to } => self
                .rename_pair(&section, &from, &to)
                .map(|()| CommandOutcome::Applied),
            Command::SetValue {
                section,
                key,
                value,
            } => self
                .set_value(&section, &key, &value)
                .map(|()| CommandOutcome::Applied),
            Command::MoveSection { name, direction } => self
                .move_section(&name, direction)
                .map(|()| CommandOutcome::Applied),
            Command::MovePair {
                section,
                key,
                direction,
            } => self
                .move_pair(&section, &key, direction)
                .map(|()| CommandOutcome::Applied),
            Command::DuplicateSection { name } => self.duplicate_section(&name).map(created),
            Command::DuplicatePair { section, key } => {
                self.duplicate_pair(&section, &key).map(created)
            }
            Command::Clear => {
                self.clear();
                Ok(CommandOutcome::Applied)
            }
        }
    }
}
