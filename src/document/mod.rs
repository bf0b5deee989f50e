//! Ordered INI document model
//!
//! An [`OrderedIniDocument`] is an ordered list of [`Section`]s, each holding an
//! ordered list of [`Pair`]s. Order is part of the document: every mutation keeps
//! the relative order of the elements it does not touch, and moves are strict
//! transpositions with the immediate neighbour.
//!
//! Sections and pairs get a stable id when created. Ids survive rename, value
//! updates and moves, so a host can keep referring to "this element" while its
//! name is being edited.

mod command;
mod naming;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

pub use command::{Command, CommandOutcome};
pub use naming::{MAX_NAME_SUFFIX, NEW_KEY_NAME, NEW_SECTION_NAME};

/// Direction of a move within an ordered sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards the start
    Up,
    /// Towards the end
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => f.write_str("up"),
            Direction::Down => f.write_str("down"),
        }
    }
}

/// Stable identity of a section within its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(u64);

/// Stable identity of a pair within its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairId(u64);

/// A key-value entry
#[derive(Debug, Clone)]
pub struct Pair {
    id: PairId,
    key: String,
    value: String,
    comments: Vec<String>,
}

impl Pair {
    pub fn id(&self) -> PairId {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Comment lines that preceded the pair in the source text
    pub fn comments(&self) -> &[String] {
        &self.comments
    }
}

/// A named, ordered group of pairs
#[derive(Debug, Clone)]
pub struct Section {
    id: SectionId,
    name: String,
    pairs: Vec<Pair>,
    comments: Vec<String>,
}

impl Section {
    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pairs in document order
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Comment lines that preceded the section header in the source text
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn pair(&self, key: &str) -> Option<&Pair> {
        self.pairs.iter().find(|p| p.key == key)
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pair(key).map(Pair::value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pair(key).is_some()
    }

    /// Keys in document order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(Pair::key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.pairs.iter().position(|p| p.key == key)
    }
}

/// An INI file as an ordered sequence of sections
#[derive(Debug, Clone, Default)]
pub struct OrderedIniDocument {
    sections: Vec<Section>,
    trailing_comments: Vec<String>,
    next_id: u64,
}

impl OrderedIniDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Sections in document order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Section names in document order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(Section::name)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_by_id(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Find a pair by id, together with the section that owns it
    pub fn pair_by_id(&self, id: PairId) -> Option<(&Section, &Pair)> {
        self.sections
            .iter()
            .find_map(|s| s.pairs.iter().find(|p| p.id == id).map(|p| (s, p)))
    }

    /// Index of the section in document order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.name == name)
    }

    /// Value of `key` in `section`
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// Comment lines after the last element of the source text
    pub fn trailing_comments(&self) -> &[String] {
        &self.trailing_comments
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Same names, values and comments in the same order. Ids are ignored.
    pub fn same_content(&self, other: &OrderedIniDocument) -> bool {
        self.trailing_comments == other.trailing_comments
            && self.sections.len() == other.sections.len()
            && self.sections.iter().zip(&other.sections).all(|(a, b)| {
                a.name == b.name
                    && a.comments == b.comments
                    && a.pairs.len() == b.pairs.len()
                    && a.pairs.iter().zip(&b.pairs).all(|(p, q)| {
                        p.key == q.key && p.value == q.value && p.comments == q.comments
                    })
            })
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// False when either the section or the key is missing
    pub fn has_key(&self, section: &str, key: &str) -> bool {
        self.section(section).is_some_and(|s| s.contains_key(key))
    }

    /// Append an empty section
    pub fn add_section(&mut self, name: &str) -> Result<SectionId, DocumentError> {
        self.push_section(name, Vec::new())
    }

    /// Append a pair to the end of `section`
    pub fn add_pair(
        &mut self,
        section: &str,
        key: &str,
        value: &str,
    ) -> Result<PairId, DocumentError> {
        self.push_pair(section, key, value, Vec::new())
    }

    /// Remove a section and everything in it
    pub fn remove_section(&mut self, name: &str) -> Result<Section, DocumentError> {
        let index = self.section_index(name)?;
        Ok(self.sections.remove(index))
    }

    pub fn remove_pair(&mut self, section: &str, key: &str) -> Result<Pair, DocumentError> {
        let (s, p) = self.pair_index(section, key)?;
        Ok(self.sections[s].pairs.remove(p))
    }

    /// Change a section's name in place. Renaming to the current name is a no-op.
    pub fn rename_section(&mut self, old_name: &str, new_name: &str) -> Result<(), DocumentError> {
        let index = self.section_index(old_name)?;
        if old_name == new_name {
            return Ok(());
        }
        if self.has_section(new_name) {
            return Err(DocumentError::DuplicateName {
                name: new_name.to_string(),
            });
        }
        self.sections[index].name = new_name.to_string();
        Ok(())
    }

    /// Change a key in place. Renaming to the current key is a no-op.
    pub fn rename_pair(
        &mut self,
        section: &str,
        old_key: &str,
        new_key: &str,
    ) -> Result<(), DocumentError> {
        let (s, p) = self.pair_index(section, old_key)?;
        if old_key == new_key {
            return Ok(());
        }
        if self.sections[s].contains_key(new_key) {
            return Err(DocumentError::DuplicateName {
                name: new_key.to_string(),
            });
        }
        self.sections[s].pairs[p].key = new_key.to_string();
        Ok(())
    }

    /// Overwrite the value of an existing pair
    pub fn set_value(&mut self, section: &str, key: &str, value: &str) -> Result<(), DocumentError> {
        let (s, p) = self.pair_index(section, key)?;
        self.sections[s].pairs[p].value = value.to_string();
        Ok(())
    }

    /// Whether `move_section` would succeed
    pub fn can_move_section(&self, name: &str, direction: Direction) -> bool {
        self.position(name)
            .and_then(|index| neighbour(index, self.sections.len(), direction))
            .is_some()
    }

    /// Whether `move_pair` would succeed
    pub fn can_move_pair(&self, section: &str, key: &str, direction: Direction) -> bool {
        self.section(section)
            .and_then(|s| {
                s.position(key)
                    .and_then(|index| neighbour(index, s.pairs.len(), direction))
            })
            .is_some()
    }

    /// Swap a section with its neighbour in `direction`
    pub fn move_section(&mut self, name: &str, direction: Direction) -> Result<(), DocumentError> {
        let index = self.section_index(name)?;
        let other = neighbour(index, self.sections.len(), direction).ok_or_else(|| {
            DocumentError::Boundary {
                name: name.to_string(),
                direction,
            }
        })?;
        self.sections.swap(index, other);
        Ok(())
    }

    /// Swap a pair with its neighbour in `direction`, within its section
    pub fn move_pair(
        &mut self,
        section: &str,
        key: &str,
        direction: Direction,
    ) -> Result<(), DocumentError> {
        let (s, p) = self.pair_index(section, key)?;
        let pairs = &mut self.sections[s].pairs;
        let other = neighbour(p, pairs.len(), direction).ok_or_else(|| DocumentError::Boundary {
            name: key.to_string(),
            direction,
        })?;
        pairs.swap(p, other);
        Ok(())
    }

    /// Append a copy of a section under a fresh name; returns that name
    pub fn duplicate_section(&mut self, name: &str) -> Result<String, DocumentError> {
        let index = self.section_index(name)?;
        let new_name = self.unique_section_name(&format!("{name} (duplicate)"));
        let pairs: Vec<_> = self.sections[index]
            .pairs
            .iter()
            .map(|p| (p.key.clone(), p.value.clone(), p.comments.clone()))
            .collect();

        self.push_section(&new_name, Vec::new())?;
        for (key, value, comments) in pairs {
            self.push_pair(&new_name, &key, &value, comments)?;
        }
        Ok(new_name)
    }

    /// Append a copy of a pair to the same section under a fresh key; returns that key
    pub fn duplicate_pair(&mut self, section: &str, key: &str) -> Result<String, DocumentError> {
        let (s, p) = self.pair_index(section, key)?;
        let new_key = self.unique_key(section, key)?;
        let value = self.sections[s].pairs[p].value.clone();
        self.add_pair(section, &new_key, &value)?;
        Ok(new_key)
    }

    /// Append a fresh section holding a single empty pair; returns the section name
    pub fn add_new_section(&mut self) -> Result<String, DocumentError> {
        let name = self.unique_section_name(NEW_SECTION_NAME);
        self.add_section(&name)?;
        self.add_pair(&name, NEW_KEY_NAME, "")?;
        Ok(name)
    }

    /// Append a fresh empty pair to `section`; returns the key
    pub fn add_new_pair(&mut self, section: &str) -> Result<String, DocumentError> {
        let key = self.unique_key(section, NEW_KEY_NAME)?;
        self.add_pair(section, &key, "")?;
        Ok(key)
    }

    /// Remove every section and trailing comment
    pub fn clear(&mut self) {
        self.sections.clear();
        self.trailing_comments.clear();
    }

    pub(crate) fn push_section(
        &mut self,
        name: &str,
        comments: Vec<String>,
    ) -> Result<SectionId, DocumentError> {
        if self.has_section(name) {
            return Err(DocumentError::DuplicateName {
                name: name.to_string(),
            });
        }
        let id = SectionId(self.allocate_id());
        self.sections.push(Section {
            id,
            name: name.to_string(),
            pairs: Vec::new(),
            comments,
        });
        Ok(id)
    }

    pub(crate) fn push_pair(
        &mut self,
        section: &str,
        key: &str,
        value: &str,
        comments: Vec<String>,
    ) -> Result<PairId, DocumentError> {
        let index = self.section_index(section)?;
        if self.sections[index].contains_key(key) {
            return Err(DocumentError::DuplicateName {
                name: key.to_string(),
            });
        }
        let id = PairId(self.allocate_id());
        self.sections[index].pairs.push(Pair {
            id,
            key: key.to_string(),
            value: value.to_string(),
            comments,
        });
        Ok(id)
    }

    pub(crate) fn set_trailing_comments(&mut self, comments: Vec<String>) {
        self.trailing_comments = comments;
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn section_index(&self, name: &str) -> Result<usize, DocumentError> {
        self.position(name)
            .ok_or_else(|| DocumentError::SectionNotFound {
                section: name.to_string(),
            })
    }

    fn pair_index(&self, section: &str, key: &str) -> Result<(usize, usize), DocumentError> {
        let s = self.section_index(section)?;
        let p = self.sections[s]
            .position(key)
            .ok_or_else(|| DocumentError::KeyNotFound {
                section: section.to_string(),
                key: key.to_string(),
            })?;
        Ok((s, p))
    }
}

/// Index adjacent to `index` in `direction`, if it exists
fn neighbour(index: usize, len: usize, direction: Direction) -> Option<usize> {
    match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => Some(index + 1).filter(|&next| next < len),
    }
}
