//! Unique name generation for new and duplicated elements

use crate::error::DocumentError;

use super::{OrderedIniDocument, Section};

/// Highest numeric suffix tried before giving up
pub const MAX_NAME_SUFFIX: u32 = 99;

/// Base name for sections created by [`OrderedIniDocument::add_new_section`]
pub const NEW_SECTION_NAME: &str = "New Section";

/// Base name for keys created by [`OrderedIniDocument::add_new_pair`]
pub const NEW_KEY_NAME: &str = "NewKey";

/// Search `base`, then `base{sep}1` ... `base{sep}99` for a name not `in_use`.
///
/// `Err` carries the last candidate tried when every suffix is taken.
fn search(base: &str, separator: &str, in_use: impl Fn(&str) -> bool) -> Result<String, String> {
    if !in_use(base) {
        return Ok(base.to_string());
    }
    for suffix in 1..=MAX_NAME_SUFFIX {
        let candidate = format!("{base}{separator}{suffix}");
        if !in_use(&candidate) {
            return Ok(candidate);
        }
    }
    Err(format!("{base}{separator}{MAX_NAME_SUFFIX}"))
}

impl OrderedIniDocument {
    /// A section name not in use: `base`, `base 1`, `base 2`, ...
    ///
    /// When all suffixes up to [`MAX_NAME_SUFFIX`] are taken the last candidate
    /// is returned even though it collides; adding it will then fail with
    /// [`DocumentError::DuplicateName`].
    pub fn unique_section_name(&self, base: &str) -> String {
        search(base, " ", |name| self.has_section(name)).unwrap_or_else(|last| {
            tracing::warn!(base, "no unique section name available, falling back to '{last}'");
            last
        })
    }

    /// Like [`unique_section_name`](Self::unique_section_name), but an
    /// exhausted search is an error.
    pub fn try_unique_section_name(&self, base: &str) -> Result<String, DocumentError> {
        search(base, " ", |name| self.has_section(name)).map_err(|_| DocumentError::Exhausted {
            base: base.to_string(),
        })
    }

    /// A key not in use in `section`: `base`, `base_1`, `base_2`, ...
    ///
    /// Degrades like [`unique_section_name`](Self::unique_section_name) when
    /// the search is exhausted.
    pub fn unique_key(&self, section: &str, base: &str) -> Result<String, DocumentError> {
        let s = self.section_or_err(section)?;
        Ok(search(base, "_", |key| s.contains_key(key)).unwrap_or_else(|last| {
            tracing::warn!(section, base, "no unique key available, falling back to '{last}'");
            last
        }))
    }

    /// Like [`unique_key`](Self::unique_key), but an exhausted search is an error.
    pub fn try_unique_key(&self, section: &str, base: &str) -> Result<String, DocumentError> {
        let s = self.section_or_err(section)?;
        search(base, "_", |key| s.contains_key(key)).map_err(|_| DocumentError::Exhausted {
            base: base.to_string(),
        })
    }

    fn section_or_err(&self, section: &str) -> Result<&Section, DocumentError> {
        self.section(section)
            .ok_or_else(|| DocumentError::SectionNotFound {
                section: section.to_string(),
            })
    }
}
