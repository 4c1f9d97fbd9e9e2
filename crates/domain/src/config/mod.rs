//! Configuration sections and their typed entries.
//!
//! Every automation owns an ordered list of [`ConfigSection`]s; each section
//! owns an ordered list of [`ConfigEntry`]s. Insertion order is display order.

mod entry;
mod format;
mod value;

pub use entry::{ConfigEntry, NewConfigEntry};
pub use format::EntryFormat;
pub use value::{ConfigEntryType, ConfigValue};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{NotFoundError, OpsDeckError, ValidationError};
use crate::id::{EntryId, IdKind, SectionId};

/// A named grouping of configuration entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSection {
    pub id: SectionId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub entries: Vec<ConfigEntry>,
}

impl ConfigSection {
    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the name is empty, an entry is
    /// invalid, or two entries share an id.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptySectionName);
        }
        let mut seen = HashSet::with_capacity(self.entries.len());
        for entry in &self.entries {
            entry.validate()?;
            if !seen.insert(entry.id.as_str()) {
                return Err(ValidationError::DuplicateId {
                    kind: IdKind::Entry,
                    id: entry.id.to_string(),
                });
            }
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no entry has `id`.
    pub fn entry(&self, id: &EntryId) -> Result<&ConfigEntry, NotFoundError> {
        self.entries
            .iter()
            .find(|e| &e.id == id)
            .ok_or_else(|| NotFoundError::new(IdKind::Entry, id.as_str()))
    }

    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no entry has `id`.
    pub fn entry_mut(&mut self, id: &EntryId) -> Result<&mut ConfigEntry, NotFoundError> {
        self.entries
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| NotFoundError::new(IdKind::Entry, id.as_str()))
    }

    /// Remove an entry, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no entry has `id`.
    pub fn remove_entry(&mut self, id: &EntryId) -> Result<ConfigEntry, NotFoundError> {
        let index = self
            .entries
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| NotFoundError::new(IdKind::Entry, id.as_str()))?;
        Ok(self.entries.remove(index))
    }
}

/// Caller-supplied fields for a new section; the store assigns ids.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConfigSection {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub entries: Vec<NewConfigEntry>,
}

impl NewConfigSection {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn entry(mut self, entry: NewConfigEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySectionName`] or the first invalid entry's error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptySectionName);
        }
        self.entries.iter().try_for_each(NewConfigEntry::validate)
    }

    /// Attach ids to the section and each of its entries.
    ///
    /// # Errors
    ///
    /// Propagates any error from `next_entry_id`.
    pub fn into_section(
        self,
        id: SectionId,
        mut next_entry_id: impl FnMut() -> Result<EntryId, OpsDeckError>,
    ) -> Result<ConfigSection, OpsDeckError> {
        let mut entries = Vec::with_capacity(self.entries.len());
        for entry in self.entries {
            entries.push(entry.into_entry(next_entry_id()?));
        }
        Ok(ConfigSection {
            id,
            name: self.name.trim().to_string(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            entries,
        })
    }
}

/// Rename or re-describe a section. `description` is tri-state like the
/// automation schedule: absent leaves it, `null` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SectionPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_util::present")]
    pub description: Option<Option<String>>,
}

impl ConfigSection {
    /// Apply a [`SectionPatch`]; the section is untouched on error.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySectionName`] for a blank name.
    pub fn apply(&mut self, patch: SectionPatch) -> Result<(), ValidationError> {
        let name = match patch.name {
            Some(name) if name.trim().is_empty() => return Err(ValidationError::EmptySectionName),
            Some(name) => name.trim().to_string(),
            None => self.name.clone(),
        };
        if let Some(description) = patch.description {
            self.description = description.filter(|d| !d.trim().is_empty());
        }
        self.name = name;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> ConfigSection {
        NewConfigSection::new("Database")
            .entry(NewConfigEntry::new("host", ConfigValue::String("db".into())))
            .entry(NewConfigEntry::new("port", ConfigValue::Number(5432.0)))
            .into_section(SectionId::new("cs-1").unwrap(), {
                let mut n = 0;
                move || -> Result<EntryId, OpsDeckError> {
                    n += 1;
                    Ok(EntryId::new(format!("ce-{n}"))?)
                }
            })
            .unwrap()
    }

    #[test]
    fn should_assign_fresh_ids_to_initial_entries() {
        let section = section();
        let ids: Vec<&str> = section.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["ce-1", "ce-2"]);
    }

    #[test]
    fn should_find_entry_by_id() {
        let section = section();
        let entry = section.entry(&EntryId::new("ce-2").unwrap()).unwrap();
        assert_eq!(entry.key, "port");
    }

    #[test]
    fn should_return_not_found_for_unknown_entry() {
        let section = section();
        let result = section.entry(&EntryId::new("ce-999").unwrap());
        assert_eq!(result, Err(NotFoundError::new(IdKind::Entry, "ce-999")));
    }

    #[test]
    fn should_remove_entry_and_keep_order_of_rest() {
        let mut section = section();
        let removed = section
            .remove_entry(&EntryId::new("ce-1").unwrap())
            .unwrap();
        assert_eq!(removed.key, "host");
        assert_eq!(section.entries.len(), 1);
        assert_eq!(section.entries[0].key, "port");
    }

    #[test]
    fn should_reject_duplicate_entry_ids() {
        let mut section = section();
        section.entries[1].id = section.entries[0].id.clone();
        assert!(matches!(
            section.validate(),
            Err(ValidationError::DuplicateId {
                kind: IdKind::Entry,
                ..
            })
        ));
    }

    #[test]
    fn should_reject_blank_section_name() {
        assert_eq!(
            NewConfigSection::new(" ").validate(),
            Err(ValidationError::EmptySectionName)
        );
    }

    #[test]
    fn should_drop_blank_description() {
        let section = NewConfigSection::new("DB")
            .description("")
            .into_section(SectionId::new("cs-2").unwrap(), || {
                Ok::<_, OpsDeckError>(EntryId::new("ce-x")?)
            })
            .unwrap();
        assert!(section.description.is_none());
    }

    #[test]
    fn should_rename_section_and_clear_description() {
        let mut section = section();
        section.description = Some("primary".to_string());
        let patch: SectionPatch =
            serde_json::from_str(r#"{"name": " Primary DB ", "description": null}"#).unwrap();
        section.apply(patch).unwrap();
        assert_eq!(section.name, "Primary DB");
        assert!(section.description.is_none());
    }

    #[test]
    fn should_leave_section_untouched_when_rename_is_blank() {
        let mut section = section();
        let before = section.clone();
        let patch = SectionPatch {
            name: Some("  ".to_string()),
            description: Some(Some("ignored".to_string())),
        };
        assert_eq!(section.apply(patch), Err(ValidationError::EmptySectionName));
        assert_eq!(section, before);
    }
}
