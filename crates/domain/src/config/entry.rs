//! Config entry: one typed key/value setting inside a section.

use serde::{Deserialize, Serialize};

use super::format::EntryFormat;
use super::value::{ConfigEntryType, ConfigValue};
use crate::error::ValidationError;
use crate::id::EntryId;

/// A typed key/value pair.
///
/// On the wire the entry is flat: `{"id", "key", "type", "value",
/// "description"?, "required"}`. Decoding fails when `value` does not match
/// `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "EntryRepr", try_from = "EntryRepr")]
pub struct ConfigEntry {
    pub id: EntryId,
    pub key: String,
    pub value: ConfigValue,
    pub description: Option<String>,
    /// Informational only, never enforced.
    pub required: bool,
}

impl ConfigEntry {
    #[must_use]
    pub fn entry_type(&self) -> ConfigEntryType {
        self.value.entry_type()
    }

    /// Replace the value, keeping the declared type.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ValueTypeMismatch`] when `value` is of a
    /// different type, or [`ValidationError::NonFiniteNumber`].
    pub fn set_value(&mut self, value: ConfigValue) -> Result<(), ValidationError> {
        let expected = self.entry_type();
        if value.entry_type() != expected {
            return Err(ValidationError::ValueTypeMismatch {
                expected,
                found: value.entry_type().as_str(),
            });
        }
        value.validate()?;
        self.value = value;
        Ok(())
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyEntryKey`] or
    /// [`ValidationError::NonFiniteNumber`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key.trim().is_empty() {
            return Err(ValidationError::EmptyEntryKey);
        }
        self.value.validate()
    }
}

#[derive(Serialize, Deserialize)]
struct EntryRepr {
    id: EntryId,
    key: String,
    #[serde(rename = "type")]
    entry_type: ConfigEntryType,
    value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    required: bool,
}

impl From<ConfigEntry> for EntryRepr {
    fn from(entry: ConfigEntry) -> Self {
        Self {
            entry_type: entry.entry_type(),
            value: entry.value.to_json(),
            id: entry.id,
            key: entry.key,
            description: entry.description,
            required: entry.required,
        }
    }
}

impl TryFrom<EntryRepr> for ConfigEntry {
    type Error = ValidationError;

    fn try_from(repr: EntryRepr) -> Result<Self, Self::Error> {
        Ok(Self {
            id: repr.id,
            key: repr.key,
            value: ConfigValue::from_json(repr.entry_type, repr.value)?,
            description: repr.description,
            required: repr.required,
        })
    }
}

/// Caller-supplied fields for a new entry; the store assigns the id.
///
/// Decodes from `{"key", "type", "value"?, "format"?, "description"?,
/// "required"?}`. When `value` is omitted the type's (or format's) default is
/// used.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "NewEntryRepr")]
pub struct NewConfigEntry {
    pub key: String,
    pub value: ConfigValue,
    pub description: Option<String>,
    pub required: bool,
}

impl NewConfigEntry {
    #[must_use]
    pub fn new(key: impl Into<String>, value: ConfigValue) -> Self {
        Self {
            key: key.into(),
            value,
            description: None,
            required: false,
        }
    }

    /// New entry holding the default value of `format`.
    #[must_use]
    pub fn from_format(key: impl Into<String>, format: EntryFormat) -> Self {
        Self::new(key, format.default_value())
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyEntryKey`] or
    /// [`ValidationError::NonFiniteNumber`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key.trim().is_empty() {
            return Err(ValidationError::EmptyEntryKey);
        }
        self.value.validate()
    }

    /// Attach an id, trimming the key and dropping a blank description.
    #[must_use]
    pub fn into_entry(self, id: EntryId) -> ConfigEntry {
        ConfigEntry {
            id,
            key: self.key.trim().to_string(),
            value: self.value,
            description: self.description.filter(|d| !d.trim().is_empty()),
            required: self.required,
        }
    }
}

#[derive(Deserialize)]
struct NewEntryRepr {
    key: String,
    #[serde(default, rename = "type")]
    entry_type: Option<ConfigEntryType>,
    #[serde(default)]
    format: Option<EntryFormat>,
    #[serde(default)]
    value: Option<serde_json::Value>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    required: bool,
}

impl TryFrom<NewEntryRepr> for NewConfigEntry {
    type Error = ValidationError;

    fn try_from(repr: NewEntryRepr) -> Result<Self, Self::Error> {
        let entry_type = repr
            .entry_type
            .or_else(|| repr.format.map(EntryFormat::storage_type))
            .ok_or(ValidationError::MissingEntryType)?;
        let value = match (repr.value, repr.format) {
            (Some(json), _) => ConfigValue::from_json(entry_type, json)?,
            (None, Some(format)) if format.storage_type() == entry_type => format.default_value(),
            (None, _) => entry_type.default_value(),
        };
        Ok(Self {
            key: repr.key,
            value,
            description: repr.description,
            required: repr.required,
        })
    }
}
