//! Entry formats offered when creating an entry.
//!
//! Formats are finer-grained than storage types (`int4`, `timestamptz`, …) and
//! each collapses onto one [`ConfigEntryType`] with a default value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::value::{ConfigEntryType, ConfigValue};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryFormat {
    #[default]
    Text,
    Uuid,
    Int4,
    Int8,
    Float8,
    Bool,
    Date,
    Time,
    Timestamp,
    Timestamptz,
    Jsonb,
    Secret,
}

impl EntryFormat {
    pub const ALL: [Self; 12] = [
        Self::Text,
        Self::Uuid,
        Self::Int4,
        Self::Int8,
        Self::Float8,
        Self::Bool,
        Self::Date,
        Self::Time,
        Self::Timestamp,
        Self::Timestamptz,
        Self::Jsonb,
        Self::Secret,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Uuid => "uuid",
            Self::Int4 => "int4",
            Self::Int8 => "int8",
            Self::Float8 => "float8",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
            Self::Timestamptz => "timestamptz",
            Self::Jsonb => "jsonb",
            Self::Secret => "secret",
        }
    }

    /// The storage type values of this format are kept as.
    #[must_use]
    pub fn storage_type(self) -> ConfigEntryType {
        match self {
            Self::Int4 | Self::Int8 | Self::Float8 => ConfigEntryType::Number,
            Self::Bool => ConfigEntryType::Boolean,
            Self::Secret => ConfigEntryType::Secret,
            Self::Text
            | Self::Uuid
            | Self::Date
            | Self::Time
            | Self::Timestamp
            | Self::Timestamptz
            | Self::Jsonb => ConfigEntryType::String,
        }
    }

    /// Initial value of a freshly added entry of this format.
    #[must_use]
    pub fn default_value(self) -> ConfigValue {
        match self {
            Self::Jsonb => ConfigValue::String("{}".to_string()),
            other => other.storage_type().default_value(),
        }
    }
}

impl fmt::Display for EntryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "entry format",
                value: s.to_string(),
            })
    }
}
