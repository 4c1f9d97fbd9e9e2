//! Typed identifier newtypes.
//!
//! Identifiers are opaque strings such as `auto-007` or `cs-012`. They are
//! minted by the application layer (see `opsdeck_app::ports::IdGenerator`),
//! never by the domain itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The scope an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Automation,
    Section,
    Entry,
}

impl IdKind {
    pub const ALL: [Self; 3] = [Self::Automation, Self::Section, Self::Entry];

    /// Short prefix used when formatting generated ids.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Automation => "auto",
            Self::Section => "cs",
            Self::Entry => "ce",
        }
    }

    /// Human-readable name, used in error messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Automation => "Automation",
            Self::Section => "ConfigSection",
            Self::Entry => "ConfigEntry",
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident, $kind:expr) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Scope this identifier belongs to.
            pub const KIND: IdKind = $kind;

            /// Wrap an already-generated identifier.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::EmptyId`] when `value` is blank.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(ValidationError::EmptyId(Self::KIND));
                }
                Ok(Self(value))
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for an [`Automation`](crate::automation::Automation).
    AutomationId,
    IdKind::Automation
);

define_id!(
    /// Identifier for a [`ConfigSection`](crate::config::ConfigSection), unique within its automation.
    SectionId,
    IdKind::Section
);

define_id!(
    /// Identifier for a [`ConfigEntry`](crate::config::ConfigEntry), unique within its section.
    EntryId,
    IdKind::Entry
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_through_display_and_from_str() {
        let id = AutomationId::new("auto-001").unwrap();
        let parsed: AutomationId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn should_serialize_as_plain_string() {
        let id = SectionId::new("cs-004").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"cs-004\"");
    }

    #[test]
    fn should_reject_blank_id() {
        let result = EntryId::from_str("   ");
        assert_eq!(result, Err(ValidationError::EmptyId(IdKind::Entry)));
    }

    #[test]
    fn should_reject_blank_id_when_deserializing() {
        assert!(serde_json::from_str::<AutomationId>("\"\"").is_err());
        assert!(serde_json::from_str::<SectionId>("\"  \"").is_err());

        let id: EntryId = serde_json::from_str("\"ce-003\"").unwrap();
        assert_eq!(id.as_str(), "ce-003");
    }

    #[test]
    fn should_expose_prefix_per_kind() {
        let prefixes: Vec<&str> = IdKind::ALL.iter().map(|k| k.prefix()).collect();
        assert_eq!(prefixes, ["auto", "cs", "ce"]);
    }
}
