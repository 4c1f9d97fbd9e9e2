//! Partial updates of an automation.

use serde::Deserialize;

use super::kind::{AutomationKind, AutomationStatus, Environment};
use super::tags::Tags;
use crate::error::ValidationError;

/// Fields that identify a record or record its provenance. A patch may never
/// name them.
pub const PROTECTED_FIELDS: [&str; 5] = ["id", "createdAt", "lastModified", "version", "config"];

/// The updatable subset of an automation's fields.
///
/// `None` leaves a field untouched. `cron_expression` is tri-state:
/// `None` leaves it, `Some(None)` clears it, `Some(Some(_))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AutomationPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<AutomationKind>,
    pub status: Option<AutomationStatus>,
    pub environment: Option<Environment>,
    pub owner: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_util::present")]
    pub cron_expression: Option<Option<String>>,
    pub tags: Option<Tags>,
}

impl AutomationPatch {
    /// Parse a patch from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ProtectedField`] when the object names a
    /// field from [`PROTECTED_FIELDS`], or [`ValidationError::InvalidPatch`]
    /// for any other malformed or unknown field.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ValidationError> {
        if let Some(object) = value.as_object()
            && let Some(field) = PROTECTED_FIELDS.iter().find(|f| object.contains_key(**f))
        {
            return Err(ValidationError::ProtectedField((*field).to_string()));
        }
        serde_json::from_value(value).map_err(|err| ValidationError::InvalidPatch(err.to_string()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
