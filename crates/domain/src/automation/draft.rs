//! Caller-supplied fields for creating an automation.

use serde::Deserialize;

use super::kind::{AutomationKind, Environment};
use super::tags::Tags;
use crate::error::ValidationError;

/// Fields a caller provides when creating an automation.
///
/// Identity, timestamps, version, status, and configuration are assigned by
/// the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAutomation {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AutomationKind,
    pub environment: Environment,
    pub owner: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cron_expression: Option<String>,
    #[serde(default)]
    pub tags: Tags,
}

impl NewAutomation {
    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] or [`ValidationError::EmptyOwner`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.owner.trim().is_empty() {
            return Err(ValidationError::EmptyOwner);
        }
        Ok(())
    }
}
