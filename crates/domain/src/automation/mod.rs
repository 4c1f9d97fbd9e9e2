//! Automation: a managed bot, script, pipeline, or integration record.
//!
//! An [`Automation`] carries descriptive metadata, an optional schedule
//! string, and an ordered tree of configuration sections. All mutations of a
//! single record (patches, section and entry edits) live here; the collection
//! level (id allocation, lookup, bulk operations) lives in the application
//! layer.

mod draft;
mod kind;
mod patch;
mod tags;

pub use draft::NewAutomation;
pub use kind::{AutomationKind, AutomationStatus, Environment};
pub use patch::{AutomationPatch, PROTECTED_FIELDS};
pub use tags::Tags;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigEntry, ConfigSection};
use crate::error::{NotFoundError, OpsDeckError, ValidationError};
use crate::id::{AutomationId, EntryId, IdKind, SectionId};
use crate::time::{self, Timestamp};

/// Version assigned to new and duplicated automations.
pub const DEFAULT_VERSION: &str = "0.1.0";

/// Suffix appended to the name of a duplicated automation.
pub const COPY_SUFFIX: &str = "_copy";

/// A managed automation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Automation {
    pub id: AutomationId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AutomationKind,
    pub status: AutomationStatus,
    pub environment: Environment,
    pub owner: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron_expression: Option<String>,
    #[serde(default)]
    pub tags: Tags,
    pub version: String,
    pub created_at: Timestamp,
    pub last_modified: Timestamp,
    #[serde(default)]
    pub config: Vec<ConfigSection>,
}

impl Automation {
    /// Create a builder for constructing an [`Automation`].
    #[must_use]
    pub fn builder() -> AutomationBuilder {
        AutomationBuilder::default()
    }

    /// Materialise a new draft record from caller-supplied fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when `fields` fails validation.
    pub fn create(
        id: AutomationId,
        fields: NewAutomation,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        fields.validate()?;
        Ok(Self {
            id,
            name: fields.name.trim().to_string(),
            kind: fields.kind,
            status: AutomationStatus::Draft,
            environment: fields.environment,
            owner: fields.owner.trim().to_string(),
            description: fields.description.trim().to_string(),
            cron_expression: normalize_cron_expression(fields.cron_expression),
            tags: fields.tags,
            version: DEFAULT_VERSION.to_string(),
            created_at: now,
            last_modified: now,
            config: Vec::new(),
        })
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`OpsDeckError::Validation`] when:
    /// - `name` or `owner` is blank
    /// - a section or entry is invalid
    /// - two sections share an id
    pub fn validate(&self) -> Result<(), OpsDeckError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.owner.trim().is_empty() {
            return Err(ValidationError::EmptyOwner.into());
        }
        let mut seen = HashSet::with_capacity(self.config.len());
        for section in &self.config {
            section.validate()?;
            if !seen.insert(section.id.as_str()) {
                return Err(ValidationError::DuplicateId {
                    kind: IdKind::Section,
                    id: section.id.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Refresh `last_modified`, never moving it backwards.
    pub fn touch(&mut self, now: Timestamp) {
        self.last_modified = time::advance(self.last_modified, now);
    }

    /// Whether a schedule string is set.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.cron_expression.is_some()
    }

    /// Apply a partial update and refresh `last_modified`.
    ///
    /// The record is left untouched when the patched result is invalid.
    ///
    /// # Errors
    ///
    /// Returns [`OpsDeckError::Validation`] when the patched record would
    /// violate an invariant.
    pub fn apply(&mut self, patch: AutomationPatch, now: Timestamp) -> Result<(), OpsDeckError> {
        let mut next = self.clone();
        if let Some(name) = patch.name {
            next.name = name.trim().to_string();
        }
        if let Some(kind) = patch.kind {
            next.kind = kind;
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(environment) = patch.environment {
            next.environment = environment;
        }
        if let Some(owner) = patch.owner {
            next.owner = owner.trim().to_string();
        }
        if let Some(description) = patch.description {
            next.description = description.trim().to_string();
        }
        if let Some(cron) = patch.cron_expression {
            next.cron_expression = normalize_cron_expression(cron);
        }
        if let Some(tags) = patch.tags {
            next.tags = tags;
        }
        next.validate()?;
        next.touch(now);
        *self = next;
        Ok(())
    }

    /// Deep copy with fresh ids at every level.
    ///
    /// The copy is renamed `<name>_copy`, its timestamps are reset to `now`
    /// and its version to [`DEFAULT_VERSION`]. `next_id` is asked for one id
    /// per automation, section, and entry.
    ///
    /// # Errors
    ///
    /// Propagates any error from `next_id`.
    pub fn duplicate(
        &self,
        now: Timestamp,
        mut next_id: impl FnMut(IdKind) -> Result<String, OpsDeckError>,
    ) -> Result<Self, OpsDeckError> {
        let id = AutomationId::new(next_id(IdKind::Automation)?)?;
        let mut config = Vec::with_capacity(self.config.len());
        for section in &self.config {
            let section_id = SectionId::new(next_id(IdKind::Section)?)?;
            let mut entries = Vec::with_capacity(section.entries.len());
            for entry in &section.entries {
                entries.push(ConfigEntry {
                    id: EntryId::new(next_id(IdKind::Entry)?)?,
                    ..entry.clone()
                });
            }
            config.push(ConfigSection {
                id: section_id,
                name: section.name.clone(),
                description: section.description.clone(),
                entries,
            });
        }
        Ok(Self {
            id,
            name: format!("{}{COPY_SUFFIX}", self.name),
            version: DEFAULT_VERSION.to_string(),
            created_at: now,
            last_modified: now,
            config,
            ..self.clone()
        })
    }

    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no section has `id`.
    pub fn section(&self, id: &SectionId) -> Result<&ConfigSection, NotFoundError> {
        self.config
            .iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| NotFoundError::new(IdKind::Section, id.as_str()))
    }

    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no section has `id`.
    pub fn section_mut(&mut self, id: &SectionId) -> Result<&mut ConfigSection, NotFoundError> {
        self.config
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| NotFoundError::new(IdKind::Section, id.as_str()))
    }

    /// Remove a section together with all of its entries.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no section has `id`.
    pub fn remove_section(&mut self, id: &SectionId) -> Result<ConfigSection, NotFoundError> {
        let index = self
            .config
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| NotFoundError::new(IdKind::Section, id.as_str()))?;
        Ok(self.config.remove(index))
    }

    /// Every section and entry id nested under this automation.
    pub fn descendant_ids(&self) -> impl Iterator<Item = &str> {
        self.config.iter().flat_map(|section| {
            std::iter::once(section.id.as_str())
                .chain(section.entries.iter().map(|e| e.id.as_str()))
        })
    }
}

/// Trim a schedule string; blank means unscheduled.
#[must_use]
pub fn normalize_cron_expression(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Step-by-step builder for [`Automation`], used for seeding and tests.
#[derive(Debug, Default)]
pub struct AutomationBuilder {
    id: Option<AutomationId>,
    name: Option<String>,
    kind: AutomationKind,
    status: AutomationStatus,
    environment: Environment,
    owner: Option<String>,
    description: String,
    cron_expression: Option<String>,
    tags: Vec<String>,
    version: Option<String>,
    created_at: Option<Timestamp>,
    last_modified: Option<Timestamp>,
    config: Vec<ConfigSection>,
}

impl AutomationBuilder {
    #[must_use]
    pub fn id(mut self, id: AutomationId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: AutomationKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn status(mut self, status: AutomationStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn cron_expression(mut self, cron: impl Into<String>) -> Self {
        self.cron_expression = Some(cron.into());
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn created_at(mut self, ts: Timestamp) -> Self {
        self.created_at = Some(ts);
        self
    }

    #[must_use]
    pub fn last_modified(mut self, ts: Timestamp) -> Self {
        self.last_modified = Some(ts);
        self
    }

    #[must_use]
    pub fn section(mut self, section: ConfigSection) -> Self {
        self.config.push(section);
        self
    }

    /// Consume the builder, validate, and return an [`Automation`].
    ///
    /// `last_modified` defaults to `created_at`, which defaults to now.
    ///
    /// # Errors
    ///
    /// Returns [`OpsDeckError::Validation`] if the id is missing, a required
    /// field is blank, a tag is invalid, or the config tree is inconsistent.
    pub fn build(self) -> Result<Automation, OpsDeckError> {
        let id = self
            .id
            .ok_or(ValidationError::EmptyId(IdKind::Automation))?;
        let created_at = self.created_at.unwrap_or_else(time::now);
        let automation = Automation {
            id,
            name: self.name.unwrap_or_default(),
            kind: self.kind,
            status: self.status,
            environment: self.environment,
            owner: self.owner.unwrap_or_default(),
            description: self.description,
            cron_expression: normalize_cron_expression(self.cron_expression),
            tags: Tags::try_from(self.tags)?,
            version: self.version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            created_at,
            last_modified: self
                .last_modified
                .map_or(created_at, |ts| time::advance(created_at, ts)),
            config: self.config,
        };
        automation.validate()?;
        Ok(automation)
    }
}
