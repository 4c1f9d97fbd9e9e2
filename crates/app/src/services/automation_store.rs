//! Automation store: the authoritative in-memory collection.
//!
//! Every operation validates its input and resolves every referenced id
//! before it mutates anything, so a failed call leaves the collection exactly
//! as it was. Mutations return a snapshot of the record they produced.

use std::collections::HashSet;

use opsdeck_domain::automation::{
    Automation, AutomationPatch, AutomationStatus, NewAutomation, normalize_cron_expression,
};
use opsdeck_domain::config::{
    ConfigEntry, ConfigSection, ConfigValue, NewConfigEntry, NewConfigSection, SectionPatch,
};
use opsdeck_domain::error::{NotFoundError, OpsDeckError, ValidationError};
use opsdeck_domain::id::{AutomationId, EntryId, IdKind, SectionId};
use opsdeck_domain::query::{AutomationFilter, ScheduleEntry};
use opsdeck_domain::summary::DashboardSummary;
use opsdeck_domain::time;

use crate::ports::IdGenerator;

/// How many candidates a generator may offer before allocation gives up.
const MAX_ID_ATTEMPTS: usize = 64;

/// In-memory collection of automations with an owned id generator.
#[derive(Debug)]
pub struct AutomationStore<G> {
    automations: Vec<Automation>,
    ids: G,
}

impl<G: IdGenerator> AutomationStore<G> {
    /// Create an empty store.
    pub fn new(ids: G) -> Self {
        Self {
            automations: Vec::new(),
            ids,
        }
    }

    /// Create a store pre-populated with `automations`.
    ///
    /// # Errors
    ///
    /// Returns [`OpsDeckError::Validation`] when a record is invalid or two
    /// records share an id.
    pub fn with_automations(automations: Vec<Automation>, ids: G) -> Result<Self, OpsDeckError> {
        let mut seen = HashSet::with_capacity(automations.len());
        for automation in &automations {
            automation.validate()?;
            if !seen.insert(automation.id.as_str()) {
                return Err(ValidationError::DuplicateId {
                    kind: IdKind::Automation,
                    id: automation.id.to_string(),
                }
                .into());
            }
        }
        tracing::debug!(count = automations.len(), "store seeded");
        Ok(Self { automations, ids })
    }

    // -- reads ---------------------------------------------------------------

    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no automation has `id`.
    pub fn get(&self, id: &AutomationId) -> Result<&Automation, NotFoundError> {
        let index = self.position(id)?;
        Ok(&self.automations[index])
    }

    /// All automations in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Automation] {
        &self.automations
    }

    #[must_use]
    pub fn list_filtered(&self, filter: &AutomationFilter) -> Vec<&Automation> {
        self.automations
            .iter()
            .filter(|a| filter.matches(a))
            .collect()
    }

    #[must_use]
    pub fn summary(&self, recent_limit: usize) -> DashboardSummary {
        DashboardSummary::from_automations(&self.automations, recent_limit)
    }

    /// Scheduling rows for the automations matching `filter`.
    #[must_use]
    pub fn schedules(&self, filter: &AutomationFilter) -> Vec<ScheduleEntry> {
        self.automations
            .iter()
            .filter(|a| filter.matches(a))
            .map(ScheduleEntry::from)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.automations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.automations.is_empty()
    }

    // -- automations ---------------------------------------------------------

    /// Append a new draft automation.
    ///
    /// # Errors
    ///
    /// Returns [`OpsDeckError::Validation`] for blank name or owner, or
    /// [`OpsDeckError::IdExhausted`] when no fresh id could be allocated.
    pub fn create(&mut self, fields: NewAutomation) -> Result<Automation, OpsDeckError> {
        fields.validate()?;
        let id = AutomationId::new(self.fresh_id(IdKind::Automation, &mut Minted::new())?)?;
        let automation = Automation::create(id, fields, time::now())?;
        tracing::debug!(automation_id = %automation.id, name = %automation.name, "automation created");
        self.automations.push(automation.clone());
        Ok(automation)
    }

    /// Append a deep copy of an automation with fresh ids at every level.
    ///
    /// # Errors
    ///
    /// Returns [`OpsDeckError::NotFound`] when no automation has `id`.
    pub fn duplicate(&mut self, id: &AutomationId) -> Result<Automation, OpsDeckError> {
        let source = self.get(id)?.clone();
        let mut minted = Minted::new();
        let copy = source.duplicate(time::now(), |kind| self.fresh_id(kind, &mut minted))?;
        copy.validate()?;
        tracing::debug!(source_id = %id, automation_id = %copy.id, "automation duplicated");
        self.automations.push(copy.clone());
        Ok(copy)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`OpsDeckError::NotFound`] when no automation has `id`, or
    /// [`OpsDeckError::Validation`] when the result would be invalid.
    pub fn update(
        &mut self,
        id: &AutomationId,
        patch: AutomationPatch,
    ) -> Result<Automation, OpsDeckError> {
        let automation = self.get_mut(id)?;
        automation.apply(patch, time::now())?;
        tracing::debug!(automation_id = %id, "automation updated");
        Ok(automation.clone())
    }

    /// Remove an automation together with all of its sections and entries.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no automation has `id`.
    pub fn delete(&mut self, id: &AutomationId) -> Result<Automation, NotFoundError> {
        let index = self.position(id)?;
        let removed = self.automations.remove(index);
        tracing::debug!(
            automation_id = %id,
            sections = removed.config.len(),
            "automation deleted"
        );
        Ok(removed)
    }

    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no automation has `id`.
    pub fn set_status(
        &mut self,
        id: &AutomationId,
        status: AutomationStatus,
    ) -> Result<Automation, NotFoundError> {
        let automation = self.get_mut(id)?;
        automation.status = status;
        automation.touch(time::now());
        tracing::debug!(automation_id = %id, %status, "status changed");
        Ok(automation.clone())
    }

    /// Scheduling toggle: `active` when enabled, `inactive` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no automation has `id`.
    pub fn set_enabled(
        &mut self,
        id: &AutomationId,
        enabled: bool,
    ) -> Result<Automation, NotFoundError> {
        let status = if enabled {
            AutomationStatus::Active
        } else {
            AutomationStatus::Inactive
        };
        self.set_status(id, status)
    }

    /// Set or clear the schedule string. A blank string clears it.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no automation has `id`.
    pub fn set_cron_expression(
        &mut self,
        id: &AutomationId,
        cron_expression: Option<String>,
    ) -> Result<Automation, NotFoundError> {
        let automation = self.get_mut(id)?;
        automation.cron_expression = normalize_cron_expression(cron_expression);
        automation.touch(time::now());
        tracing::debug!(
            automation_id = %id,
            scheduled = automation.is_scheduled(),
            "schedule changed"
        );
        Ok(automation.clone())
    }

    /// Set every automation to `inactive`, returning how many were touched.
    pub fn disable_all(&mut self) -> usize {
        let now = time::now();
        for automation in &mut self.automations {
            automation.status = AutomationStatus::Inactive;
            automation.touch(now);
        }
        tracing::info!(count = self.automations.len(), "all automations disabled");
        self.automations.len()
    }

    // -- config sections -----------------------------------------------------

    /// Append a section (and any initial entries) with fresh ids.
    ///
    /// # Errors
    ///
    /// Returns [`OpsDeckError::Validation`] for a blank name or invalid
    /// entry, or [`OpsDeckError::NotFound`] when the automation is missing.
    pub fn add_config_section(
        &mut self,
        automation_id: &AutomationId,
        section: NewConfigSection,
    ) -> Result<ConfigSection, OpsDeckError> {
        section.validate()?;
        let index = self.position(automation_id)?;
        let mut minted = Minted::new();
        let section_id = SectionId::new(self.fresh_id(IdKind::Section, &mut minted)?)?;
        let section = section.into_section(section_id, || {
            Ok(EntryId::new(self.fresh_id(IdKind::Entry, &mut minted)?)?)
        })?;
        section.validate()?;

        let automation = &mut self.automations[index];
        automation.config.push(section.clone());
        automation.touch(time::now());
        tracing::debug!(
            automation_id = %automation_id,
            section_id = %section.id,
            entries = section.entries.len(),
            "config section added"
        );
        Ok(section)
    }

    /// Rename or re-describe a section.
    ///
    /// # Errors
    ///
    /// Returns [`OpsDeckError::NotFound`] when either parent is missing, or
    /// [`OpsDeckError::Validation`] for a blank name.
    pub fn update_config_section(
        &mut self,
        automation_id: &AutomationId,
        section_id: &SectionId,
        patch: SectionPatch,
    ) -> Result<ConfigSection, OpsDeckError> {
        let automation = self.get_mut(automation_id)?;
        let section = automation.section_mut(section_id).inspect_err(log_miss)?;
        section.apply(patch)?;
        let updated = section.clone();
        automation.touch(time::now());
        tracing::debug!(automation_id = %automation_id, section_id = %section_id, "config section updated");
        Ok(updated)
    }

    /// Remove a section and all of its entries.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when either the automation or the section is
    /// missing.
    pub fn remove_config_section(
        &mut self,
        automation_id: &AutomationId,
        section_id: &SectionId,
    ) -> Result<ConfigSection, NotFoundError> {
        let automation = self.get_mut(automation_id)?;
        let removed = automation.remove_section(section_id).inspect_err(log_miss)?;
        automation.touch(time::now());
        tracing::debug!(
            automation_id = %automation_id,
            section_id = %section_id,
            entries = removed.entries.len(),
            "config section removed"
        );
        Ok(removed)
    }

    // -- config entries ------------------------------------------------------

    /// Append an entry with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`OpsDeckError::Validation`] for a blank key or non-finite
    /// number, or [`OpsDeckError::NotFound`] when either parent is missing.
    pub fn add_config_entry(
        &mut self,
        automation_id: &AutomationId,
        section_id: &SectionId,
        entry: NewConfigEntry,
    ) -> Result<ConfigEntry, OpsDeckError> {
        entry.validate()?;
        let index = self.position(automation_id)?;
        self.automations[index]
            .section(section_id)
            .inspect_err(log_miss)?;
        let entry_id = EntryId::new(self.fresh_id(IdKind::Entry, &mut Minted::new())?)?;
        let entry = entry.into_entry(entry_id);

        let automation = &mut self.automations[index];
        automation.section_mut(section_id)?.entries.push(entry.clone());
        automation.touch(time::now());
        tracing::debug!(
            automation_id = %automation_id,
            section_id = %section_id,
            entry_id = %entry.id,
            entry_type = %entry.entry_type(),
            "config entry added"
        );
        Ok(entry)
    }

    /// # Errors
    ///
    /// Returns [`NotFoundError`] when the automation, section, or entry is
    /// missing.
    pub fn remove_config_entry(
        &mut self,
        automation_id: &AutomationId,
        section_id: &SectionId,
        entry_id: &EntryId,
    ) -> Result<ConfigEntry, NotFoundError> {
        let automation = self.get_mut(automation_id)?;
        let removed = automation
            .section_mut(section_id)
            .and_then(|section| section.remove_entry(entry_id))
            .inspect_err(log_miss)?;
        automation.touch(time::now());
        tracing::debug!(
            automation_id = %automation_id,
            section_id = %section_id,
            entry_id = %entry_id,
            "config entry removed"
        );
        Ok(removed)
    }

    /// Replace an entry's value. The entry's type never changes.
    ///
    /// # Errors
    ///
    /// Returns [`OpsDeckError::NotFound`] when the automation, section, or
    /// entry is missing, or [`OpsDeckError::Validation`] when `value` is of
    /// a different type than the entry.
    pub fn update_config_entry_value(
        &mut self,
        automation_id: &AutomationId,
        section_id: &SectionId,
        entry_id: &EntryId,
        value: ConfigValue,
    ) -> Result<ConfigEntry, OpsDeckError> {
        let automation = self.get_mut(automation_id)?;
        let entry = automation
            .section_mut(section_id)
            .and_then(|section| section.entry_mut(entry_id))
            .inspect_err(log_miss)?;
        entry.set_value(value)?;
        let updated = entry.clone();
        automation.touch(time::now());
        tracing::debug!(
            automation_id = %automation_id,
            section_id = %section_id,
            entry_id = %entry_id,
            "config entry value updated"
        );
        Ok(updated)
    }

    // -- internals -----------------------------------------------------------

    fn position(&self, id: &AutomationId) -> Result<usize, NotFoundError> {
        self.automations
            .iter()
            .position(|a| &a.id == id)
            .ok_or_else(|| NotFoundError::new(IdKind::Automation, id.as_str()))
            .inspect_err(log_miss)
    }

    fn get_mut(&mut self, id: &AutomationId) -> Result<&mut Automation, NotFoundError> {
        let index = self.position(id)?;
        Ok(&mut self.automations[index])
    }

    /// Ask the generator for ids until one is unused anywhere in the store
    /// and not already handed out earlier in the same call.
    fn fresh_id(&mut self, kind: IdKind, minted: &mut Minted) -> Result<String, OpsDeckError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self.ids.next_id(kind);
            if !candidate.trim().is_empty()
                && !self.id_in_use(kind, &candidate)
                && minted.insert((kind, candidate.clone()))
            {
                return Ok(candidate);
            }
            tracing::debug!(%kind, %candidate, "generated id already in use");
        }
        Err(OpsDeckError::IdExhausted {
            kind,
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    fn id_in_use(&self, kind: IdKind, candidate: &str) -> bool {
        let sections = || self.automations.iter().flat_map(|a| &a.config);
        match kind {
            IdKind::Automation => self.automations.iter().any(|a| a.id.as_str() == candidate),
            IdKind::Section => sections().any(|s| s.id.as_str() == candidate),
            IdKind::Entry => sections()
                .flat_map(|s| &s.entries)
                .any(|e| e.id.as_str() == candidate),
        }
    }
}

/// Ids allocated so far by a call that mints several at once.
type Minted = HashSet<(IdKind, String)>;

fn log_miss(err: &NotFoundError) {
    tracing::debug!(entity = err.entity, id = %err.id, "not found");
}
