//! Automation service: shared, thread-safe access to the automation store.

use std::sync::{Mutex, MutexGuard, PoisonError};

use opsdeck_domain::automation::{Automation, AutomationPatch, AutomationStatus, NewAutomation};
use opsdeck_domain::config::{
    ConfigEntry, ConfigSection, ConfigValue, NewConfigEntry, NewConfigSection, SectionPatch,
};
use opsdeck_domain::error::OpsDeckError;
use opsdeck_domain::id::{AutomationId, EntryId, SectionId};
use opsdeck_domain::query::{AutomationFilter, ScheduleEntry};
use opsdeck_domain::summary::DashboardSummary;

use super::automation_store::AutomationStore;
use crate::ports::IdGenerator;

/// Application service serialising every operation on one store.
///
/// All methods take `&self`, so the service can be shared behind an `Arc`
/// between request handlers. Results are owned snapshots.
pub struct AutomationService<G> {
    store: Mutex<AutomationStore<G>>,
}

impl<G: IdGenerator> AutomationService<G> {
    /// Wrap an existing store.
    pub fn new(store: AutomationStore<G>) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Store operations never panic halfway through a mutation, so a
    /// poisoned lock still guards a consistent collection.
    fn store(&self) -> MutexGuard<'_, AutomationStore<G>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// # Errors
    ///
    /// Returns [`OpsDeckError::NotFound`] when no automation has `id`.
    pub fn get(&self, id: &AutomationId) -> Result<Automation, OpsDeckError> {
        Ok(self.store().get(id)?.clone())
    }

    pub fn list(&self) -> Vec<Automation> {
        self.store().list().to_vec()
    }

    pub fn list_filtered(&self, filter: &AutomationFilter) -> Vec<Automation> {
        self.store()
            .list_filtered(filter)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn summary(&self, recent_limit: usize) -> DashboardSummary {
        self.store().summary(recent_limit)
    }

    pub fn schedules(&self, filter: &AutomationFilter) -> Vec<ScheduleEntry> {
        self.store().schedules(filter)
    }

    pub fn len(&self) -> usize {
        self.store().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store().is_empty()
    }

    /// # Errors
    ///
    /// Returns [`OpsDeckError::Validation`] if invariants fail.
    #[tracing::instrument(skip(self, draft), fields(automation_name = %draft.name))]
    pub fn create(&self, draft: NewAutomation) -> Result<Automation, OpsDeckError> {
        self.store().create(draft)
    }

    /// # Errors
    ///
    /// Returns [`OpsDeckError::NotFound`] when no automation has `id`.
    #[tracing::instrument(skip(self))]
    pub fn duplicate(&self, id: &AutomationId) -> Result<Automation, OpsDeckError> {
        self.store().duplicate(id)
    }

    /// # Errors
    ///
    /// Returns [`OpsDeckError::NotFound`] or [`OpsDeckError::Validation`].
    #[tracing::instrument(skip(self, patch))]
    pub fn update(
        &self,
        id: &AutomationId,
        patch: AutomationPatch,
    ) -> Result<Automation, OpsDeckError> {
        self.store().update(id, patch)
    }

    /// # Errors
    ///
    /// Returns [`OpsDeckError::NotFound`] when no automation has `id`.
    #[tracing::instrument(skip(self))]
    pub fn delete(&self, id: &AutomationId) -> Result<Automation, OpsDeckError> {
        Ok(self.store().delete(id)?)
    }

    /// # Errors
    ///
    /// Returns [`OpsDeckError::NotFound`] when no automation has `id`.
    #[tracing::instrument(skip(self))]
    pub fn set_status(
        &self,
        id: &AutomationId,
        status: AutomationStatus,
    ) -> Result<Automation, OpsDeckError> {
        Ok(self.store().set_status(id, status)?)
    }

    /// # Errors
    ///
    /// Returns [`OpsDeckError::NotFound`] when no automation has `id`.
    #[tracing::instrument(skip(self))]
    pub fn set_enabled(&self, id: &AutomationId, enabled: bool) -> Result<Automation, OpsDeckError> {
        Ok(self.store().set_enabled(id, enabled)?)
    }

    /// # Errors
    ///
    /// Returns [`OpsDeckError::NotFound`] when no automation has `id`.
    #[tracing::instrument(skip(self))]
    pub fn set_cron_expression(
        &self,
        id: &AutomationId,
        cron_expression: Option<String>,
    ) -> Result<Automation, OpsDeckError> {
        Ok(self.store().set_cron_expression(id, cron_expression)?)
    }

    #[tracing::instrument(skip(self))]
    pub fn disable_all(&self) -> usize {
        self.store().disable_all()
    }

    /// # Errors
    ///
    /// Returns [`OpsDeckError::NotFound`] or [`OpsDeckError::Validation`].
    #[tracing::instrument(skip(self, section), fields(section_name = %section.name))]
    pub fn add_config_section(
        &self,
        automation_id: &AutomationId,
        section: NewConfigSection,
    ) -> Result<ConfigSection, OpsDeckError> {
        self.store().add_config_section(automation_id, section)
    }

    /// # Errors
    ///
    /// Returns [`OpsDeckError::NotFound`] or [`OpsDeckError::Validation`].
    #[tracing::instrument(skip(self, patch))]
    pub fn update_config_section(
        &self,
        automation_id: &AutomationId,
        section_id: &SectionId,
        patch: SectionPatch,
    ) -> Result<ConfigSection, OpsDeckError> {
        self.store()
            .update_config_section(automation_id, section_id, patch)
    }

    /// # Errors
    ///
    /// Returns [`OpsDeckError::NotFound`] when either parent is missing.
    #[tracing::instrument(skip(self))]
    pub fn remove_config_section(
        &self,
        automation_id: &AutomationId,
        section_id: &SectionId,
    ) -> Result<ConfigSection, OpsDeckError> {
        Ok(self
            .store()
            .remove_config_section(automation_id, section_id)?)
    }

    /// # Errors
    ///
    /// Returns [`OpsDeckError::NotFound`] or [`OpsDeckError::Validation`].
    #[tracing::instrument(skip(self, entry), fields(key = %entry.key))]
    pub fn add_config_entry(
        &self,
        automation_id: &AutomationId,
        section_id: &SectionId,
        entry: NewConfigEntry,
    ) -> Result<ConfigEntry, OpsDeckError> {
        self.store()
            .add_config_entry(automation_id, section_id, entry)
    }

    /// # Errors
    ///
    /// Returns [`OpsDeckError::NotFound`] when the automation, section, or
    /// entry is missing.
    #[tracing::instrument(skip(self))]
    pub fn remove_config_entry(
        &self,
        automation_id: &AutomationId,
        section_id: &SectionId,
        entry_id: &EntryId,
    ) -> Result<ConfigEntry, OpsDeckError> {
        Ok(self
            .store()
            .remove_config_entry(automation_id, section_id, entry_id)?)
    }

    /// # Errors
    ///
    /// Returns [`OpsDeckError::NotFound`] or [`OpsDeckError::Validation`].
    #[tracing::instrument(skip(self, value), fields(value_type = %value.entry_type()))]
    pub fn update_config_entry_value(
        &self,
        automation_id: &AutomationId,
        section_id: &SectionId,
        entry_id: &EntryId,
        value: ConfigValue,
    ) -> Result<ConfigEntry, OpsDeckError> {
        self.store()
            .update_config_entry_value(automation_id, section_id, entry_id, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id_generator::SequentialIdGenerator;
    use opsdeck_domain::automation::{AutomationKind, Environment};
    use opsdeck_domain::error::ValidationError;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn make_service() -> AutomationService<SequentialIdGenerator> {
        AutomationService::new(AutomationStore::new(SequentialIdGenerator::default()))
    }

    fn valid_automation() -> NewAutomation {
        NewAutomation {
            name: "Nightly Sync".to_string(),
            kind: AutomationKind::DataPipeline,
            environment: Environment::Production,
            owner: "Ana".to_string(),
            ..NewAutomation::default()
        }
    }

    #[test]
    fn should_create_automation_when_valid() {
        let svc = make_service();
        let created = svc.create(valid_automation()).unwrap();

        let fetched = svc.get(&created.id).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn should_reject_create_when_name_is_empty() {
        let svc = make_service();
        let mut fields = valid_automation();
        fields.name = String::new();

        let result = svc.create(fields);
        assert!(matches!(
            result,
            Err(OpsDeckError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_return_not_found_when_automation_missing() {
        let svc = make_service();
        let result = svc.get(&AutomationId::new("auto-404").unwrap());
        assert!(matches!(result, Err(OpsDeckError::NotFound(_))));
    }

    #[test]
    fn should_return_snapshots_not_live_records() {
        let svc = make_service();
        let created = svc.create(valid_automation()).unwrap();
        let mut snapshot = svc.get(&created.id).unwrap();
        snapshot.name = "changed locally".to_string();

        assert_eq!(svc.get(&created.id).unwrap().name, "Nightly Sync");
    }

    #[test]
    fn should_serialise_concurrent_writers() {
        let svc = Arc::new(make_service());

        thread::scope(|scope| {
            for _ in 0..8 {
                let svc = Arc::clone(&svc);
                scope.spawn(move || {
                    for _ in 0..25 {
                        let auto = svc.create(valid_automation()).unwrap();
                        svc.add_config_section(&auto.id, NewConfigSection::new("DB"))
                            .unwrap();
                    }
                });
            }
        });

        let all = svc.list();
        assert_eq!(all.len(), 200);
        let ids: HashSet<_> = all.iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids.len(), 200);
        let sections: HashSet<_> = all.iter().map(|a| a.config[0].id.clone()).collect();
        assert_eq!(sections.len(), 200);
    }

    #[test]
    fn should_disable_all_through_service() {
        let svc = make_service();
        let auto = svc.create(valid_automation()).unwrap();
        svc.set_enabled(&auto.id, true).unwrap();

        assert_eq!(svc.disable_all(), 1);
        assert_eq!(
            svc.get(&auto.id).unwrap().status,
            AutomationStatus::Inactive
        );
    }
}
