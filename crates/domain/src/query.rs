//! Read-side filtering and the scheduling view.

use serde::{Deserialize, Serialize};

use crate::automation::{Automation, AutomationKind, AutomationStatus, Environment};
use crate::id::AutomationId;

/// Criteria for narrowing a list of automations.
///
/// Every criterion is optional; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationFilter {
    /// Case-insensitive substring matched against name, type, environment,
    /// owner, and tags.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<AutomationStatus>,
    #[serde(default, rename = "type")]
    pub kind: Option<AutomationKind>,
    #[serde(default)]
    pub environment: Option<Environment>,
}

impl AutomationFilter {
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: AutomationStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: AutomationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    #[must_use]
    pub fn matches(&self, automation: &Automation) -> bool {
        if self.status.is_some_and(|s| s != automation.status) {
            return false;
        }
        if self.kind.is_some_and(|k| k != automation.kind) {
            return false;
        }
        if self.environment.is_some_and(|e| e != automation.environment) {
            return false;
        }
        match self.search_term() {
            Some(term) => matches_search(automation, &term),
            None => true,
        }
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// `term` must already be lower-cased.
fn matches_search(automation: &Automation, term: &str) -> bool {
    let contains = |haystack: &str| haystack.to_lowercase().contains(term);
    contains(&automation.name)
        || automation.kind.as_str().contains(term)
        || contains(automation.kind.label())
        || automation.environment.as_str().contains(term)
        || contains(&automation.owner)
        || automation.tags.iter().any(|tag| tag.contains(term))
}

/// One row of the scheduling view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: AutomationId,
    pub name: String,
    pub enabled: bool,
    pub cron_expression: Option<String>,
    pub status: AutomationStatus,
}

impl From<&Automation> for ScheduleEntry {
    fn from(automation: &Automation) -> Self {
        Self {
            id: automation.id.clone(),
            name: automation.name.clone(),
            enabled: automation.status.is_enabled(),
            cron_expression: automation.cron_expression.clone(),
            status: automation.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str, name: &str) -> Automation {
        Automation::builder()
            .id(AutomationId::new(id).unwrap())
            .name(name)
            .owner("Grace Hopper")
            .kind(AutomationKind::DataPipeline)
            .environment(Environment::Staging)
            .tag("etl")
            .build()
            .unwrap()
    }

    #[test]
    fn should_match_everything_when_filter_is_empty() {
        assert!(AutomationFilter::default().matches(&sample("auto-1", "Sync")));
    }

    #[test]
    fn should_match_name_case_insensitively() {
        let filter = AutomationFilter::default().search("NIGHTLY");
        assert!(filter.matches(&sample("auto-1", "Nightly Sync")));
        assert!(!filter.matches(&sample("auto-2", "Invoice Bot")));
    }

    #[test]
    fn should_match_owner_tag_and_type_label() {
        let auto = sample("auto-1", "Sync");
        assert!(AutomationFilter::default().search("hopper").matches(&auto));
        assert!(AutomationFilter::default().search("ETL").matches(&auto));
        assert!(AutomationFilter::default().search("data pipeline").matches(&auto));
        assert!(AutomationFilter::default().search("staging").matches(&auto));
    }

    #[test]
    fn should_ignore_blank_search_term() {
        let filter = AutomationFilter::default().search("   ");
        assert!(filter.matches(&sample("auto-1", "Sync")));
    }

    #[test]
    fn should_reject_when_status_differs() {
        let filter = AutomationFilter::default().status(AutomationStatus::Active);
        assert!(!filter.matches(&sample("auto-1", "Sync")));
    }

    #[test]
    fn should_combine_criteria_with_and() {
        let auto = sample("auto-1", "Sync");
        let filter = AutomationFilter::default()
            .kind(AutomationKind::DataPipeline)
            .environment(Environment::Production);
        assert!(!filter.matches(&auto));
    }

    #[test]
    fn should_deserialize_type_query_key() {
        let filter: AutomationFilter =
            serde_json::from_str(r#"{"type":"file-transfer","status":"error"}"#).unwrap();
        assert_eq!(filter.kind, Some(AutomationKind::FileTransfer));
        assert_eq!(filter.status, Some(AutomationStatus::Error));
    }

    #[test]
    fn should_report_enabled_only_when_active() {
        let mut auto = sample("auto-1", "Sync");
        assert!(!ScheduleEntry::from(&auto).enabled);
        auto.status = AutomationStatus::Active;
        assert!(ScheduleEntry::from(&auto).enabled);
    }
}
