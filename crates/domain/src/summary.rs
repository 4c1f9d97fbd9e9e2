//! Dashboard aggregates.

use serde::Serialize;

use crate::automation::{Automation, AutomationKind, AutomationStatus};
use crate::id::AutomationId;
use crate::time::Timestamp;

/// Number of recently modified automations shown on the dashboard.
pub const DEFAULT_RECENT_LIMIT: usize = 8;

/// Counts and recent activity across the whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total: usize,
    pub active: usize,
    pub errors: usize,
    pub drafts: usize,
    pub inactive: usize,
    /// Per-kind counts in first-seen order.
    pub by_kind: Vec<KindCount>,
    /// Most recently modified first.
    pub recent: Vec<RecentActivity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindCount {
    #[serde(rename = "type")]
    pub kind: AutomationKind,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub id: AutomationId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AutomationKind,
    pub status: AutomationStatus,
    pub last_modified: Timestamp,
}

impl DashboardSummary {
    /// Aggregate `automations`, keeping at most `recent_limit` recent rows.
    #[must_use]
    pub fn from_automations(automations: &[Automation], recent_limit: usize) -> Self {
        let count = |status: AutomationStatus| {
            automations
                .iter()
                .filter(|a| a.status == status)
                .count()
        };

        let mut by_kind: Vec<KindCount> = Vec::new();
        for automation in automations {
            match by_kind.iter_mut().find(|k| k.kind == automation.kind) {
                Some(entry) => entry.count += 1,
                None => by_kind.push(KindCount {
                    kind: automation.kind,
                    label: automation.kind.label(),
                    count: 1,
                }),
            }
        }

        let mut recent: Vec<&Automation> = automations.iter().collect();
        recent.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        let recent = recent
            .into_iter()
            .take(recent_limit)
            .map(|a| RecentActivity {
                id: a.id.clone(),
                name: a.name.clone(),
                kind: a.kind,
                status: a.status,
                last_modified: a.last_modified,
            })
            .collect();

        Self {
            total: automations.len(),
            active: count(AutomationStatus::Active),
            errors: count(AutomationStatus::Error),
            drafts: count(AutomationStatus::Draft),
            inactive: count(AutomationStatus::Inactive),
            by_kind,
            recent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time;
    use chrono::TimeDelta;

    fn sample(id: &str, kind: AutomationKind, status: AutomationStatus, age_hours: i64) -> Automation {
        let created = time::now() - TimeDelta::hours(age_hours);
        Automation::builder()
            .id(AutomationId::new(id).unwrap())
            .name(id)
            .owner("ops")
            .kind(kind)
            .status(status)
            .created_at(created)
            .build()
            .unwrap()
    }

    fn fleet() -> Vec<Automation> {
        vec![
            sample("auto-1", AutomationKind::RpaBot, AutomationStatus::Active, 5),
            sample("auto-2", AutomationKind::DataPipeline, AutomationStatus::Error, 1),
            sample("auto-3", AutomationKind::RpaBot, AutomationStatus::Draft, 3),
            sample("auto-4", AutomationKind::FileTransfer, AutomationStatus::Active, 2),
        ]
    }

    #[test]
    fn should_count_statuses() {
        let summary = DashboardSummary::from_automations(&fleet(), DEFAULT_RECENT_LIMIT);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.drafts, 1);
        assert_eq!(summary.inactive, 0);
    }

    #[test]
    fn should_group_kinds_in_first_seen_order() {
        let summary = DashboardSummary::from_automations(&fleet(), DEFAULT_RECENT_LIMIT);
        let kinds: Vec<_> = summary.by_kind.iter().map(|k| (k.kind, k.count)).collect();
        assert_eq!(
            kinds,
            [
                (AutomationKind::RpaBot, 2),
                (AutomationKind::DataPipeline, 1),
                (AutomationKind::FileTransfer, 1),
            ]
        );
        assert_eq!(summary.by_kind[0].label, "RPA Bot");
    }

    #[test]
    fn should_order_recent_by_last_modified_descending_when_limited() {
        let summary = DashboardSummary::from_automations(&fleet(), 2);
        let ids: Vec<_> = summary.recent.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["auto-2", "auto-4"]);
    }

    #[test]
    fn should_summarize_empty_collection() {
        let summary = DashboardSummary::from_automations(&[], DEFAULT_RECENT_LIMIT);
        assert_eq!(summary.total, 0);
        assert!(summary.by_kind.is_empty());
        assert!(summary.recent.is_empty());
    }
}
