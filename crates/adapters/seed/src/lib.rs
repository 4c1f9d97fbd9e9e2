//! # opsdeck-adapter-seed
//!
//! Demo data used to initialise an empty store.
//!
//! ## Provided automations
//!
//! | Id | Name | Type | Status |
//! |----|------|------|--------|
//! | `auto-001` | Invoice Processing Bot | rpa-bot | active |
//! | `auto-002` | Daily Sales Report | scheduled-script | active |
//! | `auto-003` | Customer Data Sync | data-pipeline | error |
//! | `auto-004` | Payment Gateway Integration | api-integration | inactive |
//! | `auto-005` | SFTP Vendor Upload | file-transfer | draft |
//! | `auto-006` | Onboarding Workflow Bot | rpa-bot | active |
//!
//! Section and entry ids are numbered `cs-001…` and `ce-001…` in order of
//! appearance. Timestamps are relative to the `now` passed in, so the demo
//! always looks recently used.
//!
//! ## Dependency rule
//!
//! Depends on `opsdeck-domain` only.

use chrono::TimeDelta;
use opsdeck_domain::automation::{Automation, AutomationKind, AutomationStatus, Environment};
use opsdeck_domain::config::{ConfigSection, ConfigValue, NewConfigEntry, NewConfigSection};
use opsdeck_domain::error::OpsDeckError;
use opsdeck_domain::id::{AutomationId, EntryId, SectionId};
use opsdeck_domain::time::Timestamp;

/// Build the demo collection.
///
/// # Errors
///
/// Returns [`OpsDeckError::Validation`] if a record fails validation, which
/// would indicate a bug in the fixture itself.
pub fn demo_automations(now: Timestamp) -> Result<Vec<Automation>, OpsDeckError> {
    let mut ids = Numbering::default();
    let at = |days: i64, hours: i64| now - TimeDelta::days(days) - TimeDelta::hours(hours);

    Ok(vec![
        Automation::builder()
            .id(AutomationId::new("auto-001")?)
            .name("Invoice Processing Bot")
            .kind(AutomationKind::RpaBot)
            .status(AutomationStatus::Active)
            .environment(Environment::Production)
            .owner("Maria Chen")
            .description("Extracts invoice data from the shared inbox and posts it to the ERP.")
            .cron_expression("0 */2 * * *")
            .tag("finance")
            .tag("invoices")
            .created_at(at(45, 0))
            .last_modified(at(0, 2))
            .section(ids.section(
                "Connection",
                Some("ERP endpoint and credentials"),
                vec![
                    string("erp_url", "https://erp.internal/api").required(true),
                    NewConfigEntry::new("api_key", ConfigValue::Secret("erp-demo-key".into()))
                        .required(true),
                    number("timeout_seconds", 30.0),
                ],
            )?)
            .section(ids.section(
                "Processing",
                None,
                vec![
                    number("batch_size", 50.0),
                    boolean("auto_approve", false)
                        .description("Approve invoices under the threshold without review"),
                ],
            )?)
            .build()?,
        Automation::builder()
            .id(AutomationId::new("auto-002")?)
            .name("Daily Sales Report")
            .kind(AutomationKind::ScheduledScript)
            .status(AutomationStatus::Active)
            .environment(Environment::Production)
            .owner("James Wilson")
            .description("Compiles yesterday's sales figures and mails them to regional leads.")
            .cron_expression("0 6 * * *")
            .tag("reporting")
            .tag("sales")
            .created_at(at(90, 0))
            .last_modified(at(1, 5))
            .section(ids.section(
                "Output",
                Some("Where the report goes"),
                vec![
                    string("recipients", "sales-leads@example.com").required(true),
                    string("format", "pdf"),
                ],
            )?)
            .build()?,
        Automation::builder()
            .id(AutomationId::new("auto-003")?)
            .name("Customer Data Sync")
            .kind(AutomationKind::DataPipeline)
            .status(AutomationStatus::Error)
            .environment(Environment::Staging)
            .owner("Priya Patel")
            .description("Replicates CRM accounts into the analytics warehouse.")
            .cron_expression("*/30 * * * *")
            .tag("etl")
            .tag("crm")
            .created_at(at(30, 0))
            .last_modified(at(0, 1))
            .section(ids.section(
                "Source",
                Some("CRM replica"),
                vec![
                    string("host", "crm-replica.staging.internal").required(true),
                    number("port", 5432.0),
                    NewConfigEntry::new("password", ConfigValue::Secret("s3cr3t".into()))
                        .required(true),
                ],
            )?)
            .section(ids.section(
                "Destination",
                None,
                vec![
                    string("warehouse", "analytics"),
                    string("schema", "crm_raw"),
                ],
            )?)
            .build()?,
        Automation::builder()
            .id(AutomationId::new("auto-004")?)
            .name("Payment Gateway Integration")
            .kind(AutomationKind::ApiIntegration)
            .status(AutomationStatus::Inactive)
            .environment(Environment::Production)
            .owner("Alex Kim")
            .description("Forwards settled payments to the accounting ledger.")
            .tag("payments")
            .created_at(at(120, 0))
            .last_modified(at(7, 0))
            .section(ids.section(
                "Endpoint",
                None,
                vec![
                    string("base_url", "https://api.payments.example.com/v2").required(true),
                    NewConfigEntry::new("client_secret", ConfigValue::Secret("pg-demo".into()))
                        .required(true),
                    number("retries", 3.0),
                    boolean("sandbox", true),
                ],
            )?)
            .build()?,
        Automation::builder()
            .id(AutomationId::new("auto-005")?)
            .name("SFTP Vendor Upload")
            .kind(AutomationKind::FileTransfer)
            .status(AutomationStatus::Draft)
            .environment(Environment::Development)
            .owner("Sam Lee")
            .description("Pushes the weekly inventory export to vendor SFTP drops.")
            .cron_expression("0 0 * * 0")
            .tag("vendors")
            .tag("sftp")
            .created_at(at(3, 0))
            .last_modified(at(2, 20))
            .section(ids.section(
                "Transfer",
                None,
                vec![
                    string("remote_path", "/incoming/inventory"),
                    boolean("delete_after_upload", false),
                ],
            )?)
            .build()?,
        Automation::builder()
            .id(AutomationId::new("auto-006")?)
            .name("Onboarding Workflow Bot")
            .kind(AutomationKind::RpaBot)
            .status(AutomationStatus::Active)
            .environment(Environment::Staging)
            .owner("Maria Chen")
            .description("Creates accounts for new hires across internal tools.")
            .tag("hr")
            .created_at(at(14, 0))
            .last_modified(at(0, 8))
            .build()?,
    ])
}

/// Hands out `cs-NNN` and `ce-NNN` ids in order.
#[derive(Default)]
struct Numbering {
    sections: u32,
    entries: u32,
}

impl Numbering {
    fn section(
        &mut self,
        name: &str,
        description: Option<&str>,
        entries: Vec<NewConfigEntry>,
    ) -> Result<ConfigSection, OpsDeckError> {
        self.sections += 1;
        let id = SectionId::new(format!("cs-{:03}", self.sections))?;
        let mut draft = NewConfigSection::new(name);
        draft.description = description.map(str::to_string);
        draft.entries = entries;

        let counter = &mut self.entries;
        draft.into_section(id, || {
            *counter += 1;
            Ok(EntryId::new(format!("ce-{:03}", *counter))?)
        })
    }
}

fn string(key: &str, value: &str) -> NewConfigEntry {
    NewConfigEntry::new(key, ConfigValue::String(value.to_string()))
}

fn number(key: &str, value: f64) -> NewConfigEntry {
    NewConfigEntry::new(key, ConfigValue::Number(value))
}

fn boolean(key: &str, value: bool) -> NewConfigEntry {
    NewConfigEntry::new(key, ConfigValue::Boolean(value))
}
