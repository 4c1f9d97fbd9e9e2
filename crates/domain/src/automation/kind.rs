//! Closed enumerations describing an automation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// What sort of automation a record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutomationKind {
    #[default]
    RpaBot,
    ScheduledScript,
    DataPipeline,
    ApiIntegration,
    FileTransfer,
}

impl AutomationKind {
    pub const ALL: [Self; 5] = [
        Self::RpaBot,
        Self::ScheduledScript,
        Self::DataPipeline,
        Self::ApiIntegration,
        Self::FileTransfer,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RpaBot => "rpa-bot",
            Self::ScheduledScript => "scheduled-script",
            Self::DataPipeline => "data-pipeline",
            Self::ApiIntegration => "api-integration",
            Self::FileTransfer => "file-transfer",
        }
    }

    /// Display label, e.g. `"RPA Bot"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::RpaBot => "RPA Bot",
            Self::ScheduledScript => "Scheduled Script",
            Self::DataPipeline => "Data Pipeline",
            Self::ApiIntegration => "API Integration",
            Self::FileTransfer => "File Transfer",
        }
    }
}

/// Lifecycle status of an automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutomationStatus {
    Active,
    Inactive,
    Error,
    #[default]
    Draft,
}

impl AutomationStatus {
    pub const ALL: [Self; 4] = [Self::Active, Self::Inactive, Self::Error, Self::Draft];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Error => "error",
            Self::Draft => "draft",
        }
    }

    /// Whether the scheduling toggle shows as on.
    #[must_use]
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Staging,
    #[default]
    Development,
}

impl Environment {
    pub const ALL: [Self; 3] = [Self::Production, Self::Staging, Self::Development];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Development => "development",
        }
    }
}

macro_rules! impl_text {
    ($name:ident, $kind:literal) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| ValidationError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

impl_text!(AutomationKind, "automation type");
impl_text!(AutomationStatus, "status");
impl_text!(Environment, "environment");
