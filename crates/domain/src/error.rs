//! Common error types used across the workspace.
//!
//! Each layer converts into [`OpsDeckError`] via `#[from]`; adapters map the
//! variants onto their own transport (HTTP status codes, exit codes, …).

use crate::config::ConfigEntryType;
use crate::id::IdKind;

/// Top-level error returned by domain and application operations.
#[derive(Debug, thiserror::Error)]
pub enum OpsDeckError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    /// The identifier generator kept returning ids that are already in use.
    #[error("could not allocate a fresh {kind} id after {attempts} attempts")]
    IdExhausted { kind: IdKind, attempts: usize },
}

/// Malformed input rejected before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("owner must not be empty")]
    EmptyOwner,

    #[error("section name must not be empty")]
    EmptySectionName,

    #[error("entry key must not be empty")]
    EmptyEntryKey,

    #[error("{0} id must not be empty")]
    EmptyId(IdKind),

    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: IdKind, id: String },

    #[error("tag must not be empty")]
    EmptyTag,

    #[error("duplicate tag `{0}`")]
    DuplicateTag(String),

    #[error("expected a {expected} value, got {found}")]
    ValueTypeMismatch {
        expected: ConfigEntryType,
        found: &'static str,
    },

    #[error("number must be finite")]
    NonFiniteNumber,

    #[error("entry needs either a `type` or a `format`")]
    MissingEntryType,

    #[error("field `{0}` cannot be updated")]
    ProtectedField(String),

    #[error("invalid patch: {0}")]
    InvalidPatch(String),

    #[error("unknown {kind} `{value}`")]
    UnknownVariant { kind: &'static str, value: String },
}

/// A referenced automation, section, or entry does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

impl NotFoundError {
    /// Build a not-found error for the given identifier kind.
    #[must_use]
    pub fn new(kind: IdKind, id: impl Into<String>) -> Self {
        Self {
            entity: kind.label(),
            id: id.into(),
        }
    }
}
