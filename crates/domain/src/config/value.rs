//! Typed configuration values.
//!
//! An entry's declared type is derived from its [`ConfigValue`] variant, so a
//! value whose shape disagrees with the declared type cannot be built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const SECRET_MASK: &str = "********";

/// Storage type of a configuration entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigEntryType {
    String,
    Number,
    Boolean,
    Secret,
}

impl ConfigEntryType {
    pub const ALL: [Self; 4] = [Self::String, Self::Number, Self::Boolean, Self::Secret];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Secret => "secret",
        }
    }

    /// Zero value for this type: empty string, `0`, or `false`.
    #[must_use]
    pub fn default_value(self) -> ConfigValue {
        match self {
            Self::String => ConfigValue::String(String::new()),
            Self::Number => ConfigValue::Number(0.0),
            Self::Boolean => ConfigValue::Boolean(false),
            Self::Secret => ConfigValue::Secret(String::new()),
        }
    }
}

impl fmt::Display for ConfigEntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigEntryType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "entry type",
                value: s.to_string(),
            })
    }
}

/// A configuration value tagged with its storage type.
///
/// Serialized adjacently tagged: `{"type": "number", "value": 5432}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ConfigValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Secret(String),
}

impl ConfigValue {
    /// Storage type implied by the variant.
    #[must_use]
    pub fn entry_type(&self) -> ConfigEntryType {
        match self {
            Self::String(_) => ConfigEntryType::String,
            Self::Number(_) => ConfigEntryType::Number,
            Self::Boolean(_) => ConfigEntryType::Boolean,
            Self::Secret(_) => ConfigEntryType::Secret,
        }
    }

    /// Check the value is storable (numbers must be finite).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonFiniteNumber`] for `NaN` or infinities.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Number(n) if !n.is_finite() => Err(ValidationError::NonFiniteNumber),
            _ => Ok(()),
        }
    }

    /// Build a value of `entry_type` from an untyped JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ValueTypeMismatch`] when the JSON shape does
    /// not match `entry_type`.
    pub fn from_json(
        entry_type: ConfigEntryType,
        value: serde_json::Value,
    ) -> Result<Self, ValidationError> {
        use serde_json::Value;

        let found = json_kind(&value);
        let parsed = match (entry_type, value) {
            (ConfigEntryType::String, Value::String(s)) => Self::String(s),
            (ConfigEntryType::Secret, Value::String(s)) => Self::Secret(s),
            (ConfigEntryType::Boolean, Value::Bool(b)) => Self::Boolean(b),
            (ConfigEntryType::Number, Value::Number(n)) => {
                Self::Number(n.as_f64().ok_or(ValidationError::NonFiniteNumber)?)
            }
            (expected, _) => return Err(ValidationError::ValueTypeMismatch { expected, found }),
        };
        parsed.validate()?;
        Ok(parsed)
    }

    /// Untyped JSON rendition of the value, secrets included.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::String(s) | Self::Secret(s) => serde_json::Value::String(s.clone()),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::Boolean(b) => serde_json::Value::Bool(*b),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Secret(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// Secrets are masked.
impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Secret(_) => f.write_str(SECRET_MASK),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
