//! Ordered, de-duplicated, lower-cased tag set.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Tags attached to an automation.
///
/// Tags are trimmed and lower-cased on insertion; insertion order is kept and
/// a tag already present is rejected rather than silently dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Tags(Vec<String>);

impl Tags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTag`] for a blank tag, or
    /// [`ValidationError::DuplicateTag`] when it is already present.
    pub fn insert(&mut self, tag: impl AsRef<str>) -> Result<(), ValidationError> {
        let tag = tag.as_ref().trim().to_lowercase();
        if tag.is_empty() {
            return Err(ValidationError::EmptyTag);
        }
        if self.0.contains(&tag) {
            return Err(ValidationError::DuplicateTag(tag));
        }
        self.0.push(tag);
        Ok(())
    }

    /// Remove a tag, returning whether it was present.
    pub fn remove(&mut self, tag: &str) -> bool {
        let tag = tag.trim().to_lowercase();
        let before = self.0.len();
        self.0.retain(|t| t != &tag);
        self.0.len() != before
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        let tag = tag.trim().to_lowercase();
        self.0.contains(&tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<String>> for Tags {
    type Error = ValidationError;

    fn try_from(raw: Vec<String>) -> Result<Self, Self::Error> {
        let mut tags = Self::new();
        for tag in raw {
            tags.insert(tag)?;
        }
        Ok(tags)
    }
}

impl TryFrom<&[&str]> for Tags {
    type Error = ValidationError;

    fn try_from(raw: &[&str]) -> Result<Self, Self::Error> {
        let mut tags = Self::new();
        for tag in raw {
            tags.insert(tag)?;
        }
        Ok(tags)
    }
}

impl From<Tags> for Vec<String> {
    fn from(tags: Tags) -> Self {
        tags.0
    }
}
