//! Identifier newtypes and the typed cache key.
//!
//! Stage and competition ids are opaque strings. Keeping them in distinct types
//! stops a stage id from being passed where a competition id is expected, and the
//! composite [`CacheKey`] replaces ad hoc string concatenation for cache lookups.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::CACHE_NAMESPACE;
use super::panel::PanelKind;
use crate::validation::validate_id;

/// Stable identifier of a stage within one competition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageId(String);

impl StageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id for a newly added stage.
    pub fn generate() -> Self {
        Self(format!("stage-{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StageId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Persistent identifier assigned by the remote store after the first overview save.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompetitionId(String);

impl CompetitionId {
    /// Build a competition id, rejecting values that are unsafe as storage keys.
    pub fn parse(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        validate_id(&id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CompetitionId {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<CompetitionId> for String {
    fn from(value: CompetitionId) -> Self {
        value.0
    }
}

impl fmt::Display for CompetitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of one panel's cached snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub competition_id: CompetitionId,
    pub panel: PanelKind,
}

impl CacheKey {
    pub fn new(competition_id: CompetitionId, panel: PanelKind) -> Self {
        Self {
            competition_id,
            panel,
        }
    }

    /// Render the key for a flat string-keyed store.
    ///
    /// Competition ids never contain `/`, so distinct keys cannot collide.
    pub fn storage_key(&self) -> String {
        format!(
            "{CACHE_NAMESPACE}/{}/{}",
            self.competition_id,
            self.panel.slug()
        )
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.competition_id, self.panel)
    }
}
