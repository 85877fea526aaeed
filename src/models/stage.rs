use serde::{Deserialize, Serialize};

use super::keys::StageId;

/// A named phase of a competition, such as a round.
///
/// Every stage-scoped panel keys its data by [`Stage::id`], so the id must never
/// change once assigned. The name is what the remote store tags records with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub name: String,
    pub order_index: u32,
}

impl Stage {
    pub fn new(id: StageId, name: impl Into<String>, order_index: u32) -> Self {
        Self {
            id,
            name: name.into(),
            order_index,
        }
    }

    /// Case-insensitive, whitespace-tolerant comparison against a record's stage tag.
    pub fn matches_name(&self, tag: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(tag.trim())
    }
}
