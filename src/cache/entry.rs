use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Stage, StageId};
use crate::panel::{PanelData, PanelState};

/// A panel snapshot and when it was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<S> {
    pub panel_state: S,
    pub timestamp: DateTime<Utc>,
}

impl<S> CacheEntry<S> {
    pub fn new(panel_state: S, timestamp: DateTime<Utc>) -> Self {
        Self {
            panel_state,
            timestamp,
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.timestamp)
    }

    /// An entry is stale once it is older than `window`.
    ///
    /// Timestamps in the future (clock skew between tabs) count as fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>, window: chrono::Duration) -> bool {
        self.age(now) <= window
    }
}

/// Result of merging a snapshot with the current stage list.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled<T: PanelData> {
    pub state: PanelState<T>,
    /// Stages that received a default entry.
    pub inserted: Vec<StageId>,
}

impl<T: PanelData> Reconciled<T> {
    pub fn changed(&self) -> bool {
        !self.inserted.is_empty()
    }
}

/// Merge a cached snapshot with the current stages.
///
/// Every stage missing from the snapshot gets the panel default. Entries for
/// stages that are no longer registered are kept; only an explicit removal
/// deletes them. Applying this twice yields the same state.
pub fn reconcile_stages<T: PanelData>(
    entry: &CacheEntry<PanelState<T>>,
    stages: &[Stage],
) -> Reconciled<T> {
    let mut state = entry.panel_state.clone();
    let inserted = state.ensure_stages(stages);
    Reconciled { state, inserted }
}
