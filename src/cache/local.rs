use anyhow::{Context, Result};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

use super::entry::{reconcile_stages, CacheEntry, Reconciled};
use crate::fs::LocalStore;
use crate::models::{CacheKey, Stage};
use crate::panel::{PanelData, PanelState};
use crate::scheduler::Clock;

/// Typed cache of panel snapshots over a string-keyed [`LocalStore`].
///
/// Reads never fail: an unreadable, mismatched or stale entry is logged,
/// removed and reported as absent.
pub struct LocalCache {
    store: Box<dyn LocalStore>,
    clock: Rc<dyn Clock>,
    freshness: chrono::Duration,
}

impl LocalCache {
    pub fn new(store: Box<dyn LocalStore>, clock: Rc<dyn Clock>, freshness: Duration) -> Self {
        Self {
            store,
            clock,
            freshness: chrono::Duration::from_std(freshness).unwrap_or(chrono::Duration::MAX),
        }
    }

    pub fn freshness(&self) -> chrono::Duration {
        self.freshness
    }

    pub fn is_fresh<S>(&self, entry: &CacheEntry<S>) -> bool {
        entry.is_fresh(self.clock.now(), self.freshness)
    }

    /// The fresh entry for `key`, if any.
    pub fn read<T: PanelData>(&mut self, key: &CacheKey) -> Option<CacheEntry<PanelState<T>>> {
        if key.panel != T::PANEL {
            warn!(%key, expected = %T::PANEL, "Cache key does not match panel type");
            return None;
        }

        let storage_key = key.storage_key();
        let raw = match self.store.get(&storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(%key, error = %format!("{e:#}"), "Failed to read cache entry");
                return None;
            }
        };

        let entry: CacheEntry<PanelState<T>> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(%key, error = %e, "Discarding unreadable cache entry");
                self.discard(key);
                return None;
            }
        };

        if !self.is_fresh(&entry) {
            debug!(
                %key,
                age_hours = entry.age(self.clock.now()).num_hours(),
                "Discarding stale cache entry"
            );
            self.discard(key);
            return None;
        }

        Some(entry)
    }

    /// Replace the entry for `key` with `state`, stamped with the current time.
    pub fn write<T: PanelData>(&mut self, key: &CacheKey, state: &PanelState<T>) -> Result<()> {
        let entry = CacheEntry::new(state, self.clock.now());
        let json = serde_json::to_string(&entry)
            .with_context(|| format!("Failed to serialize cache entry for {key}"))?;
        self.store
            .set(&key.storage_key(), &json)
            .with_context(|| format!("Failed to write cache entry for {key}"))?;
        debug!(%key, stages = state.len(), "Wrote cache entry");
        Ok(())
    }

    pub fn remove(&mut self, key: &CacheKey) -> Result<()> {
        self.store
            .remove(&key.storage_key())
            .with_context(|| format!("Failed to remove cache entry for {key}"))
    }

    /// Read the fresh entry and fill in defaults for stages it lacks.
    ///
    /// When any default was inserted the merged state is written back.
    pub fn load_reconciled<T: PanelData>(
        &mut self,
        key: &CacheKey,
        stages: &[Stage],
    ) -> Option<Reconciled<T>> {
        let entry = self.read::<T>(key)?;
        let merged = reconcile_stages(&entry, stages);
        if merged.changed() {
            debug!(%key, inserted = merged.inserted.len(), "Reconciled cache entry with stages");
            if let Err(e) = self.write(key, &merged.state) {
                warn!(%key, error = %format!("{e:#}"), "Failed to rewrite reconciled cache entry");
            }
        }
        Some(merged)
    }

    fn discard(&mut self, key: &CacheKey) {
        if let Err(e) = self.remove(key) {
            warn!(%key, error = %format!("{e:#}"), "Failed to remove cache entry");
        }
    }
}
