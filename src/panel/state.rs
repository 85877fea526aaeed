use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::remote::{ImportReport, PanelDocument, RemoteRecord};
use super::{PanelData, PanelGlobals};
use crate::models::{Stage, StageId};
use crate::registry::StageRegistry;

/// One panel's data: an entry per stage plus the panel-wide globals.
///
/// A stage may be missing from the map for a while after it is added.
/// [`PanelState::get_for_stage`] hides that by returning the default entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: PanelData")]
pub struct PanelState<T: PanelData> {
    #[serde(default)]
    stages: BTreeMap<StageId, T>,
    #[serde(default)]
    globals: T::Globals,
}

impl<T: PanelData> Default for PanelState<T> {
    fn default() -> Self {
        Self {
            stages: BTreeMap::new(),
            globals: T::Globals::default(),
        }
    }
}

impl<T: PanelData> PanelState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stage's entry, or the panel default when it has none yet.
    pub fn get_for_stage(&self, id: &StageId) -> T {
        self.stages.get(id).cloned().unwrap_or_default()
    }

    pub fn entry(&self, id: &StageId) -> Option<&T> {
        self.stages.get(id)
    }

    /// Apply an update to one stage's entry, creating it from the default if needed.
    ///
    /// Other stages' entries are never touched.
    pub fn set_for_stage(&mut self, id: &StageId, update: impl FnOnce(&mut T)) {
        update(self.stages.entry(id.clone()).or_default());
    }

    pub fn insert(&mut self, id: StageId, data: T) -> Option<T> {
        self.stages.insert(id, data)
    }

    pub fn contains(&self, id: &StageId) -> bool {
        self.stages.contains_key(id)
    }

    pub fn stage_ids(&self) -> impl Iterator<Item = &StageId> {
        self.stages.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StageId, &T)> {
        self.stages.iter()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn globals(&self) -> &T::Globals {
        &self.globals
    }

    pub fn globals_mut(&mut self) -> &mut T::Globals {
        &mut self.globals
    }

    /// Registered stages that have no entry yet, in registry order.
    pub fn missing_stages(&self, stages: &[Stage]) -> Vec<StageId> {
        stages
            .iter()
            .filter(|stage| !self.stages.contains_key(&stage.id))
            .map(|stage| stage.id.clone())
            .collect()
    }

    /// Insert the default entry for every stage that lacks one.
    ///
    /// Existing entries, including ones for stages no longer in `stages`, are
    /// left alone. Returns the ids that were inserted.
    pub fn ensure_stages(&mut self, stages: &[Stage]) -> Vec<StageId> {
        let missing = self.missing_stages(stages);
        for id in &missing {
            self.stages.insert(id.clone(), T::default());
        }
        missing
    }

    /// Remove a deleted stage's entry and any globals tagged with it.
    pub fn remove_stage(&mut self, stage: &Stage) -> Option<T> {
        self.globals.stage_removed(stage);
        self.stages.remove(&stage.id)
    }

    pub fn rename_stage(&mut self, old_name: &str, new_name: &str) {
        self.globals.stage_renamed(old_name, new_name);
    }

    /// Flatten into stage-name-tagged records, in registry order.
    ///
    /// Entries for stages outside the registry are not sent.
    pub fn to_remote_shape(&self, registry: &StageRegistry) -> Result<PanelDocument> {
        let mut records = Vec::with_capacity(self.stages.len());

        for stage in registry.stages() {
            let Some(data) = self.stages.get(&stage.id) else {
                continue;
            };

            let value = serde_json::to_value(data).with_context(|| {
                format!("Failed to serialize {} data for stage '{}'", T::PANEL, stage.name)
            })?;
            let Value::Object(fields) = value else {
                bail!(
                    "{} data for stage '{}' did not serialize to an object",
                    T::PANEL,
                    stage.name
                );
            };

            records.push(RemoteRecord {
                stage: stage.name.clone(),
                fields,
            });
        }

        let globals = serde_json::to_value(&self.globals)
            .with_context(|| format!("Failed to serialize {} globals", T::PANEL))?;

        Ok(PanelDocument { records, globals })
    }

    /// Bucket remote records by stage name.
    ///
    /// Records whose stage tag matches no registered stage are orphans from a
    /// renamed or removed stage; they are dropped and counted, never an error.
    pub fn from_remote_shape(document: PanelDocument, registry: &StageRegistry) -> (Self, ImportReport) {
        let mut state = Self::new();
        let mut report = ImportReport::default();

        for record in document.records {
            let Some(stage) = registry.find_by_name(&record.stage) else {
                debug!(panel = %T::PANEL, stage = %record.stage, "Dropping orphaned record");
                report.orphaned.push(record.stage);
                continue;
            };

            match serde_json::from_value::<T>(Value::Object(record.fields)) {
                Ok(data) => {
                    if state.stages.insert(stage.id.clone(), data).is_some() {
                        report.duplicates.push(record.stage);
                    } else {
                        report.imported += 1;
                    }
                }
                Err(e) => {
                    warn!(panel = %T::PANEL, stage = %record.stage, error = %e, "Skipping malformed record");
                    report.malformed.push(record.stage);
                }
            }
        }

        if !document.globals.is_null() {
            match serde_json::from_value::<T::Globals>(document.globals) {
                Ok(globals) => state.globals = globals,
                Err(e) => {
                    warn!(panel = %T::PANEL, error = %e, "Ignoring malformed panel globals");
                    report.globals_malformed = true;
                }
            }
        }

        let dropped = state.globals.retain_registered(registry);
        if !dropped.is_empty() {
            debug!(panel = %T::PANEL, count = dropped.len(), "Dropped orphaned stage-tagged items");
        }
        report.orphaned.extend(dropped);

        (state, report)
    }
}
