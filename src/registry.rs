//! The ordered list of stages every stage-scoped panel keys its data by.
//!
//! The registry is loaded once per session from the remote overview document.
//! After that only the overview panel changes it, by adding, renaming,
//! reordering or (with confirmation) removing stages.

use anyhow::{Context, Result};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::error::WizardError;
use crate::models::overview::OverviewDocument;
use crate::models::{CompetitionId, Stage, StageId};
use crate::sync::RemoteStore;
use crate::validation::validate_stage_name;

/// Whether any stage exists yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryStatus {
    /// No stages: every panel shows a blocked state and advancing is disallowed.
    Empty,
    Ready { stages: usize },
}

/// Caller's answer to the stage-deletion prompt. The core never prompts itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalConfirmation {
    Confirmed,
    Declined,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageRegistry {
    stages: Vec<Stage>,
}

impl StageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from stages in any order.
    ///
    /// Stages are sorted by `order_index` (ties keep input order) and renumbered
    /// `0..n`. A repeated id keeps its first occurrence.
    pub fn from_stages(stages: Vec<Stage>) -> Self {
        let mut seen = HashSet::new();
        let mut unique: Vec<Stage> = Vec::with_capacity(stages.len());
        for stage in stages {
            if seen.insert(stage.id.clone()) {
                unique.push(stage);
            } else {
                warn!(stage_id = %stage.id, "Ignoring duplicate stage id");
            }
        }

        unique.sort_by_key(|stage| stage.order_index);

        let mut registry = Self { stages: unique };
        registry.renumber();
        registry
    }

    pub fn from_document(document: &OverviewDocument) -> Self {
        Self::from_stages(document.registry_stages())
    }

    /// Fetch the overview document and build the registry from its stages.
    pub fn load(remote: &dyn RemoteStore, competition_id: &CompetitionId) -> Result<Self> {
        let document = remote
            .fetch_overview(competition_id)
            .with_context(|| format!("Failed to load stages for competition {competition_id}"))?;
        Ok(Self::from_document(&document))
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn ids(&self) -> impl Iterator<Item = &StageId> {
        self.stages.iter().map(|stage| &stage.id)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn status(&self) -> RegistryStatus {
        if self.stages.is_empty() {
            RegistryStatus::Empty
        } else {
            RegistryStatus::Ready {
                stages: self.stages.len(),
            }
        }
    }

    pub fn get(&self, id: &StageId) -> Option<&Stage> {
        self.stages.iter().find(|stage| &stage.id == id)
    }

    pub fn contains(&self, id: &StageId) -> bool {
        self.get(id).is_some()
    }

    /// Look up the stage a remote record's tag refers to.
    pub fn find_by_name(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.matches_name(name))
    }

    /// First "Round N" name not already taken.
    pub fn next_default_name(&self) -> String {
        (self.stages.len() + 1..)
            .map(|n| format!("Round {n}"))
            .find(|name| self.find_by_name(name).is_none())
            .unwrap_or_else(|| format!("Round {}", self.stages.len() + 1))
    }

    /// Append a new stage with a fresh unique id.
    pub fn add_stage(&mut self, name: impl Into<String>) -> Result<Stage, WizardError> {
        let name = self.check_name(name.into(), None)?;

        let mut id = StageId::generate();
        while self.contains(&id) {
            id = StageId::generate();
        }

        let stage = Stage::new(id, name, self.stages.len() as u32);
        debug!(stage_id = %stage.id, name = %stage.name, "Added stage");
        self.stages.push(stage.clone());
        Ok(stage)
    }

    /// Remove a stage after the user confirmed the deletion prompt.
    ///
    /// The caller is responsible for cascading the removal to every panel.
    pub fn remove_stage(
        &mut self,
        id: &StageId,
        confirmation: RemovalConfirmation,
    ) -> Result<Stage, WizardError> {
        if confirmation != RemovalConfirmation::Confirmed {
            return Err(WizardError::RemovalNotConfirmed);
        }

        let position = self
            .position(id)
            .ok_or_else(|| WizardError::UnknownStage(id.clone()))?;
        let removed = self.stages.remove(position);
        self.renumber();
        debug!(stage_id = %removed.id, name = %removed.name, "Removed stage");
        Ok(removed)
    }

    /// Rename a stage. Returns the previous name.
    pub fn rename_stage(&mut self, id: &StageId, name: impl Into<String>) -> Result<String, WizardError> {
        let position = self
            .position(id)
            .ok_or_else(|| WizardError::UnknownStage(id.clone()))?;
        let name = self.check_name(name.into(), Some(id))?;
        Ok(std::mem::replace(&mut self.stages[position].name, name))
    }

    /// Move a stage to `new_index` (clamped to the end) and renumber.
    pub fn move_stage(&mut self, id: &StageId, new_index: usize) -> Result<(), WizardError> {
        let position = self
            .position(id)
            .ok_or_else(|| WizardError::UnknownStage(id.clone()))?;
        let stage = self.stages.remove(position);
        let target = new_index.min(self.stages.len());
        self.stages.insert(target, stage);
        self.renumber();
        Ok(())
    }

    fn position(&self, id: &StageId) -> Option<usize> {
        self.stages.iter().position(|stage| &stage.id == id)
    }

    fn check_name(&self, name: String, except: Option<&StageId>) -> Result<String, WizardError> {
        validate_stage_name(&name).map_err(|e| WizardError::InvalidStageName(e.to_string()))?;
        let name = name.trim().to_string();

        let taken = self
            .stages
            .iter()
            .any(|stage| Some(&stage.id) != except && stage.matches_name(&name));
        if taken {
            return Err(WizardError::DuplicateStageName(name));
        }
        Ok(name)
    }

    fn renumber(&mut self) {
        for (index, stage) in self.stages.iter_mut().enumerate() {
            stage.order_index = index as u32;
        }
    }
}
