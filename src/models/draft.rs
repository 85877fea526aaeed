use super::awards::AwardsStageData;
use super::eligibility::EligibilityStageData;
use super::keys::{CompetitionId, StageId};
use super::overview::StageDetail;
use super::pattern::PatternStageData;
use super::registration::RegistrationStageData;
use super::stage::Stage;
use super::syllabus::SyllabusStageData;
use crate::panel::{AnyPanelState, PanelState};

/// The competition being configured, owned by a single wizard session.
///
/// `id` stays `None` until the overview has been saved once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompetitionDraft {
    pub id: Option<CompetitionId>,
    pub overview: PanelState<StageDetail>,
    pub syllabus: PanelState<SyllabusStageData>,
    pub pattern: PanelState<PatternStageData>,
    pub eligibility: PanelState<EligibilityStageData>,
    pub registration: PanelState<RegistrationStageData>,
    pub awards: PanelState<AwardsStageData>,
}

impl CompetitionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert defaults for every stage some panel is missing.
    ///
    /// Returns the number of entries inserted across all panels.
    pub fn ensure_stages(&mut self, stages: &[Stage]) -> usize {
        self.overview.ensure_stages(stages).len()
            + self.syllabus.ensure_stages(stages).len()
            + self.pattern.ensure_stages(stages).len()
            + self.eligibility.ensure_stages(stages).len()
            + self.registration.ensure_stages(stages).len()
            + self.awards.ensure_stages(stages).len()
    }

    /// Drop a removed stage from every panel, including stage-tagged globals.
    pub fn remove_stage(&mut self, stage: &Stage) {
        self.overview.remove_stage(stage);
        self.syllabus.remove_stage(stage);
        self.pattern.remove_stage(stage);
        self.eligibility.remove_stage(stage);
        self.registration.remove_stage(stage);
        self.awards.remove_stage(stage);
    }

    pub fn rename_stage(&mut self, old_name: &str, new_name: &str) {
        self.overview.rename_stage(old_name, new_name);
        self.syllabus.rename_stage(old_name, new_name);
        self.pattern.rename_stage(old_name, new_name);
        self.eligibility.rename_stage(old_name, new_name);
        self.registration.rename_stage(old_name, new_name);
        self.awards.rename_stage(old_name, new_name);
    }

    /// True when any panel holds an entry for `id`.
    pub fn references_stage(&self, id: &StageId) -> bool {
        self.overview.contains(id)
            || self.syllabus.contains(id)
            || self.pattern.contains(id)
            || self.eligibility.contains(id)
            || self.registration.contains(id)
            || self.awards.contains(id)
    }

    /// Replace one panel's state wholesale.
    pub fn replace(&mut self, state: AnyPanelState) {
        match state {
            AnyPanelState::Overview(state) => self.overview = state,
            AnyPanelState::Syllabus(state) => self.syllabus = state,
            AnyPanelState::Pattern(state) => self.pattern = state,
            AnyPanelState::Eligibility(state) => self.eligibility = state,
            AnyPanelState::Registration(state) => self.registration = state,
            AnyPanelState::Awards(state) => self.awards = state,
        }
    }
}
