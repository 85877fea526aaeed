use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::keys::{CompetitionId, StageId};
use super::panel::PanelKind;
use super::stage::Stage;
use super::stage_data::StageData;
use crate::models::draft::CompetitionDraft;
use crate::panel::{AnyPanelState, PanelData, PanelGlobals, PanelState};
use crate::registry::StageRegistry;

/// How a stage is conducted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageMode {
    #[default]
    Online,
    Offline,
}

/// Overview details kept for each stage.
///
/// Default: online, no dates, empty description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDetail {
    #[serde(default)]
    pub mode: StageMode,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
}

/// Competition-wide overview fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl PanelGlobals for OverviewInfo {}

impl PanelData for StageDetail {
    const PANEL: PanelKind = PanelKind::Overview;
    type Globals = OverviewInfo;

    fn as_stage_data(&self) -> StageData<'_> {
        StageData::Overview(self)
    }

    fn state(draft: &CompetitionDraft) -> &PanelState<Self> {
        &draft.overview
    }

    fn state_mut(draft: &mut CompetitionDraft) -> &mut PanelState<Self> {
        &mut draft.overview
    }

    fn into_any(state: PanelState<Self>) -> AnyPanelState {
        AnyPanelState::Overview(state)
    }

    fn from_any(state: AnyPanelState) -> Option<PanelState<Self>> {
        match state {
            AnyPanelState::Overview(state) => Some(state),
            _ => None,
        }
    }
}

/// One stage as the remote overview document lists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStage {
    pub id: StageId,
    pub name: String,
    #[serde(default)]
    pub order_index: Option<u32>,
    #[serde(flatten)]
    pub detail: StageDetail,
}

/// Remote shape of the overview panel. It is also the source of the stage registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition_id: Option<CompetitionId>,
    #[serde(flatten)]
    pub info: OverviewInfo,
    #[serde(default)]
    pub stages: Vec<OverviewStage>,
}

impl OverviewDocument {
    /// Assemble the document from the registry and the overview panel state.
    pub fn from_state(
        competition_id: Option<CompetitionId>,
        registry: &StageRegistry,
        state: &PanelState<StageDetail>,
    ) -> Self {
        let stages = registry
            .stages()
            .iter()
            .map(|stage| OverviewStage {
                id: stage.id.clone(),
                name: stage.name.clone(),
                order_index: Some(stage.order_index),
                detail: state.get_for_stage(&stage.id),
            })
            .collect();

        Self {
            competition_id,
            info: state.globals().clone(),
            stages,
        }
    }

    /// Registry stages in document order, before the registry sorts them.
    pub fn registry_stages(&self) -> Vec<Stage> {
        self.stages
            .iter()
            .enumerate()
            .map(|(position, stage)| {
                let order = stage.order_index.unwrap_or(position as u32);
                Stage::new(stage.id.clone(), stage.name.clone(), order)
            })
            .collect()
    }

    /// Overview panel state carried by the document.
    pub fn panel_state(&self) -> PanelState<StageDetail> {
        let mut state = PanelState::new();
        for stage in &self.stages {
            state.insert(stage.id.clone(), stage.detail.clone());
        }
        *state.globals_mut() = self.info.clone();
        state
    }
}
