use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::panel::PanelKind;
use super::stage_data::StageData;
use crate::models::draft::CompetitionDraft;
use crate::panel::{AnyPanelState, PanelData, PanelState};
use crate::validation::{is_filled, parse_count};

/// One row of an award type: how many are given and to whom.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardRow {
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub given_to: String,
}

impl AwardRow {
    pub fn new(quantity: impl Into<String>, given_to: impl Into<String>) -> Self {
        Self {
            quantity: quantity.into(),
            given_to: given_to.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        parse_count(&self.quantity).is_some() && is_filled(&self.given_to)
    }
}

/// Awards for one stage, keyed by award type (e.g. "Certificate", "Medal").
///
/// Default: no award types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardsStageData {
    #[serde(default)]
    pub award_types: BTreeMap<String, Vec<AwardRow>>,
}

impl AwardsStageData {
    /// Add an award type with one blank row. Existing rows are kept.
    pub fn add_award_type(&mut self, award_type: impl Into<String>) -> &mut Vec<AwardRow> {
        let rows = self.award_types.entry(award_type.into()).or_default();
        if rows.is_empty() {
            rows.push(AwardRow::default());
        }
        rows
    }

    pub fn remove_award_type(&mut self, award_type: &str) -> Option<Vec<AwardRow>> {
        self.award_types.remove(award_type)
    }

    /// A stage counts as complete once it has at least one award type and every row is filled.
    pub fn is_complete(&self) -> bool {
        !self.award_types.is_empty()
            && self
                .award_types
                .values()
                .all(|rows| !rows.is_empty() && rows.iter().all(AwardRow::is_complete))
    }
}

impl PanelData for AwardsStageData {
    const PANEL: PanelKind = PanelKind::Awards;
    type Globals = ();

    fn as_stage_data(&self) -> StageData<'_> {
        StageData::Awards(self)
    }

    fn state(draft: &CompetitionDraft) -> &PanelState<Self> {
        &draft.awards
    }

    fn state_mut(draft: &mut CompetitionDraft) -> &mut PanelState<Self> {
        &mut draft.awards
    }

    fn into_any(state: PanelState<Self>) -> AnyPanelState {
        AnyPanelState::Awards(state)
    }

    fn from_any(state: AnyPanelState) -> Option<PanelState<Self>> {
        match state {
            AnyPanelState::Awards(state) => Some(state),
            _ => None,
        }
    }
}
