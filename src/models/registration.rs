use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::panel::PanelKind;
use super::stage_data::StageData;
use crate::models::draft::CompetitionDraft;
use crate::panel::{AnyPanelState, PanelData, PanelGlobals, PanelState};
use crate::validation::parse_decimal;

/// A registration plan. `fee` is the amount as typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPlan {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fee: String,
    #[serde(default)]
    pub description: String,
}

impl RegistrationPlan {
    pub fn new(name: impl Into<String>, fee: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fee: fee.into(),
            description: String::new(),
        }
    }

    pub fn fee_value(&self) -> Option<f64> {
        parse_decimal(&self.fee)
    }
}

/// Period during which participants can register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationWindow {
    pub opens_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
}

impl RegistrationWindow {
    pub fn is_ordered(&self) -> bool {
        self.opens_at <= self.closes_at
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.opens_at <= at && at <= self.closes_at
    }
}

/// The single plan list and registration window shared by every stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationGlobals {
    #[serde(default)]
    pub plans: Vec<RegistrationPlan>,
    #[serde(default)]
    pub window: Option<RegistrationWindow>,
}

impl PanelGlobals for RegistrationGlobals {}

/// Per-stage registration settings.
///
/// Default: no seat limit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStageData {
    #[serde(default)]
    pub seat_limit: String,
}

impl PanelData for RegistrationStageData {
    const PANEL: PanelKind = PanelKind::Registration;
    type Globals = RegistrationGlobals;

    fn as_stage_data(&self) -> StageData<'_> {
        StageData::Registration(self)
    }

    fn state(draft: &CompetitionDraft) -> &PanelState<Self> {
        &draft.registration
    }

    fn state_mut(draft: &mut CompetitionDraft) -> &mut PanelState<Self> {
        &mut draft.registration
    }

    fn into_any(state: PanelState<Self>) -> AnyPanelState {
        AnyPanelState::Registration(state)
    }

    fn from_any(state: AnyPanelState) -> Option<PanelState<Self>> {
        match state {
            AnyPanelState::Registration(state) => Some(state),
            _ => None,
        }
    }
}
