use crate::models::awards::AwardsStageData;
use crate::models::eligibility::EligibilityStageData;
use crate::models::overview::StageDetail;
use crate::models::pattern::PatternStageData;
use crate::models::registration::RegistrationStageData;
use crate::models::syllabus::SyllabusStageData;
use crate::models::PanelKind;

use super::{PanelData, PanelState};

/// A whole panel's state, tagged by panel. Used at the host boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyPanelState {
    Overview(PanelState<StageDetail>),
    Syllabus(PanelState<SyllabusStageData>),
    Pattern(PanelState<PatternStageData>),
    Eligibility(PanelState<EligibilityStageData>),
    Registration(PanelState<RegistrationStageData>),
    Awards(PanelState<AwardsStageData>),
}

impl AnyPanelState {
    pub fn panel(&self) -> PanelKind {
        match self {
            AnyPanelState::Overview(_) => PanelKind::Overview,
            AnyPanelState::Syllabus(_) => PanelKind::Syllabus,
            AnyPanelState::Pattern(_) => PanelKind::Pattern,
            AnyPanelState::Eligibility(_) => PanelKind::Eligibility,
            AnyPanelState::Registration(_) => PanelKind::Registration,
            AnyPanelState::Awards(_) => PanelKind::Awards,
        }
    }

    /// The typed state, if this is panel `T`'s.
    pub fn into_state<T: PanelData>(self) -> Option<PanelState<T>> {
        T::from_any(self)
    }
}
