use super::awards::AwardsStageData;
use super::eligibility::EligibilityStageData;
use super::overview::StageDetail;
use super::panel::PanelKind;
use super::pattern::PatternStageData;
use super::registration::RegistrationStageData;
use super::syllabus::SyllabusStageData;

/// One stage's entry in any panel, tagged by panel.
///
/// Gates match on this exhaustively, so adding a panel forces every
/// validation path to handle it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageData<'a> {
    Overview(&'a StageDetail),
    Syllabus(&'a SyllabusStageData),
    Pattern(&'a PatternStageData),
    Eligibility(&'a EligibilityStageData),
    Registration(&'a RegistrationStageData),
    Awards(&'a AwardsStageData),
}

impl StageData<'_> {
    pub fn panel(&self) -> PanelKind {
        match self {
            StageData::Overview(_) => PanelKind::Overview,
            StageData::Syllabus(_) => PanelKind::Syllabus,
            StageData::Pattern(_) => PanelKind::Pattern,
            StageData::Eligibility(_) => PanelKind::Eligibility,
            StageData::Registration(_) => PanelKind::Registration,
            StageData::Awards(_) => PanelKind::Awards,
        }
    }
}
