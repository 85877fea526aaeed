use serde::{Deserialize, Serialize};

use super::panel::PanelKind;
use super::stage_data::StageData;
use crate::models::draft::CompetitionDraft;
use crate::panel::{AnyPanelState, PanelData, PanelState};
use crate::validation::parse_count;

/// Answer format of a paper section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionFormat {
    MultipleChoice,
    ShortAnswer,
    LongAnswer,
    Practical,
    Oral,
}

/// One section of a stage's paper.
///
/// `format` is always required. `questions` and `marks` are only required when
/// the competition's subjects are academic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub format: Option<SectionFormat>,
    #[serde(default)]
    pub questions: String,
    #[serde(default)]
    pub marks: String,
    #[serde(default)]
    pub duration_minutes: String,
}

impl Section {
    pub fn new(name: impl Into<String>, format: Option<SectionFormat>) -> Self {
        Self {
            name: name.into(),
            format,
            ..Default::default()
        }
    }

    pub fn with_scoring(mut self, questions: impl Into<String>, marks: impl Into<String>) -> Self {
        self.questions = questions.into();
        self.marks = marks.into();
        self
    }
}

/// Paper pattern for one stage.
///
/// Default: no sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternStageData {
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl PatternStageData {
    /// Sum of section marks, or `None` while any section's marks are unset.
    pub fn total_marks(&self) -> Option<u32> {
        self.sections
            .iter()
            .map(|section| parse_count(&section.marks))
            .sum()
    }
}

impl PanelData for PatternStageData {
    const PANEL: PanelKind = PanelKind::Pattern;
    type Globals = ();

    fn as_stage_data(&self) -> StageData<'_> {
        StageData::Pattern(self)
    }

    fn state(draft: &CompetitionDraft) -> &PanelState<Self> {
        &draft.pattern
    }

    fn state_mut(draft: &mut CompetitionDraft) -> &mut PanelState<Self> {
        &mut draft.pattern
    }

    fn into_any(state: PanelState<Self>) -> AnyPanelState {
        AnyPanelState::Pattern(state)
    }

    fn from_any(state: AnyPanelState) -> Option<PanelState<Self>> {
        match state {
            AnyPanelState::Pattern(state) => Some(state),
            _ => None,
        }
    }
}
