use serde::{Deserialize, Serialize};

use super::panel::PanelKind;
use super::stage_data::StageData;
use crate::models::draft::CompetitionDraft;
use crate::panel::{AnyPanelState, PanelData, PanelState};
use crate::validation::parse_decimal;

/// A syllabus topic.
///
/// `weight` is whatever the organizer typed. Weights are independent of each
/// other and are not a partition of 100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub weight: String,
}

impl Topic {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        weight: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            weight: weight.into(),
        }
    }

    pub fn weight_value(&self) -> Option<f64> {
        parse_decimal(&self.weight)
    }

    /// True when the topic's category is one of `academic_categories`.
    pub fn is_academic(&self, academic_categories: &[String]) -> bool {
        let category = self.category.trim();
        !category.is_empty()
            && academic_categories
                .iter()
                .any(|c| c.trim().eq_ignore_ascii_case(category))
    }
}

/// Syllabus for one stage.
///
/// Default: no topics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyllabusStageData {
    #[serde(default)]
    pub topics: Vec<Topic>,
}

impl SyllabusStageData {
    pub fn add_topic(&mut self, topic: Topic) {
        self.topics.push(topic);
    }

    /// Remove a topic. Sibling weights are left as entered.
    pub fn remove_topic(&mut self, index: usize) -> Option<Topic> {
        if index < self.topics.len() {
            Some(self.topics.remove(index))
        } else {
            None
        }
    }

    pub fn has_academic_topic(&self, academic_categories: &[String]) -> bool {
        self.topics
            .iter()
            .any(|topic| topic.is_academic(academic_categories))
    }
}

impl PanelData for SyllabusStageData {
    const PANEL: PanelKind = PanelKind::Syllabus;
    type Globals = ();

    fn as_stage_data(&self) -> StageData<'_> {
        StageData::Syllabus(self)
    }

    fn state(draft: &CompetitionDraft) -> &PanelState<Self> {
        &draft.syllabus
    }

    fn state_mut(draft: &mut CompetitionDraft) -> &mut PanelState<Self> {
        &mut draft.syllabus
    }

    fn into_any(state: PanelState<Self>) -> AnyPanelState {
        AnyPanelState::Syllabus(state)
    }

    fn from_any(state: AnyPanelState) -> Option<PanelState<Self>> {
        match state {
            AnyPanelState::Syllabus(state) => Some(state),
            _ => None,
        }
    }
}
