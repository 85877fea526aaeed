//! Eligibility criteria and additional registration-form items.
//!
//! Criteria live per stage like every other panel. Additional form items are a
//! single flat list where each item names its stage, mirroring how the remote
//! store keeps them. Stage removal and renames are propagated into that list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::panel::PanelKind;
use super::stage::Stage;
use super::stage_data::StageData;
use crate::models::draft::CompetitionDraft;
use crate::panel::{AnyPanelState, PanelData, PanelGlobals, PanelState};
use crate::registry::StageRegistry;

/// Selectable criterion tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriterionTag {
    Age,
    Grade,
    Gender,
    Region,
}

/// Lower and upper bound as typed. Either side may be left blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeForm {
    #[serde(default)]
    pub min: String,
    #[serde(default)]
    pub max: String,
}

impl RangeForm {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }
}

/// A selected criterion with its derived sub-form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "lowercase")]
pub enum Criterion {
    Age(RangeForm),
    Grade(RangeForm),
    Gender {
        #[serde(default)]
        allowed: Vec<String>,
    },
    Region {
        #[serde(default)]
        allowed: Vec<String>,
    },
}

impl Criterion {
    /// Empty sub-form for a freshly selected tag.
    pub fn for_tag(tag: CriterionTag) -> Self {
        match tag {
            CriterionTag::Age => Criterion::Age(RangeForm::default()),
            CriterionTag::Grade => Criterion::Grade(RangeForm::default()),
            CriterionTag::Gender => Criterion::Gender {
                allowed: Vec::new(),
            },
            CriterionTag::Region => Criterion::Region {
                allowed: Vec::new(),
            },
        }
    }

    pub fn tag(&self) -> CriterionTag {
        match self {
            Criterion::Age(_) => CriterionTag::Age,
            Criterion::Grade(_) => CriterionTag::Grade,
            Criterion::Gender { .. } => CriterionTag::Gender,
            Criterion::Region { .. } => CriterionTag::Region,
        }
    }
}

/// Eligibility criteria for one stage.
///
/// Default: no criteria selected, which means the stage is open to everyone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityStageData {
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

impl EligibilityStageData {
    /// Select a tag. Selecting an already selected tag keeps its sub-form.
    pub fn select(&mut self, tag: CriterionTag) -> &mut Criterion {
        let position = match self.criteria.iter().position(|c| c.tag() == tag) {
            Some(position) => position,
            None => {
                self.criteria.push(Criterion::for_tag(tag));
                self.criteria.len() - 1
            }
        };
        &mut self.criteria[position]
    }

    pub fn deselect(&mut self, tag: CriterionTag) -> Option<Criterion> {
        let position = self.criteria.iter().position(|c| c.tag() == tag)?;
        Some(self.criteria.remove(position))
    }

    pub fn is_selected(&self, tag: CriterionTag) -> bool {
        self.criteria.iter().any(|c| c.tag() == tag)
    }
}

/// Type-specific settings of an additional form item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FormSettings {
    Text {
        #[serde(default, rename = "maxLength")]
        max_length: Option<u32>,
    },
    Number {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    Date {
        #[serde(default, rename = "minDate")]
        min_date: Option<NaiveDate>,
        #[serde(default, rename = "maxDate")]
        max_date: Option<NaiveDate>,
    },
    Choice {
        #[serde(default)]
        options: Vec<String>,
    },
    File {
        #[serde(default, rename = "allowedExtensions")]
        allowed_extensions: Vec<String>,
        #[serde(default, rename = "maxSizeMb")]
        max_size_mb: Option<u32>,
    },
}

/// A cross-stage form item, tagged with the name of the stage it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalForm {
    pub stage: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub settings: FormSettings,
}

impl AdditionalForm {
    pub fn new(stage: impl Into<String>, label: impl Into<String>, settings: FormSettings) -> Self {
        Self {
            stage: stage.into(),
            label: label.into(),
            required: false,
            settings,
        }
    }
}

/// Panel-wide eligibility data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityGlobals {
    #[serde(default)]
    pub additional_forms: Vec<AdditionalForm>,
}

impl EligibilityGlobals {
    pub fn forms_for<'a>(&'a self, stage: &'a Stage) -> impl Iterator<Item = &'a AdditionalForm> {
        self.additional_forms
            .iter()
            .filter(move |form| stage.matches_name(&form.stage))
    }
}

impl PanelGlobals for EligibilityGlobals {
    fn retain_registered(&mut self, registry: &StageRegistry) -> Vec<String> {
        let mut dropped = Vec::new();
        self.additional_forms.retain(|form| {
            let known = registry.find_by_name(&form.stage).is_some();
            if !known {
                dropped.push(form.stage.clone());
            }
            known
        });
        dropped
    }

    fn stage_removed(&mut self, stage: &Stage) {
        self.additional_forms
            .retain(|form| !stage.matches_name(&form.stage));
    }

    fn stage_renamed(&mut self, old_name: &str, new_name: &str) {
        for form in &mut self.additional_forms {
            if form.stage.trim().eq_ignore_ascii_case(old_name.trim()) {
                form.stage = new_name.to_string();
            }
        }
    }
}

impl PanelData for EligibilityStageData {
    const PANEL: PanelKind = PanelKind::Eligibility;
    type Globals = EligibilityGlobals;

    fn as_stage_data(&self) -> StageData<'_> {
        StageData::Eligibility(self)
    }

    fn state(draft: &CompetitionDraft) -> &PanelState<Self> {
        &draft.eligibility
    }

    fn state_mut(draft: &mut CompetitionDraft) -> &mut PanelState<Self> {
        &mut draft.eligibility
    }

    fn into_any(state: PanelState<Self>) -> AnyPanelState {
        AnyPanelState::Eligibility(state)
    }

    fn from_any(state: AnyPanelState) -> Option<PanelState<Self>> {
        match state {
            AnyPanelState::Eligibility(state) => Some(state),
            _ => None,
        }
    }
}
