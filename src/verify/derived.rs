use crate::models::syllabus::SyllabusStageData;
use crate::models::PanelKind;
use crate::panel::PanelState;
use crate::registry::StageRegistry;

/// State computed from one panel and read by another panel's gate.
///
/// `is_academic` comes from the syllabus and decides whether pattern sections
/// must carry question and mark counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerivedState {
    pub is_academic: bool,
}

impl DerivedState {
    /// Panels this state is computed from.
    pub const INPUTS: &'static [PanelKind] = &[PanelKind::Syllabus];

    /// True when a change to `panel` requires recomputing.
    pub fn depends_on(panel: PanelKind) -> bool {
        Self::INPUTS.contains(&panel)
    }

    /// The competition is academic when any registered stage has a topic in an
    /// academic category.
    pub fn from_syllabus(
        syllabus: &PanelState<SyllabusStageData>,
        registry: &StageRegistry,
        academic_categories: &[String],
    ) -> Self {
        let is_academic = registry.stages().iter().any(|stage| {
            syllabus
                .entry(&stage.id)
                .is_some_and(|data| data.has_academic_topic(academic_categories))
        });
        Self { is_academic }
    }
}
