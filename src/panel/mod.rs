//! Stage-keyed panel state shared by every wizard panel.
//!
//! Each panel's per-stage data type implements [`PanelData`]. The generic
//! [`PanelState`] then provides the keyed map, the panel-wide globals, and the
//! conversion to and from the stage-tagged records the remote store speaks.

mod any;
mod remote;
mod state;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

pub use any::AnyPanelState;
pub use remote::{ImportReport, PanelDocument, RemoteRecord};
pub use state::PanelState;

use crate::models::{CompetitionDraft, PanelKind, Stage, StageData};
use crate::registry::StageRegistry;

/// Panel-scoped data that is not nested under a stage.
///
/// Globals that tag items with a stage name override the hooks so that stage
/// removal, renames and orphan cleanup reach them too.
pub trait PanelGlobals: Clone + Default + PartialEq + Debug + Serialize + DeserializeOwned {
    /// Drop items tagged with a stage the registry does not know. Returns the dropped tags.
    fn retain_registered(&mut self, _registry: &StageRegistry) -> Vec<String> {
        Vec::new()
    }

    fn stage_removed(&mut self, _stage: &Stage) {}

    fn stage_renamed(&mut self, _old_name: &str, _new_name: &str) {}
}

impl PanelGlobals for () {}

/// Per-stage data of one panel.
///
/// `Default` is the documented entry synthesized for a stage with no data yet.
pub trait PanelData: Clone + Default + PartialEq + Debug + Serialize + DeserializeOwned {
    const PANEL: PanelKind;
    type Globals: PanelGlobals;

    fn as_stage_data(&self) -> StageData<'_>;

    fn state(draft: &CompetitionDraft) -> &PanelState<Self>;
    fn state_mut(draft: &mut CompetitionDraft) -> &mut PanelState<Self>;

    fn into_any(state: PanelState<Self>) -> AnyPanelState;
    fn from_any(state: AnyPanelState) -> Option<PanelState<Self>>;
}
