use anyhow::Result;

use crate::models::overview::OverviewDocument;
use crate::models::{CompetitionId, PanelKind};
use crate::panel::PanelDocument;

/// Fetch and save operations the wizard needs from the backend.
///
/// The overview is special: it carries the stage list and creating it is what
/// assigns the competition id. Every other panel is a list of stage-tagged
/// records plus optional globals.
pub trait RemoteStore {
    fn fetch_overview(&self, competition_id: &CompetitionId) -> Result<OverviewDocument>;

    /// Persist a new competition and return its id.
    fn create_overview(&self, document: &OverviewDocument) -> Result<CompetitionId>;

    fn save_overview(&self, competition_id: &CompetitionId, document: &OverviewDocument) -> Result<()>;

    fn fetch_panel(&self, panel: PanelKind, competition_id: &CompetitionId) -> Result<PanelDocument>;

    fn save_panel(
        &self,
        panel: PanelKind,
        competition_id: &CompetitionId,
        document: &PanelDocument,
    ) -> Result<()>;
}
