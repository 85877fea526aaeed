//! The wizard's step machine.
//!
//! States are the six panels in order. Moving backward is always allowed.
//! Moving forward requires a competition id and a passing gate for every panel
//! being left or skipped over.

use tracing::{debug, info};

use crate::error::WizardError;
use crate::models::{CompetitionId, PanelKind};
use crate::verify::GateReport;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardController {
    active: PanelKind,
    competition_id: Option<CompetitionId>,
}

impl WizardController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> PanelKind {
        self.active
    }

    pub fn active_index(&self) -> usize {
        self.active.index()
    }

    pub fn competition_id(&self) -> Option<&CompetitionId> {
        self.competition_id.as_ref()
    }

    /// Record the id assigned by the first overview save.
    pub fn set_competition_id(&mut self, id: CompetitionId) {
        self.competition_id = Some(id);
    }

    /// Move to `target`, checking gates with `gate`.
    ///
    /// `competition_id` is the id the caller believes it is editing. When the
    /// controller already knows an id the two must agree.
    pub fn advance(
        &mut self,
        target: PanelKind,
        competition_id: Option<&CompetitionId>,
        gate: impl Fn(PanelKind) -> GateReport,
    ) -> Result<PanelKind, WizardError> {
        let id = match (&self.competition_id, competition_id) {
            (Some(known), Some(given)) if known != given => {
                return Err(WizardError::CompetitionMismatch {
                    expected: known.to_string(),
                    actual: given.to_string(),
                });
            }
            (Some(known), _) => known.clone(),
            (None, Some(given)) => given.clone(),
            (None, None) => return Err(WizardError::MissingCompetitionId),
        };

        if target > self.active {
            for panel in PanelKind::ALL[self.active.index()..target.index()].iter().copied() {
                let report = gate(panel);
                if !report.passed() {
                    debug!(%panel, issues = report.issues.len(), "Gate blocked advance");
                    return Err(WizardError::ValidationFailed {
                        panel,
                        issues: report.issues,
                    });
                }
            }
        }

        if target != self.active {
            info!(from = %self.active, to = %target, "Changed wizard panel");
        }
        self.competition_id = Some(id);
        self.active = target;
        Ok(target)
    }

    pub fn advance_to_index(
        &mut self,
        target: usize,
        competition_id: Option<&CompetitionId>,
        gate: impl Fn(PanelKind) -> GateReport,
    ) -> Result<PanelKind, WizardError> {
        let target = PanelKind::from_index(target).ok_or(WizardError::UnknownPanel(target))?;
        self.advance(target, competition_id, gate)
    }

    /// Publishing needs every panel's gate to hold.
    pub fn can_publish(&self, gate: impl Fn(PanelKind) -> GateReport) -> bool {
        self.competition_id.is_some() && PanelKind::ALL.into_iter().all(|panel| gate(panel).passed())
    }
}
