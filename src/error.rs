//! Error taxonomy of the wizard core.
//!
//! Infrastructure code returns `anyhow::Result` with context, the way the rest
//! of the crate does file and network IO. The session converts those failures
//! into [`WizardError`] at the panel boundary so the host always receives one of
//! the variants below. Stale cache discards and orphaned records are logged, not
//! returned.

use thiserror::Error;

use crate::models::{CacheKey, PanelKind, StageId};
use crate::verify::GateIssue;

#[derive(Debug, Error)]
pub enum WizardError {
    /// No stages are defined; every panel is blocked until the overview adds one.
    #[error("no stages are defined for this competition")]
    RegistryEmpty,

    /// A panel's gate does not hold. Recoverable by editing the panel.
    #[error("{panel} is incomplete ({} issue(s))", .issues.len())]
    ValidationFailed {
        panel: PanelKind,
        issues: Vec<GateIssue>,
    },

    /// A remote fetch or save failed. Local state is left as it was.
    #[error("failed to sync {panel}: {message}")]
    SyncFailure { panel: PanelKind, message: String },

    #[error("the overview must be saved before other panels can be used")]
    MissingCompetitionId,

    #[error("competition id mismatch: session has {expected}, got {actual}")]
    CompetitionMismatch { expected: String, actual: String },

    #[error("unknown stage: {0}")]
    UnknownStage(StageId),

    #[error("unknown panel index: {0}")]
    UnknownPanel(usize),

    #[error("stage removal was not confirmed")]
    RemovalNotConfirmed,

    #[error("a stage named '{0}' already exists")]
    DuplicateStageName(String),

    #[error("invalid stage name: {0}")]
    InvalidStageName(String),

    /// A response arrived after a newer request for the same key was issued.
    #[error("response for {key} was superseded by a newer request")]
    StaleResponse { key: CacheKey },
}

impl WizardError {
    /// Wrap an infrastructure failure as a sync failure for `panel`.
    pub fn sync(panel: PanelKind, error: &anyhow::Error) -> Self {
        WizardError::SyncFailure {
            panel,
            message: format!("{error:#}"),
        }
    }

    /// True for errors the user can resolve by editing or retrying.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WizardError::ValidationFailed { .. }
                | WizardError::SyncFailure { .. }
                | WizardError::RegistryEmpty
                | WizardError::MissingCompetitionId
                | WizardError::DuplicateStageName(_)
                | WizardError::InvalidStageName(_)
        )
    }
}
