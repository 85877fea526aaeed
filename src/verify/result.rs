//! Result types for panel gates

use std::fmt;

use crate::models::{PanelKind, StageId};

/// Kind of gate issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// The registry has no stages, so no panel can be completed
    NoStages,
    /// A required field or collection is empty
    Missing,
    /// A field is filled but its value is unusable
    Invalid,
}

/// One reason a gate does not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateIssue {
    pub kind: IssueKind,
    /// Stage the issue belongs to, or `None` for panel-wide data.
    pub stage: Option<StageId>,
    /// Path of the offending field, e.g. `sections[1].marks`.
    pub field: String,
    pub message: String,
}

impl GateIssue {
    pub fn no_stages() -> Self {
        Self {
            kind: IssueKind::NoStages,
            stage: None,
            field: "stages".to_string(),
            message: "add at least one stage on the overview panel".to_string(),
        }
    }

    /// A missing panel-wide field.
    pub fn panel(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Missing,
            stage: None,
            field: field.into(),
            message: message.into(),
        }
    }

    /// A missing field of one stage's entry.
    pub fn stage(stage: &StageId, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Missing,
            stage: Some(stage.clone()),
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid(mut self) -> Self {
        self.kind = IssueKind::Invalid;
        self
    }
}

impl fmt::Display for GateIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.stage {
            Some(stage) => write!(f, "[{stage}] {}: {}", self.field, self.message),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

/// Outcome of evaluating one panel's gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateReport {
    pub panel: PanelKind,
    pub issues: Vec<GateIssue>,
}

impl GateReport {
    pub fn new(panel: PanelKind, issues: Vec<GateIssue>) -> Self {
        Self { panel, issues }
    }

    /// The gate holds when there is nothing to fix.
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues_for<'a>(
        &'a self,
        stage: &'a StageId,
    ) -> impl Iterator<Item = &'a GateIssue> + 'a {
        self.issues
            .iter()
            .filter(move |issue| issue.stage.as_ref() == Some(stage))
    }

    /// Stages with at least one issue, in the order they were reported.
    pub fn incomplete_stages(&self) -> Vec<&StageId> {
        let mut stages: Vec<&StageId> = Vec::new();
        for stage in self.issues.iter().filter_map(|issue| issue.stage.as_ref()) {
            if !stages.contains(&stage) {
                stages.push(stage);
            }
        }
        stages
    }
}
