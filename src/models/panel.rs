use serde::{Deserialize, Serialize};

/// One of the six wizard steps, in navigation order.
///
/// Dependency graph for derived state:
/// - `Pattern` reads the academic classification derived from `Syllabus`
/// - every other panel is self-contained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
    #[default]
    Overview,
    Syllabus,
    Pattern,
    Eligibility,
    Registration,
    Awards,
}

impl std::fmt::Display for PanelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PanelKind::Overview => write!(f, "Overview"),
            PanelKind::Syllabus => write!(f, "Syllabus"),
            PanelKind::Pattern => write!(f, "Pattern"),
            PanelKind::Eligibility => write!(f, "Eligibility"),
            PanelKind::Registration => write!(f, "Registration"),
            PanelKind::Awards => write!(f, "Awards"),
        }
    }
}

impl std::str::FromStr for PanelKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overview" => Ok(PanelKind::Overview),
            "syllabus" => Ok(PanelKind::Syllabus),
            "pattern" => Ok(PanelKind::Pattern),
            "eligibility" => Ok(PanelKind::Eligibility),
            "registration" => Ok(PanelKind::Registration),
            "awards" => Ok(PanelKind::Awards),
            _ => anyhow::bail!(
                "Invalid panel: {s}. Valid values: overview, syllabus, pattern, eligibility, registration, awards"
            ),
        }
    }
}

impl PanelKind {
    pub const ALL: [PanelKind; 6] = [
        PanelKind::Overview,
        PanelKind::Syllabus,
        PanelKind::Pattern,
        PanelKind::Eligibility,
        PanelKind::Registration,
        PanelKind::Awards,
    ];

    /// Position of the panel in the wizard, `0..=5`.
    pub fn index(self) -> usize {
        match self {
            PanelKind::Overview => 0,
            PanelKind::Syllabus => 1,
            PanelKind::Pattern => 2,
            PanelKind::Eligibility => 3,
            PanelKind::Registration => 4,
            PanelKind::Awards => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<PanelKind> {
        Self::ALL.get(index).copied()
    }

    /// Lowercase name used in storage keys and remote paths.
    pub fn slug(self) -> &'static str {
        match self {
            PanelKind::Overview => "overview",
            PanelKind::Syllabus => "syllabus",
            PanelKind::Pattern => "pattern",
            PanelKind::Eligibility => "eligibility",
            PanelKind::Registration => "registration",
            PanelKind::Awards => "awards",
        }
    }

    /// Panels whose state feeds this panel's gate.
    pub fn dependencies(self) -> &'static [PanelKind] {
        match self {
            PanelKind::Pattern => &[PanelKind::Syllabus],
            PanelKind::Overview
            | PanelKind::Syllabus
            | PanelKind::Eligibility
            | PanelKind::Registration
            | PanelKind::Awards => &[],
        }
    }

    /// Panels whose gate must be re-read when this panel changes.
    pub fn dependents(self) -> Vec<PanelKind> {
        Self::ALL
            .into_iter()
            .filter(|panel| panel.dependencies().contains(&self))
            .collect()
    }
}
