//! Shared test helpers for session integration tests

use chrono::{DateTime, TimeZone, Utc};
use std::rc::Rc;

use contest_wizard::fs::{LocalStore, MemoryStore};
use contest_wizard::models::overview::{OverviewDocument, OverviewInfo, OverviewStage, StageDetail};
use contest_wizard::models::{CacheKey, CompetitionId, PanelKind, StageId};
use contest_wizard::scheduler::ManualClock;
use contest_wizard::sync::MemoryRemoteStore;
use contest_wizard::{Session, WizardConfig};

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap()
}

pub fn competition_id() -> CompetitionId {
    CompetitionId::parse("math-olympiad").expect("Failed to parse competition id")
}

/// Stage ids used by seeded overviews: "1", "2", ...
pub fn stage_id(n: usize) -> StageId {
    StageId::new(n.to_string())
}

pub fn overview(stage_names: &[&str]) -> OverviewDocument {
    OverviewDocument {
        competition_id: Some(competition_id()),
        info: OverviewInfo {
            name: "Math Olympiad".to_string(),
            subjects: vec!["Mathematics".to_string()],
            description: String::new(),
        },
        stages: stage_names
            .iter()
            .enumerate()
            .map(|(i, name)| OverviewStage {
                id: stage_id(i + 1),
                name: name.to_string(),
                order_index: Some(i as u32),
                detail: StageDetail::default(),
            })
            .collect(),
    }
}

/// Clock, remote and local store shared by every session a test creates.
pub struct Harness {
    pub clock: ManualClock,
    pub remote: MemoryRemoteStore,
    pub store: MemoryStore,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            clock: ManualClock::new(start_time()),
            remote: MemoryRemoteStore::new(),
            store: MemoryStore::new(),
        }
    }

    pub fn session(&self) -> Session {
        self.session_with_store(Box::new(self.store.clone()))
    }

    pub fn session_with_store(&self, store: Box<dyn LocalStore>) -> Session {
        Session::new(
            WizardConfig::default(),
            Box::new(self.remote.clone()),
            store,
            Rc::new(self.clock.clone()),
        )
    }

    pub fn seed(&self, stage_names: &[&str]) {
        self.remote
            .insert_overview(competition_id(), overview(stage_names));
    }

    /// Seed the remote with `stage_names` and open a session on it.
    pub fn opened(&self, stage_names: &[&str]) -> Session {
        self.seed(stage_names);
        let mut session = self.session();
        session
            .open(competition_id())
            .expect("Failed to open competition");
        session
    }

    pub fn cached(&self, panel: PanelKind) -> Option<String> {
        self.store
            .raw(&CacheKey::new(competition_id(), panel).storage_key())
    }
}
