use anyhow::{anyhow, bail, Result};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::RemoteStore;
use crate::models::overview::OverviewDocument;
use crate::models::{CacheKey, CompetitionId, PanelKind};
use crate::panel::PanelDocument;

#[derive(Debug, Default)]
struct Documents {
    overviews: HashMap<CompetitionId, OverviewDocument>,
    panels: HashMap<CacheKey, PanelDocument>,
    failing: HashSet<PanelKind>,
    created: u64,
    saves: HashMap<PanelKind, usize>,
    fetches: HashMap<PanelKind, usize>,
}

/// [`RemoteStore`] held in memory, for tests and offline hosts.
///
/// Clones share the same documents. A panel marked with [`fail`](Self::fail)
/// rejects every fetch and save until [`recover`](Self::recover) is called.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemoteStore {
    inner: Rc<RefCell<Documents>>,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_overview(&self, competition_id: CompetitionId, document: OverviewDocument) {
        self.inner
            .borrow_mut()
            .overviews
            .insert(competition_id, document);
    }

    pub fn insert_panel(&self, panel: PanelKind, competition_id: CompetitionId, document: PanelDocument) {
        self.inner
            .borrow_mut()
            .panels
            .insert(CacheKey::new(competition_id, panel), document);
    }

    pub fn overview(&self, competition_id: &CompetitionId) -> Option<OverviewDocument> {
        self.inner.borrow().overviews.get(competition_id).cloned()
    }

    pub fn panel(&self, panel: PanelKind, competition_id: &CompetitionId) -> Option<PanelDocument> {
        self.inner
            .borrow()
            .panels
            .get(&CacheKey::new(competition_id.clone(), panel))
            .cloned()
    }

    pub fn fail(&self, panel: PanelKind) {
        self.inner.borrow_mut().failing.insert(panel);
    }

    pub fn recover(&self, panel: PanelKind) {
        self.inner.borrow_mut().failing.remove(&panel);
    }

    /// Successful saves of `panel` so far.
    pub fn save_count(&self, panel: PanelKind) -> usize {
        self.inner.borrow().saves.get(&panel).copied().unwrap_or(0)
    }

    /// Fetch attempts for `panel` so far, failed ones included.
    pub fn fetch_count(&self, panel: PanelKind) -> usize {
        self.inner.borrow().fetches.get(&panel).copied().unwrap_or(0)
    }

    fn check(&self, panel: PanelKind, action: &str) -> Result<()> {
        if self.inner.borrow().failing.contains(&panel) {
            bail!("{action} {panel}: remote unavailable");
        }
        Ok(())
    }

    fn count_fetch(&self, panel: PanelKind) {
        *self.inner.borrow_mut().fetches.entry(panel).or_default() += 1;
    }

    fn count_save(&self, panel: PanelKind) {
        *self.inner.borrow_mut().saves.entry(panel).or_default() += 1;
    }
}

impl RemoteStore for MemoryRemoteStore {
    fn fetch_overview(&self, competition_id: &CompetitionId) -> Result<OverviewDocument> {
        self.count_fetch(PanelKind::Overview);
        self.check(PanelKind::Overview, "Failed to fetch")?;
        self.overview(competition_id)
            .ok_or_else(|| anyhow!("Competition {competition_id} not found"))
    }

    fn create_overview(&self, document: &OverviewDocument) -> Result<CompetitionId> {
        self.check(PanelKind::Overview, "Failed to create")?;
        let id = {
            let mut inner = self.inner.borrow_mut();
            inner.created += 1;
            CompetitionId::parse(format!("competition-{}", inner.created))?
        };
        let mut stored = document.clone();
        stored.competition_id = Some(id.clone());
        self.insert_overview(id.clone(), stored);
        self.count_save(PanelKind::Overview);
        Ok(id)
    }

    fn save_overview(&self, competition_id: &CompetitionId, document: &OverviewDocument) -> Result<()> {
        self.check(PanelKind::Overview, "Failed to save")?;
        if self.overview(competition_id).is_none() {
            bail!("Competition {competition_id} not found");
        }
        self.insert_overview(competition_id.clone(), document.clone());
        self.count_save(PanelKind::Overview);
        Ok(())
    }

    fn fetch_panel(&self, panel: PanelKind, competition_id: &CompetitionId) -> Result<PanelDocument> {
        self.count_fetch(panel);
        self.check(panel, "Failed to fetch")?;
        Ok(self.panel(panel, competition_id).unwrap_or_default())
    }

    fn save_panel(
        &self,
        panel: PanelKind,
        competition_id: &CompetitionId,
        document: &PanelDocument,
    ) -> Result<()> {
        self.check(panel, "Failed to save")?;
        self.insert_panel(panel, competition_id.clone(), document.clone());
        self.count_save(panel);
        Ok(())
    }
}
