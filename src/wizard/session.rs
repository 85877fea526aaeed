//! One wizard session: the registry, the draft, and everything that keeps them
//! in sync with the local cache and the remote store.
//!
//! The session is single-threaded and never blocks on a timer. Edits schedule
//! a debounced cache write; the host calls [`Session::tick`] to run the writes
//! that are due. Remote saves only happen when the host asks for one.

use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, info, warn};

use crate::cache::{Debouncer, LocalCache};
use crate::config::WizardConfig;
use crate::error::WizardError;
use crate::fs::LocalStore;
use crate::models::awards::AwardsStageData;
use crate::models::eligibility::EligibilityStageData;
use crate::models::overview::{OverviewDocument, StageDetail};
use crate::models::pattern::PatternStageData;
use crate::models::registration::RegistrationStageData;
use crate::models::syllabus::SyllabusStageData;
use crate::models::{CacheKey, CompetitionDraft, CompetitionId, PanelKind, Stage, StageId};
use crate::panel::{AnyPanelState, ImportReport, PanelData, PanelDocument, PanelState};
use crate::registry::{RemovalConfirmation, StageRegistry};
use crate::scheduler::{Clock, DelayQueue, Scheduler};
use crate::sync::{RemoteStore, RequestTicket, RequestTracker};
use crate::verify::{evaluate, DerivedState, GateReport};

use super::controller::WizardController;

/// A transient message for the host to show, such as a failed save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub panel: PanelKind,
    pub message: String,
}

/// Where a panel's state came from when it was loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    /// A fresh cache entry; `inserted` stages received defaults.
    Cache { inserted: usize },
    Remote(ImportReport),
}

pub struct Session {
    config: WizardConfig,
    remote: Box<dyn RemoteStore>,
    cache: LocalCache,
    debouncer: Debouncer<CacheKey>,
    tracker: RequestTracker,
    registry: StageRegistry,
    draft: CompetitionDraft,
    derived: DerivedState,
    controller: WizardController,
    synced: HashSet<PanelKind>,
    notices: Vec<Notice>,
}

impl Session {
    pub fn new(
        config: WizardConfig,
        remote: Box<dyn RemoteStore>,
        store: Box<dyn LocalStore>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let scheduler: Box<dyn Scheduler<CacheKey>> = Box::new(DelayQueue::new(Rc::clone(&clock)));
        Self::with_scheduler(config, remote, store, clock, scheduler)
    }

    pub fn with_scheduler(
        config: WizardConfig,
        remote: Box<dyn RemoteStore>,
        store: Box<dyn LocalStore>,
        clock: Rc<dyn Clock>,
        scheduler: Box<dyn Scheduler<CacheKey>>,
    ) -> Self {
        let cache = LocalCache::new(store, clock, config.freshness());
        let debouncer = Debouncer::new(scheduler, config.debounce());
        Self {
            config,
            remote,
            cache,
            debouncer,
            tracker: RequestTracker::new(),
            registry: StageRegistry::new(),
            draft: CompetitionDraft::new(),
            derived: DerivedState::default(),
            controller: WizardController::new(),
            synced: HashSet::new(),
            notices: Vec::new(),
        }
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn registry(&self) -> &StageRegistry {
        &self.registry
    }

    pub fn draft(&self) -> &CompetitionDraft {
        &self.draft
    }

    pub fn derived(&self) -> DerivedState {
        self.derived
    }

    pub fn competition_id(&self) -> Option<&CompetitionId> {
        self.draft.id.as_ref()
    }

    pub fn active_panel(&self) -> PanelKind {
        self.controller.active()
    }

    pub fn panel_state<T: PanelData>(&self) -> &PanelState<T> {
        T::state(&self.draft)
    }

    /// True once the panel's current state has been saved remotely.
    pub fn is_synced(&self, panel: PanelKind) -> bool {
        self.synced.contains(&panel)
    }

    /// Whether a debounced cache write is waiting for `panel`.
    pub fn has_pending_write(&self, panel: PanelKind) -> bool {
        self.cache_key(panel)
            .is_some_and(|key| self.debouncer.is_pending(&key))
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Open an existing competition.
    ///
    /// The overview is fetched first because it defines the stages. Every
    /// other panel is then loaded from a fresh cache entry or the remote store.
    /// A panel that fails to load is left at its defaults and reported as a
    /// notice; only an overview failure fails the whole call.
    pub fn open(&mut self, competition_id: CompetitionId) -> Result<(), WizardError> {
        let document = match self.remote.fetch_overview(&competition_id) {
            Ok(document) => document,
            Err(e) => return Err(self.sync_failed(PanelKind::Overview, &e)),
        };

        self.draft = CompetitionDraft::new();
        self.draft.id = Some(competition_id.clone());
        self.controller = WizardController::new();
        self.controller.set_competition_id(competition_id.clone());
        self.synced.clear();
        self.install_overview(&document);

        let key = CacheKey::new(competition_id.clone(), PanelKind::Overview);
        if let Some(merged) = self
            .cache
            .load_reconciled::<StageDetail>(&key, self.registry.stages())
        {
            debug!(%key, "Using cached overview edits");
            self.draft.overview = merged.state;
        } else {
            self.synced.insert(PanelKind::Overview);
        }

        for panel in PanelKind::ALL.into_iter().skip(1) {
            // Failures are already turned into notices.
            let _ = self.load_panel(panel);
        }

        self.draft.ensure_stages(self.registry.stages());
        self.recompute_derived();
        info!(%competition_id, stages = self.registry.len(), "Opened competition");
        Ok(())
    }

    /// Load one panel, preferring a fresh cache entry over the remote store.
    pub fn load_panel(&mut self, panel: PanelKind) -> Result<LoadSource, WizardError> {
        match panel {
            PanelKind::Overview => self.load::<StageDetail>(),
            PanelKind::Syllabus => self.load::<SyllabusStageData>(),
            PanelKind::Pattern => self.load::<PatternStageData>(),
            PanelKind::Eligibility => self.load::<EligibilityStageData>(),
            PanelKind::Registration => self.load::<RegistrationStageData>(),
            PanelKind::Awards => self.load::<AwardsStageData>(),
        }
    }

    fn load<T: PanelData>(&mut self) -> Result<LoadSource, WizardError> {
        let key = self.require_key(T::PANEL)?;

        if let Some(merged) = self.cache.load_reconciled::<T>(&key, self.registry.stages()) {
            let inserted = merged.inserted.len();
            *T::state_mut(&mut self.draft) = merged.state;
            self.synced.remove(&T::PANEL);
            self.recompute_if_input(T::PANEL);
            return Ok(LoadSource::Cache { inserted });
        }

        self.refresh_panel(T::PANEL).map(LoadSource::Remote)
    }

    /// Issue a tagged fetch for `panel`. The response must come back through
    /// [`Session::apply_panel_document`] or [`Session::apply_overview_document`].
    pub fn begin_fetch(&mut self, panel: PanelKind) -> Result<RequestTicket, WizardError> {
        let key = self.require_key(panel)?;
        Ok(self.tracker.issue(key))
    }

    /// Fetch `panel` from the remote store and replace the local state with it.
    pub fn refresh_panel(&mut self, panel: PanelKind) -> Result<ImportReport, WizardError> {
        let ticket = self.begin_fetch(panel)?;
        let competition_id = ticket.key.competition_id.clone();

        let fetched = if panel == PanelKind::Overview {
            self.remote
                .fetch_overview(&competition_id)
                .map(Fetched::Overview)
        } else {
            self.remote.fetch_panel(panel, &competition_id).map(Fetched::Panel)
        };

        match fetched {
            Ok(Fetched::Panel(document)) => self.apply_panel_document(&ticket, document),
            Ok(Fetched::Overview(document)) => {
                self.apply_overview_document(&ticket, document)?;
                Ok(ImportReport::default())
            }
            Err(e) => {
                self.tracker.invalidate(&ticket.key);
                Err(self.sync_failed(panel, &e))
            }
        }
    }

    /// Apply a fetched panel document if `ticket` is still the latest request.
    pub fn apply_panel_document(
        &mut self,
        ticket: &RequestTicket,
        document: PanelDocument,
    ) -> Result<ImportReport, WizardError> {
        self.check_ticket(ticket)?;
        let report = match ticket.key.panel {
            PanelKind::Overview => self.import::<StageDetail>(document),
            PanelKind::Syllabus => self.import::<SyllabusStageData>(document),
            PanelKind::Pattern => self.import::<PatternStageData>(document),
            PanelKind::Eligibility => self.import::<EligibilityStageData>(document),
            PanelKind::Registration => self.import::<RegistrationStageData>(document),
            PanelKind::Awards => self.import::<AwardsStageData>(document),
        };
        Ok(report)
    }

    /// Apply a fetched overview document, replacing the stage registry.
    pub fn apply_overview_document(
        &mut self,
        ticket: &RequestTicket,
        document: OverviewDocument,
    ) -> Result<(), WizardError> {
        self.check_ticket(ticket)?;
        self.install_overview(&document);
        self.draft.ensure_stages(self.registry.stages());
        self.synced.insert(PanelKind::Overview);
        self.write_now(PanelKind::Overview);
        self.recompute_derived();
        Ok(())
    }

    fn check_ticket(&mut self, ticket: &RequestTicket) -> Result<(), WizardError> {
        if self.draft.id.as_ref() != Some(&ticket.key.competition_id) || !self.tracker.complete(ticket) {
            debug!(key = %ticket.key, "Discarding stale response");
            return Err(WizardError::StaleResponse {
                key: ticket.key.clone(),
            });
        }
        Ok(())
    }

    fn import<T: PanelData>(&mut self, document: PanelDocument) -> ImportReport {
        let (mut state, report) = PanelState::<T>::from_remote_shape(document, &self.registry);
        state.ensure_stages(self.registry.stages());
        if !report.is_clean() {
            info!(
                panel = %T::PANEL,
                orphaned = report.orphaned.len(),
                malformed = report.malformed.len(),
                "Imported panel with dropped records"
            );
        }

        *T::state_mut(&mut self.draft) = state;
        self.synced.insert(T::PANEL);
        self.write_now(T::PANEL);
        self.recompute_if_input(T::PANEL);
        report
    }

    fn install_overview(&mut self, document: &OverviewDocument) {
        self.registry = StageRegistry::from_document(document);
        self.draft.overview = document.panel_state();
    }

    // Stage events

    /// Add a stage. Every panel gets a default entry for it.
    pub fn add_stage(&mut self, name: Option<&str>) -> Result<Stage, WizardError> {
        let name = match name {
            Some(name) => name.to_string(),
            None => self.registry.next_default_name(),
        };
        let stage = self.registry.add_stage(name)?;
        self.draft.ensure_stages(self.registry.stages());
        self.touch_all();
        Ok(stage)
    }

    /// Remove a stage and everything keyed by it, after the user confirmed.
    pub fn remove_stage(
        &mut self,
        id: &StageId,
        confirmation: RemovalConfirmation,
    ) -> Result<Stage, WizardError> {
        let stage = self.registry.remove_stage(id, confirmation)?;
        self.draft.remove_stage(&stage);
        self.touch_all();
        self.recompute_derived();
        Ok(stage)
    }

    pub fn rename_stage(&mut self, id: &StageId, name: &str) -> Result<(), WizardError> {
        let old_name = self.registry.rename_stage(id, name)?;
        let new_name = self
            .registry
            .get(id)
            .map(|stage| stage.name.clone())
            .unwrap_or_else(|| name.trim().to_string());
        self.draft.rename_stage(&old_name, &new_name);
        self.touch_all();
        Ok(())
    }

    pub fn move_stage(&mut self, id: &StageId, new_index: usize) -> Result<(), WizardError> {
        self.registry.move_stage(id, new_index)?;
        self.panel_changed(PanelKind::Overview);
        Ok(())
    }

    /// Replace the stage list with one supplied by the host.
    ///
    /// Newly seen stages get default entries in every panel. Entries for
    /// stages missing from `stages` are kept; only [`Session::remove_stage`]
    /// deletes data. A stage whose id is kept under a new name is treated as a
    /// rename, so name-tagged globals follow it. Returns the number of entries
    /// inserted.
    pub fn on_stage_change(&mut self, stages: Vec<Stage>) -> usize {
        let registry = StageRegistry::from_stages(stages);
        let renamed: Vec<(&Stage, &Stage)> = registry
            .stages()
            .iter()
            .filter_map(|stage| {
                let previous = self.registry.get(&stage.id)?;
                (previous.name != stage.name).then_some((previous, stage))
            })
            .collect();

        // Retag through a placeholder so swapped names cannot merge.
        for (previous, _) in &renamed {
            self.draft
                .rename_stage(&previous.name, &rename_placeholder(&previous.id));
        }
        for (previous, stage) in &renamed {
            debug!(
                stage_id = %stage.id,
                from = %previous.name,
                to = %stage.name,
                "Stage renamed by host"
            );
            self.draft
                .rename_stage(&rename_placeholder(&stage.id), &stage.name);
        }

        self.registry = registry;
        let inserted = self.draft.ensure_stages(self.registry.stages());
        debug!(stages = self.registry.len(), inserted, "Stage list changed");
        self.touch_all();
        self.recompute_derived();
        inserted
    }

    // Panel edits

    /// Edit one stage's entry of panel `T`.
    pub fn update_stage<T: PanelData>(
        &mut self,
        id: &StageId,
        update: impl FnOnce(&mut T),
    ) -> Result<(), WizardError> {
        self.require_editable(T::PANEL)?;
        if !self.registry.contains(id) {
            return Err(WizardError::UnknownStage(id.clone()));
        }
        T::state_mut(&mut self.draft).set_for_stage(id, update);
        self.panel_changed(T::PANEL);
        Ok(())
    }

    /// Edit the panel-wide data of panel `T`.
    pub fn update_globals<T: PanelData>(
        &mut self,
        update: impl FnOnce(&mut T::Globals),
    ) -> Result<(), WizardError> {
        self.require_editable(T::PANEL)?;
        update(T::state_mut(&mut self.draft).globals_mut());
        self.panel_changed(T::PANEL);
        Ok(())
    }

    /// A copy of one panel's state for the host to edit and hand back through
    /// [`Session::on_panel_state_change`].
    pub fn snapshot(&self, panel: PanelKind) -> AnyPanelState {
        match panel {
            PanelKind::Overview => StageDetail::into_any(self.draft.overview.clone()),
            PanelKind::Syllabus => SyllabusStageData::into_any(self.draft.syllabus.clone()),
            PanelKind::Pattern => PatternStageData::into_any(self.draft.pattern.clone()),
            PanelKind::Eligibility => EligibilityStageData::into_any(self.draft.eligibility.clone()),
            PanelKind::Registration => {
                RegistrationStageData::into_any(self.draft.registration.clone())
            }
            PanelKind::Awards => AwardsStageData::into_any(self.draft.awards.clone()),
        }
    }

    /// Replace a panel's whole state, e.g. after the host edited a copy.
    pub fn on_panel_state_change(&mut self, state: AnyPanelState) -> Result<(), WizardError> {
        let panel = state.panel();
        self.require_editable(panel)?;
        self.draft.replace(state);
        self.draft.ensure_stages(self.registry.stages());
        self.panel_changed(panel);
        Ok(())
    }

    fn panel_changed(&mut self, panel: PanelKind) {
        self.synced.remove(&panel);
        self.recompute_if_input(panel);
        if let Some(key) = self.cache_key(panel) {
            self.debouncer.touch(key);
        }
    }

    fn touch_all(&mut self) {
        for panel in PanelKind::ALL {
            self.panel_changed(panel);
        }
    }

    fn recompute_if_input(&mut self, panel: PanelKind) {
        if DerivedState::depends_on(panel) {
            self.recompute_derived();
        }
    }

    fn recompute_derived(&mut self) {
        let derived = DerivedState::from_syllabus(
            &self.draft.syllabus,
            &self.registry,
            &self.config.academic_categories,
        );
        if derived != self.derived {
            debug!(is_academic = derived.is_academic, "Derived state changed");
            self.derived = derived;
        }
    }

    // Cache

    /// Run the cache writes whose idle window has elapsed. Returns how many ran.
    pub fn tick(&mut self) -> usize {
        let due = self.debouncer.take_due();
        self.write_keys(due)
    }

    /// Run every pending cache write now, e.g. before the host unloads.
    pub fn flush_pending(&mut self) -> usize {
        let pending = self.debouncer.drain();
        self.write_keys(pending)
    }

    fn write_keys(&mut self, keys: Vec<CacheKey>) -> usize {
        let mut written = 0;
        for key in keys {
            if self.draft.id.as_ref() != Some(&key.competition_id) {
                debug!(%key, "Skipping cache write for a closed competition");
                continue;
            }
            if self.write_cache(&key) {
                written += 1;
            }
        }
        written
    }

    fn write_now(&mut self, panel: PanelKind) {
        if let Some(key) = self.cache_key(panel) {
            self.debouncer.cancel(&key);
            self.write_cache(&key);
        }
    }

    fn write_cache(&mut self, key: &CacheKey) -> bool {
        let result = match key.panel {
            PanelKind::Overview => self.cache.write(key, &self.draft.overview),
            PanelKind::Syllabus => self.cache.write(key, &self.draft.syllabus),
            PanelKind::Pattern => self.cache.write(key, &self.draft.pattern),
            PanelKind::Eligibility => self.cache.write(key, &self.draft.eligibility),
            PanelKind::Registration => self.cache.write(key, &self.draft.registration),
            PanelKind::Awards => self.cache.write(key, &self.draft.awards),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(%key, error = %format!("{e:#}"), "Failed to write cache entry");
                false
            }
        }
    }

    // Remote saves

    /// Push `panel` to the remote store.
    ///
    /// The first overview save creates the competition and promotes the draft
    /// to its id. On failure nothing changes locally: the cache is not
    /// rewritten, the panel stays unsynced and a notice is queued.
    pub fn save_panel(&mut self, panel: PanelKind) -> Result<(), WizardError> {
        let result = match panel {
            PanelKind::Overview => self.save_overview(),
            PanelKind::Syllabus => self.save::<SyllabusStageData>(),
            PanelKind::Pattern => self.save::<PatternStageData>(),
            PanelKind::Eligibility => self.save::<EligibilityStageData>(),
            PanelKind::Registration => self.save::<RegistrationStageData>(),
            PanelKind::Awards => self.save::<AwardsStageData>(),
        };

        match result {
            Ok(()) => {
                self.synced.insert(panel);
                self.write_now(panel);
                info!(%panel, "Saved panel");
                Ok(())
            }
            Err(SaveError::Wizard(e)) => Err(e),
            Err(SaveError::Remote(e)) => Err(self.sync_failed(panel, &e)),
        }
    }

    fn save_overview(&mut self) -> Result<(), SaveError> {
        let document = OverviewDocument::from_state(
            self.draft.id.clone(),
            &self.registry,
            &self.draft.overview,
        );

        match self.draft.id.clone() {
            Some(id) => self
                .remote
                .save_overview(&id, &document)
                .map_err(SaveError::Remote),
            None => {
                let id = self
                    .remote
                    .create_overview(&document)
                    .map_err(SaveError::Remote)?;
                info!(competition_id = %id, "Created competition");
                self.draft.id = Some(id.clone());
                self.controller.set_competition_id(id);
                self.draft.ensure_stages(self.registry.stages());
                Ok(())
            }
        }
    }

    fn save<T: PanelData>(&mut self) -> Result<(), SaveError> {
        let key = self.require_key(T::PANEL).map_err(SaveError::Wizard)?;
        let document = T::state(&self.draft)
            .to_remote_shape(&self.registry)
            .map_err(SaveError::Remote)?;
        self.remote
            .save_panel(T::PANEL, &key.competition_id, &document)
            .map_err(SaveError::Remote)
    }

    fn sync_failed(&mut self, panel: PanelKind, error: &anyhow::Error) -> WizardError {
        warn!(%panel, error = %format!("{error:#}"), "Remote sync failed");
        let failure = WizardError::sync(panel, error);
        self.notices.push(Notice {
            panel,
            message: failure.to_string(),
        });
        failure
    }

    // Navigation

    pub fn gate(&self, panel: PanelKind) -> GateReport {
        evaluate(panel, &self.draft, &self.registry, &self.derived)
    }

    /// True when the wizard could move forward past `panel` right now.
    pub fn can_advance(&self, panel: PanelKind) -> bool {
        self.draft.id.is_some() && self.gate(panel).passed()
    }

    pub fn advance(
        &mut self,
        target: usize,
        competition_id: Option<&CompetitionId>,
    ) -> Result<PanelKind, WizardError> {
        if target > self.controller.active_index() && self.registry.is_empty() {
            return Err(WizardError::RegistryEmpty);
        }
        self.controller
            .advance_to_index(target, competition_id, |panel| {
                evaluate(panel, &self.draft, &self.registry, &self.derived)
            })
    }

    /// Save the active panel, then move to `target` if the save succeeded.
    pub fn save_and_advance(&mut self, target: usize) -> Result<PanelKind, WizardError> {
        self.save_panel(self.controller.active())?;
        let id = self.draft.id.clone();
        self.advance(target, id.as_ref())
    }

    pub fn can_publish(&self) -> bool {
        self.controller.can_publish(|panel| self.gate(panel))
    }

    // Keys

    fn cache_key(&self, panel: PanelKind) -> Option<CacheKey> {
        self.draft
            .id
            .as_ref()
            .map(|id| CacheKey::new(id.clone(), panel))
    }

    fn require_key(&self, panel: PanelKind) -> Result<CacheKey, WizardError> {
        self.cache_key(panel).ok_or(WizardError::MissingCompetitionId)
    }

    /// The overview can be edited before the competition exists; every other
    /// panel needs its id.
    fn require_editable(&self, panel: PanelKind) -> Result<(), WizardError> {
        if panel != PanelKind::Overview && self.draft.id.is_none() {
            return Err(WizardError::MissingCompetitionId);
        }
        Ok(())
    }
}

fn rename_placeholder(id: &StageId) -> String {
    format!("\u{1}{id}")
}

enum Fetched {
    Panel(PanelDocument),
    Overview(OverviewDocument),
}

enum SaveError {
    Wizard(WizardError),
    Remote(anyhow::Error),
}
