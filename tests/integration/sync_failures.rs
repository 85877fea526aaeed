//! Remote sync tests
//!
//! Failed saves leave local state alone, superseded responses are dropped,
//! and orphaned records never fail an import.

use serde_json::json;
use std::time::Duration;

use contest_wizard::models::awards::{AwardRow, AwardsStageData};
use contest_wizard::models::pattern::PatternStageData;
use contest_wizard::models::PanelKind;
use contest_wizard::panel::PanelDocument;
use contest_wizard::WizardError;

use super::helpers::*;

fn pattern_document() -> PanelDocument {
    serde_json::from_value(json!({
        "records": [
            {"stage": "Round 1", "sections": [{"name": "Part A", "format": "oral"}]},
            {"stage": "DeletedStage", "sections": [{"name": "Old", "format": "oral"}]}
        ]
    }))
    .expect("Failed to build pattern document")
}

/// Test: a failed save keeps the cache, the sync flag and the active panel
#[test]
fn test_failed_save_changes_nothing_locally() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1"]);

    session
        .update_stage::<AwardsStageData>(&stage_id(1), |awards| {
            awards.add_award_type("Medal")[0] = AwardRow::new("3", "Top three");
        })
        .expect("Failed to edit awards");
    session.flush_pending();
    let cached_before = harness.cached(PanelKind::Awards);

    session
        .update_stage::<AwardsStageData>(&stage_id(1), |awards| {
            awards.add_award_type("Certificate");
        })
        .expect("Failed to edit awards");

    harness.remote.fail(PanelKind::Awards);
    let err = session.save_panel(PanelKind::Awards).unwrap_err();
    assert!(matches!(err, WizardError::SyncFailure { panel: PanelKind::Awards, .. }));
    assert!(err.is_recoverable());

    assert_eq!(harness.cached(PanelKind::Awards), cached_before);
    assert!(!session.is_synced(PanelKind::Awards));
    assert!(session.has_pending_write(PanelKind::Awards));
    assert_eq!(harness.remote.save_count(PanelKind::Awards), 0);

    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].panel, PanelKind::Awards);
    assert!(session.take_notices().is_empty());

    harness.remote.recover(PanelKind::Awards);
    session
        .save_panel(PanelKind::Awards)
        .expect("Retry should succeed");
    assert!(session.is_synced(PanelKind::Awards));
    assert!(!session.has_pending_write(PanelKind::Awards));
    assert_ne!(harness.cached(PanelKind::Awards), cached_before);
}

/// Test: a failed save does not move the wizard
#[test]
fn test_failed_save_does_not_transition() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1"]);

    harness.remote.fail(PanelKind::Overview);
    let result = session.save_and_advance(1);

    assert!(matches!(
        result,
        Err(WizardError::SyncFailure { panel: PanelKind::Overview, .. })
    ));
    assert_eq!(session.active_panel(), PanelKind::Overview);

    harness.remote.recover(PanelKind::Overview);
    assert_eq!(
        session.save_and_advance(1).expect("Failed to save and advance"),
        PanelKind::Syllabus
    );
}

/// Test: only the newest fetch for a panel may apply its response
#[test]
fn test_superseded_response_is_discarded() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1"]);

    let first = session
        .begin_fetch(PanelKind::Pattern)
        .expect("Failed to begin fetch");
    let second = session
        .begin_fetch(PanelKind::Pattern)
        .expect("Failed to begin fetch");

    let stale = session.apply_panel_document(&first, pattern_document());
    assert!(matches!(stale, Err(WizardError::StaleResponse { .. })));
    assert!(session
        .panel_state::<PatternStageData>()
        .get_for_stage(&stage_id(1))
        .sections
        .is_empty());

    session
        .apply_panel_document(&second, pattern_document())
        .expect("Latest response should apply");
    assert_eq!(
        session
            .panel_state::<PatternStageData>()
            .get_for_stage(&stage_id(1))
            .sections[0]
            .name,
        "Part A"
    );

    let replay = session.apply_panel_document(&second, pattern_document());
    assert!(matches!(replay, Err(WizardError::StaleResponse { .. })));
}

/// Test: records for unknown stages are dropped on import
#[test]
fn test_orphaned_records_are_dropped() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1"]);
    harness
        .remote
        .insert_panel(PanelKind::Pattern, competition_id(), pattern_document());

    let report = session
        .refresh_panel(PanelKind::Pattern)
        .expect("Failed to refresh pattern");

    assert_eq!(report.imported, 1);
    assert_eq!(report.orphaned, vec!["DeletedStage".to_string()]);
    assert_eq!(session.panel_state::<PatternStageData>().len(), 1);
    assert!(session.is_synced(PanelKind::Pattern));
}

/// Test: a failed fetch leaves the panel at its current state
#[test]
fn test_failed_fetch_keeps_state_and_reports() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1"]);
    let before = session.panel_state::<PatternStageData>().clone();

    harness.remote.fail(PanelKind::Pattern);
    harness.clock.advance(Duration::from_secs(5));
    let result = session.refresh_panel(PanelKind::Pattern);

    assert!(matches!(result, Err(WizardError::SyncFailure { .. })));
    assert_eq!(session.panel_state::<PatternStageData>(), &before);
    assert_eq!(session.take_notices().len(), 1);
}
