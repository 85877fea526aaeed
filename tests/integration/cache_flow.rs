//! Local cache tests
//!
//! Debounced writes, freshness expiry and stage reconciliation as a session
//! sees them.

use std::time::Duration;
use tempfile::TempDir;

use contest_wizard::fs::FileStore;
use contest_wizard::models::syllabus::{SyllabusStageData, Topic};
use contest_wizard::models::PanelKind;
use contest_wizard::wizard::LoadSource;

use super::helpers::*;

fn add_topic(session: &mut contest_wizard::Session, name: &str) {
    session
        .update_stage::<SyllabusStageData>(&stage_id(1), |syllabus| {
            syllabus.add_topic(Topic::new(name, "Mathematics", "10"));
        })
        .expect("Failed to edit syllabus");
}

/// Test: a burst of edits produces exactly one cache write
#[test]
fn test_rapid_edits_coalesce_into_one_write() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1"]);
    let writes_after_open = harness.store.writes();

    for i in 0..5 {
        add_topic(&mut session, &format!("Topic {i}"));
        harness.clock.advance(Duration::from_millis(200));
        assert_eq!(session.tick(), 0, "no write while edits keep coming");
    }

    harness.clock.advance(Duration::from_millis(1000));
    assert_eq!(session.tick(), 1);
    assert_eq!(harness.store.writes(), writes_after_open + 1);
    assert!(!session.has_pending_write(PanelKind::Syllabus));

    add_topic(&mut session, "Topic 5");
    harness.clock.advance(Duration::from_millis(1000));
    assert_eq!(session.tick(), 1);
    assert_eq!(harness.store.writes(), writes_after_open + 2);

    let cached = harness
        .cached(PanelKind::Syllabus)
        .expect("syllabus should be cached");
    assert!(cached.contains("Topic 5"));
}

/// Test: a cache entry an hour old is used instead of the remote copy
#[test]
fn test_recent_cache_entry_wins_over_remote() {
    let harness = Harness::new();
    let mut first = harness.opened(&["Round 1"]);
    add_topic(&mut first, "Limits");
    first.flush_pending();

    harness.clock.advance(Duration::from_secs(3600));
    let fetches_before = harness.remote.fetch_count(PanelKind::Syllabus);

    let mut second = harness.session();
    second.open(competition_id()).expect("Failed to reopen");

    let syllabus = second
        .panel_state::<SyllabusStageData>()
        .get_for_stage(&stage_id(1));
    assert_eq!(syllabus.topics[0].name, "Limits");
    assert_eq!(harness.remote.fetch_count(PanelKind::Syllabus), fetches_before);
    assert!(second.derived().is_academic);
    assert!(!second.is_synced(PanelKind::Syllabus));
}

/// Test: a cache entry 25 hours old is discarded and the remote copy used
#[test]
fn test_stale_cache_entry_is_discarded() {
    let harness = Harness::new();
    let mut first = harness.opened(&["Round 1"]);
    add_topic(&mut first, "Limits");
    first.flush_pending();

    harness.clock.advance(Duration::from_secs(25 * 3600));

    let mut second = harness.session();
    second.open(competition_id()).expect("Failed to reopen");

    assert!(second
        .panel_state::<SyllabusStageData>()
        .get_for_stage(&stage_id(1))
        .topics
        .is_empty());
    assert!(second.is_synced(PanelKind::Syllabus));
}

/// Test: a stage added remotely is filled in when the cache is reloaded
#[test]
fn test_cache_reload_fills_new_stage() {
    let harness = Harness::new();
    let mut first = harness.opened(&["Round 1"]);
    add_topic(&mut first, "Limits");
    first.flush_pending();

    harness.seed(&["Round 1", "Round 2"]);
    let mut second = harness.session();
    second.open(competition_id()).expect("Failed to reopen");

    let outcome = second
        .load_panel(PanelKind::Syllabus)
        .expect("Failed to load syllabus");
    assert_eq!(outcome, LoadSource::Cache { inserted: 0 });

    let state = second.panel_state::<SyllabusStageData>();
    assert!(state.contains(&stage_id(2)));
    assert_eq!(state.get_for_stage(&stage_id(1)).topics.len(), 1);

    let cached = harness
        .cached(PanelKind::Syllabus)
        .expect("syllabus should be cached");
    assert!(cached.contains("\"2\""), "reconciled entry should be written back");
}

/// Test: the file-backed store survives across sessions
#[test]
fn test_file_store_persists_between_sessions() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let harness = Harness::new();
    harness.seed(&["Round 1"]);

    let store = FileStore::open(temp_dir.path()).expect("Failed to open file store");
    let mut first = harness.session_with_store(Box::new(store.clone()));
    first.open(competition_id()).expect("Failed to open");
    add_topic(&mut first, "Probability");
    assert_eq!(first.flush_pending(), 1);

    let mut second = harness.session_with_store(Box::new(store));
    second.open(competition_id()).expect("Failed to reopen");
    assert_eq!(
        second
            .panel_state::<SyllabusStageData>()
            .get_for_stage(&stage_id(1))
            .topics[0]
            .name,
        "Probability"
    );
}
