//! Gated navigation tests
//!
//! Forward moves need a competition id and passing gates; backward moves are
//! always allowed.

use chrono::{TimeZone, Utc};

use contest_wizard::models::awards::{AwardRow, AwardsStageData};
use contest_wizard::models::overview::StageDetail;
use contest_wizard::models::pattern::{PatternStageData, Section, SectionFormat};
use contest_wizard::models::registration::{RegistrationPlan, RegistrationStageData, RegistrationWindow};
use contest_wizard::models::syllabus::{SyllabusStageData, Topic};
use contest_wizard::models::PanelKind;
use contest_wizard::verify::IssueKind;
use contest_wizard::{Session, WizardError};

use super::helpers::*;

fn add_syllabus_topic(session: &mut Session, category: &str) {
    session
        .update_stage::<SyllabusStageData>(&stage_id(1), |syllabus| {
            syllabus.add_topic(Topic::new("Topic", category, "10"));
        })
        .expect("Failed to edit syllabus");
}

fn add_unscored_section(session: &mut Session) {
    session
        .update_stage::<PatternStageData>(&stage_id(1), |pattern| {
            pattern
                .sections
                .push(Section::new("Part A", Some(SectionFormat::ShortAnswer)));
        })
        .expect("Failed to edit pattern");
}

/// Test: a new competition cannot leave the overview until it is saved
#[test]
fn test_unsaved_overview_blocks_forward_navigation() {
    let harness = Harness::new();
    let mut session = harness.session();

    assert!(matches!(
        session.advance(1, None),
        Err(WizardError::RegistryEmpty)
    ));

    let stage = session.add_stage(None).expect("Failed to add stage");
    session
        .update_globals::<StageDetail>(|info| info.name = "Science Cup".to_string())
        .expect("Failed to edit overview");

    assert!(matches!(
        session.advance(1, None),
        Err(WizardError::MissingCompetitionId)
    ));
    assert!(matches!(
        session.update_stage::<AwardsStageData>(&stage.id, |_| {}),
        Err(WizardError::MissingCompetitionId)
    ));
    assert!(!session.can_advance(PanelKind::Overview));

    session
        .save_panel(PanelKind::Overview)
        .expect("Failed to save overview");
    let id = session
        .competition_id()
        .cloned()
        .expect("overview save should assign an id");
    assert!(harness.remote.overview(&id).is_some());
    assert!(session.is_synced(PanelKind::Overview));

    let moved = session.advance(1, Some(&id)).expect("Failed to advance");
    assert_eq!(moved, PanelKind::Syllabus);
    assert!(harness
        .store
        .raw(&contest_wizard::models::CacheKey::new(id, PanelKind::Overview).storage_key())
        .is_some());
}

/// Test: an empty syllabus blocks the move to pattern, going back is fine
#[test]
fn test_gates_block_forward_but_not_backward() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1"]);
    let id = competition_id();

    session.advance(1, Some(&id)).expect("Failed to reach syllabus");
    let err = session.advance(2, Some(&id)).unwrap_err();
    match err {
        WizardError::ValidationFailed { panel, issues } => {
            assert_eq!(panel, PanelKind::Syllabus);
            assert_eq!(issues[0].field, "topics");
            assert_eq!(issues[0].stage, Some(stage_id(1)));
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
    assert_eq!(session.active_panel(), PanelKind::Syllabus);

    session.advance(0, Some(&id)).expect("backward move should pass");
    assert_eq!(session.active_panel(), PanelKind::Overview);
}

/// Test: pattern's scoring fields are required only for academic syllabi
#[test]
fn test_pattern_gate_follows_syllabus_classification() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1"]);

    add_syllabus_topic(&mut session, "Arts");
    add_unscored_section(&mut session);
    assert!(!session.derived().is_academic);
    assert!(session.gate(PanelKind::Pattern).passed());

    add_syllabus_topic(&mut session, "Science");
    assert!(session.derived().is_academic);
    let report = session.gate(PanelKind::Pattern);
    assert!(!report.passed());
    assert!(report.issues.iter().all(|issue| issue.kind == IssueKind::Missing));

    session
        .update_stage::<PatternStageData>(&stage_id(1), |pattern| {
            pattern.sections[0] = pattern.sections[0].clone().with_scoring("10", "50");
        })
        .expect("Failed to edit pattern");
    assert!(session.gate(PanelKind::Pattern).passed());
}

/// Test: the awards gate flips once the blank row is filled
#[test]
fn test_awards_gate_example() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1"]);

    session
        .update_stage::<AwardsStageData>(&stage_id(1), |awards| {
            awards.add_award_type("Certificate");
        })
        .expect("Failed to edit awards");
    assert!(!session.gate(PanelKind::Awards).passed());

    session
        .update_stage::<AwardsStageData>(&stage_id(1), |awards| {
            awards
                .award_types
                .insert("Certificate".to_string(), vec![AwardRow::new("50", "Student")]);
        })
        .expect("Failed to edit awards");
    assert!(session.gate(PanelKind::Awards).passed());
}

/// Test: publishing needs all six gates
#[test]
fn test_can_publish_once_every_panel_is_complete() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1"]);
    assert!(!session.can_publish());

    add_syllabus_topic(&mut session, "Arts");
    add_unscored_section(&mut session);
    session
        .update_globals::<RegistrationStageData>(|registration| {
            registration.plans.push(RegistrationPlan::new("Standard", "0"));
            registration.window = Some(RegistrationWindow {
                opens_at: Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap(),
                closes_at: Utc.with_ymd_and_hms(2026, 6, 30, 0, 0, 0).unwrap(),
            });
        })
        .expect("Failed to edit registration");
    assert!(!session.can_publish(), "awards are still empty");

    session
        .update_stage::<AwardsStageData>(&stage_id(1), |awards| {
            awards.add_award_type("Trophy")[0] = AwardRow::new("1", "Winner");
        })
        .expect("Failed to edit awards");

    for panel in PanelKind::ALL {
        assert!(session.can_advance(panel), "{panel} gate should pass");
    }
    assert!(session.can_publish());

    let id = competition_id();
    let last = session.advance(5, Some(&id)).expect("Failed to skip ahead");
    assert_eq!(last, PanelKind::Awards);
}
