//! Stage lifecycle tests
//!
//! Adding, renaming and removing stages must reach every panel.

use contest_wizard::models::awards::AwardsStageData;
use contest_wizard::models::eligibility::{AdditionalForm, EligibilityStageData, FormSettings};
use contest_wizard::models::syllabus::{SyllabusStageData, Topic};
use contest_wizard::models::{PanelKind, Stage};
use contest_wizard::panel::PanelData;
use contest_wizard::registry::{RegistryStatus, RemovalConfirmation};
use contest_wizard::WizardError;

use super::helpers::*;

/// Test: a new stage gets a default entry in every panel
#[test]
fn test_added_stage_reaches_every_panel() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1"]);

    let stage = session.add_stage(None).expect("Failed to add stage");
    assert_eq!(stage.name, "Round 2");
    assert_eq!(stage.order_index, 1);

    let draft = session.draft();
    assert!(draft.overview.contains(&stage.id));
    assert!(draft.syllabus.contains(&stage.id));
    assert!(draft.pattern.contains(&stage.id));
    assert!(draft.eligibility.contains(&stage.id));
    assert!(draft.registration.contains(&stage.id));
    assert!(draft.awards.contains(&stage.id));
    assert_eq!(
        draft.syllabus.get_for_stage(&stage.id),
        SyllabusStageData::default()
    );

    for panel in PanelKind::ALL {
        assert!(session.has_pending_write(panel), "{panel} should be scheduled for caching");
    }
}

/// Test: removal needs confirmation and then clears the stage everywhere
#[test]
fn test_confirmed_removal_cascades() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1", "Round 2"]);
    let round_2 = stage_id(2);

    session
        .update_stage::<AwardsStageData>(&round_2, |awards| {
            awards.add_award_type("Medal");
        })
        .expect("Failed to edit awards");
    session
        .update_globals::<EligibilityStageData>(|globals| {
            globals.additional_forms.push(AdditionalForm::new(
                "Round 2",
                "School name",
                FormSettings::Text { max_length: Some(120) },
            ));
        })
        .expect("Failed to edit eligibility globals");

    let declined = session.remove_stage(&round_2, RemovalConfirmation::Declined);
    assert!(matches!(declined, Err(WizardError::RemovalNotConfirmed)));
    assert!(session.draft().references_stage(&round_2));

    let removed = session
        .remove_stage(&round_2, RemovalConfirmation::Confirmed)
        .expect("Failed to remove stage");
    assert_eq!(removed.name, "Round 2");
    assert!(!session.draft().references_stage(&round_2));
    assert!(session
        .draft()
        .eligibility
        .globals()
        .additional_forms
        .is_empty());
    assert_eq!(session.registry().status(), RegistryStatus::Ready { stages: 1 });
}

/// Test: renaming a stage retags its additional forms
#[test]
fn test_rename_retags_additional_forms() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1"]);

    session
        .update_globals::<EligibilityStageData>(|globals| {
            globals.additional_forms.push(AdditionalForm::new(
                "Round 1",
                "Guardian phone",
                FormSettings::Text { max_length: None },
            ));
        })
        .expect("Failed to edit eligibility globals");

    session
        .rename_stage(&stage_id(1), "  Qualifier ")
        .expect("Failed to rename stage");

    assert_eq!(session.registry().stages()[0].name, "Qualifier");
    assert_eq!(
        session.draft().eligibility.globals().additional_forms[0].stage,
        "Qualifier"
    );
}

/// Test: a rename arriving through the host's stage list keeps forms across save and reload
#[test]
fn test_host_rename_keeps_additional_forms_through_sync() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1"]);
    session
        .update_globals::<EligibilityStageData>(|globals| {
            globals.additional_forms.push(AdditionalForm::new(
                "Round 1",
                "School name",
                FormSettings::Text { max_length: None },
            ));
        })
        .expect("Failed to edit eligibility globals");

    let inserted = session.on_stage_change(vec![Stage::new(stage_id(1), "Finals", 0)]);
    assert_eq!(inserted, 0);
    assert_eq!(
        session.draft().eligibility.globals().additional_forms[0].stage,
        "Finals"
    );

    session
        .save_panel(PanelKind::Eligibility)
        .expect("Failed to save eligibility");
    let report = session
        .refresh_panel(PanelKind::Eligibility)
        .expect("Failed to reload eligibility");

    assert!(report.orphaned.is_empty());
    let forms = &session.draft().eligibility.globals().additional_forms;
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].stage, "Finals");
}

/// Test: two stages swapping names through the host keep their own forms
#[test]
fn test_host_name_swap_keeps_forms_apart() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1", "Round 2"]);
    session
        .update_globals::<EligibilityStageData>(|globals| {
            for (stage, label) in [("Round 1", "First"), ("Round 2", "Second")] {
                globals.additional_forms.push(AdditionalForm::new(
                    stage,
                    label,
                    FormSettings::Text { max_length: None },
                ));
            }
        })
        .expect("Failed to edit eligibility globals");

    session.on_stage_change(vec![
        Stage::new(stage_id(1), "Round 2", 0),
        Stage::new(stage_id(2), "Round 1", 1),
    ]);

    let forms = &session.draft().eligibility.globals().additional_forms;
    assert_eq!(forms[0].label, "First");
    assert_eq!(forms[0].stage, "Round 2");
    assert_eq!(forms[1].label, "Second");
    assert_eq!(forms[1].stage, "Round 1");
}

/// Test: a host-supplied stage list adds defaults but never deletes data
#[test]
fn test_stage_change_keeps_data_for_missing_stages() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1"]);
    session
        .update_stage::<SyllabusStageData>(&stage_id(1), |syllabus| {
            syllabus.add_topic(Topic::new("Geometry", "Mathematics", "30"));
        })
        .expect("Failed to edit syllabus");

    let inserted = session.on_stage_change(vec![Stage::new(stage_id(2), "Finals", 0)]);

    assert_eq!(inserted, 6);
    assert_eq!(session.registry().len(), 1);
    assert!(session.draft().syllabus.contains(&stage_id(1)));
    assert!(session.draft().awards.contains(&stage_id(2)));
    assert!(
        !session.derived().is_academic,
        "unregistered stages no longer feed derived state"
    );
}

/// Test: edits to unknown stages are rejected
#[test]
fn test_update_unknown_stage_fails() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1"]);

    let result = session.update_stage::<AwardsStageData>(&stage_id(9), |_| {});
    assert!(matches!(result, Err(WizardError::UnknownStage(_))));
}

/// Test: stages can be reordered
#[test]
fn test_move_stage_renumbers() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1", "Round 2", "Round 3"]);

    session
        .move_stage(&stage_id(3), 0)
        .expect("Failed to move stage");

    let names: Vec<&str> = session
        .registry()
        .stages()
        .iter()
        .map(|stage| stage.name.as_str())
        .collect();
    assert_eq!(names, vec!["Round 3", "Round 1", "Round 2"]);
    assert_eq!(session.registry().stages()[2].order_index, 2);
}

/// Test: the host can edit a snapshot and hand the whole panel back
#[test]
fn test_snapshot_edit_and_replace() {
    let harness = Harness::new();
    let mut session = harness.opened(&["Round 1", "Round 2"]);

    let mut syllabus = session
        .snapshot(PanelKind::Syllabus)
        .into_state::<SyllabusStageData>()
        .expect("snapshot should hold syllabus state");
    assert!(session
        .snapshot(PanelKind::Awards)
        .into_state::<SyllabusStageData>()
        .is_none());

    syllabus.set_for_stage(&stage_id(2), |data| {
        data.add_topic(Topic::new("Optics", "Science", "15"));
    });
    session
        .on_panel_state_change(SyllabusStageData::into_any(syllabus))
        .expect("Failed to replace syllabus");

    assert!(session.derived().is_academic);
    assert!(session.has_pending_write(PanelKind::Syllabus));
    assert_eq!(
        session
            .panel_state::<SyllabusStageData>()
            .get_for_stage(&stage_id(2))
            .topics[0]
            .name,
        "Optics"
    );
}
