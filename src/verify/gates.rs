use crate::models::awards::AwardsStageData;
use crate::models::eligibility::{AdditionalForm, Criterion, EligibilityGlobals, FormSettings, RangeForm};
use crate::models::overview::{OverviewInfo, StageDetail};
use crate::models::pattern::PatternStageData;
use crate::models::registration::{RegistrationGlobals, RegistrationStageData};
use crate::models::syllabus::SyllabusStageData;
use crate::models::{CompetitionDraft, PanelKind, Stage, StageData};
use crate::panel::{PanelData, PanelState};
use crate::registry::StageRegistry;
use crate::validation::{is_filled, parse_count, parse_decimal};

use super::derived::DerivedState;
use super::result::{GateIssue, GateReport};

/// Evaluate `panel`'s gate against the current draft.
///
/// An empty registry always fails with a `NoStages` issue; panel-wide fields
/// are still checked so the host can list everything at once.
pub fn evaluate(
    panel: PanelKind,
    draft: &CompetitionDraft,
    registry: &StageRegistry,
    derived: &DerivedState,
) -> GateReport {
    let mut issues = Vec::new();
    if registry.is_empty() {
        issues.push(GateIssue::no_stages());
    }

    match panel {
        PanelKind::Overview => {
            issues.extend(stage_issues(&draft.overview, registry, derived));
            issues.extend(check_overview_info(draft.overview.globals()));
        }
        PanelKind::Syllabus => issues.extend(stage_issues(&draft.syllabus, registry, derived)),
        PanelKind::Pattern => issues.extend(stage_issues(&draft.pattern, registry, derived)),
        PanelKind::Eligibility => {
            issues.extend(stage_issues(&draft.eligibility, registry, derived));
            issues.extend(check_additional_forms(draft.eligibility.globals(), registry));
        }
        PanelKind::Registration => {
            issues.extend(stage_issues(&draft.registration, registry, derived));
            issues.extend(check_registration_globals(draft.registration.globals()));
        }
        PanelKind::Awards => issues.extend(stage_issues(&draft.awards, registry, derived)),
    }

    GateReport::new(panel, issues)
}

/// Check every registered stage, using the default entry where one is missing.
fn stage_issues<T: PanelData>(
    state: &PanelState<T>,
    registry: &StageRegistry,
    derived: &DerivedState,
) -> Vec<GateIssue> {
    registry
        .stages()
        .iter()
        .flat_map(|stage| {
            let data = state.get_for_stage(&stage.id);
            check_stage(stage, data.as_stage_data(), derived)
        })
        .collect()
}

fn check_stage(stage: &Stage, data: StageData<'_>, derived: &DerivedState) -> Vec<GateIssue> {
    match data {
        StageData::Overview(detail) => check_stage_detail(stage, detail),
        StageData::Syllabus(syllabus) => check_syllabus(stage, syllabus),
        StageData::Pattern(pattern) => check_pattern(stage, pattern, derived),
        StageData::Eligibility(eligibility) => eligibility
            .criteria
            .iter()
            .flat_map(|criterion| check_criterion(stage, criterion))
            .collect(),
        StageData::Registration(registration) => check_seat_limit(stage, registration),
        StageData::Awards(awards) => check_awards(stage, awards),
    }
}

fn check_overview_info(info: &OverviewInfo) -> Vec<GateIssue> {
    let mut issues = Vec::new();
    if !is_filled(&info.name) {
        issues.push(GateIssue::panel("name", "enter the competition name"));
    }
    issues
}

fn check_stage_detail(stage: &Stage, detail: &StageDetail) -> Vec<GateIssue> {
    match (detail.start_date, detail.end_date) {
        (Some(start), Some(end)) if start > end => vec![GateIssue::stage(
            &stage.id,
            "endDate",
            format!("'{}' ends before it starts", stage.name),
        )
        .invalid()],
        _ => Vec::new(),
    }
}

fn check_syllabus(stage: &Stage, syllabus: &SyllabusStageData) -> Vec<GateIssue> {
    if syllabus.topics.is_empty() {
        return vec![GateIssue::stage(
            &stage.id,
            "topics",
            format!("add at least one topic to '{}'", stage.name),
        )];
    }

    let mut issues = Vec::new();
    for (index, topic) in syllabus.topics.iter().enumerate() {
        if !is_filled(&topic.name) {
            issues.push(GateIssue::stage(
                &stage.id,
                format!("topics[{index}].name"),
                "enter a topic name",
            ));
        }
        if !is_filled(&topic.weight) {
            issues.push(GateIssue::stage(
                &stage.id,
                format!("topics[{index}].weight"),
                "enter a weight",
            ));
        } else if topic.weight_value().is_none() {
            issues.push(
                GateIssue::stage(
                    &stage.id,
                    format!("topics[{index}].weight"),
                    "weight must be a non-negative number",
                )
                .invalid(),
            );
        }
    }
    issues
}

fn check_pattern(stage: &Stage, pattern: &PatternStageData, derived: &DerivedState) -> Vec<GateIssue> {
    if pattern.sections.is_empty() {
        return vec![GateIssue::stage(
            &stage.id,
            "sections",
            format!("add at least one section to '{}'", stage.name),
        )];
    }

    let mut issues = Vec::new();
    for (index, section) in pattern.sections.iter().enumerate() {
        if section.format.is_none() {
            issues.push(GateIssue::stage(
                &stage.id,
                format!("sections[{index}].format"),
                "choose a format",
            ));
        }

        if derived.is_academic {
            for (field, value) in [("questions", &section.questions), ("marks", &section.marks)] {
                if !is_filled(value) {
                    issues.push(GateIssue::stage(
                        &stage.id,
                        format!("sections[{index}].{field}"),
                        format!("enter the number of {field}"),
                    ));
                } else if parse_count(value).is_none() {
                    issues.push(
                        GateIssue::stage(
                            &stage.id,
                            format!("sections[{index}].{field}"),
                            format!("{field} must be a positive whole number"),
                        )
                        .invalid(),
                    );
                }
            }
        }
    }
    issues
}

fn check_criterion(stage: &Stage, criterion: &Criterion) -> Vec<GateIssue> {
    match criterion {
        Criterion::Age(range) => check_range(stage, "age", range),
        Criterion::Grade(range) => check_range(stage, "grade", range),
        Criterion::Gender { allowed } => check_allowed(stage, "gender", allowed),
        Criterion::Region { allowed } => check_allowed(stage, "region", allowed),
    }
}

fn check_range(stage: &Stage, field: &str, range: &RangeForm) -> Vec<GateIssue> {
    let mut issues = Vec::new();
    if !is_filled(&range.min) && !is_filled(&range.max) {
        issues.push(GateIssue::stage(
            &stage.id,
            field,
            format!("enter a minimum or maximum {field}"),
        ));
        return issues;
    }

    let mut bound = |side: &str, value: &str| -> Option<f64> {
        if !is_filled(value) {
            return None;
        }
        let parsed = parse_decimal(value);
        if parsed.is_none() {
            issues.push(
                GateIssue::stage(
                    &stage.id,
                    format!("{field}.{side}"),
                    format!("{side} {field} must be a non-negative number"),
                )
                .invalid(),
            );
        }
        parsed
    };
    let min = bound("min", &range.min);
    let max = bound("max", &range.max);

    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            issues.push(
                GateIssue::stage(
                    &stage.id,
                    format!("{field}.max"),
                    format!("maximum {field} is below the minimum"),
                )
                .invalid(),
            );
        }
    }
    issues
}

fn check_allowed(stage: &Stage, field: &str, allowed: &[String]) -> Vec<GateIssue> {
    if allowed.iter().any(|value| is_filled(value)) {
        Vec::new()
    } else {
        vec![GateIssue::stage(
            &stage.id,
            field,
            format!("select at least one allowed {field}"),
        )]
    }
}

fn check_additional_forms(globals: &EligibilityGlobals, registry: &StageRegistry) -> Vec<GateIssue> {
    let mut issues = Vec::new();
    for (index, form) in globals.additional_forms.iter().enumerate() {
        let Some(stage) = registry.find_by_name(&form.stage) else {
            continue;
        };
        issues.extend(check_form(stage, index, form));
    }
    issues
}

fn check_form(stage: &Stage, index: usize, form: &AdditionalForm) -> Vec<GateIssue> {
    let field = |name: &str| format!("additionalForms[{index}].{name}");
    let mut issues = Vec::new();

    if !is_filled(&form.label) {
        issues.push(GateIssue::stage(&stage.id, field("label"), "enter a label"));
    }

    let invalid = |name: &str, message: &str| GateIssue::stage(&stage.id, field(name), message).invalid();
    match &form.settings {
        FormSettings::Text { max_length } => {
            if *max_length == Some(0) {
                issues.push(invalid("maxLength", "maximum length must be positive"));
            }
        }
        FormSettings::Number { min, max } => {
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    issues.push(invalid("max", "maximum is below the minimum"));
                }
            }
        }
        FormSettings::Date { min_date, max_date } => {
            if let (Some(min), Some(max)) = (min_date, max_date) {
                if min > max {
                    issues.push(invalid("maxDate", "latest date is before the earliest date"));
                }
            }
        }
        FormSettings::Choice { options } => {
            if !options.iter().any(|option| is_filled(option)) {
                issues.push(GateIssue::stage(
                    &stage.id,
                    field("options"),
                    "add at least one option",
                ));
            }
        }
        FormSettings::File {
            allowed_extensions,
            max_size_mb,
        } => {
            if allowed_extensions.iter().any(|ext| !is_filled(ext)) {
                issues.push(invalid("allowedExtensions", "file extensions cannot be blank"));
            }
            if *max_size_mb == Some(0) {
                issues.push(invalid("maxSizeMb", "maximum size must be positive"));
            }
        }
    }
    issues
}

fn check_seat_limit(stage: &Stage, registration: &RegistrationStageData) -> Vec<GateIssue> {
    if is_filled(&registration.seat_limit) && parse_count(&registration.seat_limit).is_none() {
        vec![GateIssue::stage(
            &stage.id,
            "seatLimit",
            "seat limit must be a positive whole number",
        )
        .invalid()]
    } else {
        Vec::new()
    }
}

fn check_registration_globals(globals: &RegistrationGlobals) -> Vec<GateIssue> {
    let mut issues = Vec::new();

    if globals.plans.is_empty() {
        issues.push(GateIssue::panel("plans", "add at least one registration plan"));
    }
    for (index, plan) in globals.plans.iter().enumerate() {
        if !is_filled(&plan.name) {
            issues.push(GateIssue::panel(format!("plans[{index}].name"), "enter a plan name"));
        }
        if !is_filled(&plan.fee) {
            issues.push(GateIssue::panel(format!("plans[{index}].fee"), "enter a fee"));
        } else if plan.fee_value().is_none() {
            issues.push(
                GateIssue::panel(format!("plans[{index}].fee"), "fee must be a non-negative amount")
                    .invalid(),
            );
        }
    }

    match &globals.window {
        None => issues.push(GateIssue::panel("window", "set the registration window")),
        Some(window) if !window.is_ordered() => issues.push(
            GateIssue::panel("window.closesAt", "registration closes before it opens").invalid(),
        ),
        Some(_) => {}
    }
    issues
}

fn check_awards(stage: &Stage, awards: &AwardsStageData) -> Vec<GateIssue> {
    if awards.award_types.is_empty() {
        return vec![GateIssue::stage(
            &stage.id,
            "awardTypes",
            format!("add at least one award type to '{}'", stage.name),
        )];
    }

    let mut issues = Vec::new();
    for (award_type, rows) in &awards.award_types {
        if rows.is_empty() {
            issues.push(GateIssue::stage(
                &stage.id,
                format!("awardTypes.{award_type}"),
                "add at least one row",
            ));
        }
        for (index, row) in rows.iter().enumerate() {
            if !is_filled(&row.quantity) {
                issues.push(GateIssue::stage(
                    &stage.id,
                    format!("awardTypes.{award_type}[{index}].quantity"),
                    "enter a quantity",
                ));
            } else if parse_count(&row.quantity).is_none() {
                issues.push(
                    GateIssue::stage(
                        &stage.id,
                        format!("awardTypes.{award_type}[{index}].quantity"),
                        "quantity must be a positive whole number",
                    )
                    .invalid(),
                );
            }
            if !is_filled(&row.given_to) {
                issues.push(GateIssue::stage(
                    &stage.id,
                    format!("awardTypes.{award_type}[{index}].givenTo"),
                    "enter who receives it",
                ));
            }
        }
    }
    issues
}
