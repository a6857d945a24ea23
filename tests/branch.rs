//! Tests for the condition editor and branch routing.
mod common;
use careflow::prelude::*;
use common::*;

fn targets() -> Vec<StepId> {
    vec![StepId::new("email"), StepId::new("wait")]
}

#[test]
fn test_add_condition_uses_catalog_and_first_target() {
    let mut conditions = Vec::new();
    let fields = FieldCatalog::default();
    let mut ids = SequentialIds::new("cond");
    let mut updates = Vec::new();

    let id = {
        let mut editor = ConditionEditor::new(&mut conditions, &fields, targets(), &mut ids)
            .on_update(|list: &[Condition]| updates.push(list.len()));
        editor.add_condition().unwrap()
    };

    assert_eq!(id.as_str(), "cond-1");
    assert_eq!(updates, vec![1]);
    let condition = &conditions[0];
    assert_eq!(condition.field, "patient.name");
    assert_eq!(condition.operator, Operator::Equals);
    assert_eq!(condition.value, "");
    assert_eq!(condition.next_step, Target::step("email"));
}

#[test]
fn test_add_condition_without_targets_ends_workflow() {
    let mut conditions = Vec::new();
    let fields = FieldCatalog::new(["appointment.date"]);
    let mut ids = SequentialIds::default();
    let mut editor = ConditionEditor::new(&mut conditions, &fields, Vec::new(), &mut ids);
    editor.add_condition().unwrap();
    assert_eq!(editor.conditions()[0].next_step, Target::End);
    assert_eq!(editor.conditions()[0].field, "appointment.date");
}

#[test]
fn test_update_and_remove_notify_once_each() {
    let mut conditions = Vec::new();
    let fields = FieldCatalog::default();
    let mut ids = SequentialIds::new("cond");
    let mut calls = 0;
    {
        let mut editor = ConditionEditor::new(&mut conditions, &fields, targets(), &mut ids)
            .on_update(|_: &[Condition]| calls += 1);
        editor.add_condition().unwrap();
        editor.add_condition().unwrap();
        editor
            .update_condition(1, ConditionUpdate::Field("patient.age".to_string()))
            .unwrap();
        editor
            .update_condition(1, ConditionUpdate::NextStep(Target::End))
            .unwrap();
        let removed = editor.remove_condition(0).unwrap();
        assert_eq!(removed.id.as_str(), "cond-1");
    }
    assert_eq!(calls, 5);
    assert_eq!(conditions.len(), 1);
    assert_eq!(conditions[0].id.as_str(), "cond-2");
    assert_eq!(conditions[0].field, "patient.age");
    assert!(conditions[0].next_step.is_end());
}

#[test]
fn test_out_of_range_edits_fail_without_notifying() {
    let mut conditions = Vec::new();
    let fields = FieldCatalog::default();
    let mut ids = SequentialIds::default();
    let mut calls = 0;
    {
        let mut editor = ConditionEditor::new(&mut conditions, &fields, targets(), &mut ids)
            .on_update(|_: &[Condition]| calls += 1);
        assert_eq!(
            editor.update_condition(0, ConditionUpdate::Value("x".to_string())),
            Err(BuilderError::ConditionIndexOutOfBounds { index: 0, len: 0 })
        );
        assert!(editor.remove_condition(3).is_err());
    }
    assert_eq!(calls, 0);
}

#[test]
fn test_unary_operator_retains_value_by_default() {
    let mut conditions = vec![Condition::new(
        "c1",
        "patient.age",
        Operator::Equals,
        "anything",
        Target::End,
    )];
    let fields = FieldCatalog::default();
    let mut ids = SequentialIds::default();
    let mut editor = ConditionEditor::new(&mut conditions, &fields, targets(), &mut ids);
    editor
        .update_condition(0, ConditionUpdate::Operator(Operator::IsEmpty))
        .unwrap();

    let condition = &editor.conditions()[0];
    assert_eq!(condition.value, "anything");
    assert_eq!(condition.effective_value(), None);
    // The stale value plays no part in evaluation.
    assert!(condition.evaluate(&record(&[])));
    assert!(!condition.evaluate(&record(&[("patient.age", "41")])));
}

#[test]
fn test_unary_operator_clears_value_when_configured() {
    let mut conditions = vec![Condition::new(
        "c1",
        "patient.age",
        Operator::Equals,
        "anything",
        Target::End,
    )];
    let fields = FieldCatalog::default();
    let mut ids = SequentialIds::default();
    let mut editor = ConditionEditor::new(&mut conditions, &fields, targets(), &mut ids)
        .with_unary_policy(UnaryValuePolicy::Clear);
    editor
        .update_condition(0, ConditionUpdate::Operator(Operator::IsNotEmpty))
        .unwrap();
    assert_eq!(editor.conditions()[0].value, "");
}

#[test]
fn test_operators() {
    let cases = [
        (Operator::Equals, "follow-up", "follow-up", true),
        (Operator::NotEquals, "follow-up", "initial", true),
        (Operator::Contains, "Jane Doe", "Doe", true),
        (Operator::NotContains, "Jane Doe", "Smith", true),
        (Operator::GreaterThan, "70", "65", true),
        (Operator::GreaterThan, "7", "65", false),
        (Operator::LessThan, "2024-01-01", "2024-06-01", true),
        (Operator::StartsWith, "+1 555", "+1", true),
        (Operator::EndsWith, "jane@clinic.org", "@clinic.org", true),
        (Operator::IsEmpty, "", "", true),
        (Operator::IsNotEmpty, "", "", false),
    ];
    for (op, actual, expected, outcome) in cases {
        assert_eq!(
            op.apply(actual, expected),
            outcome,
            "{} {} {}",
            actual,
            op,
            expected
        );
    }
}

#[test]
fn test_route_branch_first_match_wins() {
    let branch = BranchConfig {
        conditions: vec![
            Condition::new("c1", "patient.age", Operator::GreaterThan, "65", Target::step("senior")),
            Condition::new("c2", "patient.age", Operator::GreaterThan, "18", Target::step("adult")),
        ],
        default_branch: Target::End,
    };

    let routing = route_branch(&branch, &record(&[("patient.age", "70")]));
    assert_eq!(routing.target, Target::step("senior"));
    assert_eq!(routing.matched.as_ref().map(ConditionId::as_str), Some("c1"));
    assert_eq!(routing.reason, "$patient.age greater_than \"65\" (was \"70\")");

    let routing = route_branch(&branch, &record(&[("patient.age", "30")]));
    assert_eq!(routing.target, Target::step("adult"));

    let routing = route_branch(&branch, &record(&[("patient.age", "12")]));
    assert_eq!(routing.target, Target::End);
    assert_eq!(routing.matched, None);
}

#[test]
fn test_missing_field_reads_as_empty() {
    let condition = Condition::new("c1", "patient.phone", Operator::IsEmpty, "", Target::End);
    assert!(condition.evaluate(&record(&[("patient.name", "Jane")])));
}

#[test]
fn test_add_condition_skips_ids_already_in_the_list() {
    let mut conditions = vec![
        Condition::new("cond-1", "patient.status", Operator::Equals, "active", Target::End),
        Condition::new("cond-2", "patient.age", Operator::GreaterThan, "65", Target::End),
    ];
    let fields = FieldCatalog::default();
    let mut ids = SequentialIds::new("cond");
    let mut editor = ConditionEditor::new(&mut conditions, &fields, targets(), &mut ids);

    assert_eq!(editor.add_condition().unwrap().as_str(), "cond-3");
    let ids: Vec<_> = editor.conditions().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["cond-1", "cond-2", "cond-3"]);
}

#[test]
fn test_add_condition_gives_up_on_a_stuck_generator() {
    struct Always;
    impl IdGenerator for Always {
        fn next_id(&mut self) -> String {
            "cond-1".to_string()
        }
    }
    let mut conditions = vec![Condition::new(
        "cond-1",
        "patient.name",
        Operator::IsNotEmpty,
        "",
        Target::End,
    )];
    let fields = FieldCatalog::default();
    let mut ids = Always;
    let mut calls = 0;
    let err = {
        let mut editor = ConditionEditor::new(&mut conditions, &fields, targets(), &mut ids)
            .on_update(|_: &[Condition]| calls += 1);
        editor.add_condition().unwrap_err()
    };
    assert!(matches!(err, BuilderError::IdExhausted(_)));
    assert_eq!(conditions.len(), 1);
    assert_eq!(calls, 0);
}
