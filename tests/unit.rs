//! Unit tests for the core value types and their wire format.
mod common;
use careflow::prelude::*;
use common::*;

#[test]
fn test_step_type_names() {
    assert_eq!(StepType::Email.to_string(), "email");
    assert_eq!("template".parse::<StepType>().unwrap(), StepType::Template);
    assert!(matches!(
        "webhook".parse::<StepType>(),
        Err(DefinitionError::UnknownStepType(name)) if name == "webhook"
    ));
}

#[test]
fn test_operator_names_and_arity() {
    assert_eq!(Operator::NotContains.to_string(), "not_contains");
    assert_eq!("ends_with".parse::<Operator>().unwrap(), Operator::EndsWith);
    let unary: Vec<_> = Operator::ALL.iter().filter(|op| op.is_unary()).collect();
    assert_eq!(unary, vec![&Operator::IsEmpty, &Operator::IsNotEmpty]);
}

#[test]
fn test_target_uses_end_sentinel_on_the_wire() {
    assert_eq!(serde_json::to_string(&Target::End).unwrap(), "\"end\"");
    assert_eq!(
        serde_json::to_string(&Target::step("abc")).unwrap(),
        "\"abc\""
    );
    let parsed: Target = serde_json::from_str("\"end\"").unwrap();
    assert!(parsed.is_end());
    let parsed: Target = serde_json::from_str("\"step-9\"").unwrap();
    assert_eq!(parsed.step_id().map(StepId::as_str), Some("step-9"));
}

#[test]
fn test_step_json_matches_front_end_shape() {
    let step = Step::new("t1", StepConfig::Template(TemplateConfig {
        template_id: "follow_up".to_string(),
    }));
    let json = serde_json::to_value(&step).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": "t1",
            "type": "template",
            "config": { "templateId": "follow_up" }
        })
    );
}

#[test]
fn test_step_json_ignores_fields_of_other_types() {
    let json = r#"{
        "id": "s1",
        "type": "sms",
        "config": { "message": "See you soon", "subject": "stale", "delay": "1d" }
    }"#;
    let step: Step = serde_json::from_str(json).unwrap();
    assert_eq!(step.step_type(), StepType::Sms);
    assert_eq!(step.config(), &sms("See you soon"));
}

#[test]
fn test_step_json_rejects_unknown_type() {
    let json = r#"{ "id": "s1", "type": "webhook", "config": {} }"#;
    let err = serde_json::from_str::<Step>(json).unwrap_err();
    assert!(err.to_string().contains("webhook"));
}

#[test]
fn test_branch_json_round_trip_keeps_sentinel() {
    let json = r#"{
        "id": "b1",
        "type": "branch",
        "config": {
            "conditions": [{
                "id": "c1",
                "field": "patient.age",
                "operator": "greater_than",
                "value": "65",
                "nextStepId": "end",
                "description": "Seniors finish early"
            }],
            "defaultBranchId": "e1"
        }
    }"#;
    let step: Step = serde_json::from_str(json).unwrap();
    let branch = step.as_branch().unwrap();
    assert_eq!(branch.conditions[0].operator, Operator::GreaterThan);
    assert!(branch.conditions[0].next_step.is_end());
    assert_eq!(branch.default_branch, Target::step("e1"));

    let back = serde_json::to_value(&step).unwrap();
    assert_eq!(back["config"]["conditions"][0]["nextStepId"], "end");
    assert_eq!(back["config"]["defaultBranchId"], "e1");
}

#[test]
fn test_error_display() {
    let err = BuilderError::StepReferenced {
        step: StepId::new("email"),
        referrers: vec![StepId::new("b1"), StepId::new("b2")],
    };
    assert_eq!(
        err.to_string(),
        "Step 'email' is still referenced by: b1, b2"
    );

    let err = BuilderError::InvalidMode {
        operation: "submit a step",
        mode: BuilderMode::Idle,
    };
    assert_eq!(err.to_string(), "Cannot submit a step while the builder is idle");

    let err = RouteError::DanglingTarget {
        from: StepId::new("b1"),
        target: StepId::new("gone"),
    };
    assert!(err.to_string().contains("gone"));
}

#[test]
fn test_sequential_ids() {
    let mut ids = SequentialIds::new("c");
    assert_eq!(ids.next_id(), "c-1");
    assert_eq!(ids.next_id(), "c-2");
}

#[test]
fn test_random_ids_are_base36() {
    let id = RandomIds.next_id();
    assert_eq!(id.len(), 9);
    assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
}

#[test]
fn test_workflow_display_tree() {
    let rendered = DisplayWorkflow {
        workflow: &sample_workflow(),
    }
    .to_string();
    assert!(rendered.starts_with("Patient onboarding [wf-1] (3 steps)"));
    assert!(rendered.contains("├── 1. email 'email': \"Welcome\""));
    assert!(rendered.contains("├── 2. wait 'wait': wait 1d"));
    assert!(rendered.contains("└── 3. branch 'branch': 1 conditions"));
    assert!(rendered.contains("    ├── if appointment.type equals \"follow-up\" -> email"));
    assert!(rendered.contains("    └── else -> <end>"));
}

#[test]
fn test_catalogs() {
    let template = careflow::catalog::find_template("appointment_reminder").unwrap();
    assert_eq!(template.id, "appointment_reminder");
    assert_eq!(careflow::catalog::TEMPLATES.len(), 4);

    let fields = FieldCatalog::default();
    assert_eq!(fields.len(), 10);
    assert_eq!(fields.first(), Some("patient.name"));
    assert!(fields.contains("prescription.refills"));
    assert!(!fields.contains("patient.ssn"));
    assert!(FieldCatalog::new(Vec::<String>::new()).is_empty());
}
