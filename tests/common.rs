//! Common test utilities for building workflows, steps and records.
use careflow::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Snapshots of every workflow passed to `on_change`, in call order.
pub type ChangeLog = Rc<RefCell<Vec<Workflow>>>;

/// Creates a builder with sequential step ids (`step-1`, `step-2`, ...) that records
/// every change notification.
#[allow(dead_code)]
pub fn recording_builder(workflow: Workflow) -> (StepBuilder<'static>, ChangeLog) {
    recording_builder_with(workflow, |config| config)
}

/// Like [`recording_builder`], with extra configuration applied before building.
#[allow(dead_code)]
pub fn recording_builder_with(
    workflow: Workflow,
    configure: impl FnOnce(StepBuilderConfig<'static>) -> StepBuilderConfig<'static>,
) -> (StepBuilder<'static>, ChangeLog) {
    let log: ChangeLog = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let config = StepBuilder::configure(workflow)
        .with_id_generator(SequentialIds::new("step"))
        .on_change(move |wf| sink.borrow_mut().push(wf.clone()));
    (configure(config).build(), log)
}

#[allow(dead_code)]
pub fn empty_workflow() -> Workflow {
    Workflow::new("wf-1", "Patient onboarding")
}

#[allow(dead_code)]
pub fn email(subject: &str, content: &str) -> StepConfig {
    StepConfig::Email(EmailConfig {
        subject: subject.to_string(),
        content: content.to_string(),
        recipient: None,
    })
}

#[allow(dead_code)]
pub fn wait(delay: &str) -> StepConfig {
    StepConfig::Wait(WaitConfig {
        delay: delay.to_string(),
    })
}

#[allow(dead_code)]
pub fn sms(message: &str) -> StepConfig {
    StepConfig::Sms(SmsConfig {
        message: message.to_string(),
        recipient: None,
    })
}

/// A branch with a single `field equals value -> target` rule.
#[allow(dead_code)]
pub fn branch(field: &str, value: &str, target: Target, default: Target) -> StepConfig {
    StepConfig::Branch(BranchConfig {
        conditions: vec![Condition::new("cond-1", field, Operator::Equals, value, target)],
        default_branch: default,
    })
}

/// Workflow `[welcome email, 1d wait, branch(appointment.type == follow-up -> email)]`.
#[allow(dead_code)]
pub fn sample_workflow() -> Workflow {
    empty_workflow().with_steps(vec![
        Step::new("email", email("Welcome", "Hi there")),
        Step::new("wait", wait("1d")),
        Step::new(
            "branch",
            branch(
                "appointment.type",
                "follow-up",
                Target::step("email"),
                Target::End,
            ),
        ),
    ])
}

#[allow(dead_code)]
pub fn record(pairs: &[(&str, &str)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[allow(dead_code)]
pub fn ids(workflow: &Workflow) -> Vec<&str> {
    workflow.steps.iter().map(|s| s.id.as_str()).collect()
}
