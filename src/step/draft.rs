use super::{
    BranchConfig, ConditionConfig, EmailConfig, SmsConfig, StepConfig, StepType, TaskConfig,
    TemplateConfig, WaitConfig,
};
use crate::branch::{Condition, Target};

/// The in-progress form state shared by every step type.
///
/// Switching the selected type keeps whatever was typed for the other types, so a
/// draft is usually overfull. [`relevant_config`] is the only way from a draft to a
/// committed [`StepConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepDraft {
    pub subject: String,
    pub content: String,
    pub recipient: String,
    pub message: String,
    pub description: String,
    pub assignee: String,
    pub delay: String,
    pub condition: String,
    pub template_id: String,
    pub conditions: Vec<Condition>,
    pub default_branch: Target,
}

impl StepDraft {
    pub fn project(&self, step_type: StepType) -> StepConfig {
        relevant_config(step_type, self)
    }

    pub fn is_valid_for(&self, step_type: StepType) -> bool {
        is_step_valid(step_type, self)
    }
}

impl From<&StepConfig> for StepDraft {
    fn from(config: &StepConfig) -> Self {
        let mut draft = StepDraft::default();
        match config {
            StepConfig::Email(c) => {
                draft.subject = c.subject.clone();
                draft.content = c.content.clone();
                draft.recipient = c.recipient.clone().unwrap_or_default();
            }
            StepConfig::Sms(c) => {
                draft.message = c.message.clone();
                draft.recipient = c.recipient.clone().unwrap_or_default();
            }
            StepConfig::Task(c) => {
                draft.subject = c.subject.clone();
                draft.description = c.description.clone().unwrap_or_default();
                draft.assignee = c.assignee.clone().unwrap_or_default();
            }
            StepConfig::Wait(c) => draft.delay = c.delay.clone(),
            StepConfig::Condition(c) => draft.condition = c.condition.clone(),
            StepConfig::Template(c) => draft.template_id = c.template_id.clone(),
            StepConfig::Branch(c) => {
                draft.conditions = c.conditions.clone();
                draft.default_branch = c.default_branch.clone();
            }
        }
        draft
    }
}

fn filled(s: &str) -> bool {
    !s.trim().is_empty()
}

fn optional(s: &str) -> Option<String> {
    filled(s).then(|| s.to_string())
}

/// Decides whether a draft holds enough to be committed as a step of `step_type`.
///
/// Required text fields must contain something other than whitespace. Delays are not
/// parsed and template ids are not checked against the catalog. Branches have no
/// required fields.
pub fn is_step_valid(step_type: StepType, draft: &StepDraft) -> bool {
    match step_type {
        StepType::Email => filled(&draft.subject) && filled(&draft.content),
        StepType::Sms => filled(&draft.message),
        StepType::Task => filled(&draft.subject),
        StepType::Wait => filled(&draft.delay),
        StepType::Condition => filled(&draft.condition),
        StepType::Template => filled(&draft.template_id),
        StepType::Branch => true,
    }
}

/// Same as [`is_step_valid`], for a type given by name. Unknown names are never valid.
pub fn is_step_valid_by_name(step_type: &str, draft: &StepDraft) -> bool {
    step_type
        .parse::<StepType>()
        .is_ok_and(|t| is_step_valid(t, draft))
}

/// Keeps only the draft fields that belong to `step_type`.
pub fn relevant_config(step_type: StepType, draft: &StepDraft) -> StepConfig {
    match step_type {
        StepType::Email => StepConfig::Email(EmailConfig {
            subject: draft.subject.clone(),
            content: draft.content.clone(),
            recipient: optional(&draft.recipient),
        }),
        StepType::Sms => StepConfig::Sms(SmsConfig {
            message: draft.message.clone(),
            recipient: optional(&draft.recipient),
        }),
        StepType::Task => StepConfig::Task(TaskConfig {
            subject: draft.subject.clone(),
            description: optional(&draft.description),
            assignee: optional(&draft.assignee),
        }),
        StepType::Wait => StepConfig::Wait(WaitConfig {
            delay: draft.delay.clone(),
        }),
        StepType::Condition => StepConfig::Condition(ConditionConfig {
            condition: draft.condition.clone(),
        }),
        StepType::Template => StepConfig::Template(TemplateConfig {
            template_id: draft.template_id.clone(),
        }),
        StepType::Branch => StepConfig::Branch(BranchConfig {
            conditions: draft.conditions.clone(),
            default_branch: draft.default_branch.clone(),
        }),
    }
}

/// Same as [`relevant_config`], for a type given by name. Unknown names yield `None`.
pub fn relevant_config_by_name(step_type: &str, draft: &StepDraft) -> Option<StepConfig> {
    step_type
        .parse::<StepType>()
        .ok()
        .map(|t| relevant_config(t, draft))
}
