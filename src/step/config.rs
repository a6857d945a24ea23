use super::StepType;
use crate::branch::{Condition, ConditionId, Target};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsConfig {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(default)]
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

/// A pause before the next step. `delay` is free text such as `"1d"`, `"2h"` or `"30m"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitConfig {
    #[serde(default)]
    pub delay: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionConfig {
    #[serde(default)]
    pub condition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default, rename = "templateId")]
    pub template_id: String,
}

/// Ordered conditions plus the target taken when none of them match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchConfig {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default, rename = "defaultBranchId")]
    pub default_branch: Target,
}

impl BranchConfig {
    /// Every target this branch can jump to, paired with the owning condition.
    /// The default target comes last with no condition id.
    pub fn targets(&self) -> impl Iterator<Item = (Option<&ConditionId>, &Target)> {
        self.conditions
            .iter()
            .map(|c| (Some(&c.id), &c.next_step))
            .chain(std::iter::once((None, &self.default_branch)))
    }

    pub(crate) fn targets_mut(&mut self) -> impl Iterator<Item = &mut Target> {
        self.conditions
            .iter_mut()
            .map(|c| &mut c.next_step)
            .chain(std::iter::once(&mut self.default_branch))
    }
}

/// The type-specific payload of a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StepConfig {
    Email(EmailConfig),
    Sms(SmsConfig),
    Task(TaskConfig),
    Wait(WaitConfig),
    Condition(ConditionConfig),
    Template(TemplateConfig),
    Branch(BranchConfig),
}

impl StepConfig {
    pub fn step_type(&self) -> StepType {
        match self {
            StepConfig::Email(_) => StepType::Email,
            StepConfig::Sms(_) => StepType::Sms,
            StepConfig::Task(_) => StepType::Task,
            StepConfig::Wait(_) => StepType::Wait,
            StepConfig::Condition(_) => StepType::Condition,
            StepConfig::Template(_) => StepType::Template,
            StepConfig::Branch(_) => StepType::Branch,
        }
    }

    /// An empty payload for the given type.
    pub fn empty(step_type: StepType) -> Self {
        match step_type {
            StepType::Email => StepConfig::Email(EmailConfig::default()),
            StepType::Sms => StepConfig::Sms(SmsConfig::default()),
            StepType::Task => StepConfig::Task(TaskConfig::default()),
            StepType::Wait => StepConfig::Wait(WaitConfig::default()),
            StepType::Condition => StepConfig::Condition(ConditionConfig::default()),
            StepType::Template => StepConfig::Template(TemplateConfig::default()),
            StepType::Branch => StepConfig::Branch(BranchConfig::default()),
        }
    }

    /// Whether the required fields of this payload are filled in.
    pub fn is_valid(&self) -> bool {
        super::is_step_valid(self.step_type(), &super::StepDraft::from(self))
    }

    /// Decodes a JSON payload as the configuration of `step_type`.
    /// Fields belonging to other types are ignored.
    pub fn from_json(
        step_type: StepType,
        value: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        let value = if value.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            value
        };
        Ok(match step_type {
            StepType::Email => StepConfig::Email(serde_json::from_value(value)?),
            StepType::Sms => StepConfig::Sms(serde_json::from_value(value)?),
            StepType::Task => StepConfig::Task(serde_json::from_value(value)?),
            StepType::Wait => StepConfig::Wait(serde_json::from_value(value)?),
            StepType::Condition => StepConfig::Condition(serde_json::from_value(value)?),
            StepType::Template => StepConfig::Template(serde_json::from_value(value)?),
            StepType::Branch => StepConfig::Branch(serde_json::from_value(value)?),
        })
    }
}

macro_rules! impl_from_config {
    ( $( ($config:ty, $variant:path) ),* $(,)? ) => {
        $(
            impl From<$config> for StepConfig {
                fn from(config: $config) -> Self {
                    $variant(config)
                }
            }
        )*
    };
}

impl_from_config! {
    (EmailConfig, StepConfig::Email),
    (SmsConfig, StepConfig::Sms),
    (TaskConfig, StepConfig::Task),
    (WaitConfig, StepConfig::Wait),
    (ConditionConfig, StepConfig::Condition),
    (TemplateConfig, StepConfig::Template),
    (BranchConfig, StepConfig::Branch),
}
