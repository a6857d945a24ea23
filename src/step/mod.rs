pub mod config;
pub mod draft;

pub use config::*;
pub use draft::*;

use crate::error::{BuilderError, DefinitionError};
use crate::ids::StepId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of step kinds a workflow can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Email,
    Sms,
    Task,
    Wait,
    Condition,
    Template,
    Branch,
}

impl StepType {
    pub const ALL: [StepType; 7] = [
        StepType::Email,
        StepType::Sms,
        StepType::Task,
        StepType::Wait,
        StepType::Condition,
        StepType::Template,
        StepType::Branch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::Email => "email",
            StepType::Sms => "sms",
            StepType::Task => "task",
            StepType::Wait => "wait",
            StepType::Condition => "condition",
            StepType::Template => "template",
            StepType::Branch => "branch",
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepType {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DefinitionError::UnknownStepType(s.to_string()))
    }
}

/// One unit of automation in a workflow.
///
/// The type is derived from the configuration at construction time, so a step can
/// never carry a payload that belongs to another step type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStep")]
pub struct Step {
    pub id: StepId,
    #[serde(rename = "type")]
    step_type: StepType,
    config: StepConfig,
}

impl Step {
    pub fn new(id: impl Into<StepId>, config: StepConfig) -> Self {
        Self {
            id: id.into(),
            step_type: config.step_type(),
            config,
        }
    }

    pub fn step_type(&self) -> StepType {
        self.step_type
    }

    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    pub fn is_branch(&self) -> bool {
        self.step_type == StepType::Branch
    }

    pub fn as_branch(&self) -> Option<&BranchConfig> {
        match &self.config {
            StepConfig::Branch(branch) => Some(branch),
            _ => None,
        }
    }

    pub(crate) fn as_branch_mut(&mut self) -> Option<&mut BranchConfig> {
        match &mut self.config {
            StepConfig::Branch(branch) => Some(branch),
            _ => None,
        }
    }

    /// Swaps in a new configuration. The id and type stay fixed.
    pub(crate) fn replace_config(&mut self, config: StepConfig) -> Result<(), BuilderError> {
        if config.step_type() != self.step_type {
            return Err(BuilderError::StepTypeMismatch {
                step_id: self.id.clone(),
                expected: self.step_type,
                found: config.step_type(),
            });
        }
        self.config = config;
        Ok(())
    }
}

/// A step waiting to be appended. Without an id the builder assigns one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStep {
    pub id: Option<StepId>,
    pub config: StepConfig,
}

impl NewStep {
    pub fn new(config: impl Into<StepConfig>) -> Self {
        Self {
            id: None,
            config: config.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<StepId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl From<StepConfig> for NewStep {
    fn from(config: StepConfig) -> Self {
        Self::new(config)
    }
}

// Wire shape shared with the front-end: `{ "id", "type", "config" }`.
#[derive(Deserialize)]
struct RawStep {
    id: StepId,
    #[serde(rename = "type")]
    step_type: String,
    #[serde(default)]
    config: serde_json::Value,
}

impl TryFrom<RawStep> for Step {
    type Error = DefinitionError;

    fn try_from(raw: RawStep) -> Result<Self, Self::Error> {
        let step_type: StepType = raw.step_type.parse()?;
        let config = StepConfig::from_json(step_type, raw.config).map_err(|e| {
            DefinitionError::InvalidConfig {
                step_id: raw.id.clone(),
                step_type,
                message: e.to_string(),
            }
        })?;
        Ok(Step::new(raw.id, config))
    }
}
