use crate::builder::BuilderMode;
use crate::ids::StepId;
use crate::step::StepType;
use itertools::Itertools;
use thiserror::Error;

/// Errors raised while editing a workflow through the step builder or condition editor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    #[error("Step index {index} is out of bounds for a workflow with {len} steps")]
    StepIndexOutOfBounds { index: usize, len: usize },

    #[error("Condition index {index} is out of bounds for a branch with {len} conditions")]
    ConditionIndexOutOfBounds { index: usize, len: usize },

    #[error("The {step_type} step is missing required fields")]
    InvalidStep { step_type: StepType },

    #[error("Step '{step_id}' is a {expected} step and cannot take a {found} configuration")]
    StepTypeMismatch {
        step_id: StepId,
        expected: StepType,
        found: StepType,
    },

    #[error("Step '{step}' is still referenced by: {}", .referrers.iter().join(", "))]
    StepReferenced { step: StepId, referrers: Vec<StepId> },

    #[error("Step id '{0}' is already used in this workflow")]
    DuplicateStepId(StepId),

    #[error("Step id '{0}' is reserved for the end of the workflow")]
    ReservedStepId(StepId),

    #[error("Could not generate an unused id after {0} attempts")]
    IdExhausted(usize),

    #[error("Cannot {operation} while the builder is {mode}")]
    InvalidMode {
        operation: &'static str,
        mode: BuilderMode,
    },
}

/// Errors that can occur while loading or writing a workflow definition.
#[derive(Error, Debug, Clone)]
pub enum DefinitionError {
    #[error("Failed to parse workflow JSON: {0}")]
    JsonParseError(String),

    #[error("Failed to serialize workflow: {0}")]
    SerializeError(String),

    #[error("Could not read workflow file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Unknown step type: '{0}'")]
    UnknownStepType(String),

    #[error("Invalid configuration for {step_type} step '{step_id}': {message}")]
    InvalidConfig {
        step_id: StepId,
        step_type: StepType,
        message: String,
    },
}

/// Errors that can occur while routing a record through a workflow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Step index {index} is out of bounds for a workflow with {len} steps")]
    StepIndexOutOfBounds { index: usize, len: usize },

    #[error("Step '{from}' routes to '{target}', which is not part of the workflow")]
    DanglingTarget { from: StepId, target: StepId },

    #[error("Gave up after visiting {0} steps; the branches likely form a cycle")]
    StepLimitExceeded(usize),
}
