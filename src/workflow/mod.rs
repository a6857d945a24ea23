//! The workflow aggregate: an ordered list of steps plus its metadata.
//!
//! Step order is the default execution order. Only branch steps point at other steps,
//! and they do so by id, so moving steps around never invalidates a reference.

pub mod display;
pub mod route;

pub use display::*;
pub use route::*;

use crate::branch::{ConditionId, END_SENTINEL, Target};
use crate::error::DefinitionError;
use crate::ids::{StepId, WorkflowId};
use crate::step::Step;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    #[default]
    Draft,
    Active,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: WorkflowId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: WorkflowStatus,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A branch target or step id that breaks reference integrity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceIssue {
    /// A branch points at a step id that is not in the workflow.
    Dangling {
        step: StepId,
        condition: Option<ConditionId>,
        target: StepId,
    },
    /// A branch points at itself.
    SelfReference {
        step: StepId,
        condition: Option<ConditionId>,
    },
    /// Two or more steps share an id.
    DuplicateStepId(StepId),
    /// A step uses the id that marks the end of the workflow on the wire.
    ReservedStepId(StepId),
}

impl fmt::Display for ReferenceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin = |condition: &Option<ConditionId>| match condition {
            Some(id) => format!("condition '{}'", id),
            None => "default branch".to_string(),
        };
        match self {
            ReferenceIssue::Dangling {
                step,
                condition,
                target,
            } => write!(
                f,
                "Step '{}' ({}) targets missing step '{}'",
                step,
                origin(condition),
                target
            ),
            ReferenceIssue::SelfReference { step, condition } => {
                write!(f, "Step '{}' ({}) targets itself", step, origin(condition))
            }
            ReferenceIssue::DuplicateStepId(id) => {
                write!(f, "Step id '{}' is used more than once", id)
            }
            ReferenceIssue::ReservedStepId(id) => {
                write!(f, "Step id '{}' is reserved for the end of the workflow", id)
            }
        }
    }
}

impl Workflow {
    pub fn new(id: impl Into<WorkflowId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            status: WorkflowStatus::default(),
            steps: Vec::new(),
        }
    }

    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn position(&self, id: &StepId) -> Option<usize> {
        self.steps.iter().position(|s| &s.id == id)
    }

    pub fn step(&self, id: &StepId) -> Option<&Step> {
        self.steps.iter().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &StepId) -> bool {
        self.position(id).is_some()
    }

    pub fn step_ids(&self) -> impl Iterator<Item = &StepId> {
        self.steps.iter().map(|s| &s.id)
    }

    /// Ids of the branch steps, other than `id` itself, that can jump to `id`.
    pub fn referrers(&self, id: &StepId) -> Vec<StepId> {
        self.steps
            .iter()
            .filter(|s| &s.id != id)
            .filter(|s| {
                s.as_branch().is_some_and(|branch| {
                    branch
                        .targets()
                        .any(|(_, target)| target.step_id() == Some(id))
                })
            })
            .map(|s| s.id.clone())
            .collect()
    }

    /// Rewrites every branch target pointing at `id` to `replacement`.
    /// Returns the number of targets changed.
    pub fn retarget(&mut self, id: &StepId, replacement: &Target) -> usize {
        let mut changed = 0;
        for branch in self.steps.iter_mut().filter_map(Step::as_branch_mut) {
            for target in branch.targets_mut() {
                if target.step_id() == Some(id) {
                    *target = replacement.clone();
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Lists dangling and self-referencing branch targets, duplicate step ids and
    /// steps using the reserved end id.
    pub fn reference_issues(&self) -> Vec<ReferenceIssue> {
        let mut issues: Vec<ReferenceIssue> = self
            .step_ids()
            .duplicates()
            .map(|id| ReferenceIssue::DuplicateStepId(id.clone()))
            .collect();
        issues.extend(
            self.step_ids()
                .filter(|id| id.as_str() == END_SENTINEL)
                .map(|id| ReferenceIssue::ReservedStepId(id.clone())),
        );

        for step in &self.steps {
            let Some(branch) = step.as_branch() else {
                continue;
            };
            for (condition, target) in branch.targets() {
                let Some(target_id) = target.step_id() else {
                    continue;
                };
                if target_id == &step.id {
                    issues.push(ReferenceIssue::SelfReference {
                        step: step.id.clone(),
                        condition: condition.cloned(),
                    });
                } else if !self.contains(target_id) {
                    issues.push(ReferenceIssue::Dangling {
                        step: step.id.clone(),
                        condition: condition.cloned(),
                        target: target_id.clone(),
                    });
                }
            }
        }
        issues
    }

    /// Indices of steps whose configuration is missing required fields.
    pub fn invalid_steps(&self) -> Vec<usize> {
        self.steps
            .iter()
            .positions(|s| !s.config().is_valid())
            .collect()
    }

    /// Parses a workflow. Reference issues do not fail the load; each one is logged
    /// as a warning.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        let workflow: Self = serde_json::from_str(json)
            .map_err(|e| DefinitionError::JsonParseError(e.to_string()))?;
        for issue in workflow.reference_issues() {
            tracing::warn!(workflow = %workflow.id, "{}", issue);
        }
        Ok(workflow)
    }

    pub fn from_file(path: &str) -> Result<Self, DefinitionError> {
        let content = fs::read_to_string(path).map_err(|e| DefinitionError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String, DefinitionError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DefinitionError::SerializeError(e.to_string()))
    }
}
