pub mod editor;
pub mod evaluate;

pub use editor::*;
pub use evaluate::*;

pub use crate::ids::ConditionId;
use crate::ids::StepId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a branch sends control: another step, or the end of the workflow.
///
/// On the wire this is a bare string and the reserved value `"end"` stands for
/// [`Target::End`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Target {
    Step(StepId),
    #[default]
    End,
}

pub const END_SENTINEL: &str = "end";

impl Target {
    pub fn step(id: impl Into<StepId>) -> Self {
        Target::Step(id.into())
    }

    pub fn step_id(&self) -> Option<&StepId> {
        match self {
            Target::Step(id) => Some(id),
            Target::End => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Target::End)
    }
}

impl From<String> for Target {
    fn from(s: String) -> Self {
        if s == END_SENTINEL {
            Target::End
        } else {
            Target::Step(StepId::from(s))
        }
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        match target {
            Target::Step(id) => id.as_str().to_string(),
            Target::End => END_SENTINEL.to_string(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Step(id) => write!(f, "{}", id),
            Target::End => write!(f, "<end>"),
        }
    }
}

/// Comparison applied between a record field and a condition's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    #[default]
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    IsEmpty,
    IsNotEmpty,
    StartsWith,
    EndsWith,
}

impl Operator {
    pub const ALL: [Operator; 10] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::Contains,
        Operator::NotContains,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::IsEmpty,
        Operator::IsNotEmpty,
        Operator::StartsWith,
        Operator::EndsWith,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
        }
    }

    /// Unary operators only look at the field; the condition's value is ignored.
    pub fn is_unary(&self) -> bool {
        matches!(self, Operator::IsEmpty | Operator::IsNotEmpty)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown operator '{}'", s))
    }
}

/// One rule of a branch step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub id: ConditionId,
    pub field: String,
    #[serde(default)]
    pub operator: Operator,
    #[serde(default)]
    pub value: String,
    #[serde(default, rename = "nextStepId")]
    pub next_step: Target,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Condition {
    pub fn new(
        id: impl Into<ConditionId>,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<String>,
        next_step: Target,
    ) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            operator,
            value: value.into(),
            next_step,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The operand actually used in a comparison. `None` for unary operators, even
    /// when a stale value is still stored.
    pub fn effective_value(&self) -> Option<&str> {
        (!self.operator.is_unary()).then_some(self.value.as_str())
    }
}

/// A single attribute change applied through the condition editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionUpdate {
    Field(String),
    Operator(Operator),
    Value(String),
    NextStep(Target),
    Description(Option<String>),
}

/// What happens to a condition's value when its operator becomes unary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnaryValuePolicy {
    /// Keep the stored value. Evaluation ignores it.
    #[default]
    Retain,
    /// Empty the value as soon as a unary operator is selected.
    Clear,
}
