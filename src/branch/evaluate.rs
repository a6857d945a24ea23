use super::{Condition, ConditionId, Operator, Target};
use crate::step::BranchConfig;
use ahash::AHashMap;
use std::cmp::Ordering;

/// Field values of the record a workflow runs for, keyed by dotted path
/// (`"patient.age"`). Missing fields read as empty.
pub type Record = AHashMap<String, String>;

/// The outcome of routing a branch step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routing {
    pub target: Target,
    /// The condition that decided the route. `None` when the default was taken.
    pub matched: Option<ConditionId>,
    /// A human-readable explanation of the decision.
    pub reason: String,
}

impl Operator {
    /// Applies the operator to a field value. `expected` is ignored for unary operators.
    ///
    /// Ordering comparisons are numeric when both sides parse as numbers and lexical
    /// otherwise. All other comparisons are exact and case-sensitive.
    pub fn apply(&self, actual: &str, expected: &str) -> bool {
        match self {
            Operator::Equals => actual == expected,
            Operator::NotEquals => actual != expected,
            Operator::Contains => actual.contains(expected),
            Operator::NotContains => !actual.contains(expected),
            Operator::GreaterThan => compare(actual, expected) == Ordering::Greater,
            Operator::LessThan => compare(actual, expected) == Ordering::Less,
            Operator::IsEmpty => actual.trim().is_empty(),
            Operator::IsNotEmpty => !actual.trim().is_empty(),
            Operator::StartsWith => actual.starts_with(expected),
            Operator::EndsWith => actual.ends_with(expected),
        }
    }
}

fn compare(actual: &str, expected: &str) -> Ordering {
    match (actual.trim().parse::<f64>(), expected.trim().parse::<f64>()) {
        (Ok(a), Ok(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => actual.cmp(expected),
    }
}

impl Condition {
    pub fn evaluate(&self, record: &Record) -> bool {
        let actual = record.get(&self.field).map(String::as_str).unwrap_or("");
        self.operator
            .apply(actual, self.effective_value().unwrap_or_default())
    }

    fn describe(&self, record: &Record) -> String {
        let actual = record.get(&self.field).map(String::as_str).unwrap_or("");
        match self.effective_value() {
            Some(value) => format!(
                "${} {} \"{}\" (was \"{}\")",
                self.field, self.operator, value, actual
            ),
            None => format!("${} {} (was \"{}\")", self.field, self.operator, actual),
        }
    }
}

/// Picks the target of a branch: the first matching condition wins, otherwise the
/// default target is taken.
pub fn route_branch(branch: &BranchConfig, record: &Record) -> Routing {
    match branch.conditions.iter().find(|c| c.evaluate(record)) {
        Some(condition) => Routing {
            target: condition.next_step.clone(),
            matched: Some(condition.id.clone()),
            reason: condition.describe(record),
        },
        None => Routing {
            target: branch.default_branch.clone(),
            matched: None,
            reason: "No condition matched; default branch taken".to_string(),
        },
    }
}
