use super::Workflow;
use crate::step::{Step, StepConfig};
use std::fmt;

/// Renders a workflow as a tree: one line per step, branch conditions nested below.
pub struct DisplayWorkflow<'a> {
    pub workflow: &'a Workflow,
}

impl<'a> fmt::Display for DisplayWorkflow<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} [{}] ({} steps)",
            self.workflow.name,
            self.workflow.id,
            self.workflow.steps.len()
        )?;
        let count = self.workflow.steps.len();
        for (index, step) in self.workflow.steps.iter().enumerate() {
            self.fmt_step(f, index, step, index + 1 == count)?;
        }
        Ok(())
    }
}

impl<'a> DisplayWorkflow<'a> {
    fn fmt_step(
        &self,
        f: &mut fmt::Formatter<'_>,
        index: usize,
        step: &Step,
        is_last: bool,
    ) -> fmt::Result {
        let node_marker = if is_last { "└── " } else { "├── " };
        let child_prefix = if is_last { "    " } else { "│   " };
        writeln!(
            f,
            "{}{}. {} '{}': {}",
            node_marker,
            index + 1,
            step.step_type(),
            step.id,
            Self::summary(step.config())
        )?;

        if let Some(branch) = step.as_branch() {
            for condition in &branch.conditions {
                let operand = condition
                    .effective_value()
                    .map(|v| format!(" \"{}\"", v))
                    .unwrap_or_default();
                writeln!(
                    f,
                    "{}├── if {} {}{} -> {}",
                    child_prefix, condition.field, condition.operator, operand, condition.next_step
                )?;
            }
            writeln!(f, "{}└── else -> {}", child_prefix, branch.default_branch)?;
        }
        Ok(())
    }

    fn summary(config: &StepConfig) -> String {
        match config {
            StepConfig::Email(c) => format!("\"{}\"", c.subject),
            StepConfig::Sms(c) => format!("\"{}\"", c.message),
            StepConfig::Task(c) => match &c.assignee {
                Some(assignee) => format!("\"{}\" ({})", c.subject, assignee),
                None => format!("\"{}\"", c.subject),
            },
            StepConfig::Wait(c) => format!("wait {}", c.delay),
            StepConfig::Condition(c) => c.condition.clone(),
            StepConfig::Template(c) => c.template_id.clone(),
            StepConfig::Branch(c) => format!("{} conditions", c.conditions.len()),
        }
    }
}
