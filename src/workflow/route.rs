use super::Workflow;
use crate::branch::{Record, Routing, Target, route_branch};
use crate::error::RouteError;
use crate::ids::StepId;

/// One visited step of a dry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub step: StepId,
    /// Present for branch steps only.
    pub routing: Option<Routing>,
}

impl Workflow {
    /// Where control goes after the step at `index`.
    ///
    /// Branch steps are routed against `record`; every other step falls through to the
    /// next step in list order, or to the end after the last one. `condition` steps
    /// are not interpreted and also fall through.
    pub fn next_step(&self, index: usize, record: &Record) -> Result<Target, RouteError> {
        let step = self
            .steps
            .get(index)
            .ok_or(RouteError::StepIndexOutOfBounds {
                index,
                len: self.steps.len(),
            })?;
        Ok(match step.as_branch() {
            Some(branch) => route_branch(branch, record).target,
            None => self
                .steps
                .get(index + 1)
                .map(|next| Target::Step(next.id.clone()))
                .unwrap_or(Target::End),
        })
    }

    /// Walks the workflow from its first step for `record` without performing any
    /// action, returning the visited steps in order.
    ///
    /// Fails on a target that does not exist, or once more than `max_steps` steps
    /// have been visited, which is how cycles between branches surface.
    pub fn trace(&self, record: &Record, max_steps: usize) -> Result<Vec<TraceEntry>, RouteError> {
        let mut visited = Vec::new();
        if self.steps.is_empty() {
            return Ok(visited);
        }
        let mut current = 0;

        loop {
            if visited.len() >= max_steps {
                return Err(RouteError::StepLimitExceeded(max_steps));
            }
            let step = &self.steps[current];
            let routing = step.as_branch().map(|branch| route_branch(branch, record));
            let target = match &routing {
                Some(routing) => routing.target.clone(),
                None => self.next_step(current, record)?,
            };
            visited.push(TraceEntry {
                step: step.id.clone(),
                routing,
            });

            match target {
                Target::End => return Ok(visited),
                Target::Step(id) => {
                    current = self
                        .position(&id)
                        .ok_or_else(|| RouteError::DanglingTarget {
                            from: step.id.clone(),
                            target: id.clone(),
                        })?;
                }
            }
        }
    }
}
