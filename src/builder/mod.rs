//! The step builder: the controller that owns a workflow's step list while it is
//! being edited.
//!
//! Every successful mutation calls the owner's `on_change` callback exactly once with
//! the full, updated [`Workflow`]. Failed operations leave the workflow untouched and
//! notify nobody.

mod mode;

pub use mode::BuilderMode;

use crate::branch::{ConditionEditor, END_SENTINEL, Target, UnaryValuePolicy};
use crate::catalog::FieldCatalog;
use crate::error::BuilderError;
use crate::ids::{IdGenerator, MAX_ID_ATTEMPTS, RandomIds, StepId};
use crate::step::{NewStep, Step, StepConfig, StepDraft, StepType, is_step_valid, relevant_config};
use crate::workflow::Workflow;

/// What deleting a step does to branch targets that still point at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Delete anyway and leave the targets dangling.
    #[default]
    Retain,
    /// Delete and send the dangling targets to the end of the workflow.
    RedirectToEnd,
    /// Refuse to delete a step that another branch still targets.
    Block,
}

type ChangeCallback<'a> = Box<dyn FnMut(&Workflow) + 'a>;

pub struct StepBuilder<'a> {
    workflow: Workflow,
    mode: BuilderMode,
    draft: StepDraft,
    draft_type: StepType,
    ids: Box<dyn IdGenerator + 'a>,
    fields: FieldCatalog,
    delete_policy: DeletePolicy,
    unary_policy: UnaryValuePolicy,
    on_change: Option<ChangeCallback<'a>>,
}

pub struct StepBuilderConfig<'a> {
    workflow: Workflow,
    ids: Box<dyn IdGenerator + 'a>,
    fields: FieldCatalog,
    delete_policy: DeletePolicy,
    unary_policy: UnaryValuePolicy,
    on_change: Option<ChangeCallback<'a>>,
}

impl<'a> StepBuilderConfig<'a> {
    pub fn new(workflow: Workflow) -> Self {
        Self {
            workflow,
            ids: Box::new(RandomIds),
            fields: FieldCatalog::default(),
            delete_policy: DeletePolicy::default(),
            unary_policy: UnaryValuePolicy::default(),
            on_change: None,
        }
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'a) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_field_catalog(mut self, fields: FieldCatalog) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    pub fn with_unary_value_policy(mut self, policy: UnaryValuePolicy) -> Self {
        self.unary_policy = policy;
        self
    }

    /// Registers the owner's change notification.
    pub fn on_change(mut self, callback: impl FnMut(&Workflow) + 'a) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn build(self) -> StepBuilder<'a> {
        StepBuilder {
            workflow: self.workflow,
            mode: BuilderMode::Idle,
            draft: StepDraft::default(),
            draft_type: StepType::Email,
            ids: self.ids,
            fields: self.fields,
            delete_policy: self.delete_policy,
            unary_policy: self.unary_policy,
            on_change: self.on_change,
        }
    }
}

impl<'a> StepBuilder<'a> {
    pub fn configure(workflow: Workflow) -> StepBuilderConfig<'a> {
        StepBuilderConfig::new(workflow)
    }

    /// A builder with random ids, default policies and no owner callback.
    pub fn new(workflow: Workflow) -> Self {
        StepBuilderConfig::new(workflow).build()
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn into_workflow(self) -> Workflow {
        self.workflow
    }

    pub fn mode(&self) -> BuilderMode {
        self.mode
    }

    pub fn draft(&self) -> &StepDraft {
        &self.draft
    }

    pub fn draft_type(&self) -> StepType {
        self.draft_type
    }

    pub fn field_catalog(&self) -> &FieldCatalog {
        &self.fields
    }

    /// Step ids a branch may target, in list order, leaving out `exclude`.
    pub fn available_targets(&self, exclude: Option<&StepId>) -> Vec<StepId> {
        self.workflow
            .step_ids()
            .filter(|id| Some(*id) != exclude)
            .cloned()
            .collect()
    }

    // --- Form state ---

    /// Opens the add form with an empty email draft, closing any open edit.
    pub fn open_add(&mut self) {
        self.draft = StepDraft::default();
        self.draft_type = StepType::Email;
        self.mode = BuilderMode::Adding;
    }

    /// Opens the edit form for the step at `index`, seeded with its configuration.
    pub fn open_edit(&mut self, index: usize) -> Result<(), BuilderError> {
        let step = self.step_at(index)?;
        let (draft, draft_type) = (StepDraft::from(step.config()), step.step_type());
        self.draft = draft;
        self.draft_type = draft_type;
        self.mode = BuilderMode::Editing(index);
        Ok(())
    }

    /// Closes the open form and drops the draft.
    pub fn cancel(&mut self) {
        self.close();
    }

    pub fn draft_mut(&mut self) -> Result<&mut StepDraft, BuilderError> {
        if self.mode.is_idle() {
            return Err(self.invalid_mode("edit the draft"));
        }
        Ok(&mut self.draft)
    }

    /// Changes the type being added. Fields typed for other types are kept in the draft.
    pub fn set_draft_type(&mut self, step_type: StepType) -> Result<(), BuilderError> {
        if self.mode != BuilderMode::Adding {
            return Err(self.invalid_mode("change the step type"));
        }
        self.draft_type = step_type;
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        !self.mode.is_idle() && is_step_valid(self.draft_type, &self.draft)
    }

    /// Edits the conditions of the branch being drafted. Changes stay in the draft
    /// until [`submit`](Self::submit). Only available while the draft is a branch.
    pub fn draft_conditions(&mut self) -> Result<ConditionEditor<'_>, BuilderError> {
        if self.draft_type != StepType::Branch {
            return Err(self.invalid_mode("edit branch conditions of a non-branch step"));
        }
        let exclude = match self.mode {
            BuilderMode::Idle => return Err(self.invalid_mode("edit branch conditions")),
            BuilderMode::Adding => None,
            BuilderMode::Editing(index) => Some(self.step_at(index)?.id.clone()),
        };
        let targets = self.available_targets(exclude.as_ref());
        Ok(ConditionEditor::new(
            &mut self.draft.conditions,
            &self.fields,
            targets,
            &mut *self.ids,
        )
        .with_unary_policy(self.unary_policy))
    }

    /// Commits the draft: appends it in `Adding` mode or replaces the edited step's
    /// configuration in `Editing` mode, then returns to `Idle`.
    pub fn submit(&mut self) -> Result<StepId, BuilderError> {
        if self.mode.is_idle() {
            return Err(self.invalid_mode("submit a step"));
        }
        if !self.can_submit() {
            return Err(BuilderError::InvalidStep {
                step_type: self.draft_type,
            });
        }

        let config = relevant_config(self.draft_type, &self.draft);
        let id = match self.mode {
            BuilderMode::Editing(index) => {
                self.update_step(index, config)?;
                self.workflow.steps[index].id.clone()
            }
            _ => self.add_step(NewStep::new(config))?,
        };
        self.close();
        Ok(id)
    }

    // --- Step list operations ---

    /// Appends a step, assigning a fresh id when it has none.
    pub fn add_step(&mut self, step: impl Into<NewStep>) -> Result<StepId, BuilderError> {
        let step = step.into();
        let id = match step.id {
            Some(id) if id.as_str() == END_SENTINEL => {
                return Err(BuilderError::ReservedStepId(id));
            }
            Some(id) if self.workflow.contains(&id) => {
                return Err(BuilderError::DuplicateStepId(id));
            }
            Some(id) => id,
            None => self.fresh_step_id()?,
        };

        tracing::debug!(step = %id, step_type = %step.config.step_type(), "Adding step");
        self.workflow.steps.push(Step::new(id.clone(), step.config));
        self.notify();
        Ok(id)
    }

    /// Replaces the configuration of the step at `index`. Its id and type stay fixed.
    pub fn update_step(&mut self, index: usize, config: StepConfig) -> Result<(), BuilderError> {
        let len = self.workflow.steps.len();
        let step = self
            .workflow
            .steps
            .get_mut(index)
            .ok_or(BuilderError::StepIndexOutOfBounds { index, len })?;
        step.replace_config(config)?;

        tracing::debug!(step = %step.id, index, "Updated step");
        self.notify();
        Ok(())
    }

    /// Removes the step at `index` and applies the delete policy to branch targets
    /// that pointed at it.
    pub fn delete_step(&mut self, index: usize) -> Result<Step, BuilderError> {
        let id = self.step_at(index)?.id.clone();
        let referrers = self.workflow.referrers(&id);

        if self.delete_policy == DeletePolicy::Block && !referrers.is_empty() {
            return Err(BuilderError::StepReferenced {
                step: id,
                referrers,
            });
        }

        let removed = self.workflow.steps.remove(index);
        if !referrers.is_empty() {
            match self.delete_policy {
                DeletePolicy::RedirectToEnd => {
                    let changed = self.workflow.retarget(&id, &Target::End);
                    tracing::debug!(step = %id, changed, "Redirected branch targets to end");
                }
                _ => {
                    tracing::warn!(
                        "Deleted step '{}' is still targeted by {} branch step(s)",
                        id,
                        referrers.len()
                    );
                }
            }
        }

        self.mode = self.mode.after_removal(index);
        tracing::debug!(step = %id, index, "Deleted step");
        self.notify();
        Ok(removed)
    }

    /// Moves the step at `from` so that it ends up at `to`.
    pub fn reorder_steps(&mut self, from: usize, to: usize) -> Result<(), BuilderError> {
        self.step_at(from)?;
        self.step_at(to)?;

        let step = self.workflow.steps.remove(from);
        self.workflow.steps.insert(to, step);
        self.mode = self.mode.after_move(from, to);

        tracing::debug!(from, to, "Reordered steps");
        self.notify();
        Ok(())
    }

    fn step_at(&self, index: usize) -> Result<&Step, BuilderError> {
        self.workflow
            .steps
            .get(index)
            .ok_or(BuilderError::StepIndexOutOfBounds {
                index,
                len: self.workflow.steps.len(),
            })
    }

    fn fresh_step_id(&mut self) -> Result<StepId, BuilderError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = StepId::new(self.ids.next_id());
            if !self.workflow.contains(&id) && id.as_str() != END_SENTINEL {
                return Ok(id);
            }
        }
        Err(BuilderError::IdExhausted(MAX_ID_ATTEMPTS))
    }

    fn close(&mut self) {
        self.mode = BuilderMode::Idle;
        self.draft = StepDraft::default();
    }

    fn invalid_mode(&self, operation: &'static str) -> BuilderError {
        BuilderError::InvalidMode {
            operation,
            mode: self.mode,
        }
    }

    fn notify(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.workflow);
        }
    }
}
