use super::{Condition, ConditionId, ConditionUpdate, Operator, Target, UnaryValuePolicy};
use crate::catalog::FieldCatalog;
use crate::error::BuilderError;
use crate::ids::{IdGenerator, MAX_ID_ATTEMPTS, StepId};

/// Edits the ordered condition list of one branch step.
///
/// The editor owns no state: it works on a borrowed list and reports every successful
/// change through the optional `on_update` callback.
pub struct ConditionEditor<'a> {
    conditions: &'a mut Vec<Condition>,
    fields: &'a FieldCatalog,
    targets: Vec<StepId>,
    ids: &'a mut dyn IdGenerator,
    unary_policy: UnaryValuePolicy,
    on_update: Option<Box<dyn FnMut(&[Condition]) + 'a>>,
}

impl<'a> ConditionEditor<'a> {
    /// `targets` are the steps a condition may jump to, in display order.
    pub fn new(
        conditions: &'a mut Vec<Condition>,
        fields: &'a FieldCatalog,
        targets: Vec<StepId>,
        ids: &'a mut dyn IdGenerator,
    ) -> Self {
        Self {
            conditions,
            fields,
            targets,
            ids,
            unary_policy: UnaryValuePolicy::default(),
            on_update: None,
        }
    }

    pub fn with_unary_policy(mut self, policy: UnaryValuePolicy) -> Self {
        self.unary_policy = policy;
        self
    }

    pub fn on_update(mut self, callback: impl FnMut(&[Condition]) + 'a) -> Self {
        self.on_update = Some(Box::new(callback));
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        self.conditions
    }

    /// Appends a condition using the first catalog field and the first available
    /// target, falling back to the end of the workflow when no step is available.
    pub fn add_condition(&mut self) -> Result<ConditionId, BuilderError> {
        let id = self.fresh_condition_id()?;
        let next_step = self
            .targets
            .first()
            .cloned()
            .map(Target::Step)
            .unwrap_or_default();
        self.conditions.push(Condition::new(
            id.clone(),
            self.fields.first().unwrap_or_default(),
            Operator::Equals,
            String::new(),
            next_step,
        ));
        tracing::debug!(condition = %id, "Added branch condition");
        self.notify();
        Ok(id)
    }

    /// Replaces one attribute of the condition at `index`. Values are not validated.
    pub fn update_condition(
        &mut self,
        index: usize,
        update: ConditionUpdate,
    ) -> Result<(), BuilderError> {
        let len = self.conditions.len();
        let condition = self
            .conditions
            .get_mut(index)
            .ok_or(BuilderError::ConditionIndexOutOfBounds { index, len })?;

        match update {
            ConditionUpdate::Field(field) => condition.field = field,
            ConditionUpdate::Operator(operator) => {
                condition.operator = operator;
                if operator.is_unary() && self.unary_policy == UnaryValuePolicy::Clear {
                    condition.value.clear();
                }
            }
            ConditionUpdate::Value(value) => condition.value = value,
            ConditionUpdate::NextStep(target) => condition.next_step = target,
            ConditionUpdate::Description(description) => condition.description = description,
        }
        self.notify();
        Ok(())
    }

    pub fn remove_condition(&mut self, index: usize) -> Result<Condition, BuilderError> {
        if index >= self.conditions.len() {
            return Err(BuilderError::ConditionIndexOutOfBounds {
                index,
                len: self.conditions.len(),
            });
        }
        let removed = self.conditions.remove(index);
        tracing::debug!(condition = %removed.id, "Removed branch condition");
        self.notify();
        Ok(removed)
    }

    fn fresh_condition_id(&mut self) -> Result<ConditionId, BuilderError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = ConditionId::new(self.ids.next_id());
            if !self.conditions.iter().any(|c| c.id == id) {
                return Ok(id);
            }
        }
        Err(BuilderError::IdExhausted(MAX_ID_ATTEMPTS))
    }

    fn notify(&mut self) {
        if let Some(callback) = self.on_update.as_mut() {
            callback(&self.conditions[..]);
        }
    }
}
