//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types of the careflow crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use careflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let workflow = Workflow::from_file("path/to/workflow.json")?;
//! for issue in workflow.reference_issues() {
//!     println!("{}", issue);
//! }
//!
//! let mut record = Record::default();
//! record.insert("appointment.type".to_string(), "follow-up".to_string());
//! for entry in workflow.trace(&record, 100)? {
//!     println!("-> {}", entry.step);
//! }
//! # Ok(())
//! # }
//! ```

// Workflow aggregate and editing
pub use crate::builder::{BuilderMode, DeletePolicy, StepBuilder, StepBuilderConfig};
pub use crate::workflow::{DisplayWorkflow, ReferenceIssue, TraceEntry, Workflow, WorkflowStatus};

// Steps and their payloads
pub use crate::step::{
    BranchConfig, ConditionConfig, EmailConfig, NewStep, SmsConfig, Step, StepConfig, StepDraft,
    StepType, TaskConfig, TemplateConfig, WaitConfig, is_step_valid, relevant_config,
};

// Branch conditions
pub use crate::branch::{
    Condition, ConditionEditor, ConditionUpdate, Operator, Record, Routing, Target,
    UnaryValuePolicy, route_branch,
};

// Identifiers and catalogs
pub use crate::catalog::FieldCatalog;
pub use crate::ids::{ConditionId, IdGenerator, RandomIds, SequentialIds, StepId, WorkflowId};

// Error types
pub use crate::error::{BuilderError, DefinitionError, RouteError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
