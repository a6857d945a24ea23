//! # careflow - Workflow Definition Model
//!
//! **careflow** models the automation sequences of a patient-communication CRM: an
//! ordered list of typed steps (email, sms, task, wait, condition, template, branch),
//! where branch steps send control to another step, or end the workflow, depending on
//! ordered conditions evaluated against a record.
//!
//! ## Core Workflow
//!
//! 1.  **Load or create a `Workflow`**: build one in code or parse it from the JSON the
//!     front-end exchanges (`Workflow::from_json`).
//! 2.  **Edit it through a `StepBuilder`**: the builder owns the step list while it is
//!     being edited and reports every change to its owner through `on_change`.
//! 3.  **Check it**: `Workflow::reference_issues` lists dangling or self-referencing
//!     branch targets, `Workflow::invalid_steps` lists incomplete steps.
//! 4.  **Preview it**: `Workflow::trace` walks the workflow for a sample record.
//!
//! ## Quick Start
//!
//! ```rust
//! use careflow::prelude::*;
//!
//! let mut changes = 0;
//! let mut builder = StepBuilder::configure(Workflow::new("wf-1", "Onboarding"))
//!     .with_id_generator(SequentialIds::new("step"))
//!     .on_change(|_| changes += 1)
//!     .build();
//!
//! builder.open_add();
//! builder.draft_mut()?.subject = "Welcome".to_string();
//! builder.draft_mut()?.content = "Hi there".to_string();
//! let email = builder.submit()?;
//!
//! builder.add_step(StepConfig::Wait(WaitConfig { delay: "1d".to_string() }))?;
//!
//! let workflow = builder.into_workflow();
//! assert_eq!(workflow.steps[0].id, email);
//! assert_eq!(changes, 2);
//! # Ok::<(), careflow::error::BuilderError>(())
//! ```

pub mod branch;
pub mod builder;
pub mod catalog;
pub mod error;
pub mod ids;
pub mod prelude;
pub mod step;
pub mod workflow;
