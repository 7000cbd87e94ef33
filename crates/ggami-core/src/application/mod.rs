//! Application layer for ggami.
//!
//! This layer contains:
//! - **Pipeline**: the step executor and its rollback ledger
//! - **Steps**: the closed set of generation steps and the plan builder
//! - **Services**: use case orchestration (`GenerateService`)
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types

pub mod error;
pub mod pipeline;
pub mod plan;
pub mod ports;
pub mod render_data;
pub mod services;
pub mod steps;

pub use error::{ApplicationError, RollbackFailure};
pub use pipeline::{Pipeline, PipelineStep};
pub use plan::{PlanMode, build_plan, build_steps};
pub use ports::{Filesystem, TemplateRenderer};
pub use services::{GenerateService, GenerationPlan, ModuleInfo, PlannedStep};
pub use steps::{Step, StepEnv};
