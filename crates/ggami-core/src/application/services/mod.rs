//! Application services - use case orchestration.

mod generate_service;

pub use generate_service::{GenerateService, GenerationPlan, ModuleInfo, PlannedStep};
