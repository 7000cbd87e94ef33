pub mod common;
pub mod context;
pub mod module;
pub mod project;

pub use context::PipelineContext;
pub use module::{CodeSnippet, InjectionTarget, ModuleCategory, ModuleDef, ModuleRegistry};
pub use project::{FieldDef, ModelDef, ModelRbac, ProjectConfig, RbacConfig, RolePermission};
