// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for ggami.
//!
//! Pure logic only: the generation request, the module registry, dependency
//! resolution and request validation. Filesystem access and template
//! rendering live behind the ports in the application layer.
//!
//! - **No I/O**: nothing here touches the disk
//! - **Synchronous**: no async, no threads
//! - **Value semantics**: entities are `Clone + PartialEq`

pub mod entities;
pub mod error;
pub mod naming;
pub mod resolver;
pub mod value_objects;

mod validation;

pub use entities::{
    CodeSnippet, FieldDef, InjectionTarget, ModelDef, ModelRbac, ModuleCategory, ModuleDef,
    ModuleRegistry, PipelineContext, ProjectConfig, RbacConfig, RolePermission,
    common::Permissions, project::DEFAULT_PORT,
};
pub use error::{DomainError, ErrorCategory, ValidationError};
pub use resolver::resolve;
pub use validation::DomainValidator;
pub use value_objects::{DbDriver, DbType, Delimiters, FieldType, Language};
