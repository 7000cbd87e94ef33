//! ggami Core - generation pipeline and module resolution.
//!
//! This crate provides the domain and application layers of the ggami
//! project generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             ggami-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │            GenerateService              │
//! │   plan → Pipeline<Step> → rollback      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Ports (Traits)       │
//! │       (Filesystem, TemplateRenderer)    │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      ggami-adapters (Infrastructure)    │
//! │ (LocalFilesystem, MiniJinjaRenderer...) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ggami_core::prelude::*;
//!
//! let service = GenerateService::new(Arc::new(registry), renderer, filesystem);
//! let config = ProjectConfig::new("blog", "./blog").with_modules(["ui-hero"]);
//! let path = service.generate(config, "go")?;
//! ```

pub mod application;
pub mod domain;
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerateService, GenerationPlan, ModuleInfo, PlanMode,
        ports::{Filesystem, TemplateRenderer},
    };
    pub use crate::domain::{
        CodeSnippet, Delimiters, FieldDef, InjectionTarget, Language, ModelDef, ModuleCategory,
        ModuleDef, ModuleRegistry, Permissions, ProjectConfig, RbacConfig,
    };
    pub use crate::error::{GgamiError, GgamiResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
