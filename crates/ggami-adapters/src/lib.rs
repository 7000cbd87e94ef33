//! Infrastructure adapters for ggami.
//!
//! This crate implements the ports defined in `ggami-core::application::ports`
//! and ships the built-in module registry and template set. It contains all
//! I/O and third-party rendering.

pub mod builtin_modules;
pub mod filesystem;
pub mod renderer;

// Re-export commonly used adapters
pub use builtin_modules::builtin_registry;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::MiniJinjaRenderer;
