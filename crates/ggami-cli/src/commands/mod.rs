//! One module per subcommand.

use std::sync::Arc;

use ggami_adapters::{LocalFilesystem, MiniJinjaRenderer, builtin_registry};
use ggami_core::{application::GenerateService, error::GgamiError};

use crate::error::{CliError, CliResult, IntoCli};

pub mod completions;
pub mod config;
pub mod init;
pub mod modules;
pub mod new;

/// Wire the production adapters into a [`GenerateService`].
pub fn build_service() -> CliResult<GenerateService> {
    let registry = builtin_registry().map_err(|e| CliError::Core(GgamiError::from(e)))?;
    let renderer = MiniJinjaRenderer::new().with_cli_context(|| "loading templates")?;

    Ok(GenerateService::new(
        Arc::new(registry),
        Box::new(renderer),
        Box::new(LocalFilesystem::new()),
    ))
}
