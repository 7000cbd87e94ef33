use std::path::{Path, PathBuf};

use crate::domain::{
    entities::{module::ModuleDef, project::ProjectConfig},
    error::ValidationError,
    value_objects::Language,
};

/// State threaded through every pipeline step of one generation run.
///
/// The configuration, language and final directory are fixed at
/// construction. Steps fill in the rest: `ResolveModules` sets
/// [`modules`](Self::modules), `CreateTempDir` sets the temp dir and
/// `Finalize` clears it again once the tree has been promoted.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    config: ProjectConfig,
    language: String,
    final_dir: PathBuf,
    temp_dir: Option<PathBuf>,
    /// Dependency-ordered active modules.
    pub modules: Vec<ModuleDef>,
}

impl PipelineContext {
    pub fn new(config: ProjectConfig, language: impl Into<String>) -> Self {
        let final_dir = config.target_path.clone();
        Self {
            config,
            language: language.into(),
            final_dir,
            temp_dir: None,
            modules: Vec::new(),
        }
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// The raw language tag as supplied by the caller.
    pub fn language_tag(&self) -> &str {
        &self.language
    }

    pub fn language(&self) -> Result<Language, ValidationError> {
        self.language.parse()
    }

    pub fn final_dir(&self) -> &Path {
        &self.final_dir
    }

    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp_dir.as_deref()
    }

    pub fn set_temp_dir(&mut self, path: PathBuf) {
        self.temp_dir = Some(path);
    }

    /// Forget the temp dir; returns what was there.
    pub fn take_temp_dir(&mut self) -> Option<PathBuf> {
        self.temp_dir.take()
    }

    pub fn module_ids(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.id.as_str()).collect()
    }
}
