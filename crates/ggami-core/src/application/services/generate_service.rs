//! Generate Service - main application orchestrator.
//!
//! Builds the step plan for a request and runs it against the injected
//! filesystem and renderer. This is the driving port the CLI calls.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    application::{
        pipeline::PipelineStep,
        plan::{PlanMode, build_plan},
        ports::{Filesystem, TemplateRenderer},
        steps::{Step, StepEnv},
    },
    domain::{ModuleCategory, ModuleRegistry, PipelineContext, ProjectConfig},
    error::GgamiResult,
};

/// Information about a module for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ModuleCategory,
    pub dependencies: Vec<String>,
}

/// A step as shown in a dry run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    pub name: &'static str,
    pub description: &'static str,
}

/// What `generate` would do for a request, without doing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationPlan {
    pub mode: PlanMode,
    pub target: PathBuf,
    pub steps: Vec<PlannedStep>,
}

/// Main generation service.
pub struct GenerateService {
    env: StepEnv,
}

impl GenerateService {
    /// Create a new generate service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use ggami_core::application::GenerateService;
    ///
    /// let service = GenerateService::new(
    ///     Arc::new(registry), // ModuleRegistry
    ///     Box::new(renderer), // impl TemplateRenderer
    ///     Box::new(fs),       // impl Filesystem
    /// );
    /// ```
    pub fn new(
        registry: Arc<ModuleRegistry>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            env: StepEnv {
                filesystem,
                renderer,
                registry,
            },
        }
    }

    /// Generate a project at `config.target_path`.
    ///
    /// Either the target ends up holding the complete project, or the error
    /// names the failing step and the target is left as it was. Two runs must
    /// not target the same path at the same time.
    #[instrument(
        skip_all,
        fields(
            project = %config.project_name,
            language = %language,
            target = %config.target_path.display()
        )
    )]
    pub fn generate(&self, config: ProjectConfig, language: &str) -> GgamiResult<PathBuf> {
        let pipeline = build_plan(&config, language);
        info!(steps = ?pipeline.step_names(), "Generating project");

        let mut ctx = PipelineContext::new(config, language);
        let result = pipeline.run(&mut ctx, &self.env);

        if result.is_err() {
            if let Some(temp) = ctx.temp_dir() {
                if self.env.filesystem.exists(temp) {
                    warn!(path = %temp.display(), "Temp dir leaked after failed run");
                }
            }
        }
        result?;

        info!("Generation completed successfully");
        Ok(ctx.final_dir().to_path_buf())
    }

    /// Describe the steps `generate` would run for this request.
    pub fn plan(&self, config: &ProjectConfig, language: &str) -> GenerationPlan {
        let steps = build_plan(config, language)
            .steps()
            .iter()
            .map(|s| PlannedStep {
                name: PipelineStep::name(s),
                description: Step::description(*s),
            })
            .collect();

        GenerationPlan {
            mode: PlanMode::for_request(config, language),
            target: config.target_path.clone(),
            steps,
        }
    }

    /// List all registered modules, in registry order.
    pub fn list_modules(&self) -> Vec<ModuleInfo> {
        self.env
            .registry
            .iter()
            .map(|m| ModuleInfo {
                id: m.id.clone(),
                name: m.name.clone(),
                description: m.description.clone(),
                category: m.category,
                dependencies: m.dependencies.clone(),
            })
            .collect()
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.env.registry
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::{
        application::ports::MockFilesystem,
        domain::{Delimiters, DomainError, ModuleDef},
        error::GgamiError,
    };

    struct NullRenderer;

    impl TemplateRenderer for NullRenderer {
        fn render(&self, _t: &str, _d: &Value, _x: Delimiters) -> GgamiResult<String> {
            Ok(String::new())
        }
    }

    fn registry() -> Arc<ModuleRegistry> {
        Arc::new(
            ModuleRegistry::new(vec![
                ModuleDef::new("base", "Base", ModuleCategory::Utils).description("shared"),
                ModuleDef::new("login", "Login", ModuleCategory::Feature).depends_on("base"),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn unknown_module_fails_before_touching_disk() {
        // No expectations: any filesystem call panics.
        let service = GenerateService::new(
            registry(),
            Box::new(NullRenderer),
            Box::new(MockFilesystem::new()),
        );
        let cfg = ProjectConfig::new("blog", "/out/blog").with_modules(["nope"]);

        let err = service.generate(cfg, "go").unwrap_err();
        assert!(matches!(
            err.root_cause(),
            GgamiError::Domain(DomainError::UnknownModule { .. })
        ));
        assert!(err.to_string().starts_with("step 'ResolveModules' failed"));
    }

    #[test]
    fn lists_modules_in_registry_order() {
        let service = GenerateService::new(
            registry(),
            Box::new(NullRenderer),
            Box::new(MockFilesystem::new()),
        );

        let modules = service.list_modules();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].id, "base");
        assert_eq!(modules[0].description, "shared");
        assert_eq!(modules[1].dependencies, ["base"]);
    }

    #[test]
    fn plan_describes_steps() {
        let service = GenerateService::new(
            registry(),
            Box::new(NullRenderer),
            Box::new(MockFilesystem::new()),
        );

        let plan = service.plan(&ProjectConfig::new("blog", "/out/blog"), "go");
        assert_eq!(plan.mode, PlanMode::Legacy);
        assert_eq!(plan.steps.first().map(|s| s.name), Some("ValidateConfig"));
        assert_eq!(plan.steps.last().map(|s| s.name), Some("Finalize"));
        assert!(plan.steps.iter().all(|s| !s.description.is_empty()));
    }
}
