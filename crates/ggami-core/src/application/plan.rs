//! Step sequence selection.

use std::fmt;

use serde::Serialize;

use crate::{
    application::{pipeline::Pipeline, steps::Step},
    domain::{Language, ProjectConfig},
};

/// Which backend a request is generated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanMode {
    /// Model-driven, multi-file project (Go only).
    Structured,
    /// Single main source with module snippets spliced in.
    Legacy,
}

impl PlanMode {
    /// Structured needs the flag, at least one model and a language with a
    /// structured backend. Anything else, including an unparseable language,
    /// is legacy; validation reports the language later.
    pub fn for_request(config: &ProjectConfig, language: &str) -> Self {
        let structured_language = language
            .parse::<Language>()
            .is_ok_and(Language::supports_structured);

        if config.structured && !config.models.is_empty() && structured_language {
            Self::Structured
        } else {
            Self::Legacy
        }
    }
}

impl fmt::Display for PlanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured => f.write_str("structured"),
            Self::Legacy => f.write_str("legacy"),
        }
    }
}

/// The steps a request will run, in order.
pub fn build_steps(config: &ProjectConfig, language: &str) -> Vec<Step> {
    match PlanMode::for_request(config, language) {
        PlanMode::Structured => {
            let mut steps = vec![
                Step::ValidateConfig,
                Step::ResolveModules,
                Step::CreateTempDir,
                Step::ScaffoldStructured,
                Step::GenerateCore,
                Step::GenerateModels,
                Step::GenerateHandlers,
                Step::GenerateTemplates,
            ];
            if config.rbac_enabled() {
                steps.push(Step::GenerateMiddleware);
            }
            steps.push(Step::Finalize);
            steps
        }
        PlanMode::Legacy => vec![
            Step::ValidateConfig,
            Step::ResolveModules,
            Step::CreateTempDir,
            Step::Scaffold,
            Step::GenerateCore,
            Step::InjectModules,
            Step::Finalize,
        ],
    }
}

pub fn build_plan(config: &ProjectConfig, language: &str) -> Pipeline<Step> {
    Pipeline::new(build_steps(config, language))
}
