//! The closed set of generation steps.

mod finalize;
mod inject;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::{
    application::{
        ApplicationError,
        pipeline::PipelineStep,
        ports::{Filesystem, TemplateRenderer},
        render_data::{LegacyData, StructuredData},
    },
    domain::{
        Delimiters, DomainValidator, InjectionTarget, Language, ModuleRegistry, Permissions,
        PipelineContext, resolve,
    },
    error::GgamiResult,
};

pub use inject::{InjectionTargets, inject_before_marker};

/// Names of the embedded templates the steps render.
pub mod templates {
    pub const GO_MAIN: &str = "go/legacy/main.go";
    pub const GO_MOD: &str = "go/legacy/go.mod";
    pub const GO_INDEX: &str = "go/legacy/index.html";

    pub const NODE_PACKAGE: &str = "node/package.json";
    pub const NODE_SERVER: &str = "node/server.js";
    pub const NODE_INDEX: &str = "node/index.html";

    pub const STRUCTURED_GO_MOD: &str = "go/structured/go.mod";
    pub const STRUCTURED_MAIN: &str = "go/structured/main.go";
    pub const HELPERS: &str = "go/structured/helpers.go";
    pub const BASE_HANDLER: &str = "go/structured/base.go";
    pub const MODEL: &str = "go/structured/model.go";
    pub const HANDLER: &str = "go/structured/handler.go";
    pub const USER_MODEL: &str = "go/structured/user_model.go";
    pub const MIDDLEWARE_AUTH: &str = "go/structured/middleware_auth.go";
    pub const MIDDLEWARE_RBAC: &str = "go/structured/middleware_rbac.go";
    pub const AUTH_HANDLER: &str = "go/structured/auth_handler.go";

    pub const LAYOUT: &str = "go/structured/layout.html";
    pub const DASHBOARD: &str = "go/structured/dashboard.html";
    pub const NOT_FOUND: &str = "go/structured/404.html";
    pub const LIST: &str = "go/structured/list.html";
    pub const FORM: &str = "go/structured/form.html";
    pub const LOGIN: &str = "go/structured/login.html";
    pub const REGISTER: &str = "go/structured/register.html";
    pub const FORGOT_PASSWORD: &str = "go/structured/forgot_password.html";

    /// Every name above; a renderer must know all of them.
    pub const ALL: &[&str] = &[
        GO_MAIN,
        GO_MOD,
        GO_INDEX,
        NODE_PACKAGE,
        NODE_SERVER,
        NODE_INDEX,
        STRUCTURED_GO_MOD,
        STRUCTURED_MAIN,
        HELPERS,
        BASE_HANDLER,
        MODEL,
        HANDLER,
        USER_MODEL,
        MIDDLEWARE_AUTH,
        MIDDLEWARE_RBAC,
        AUTH_HANDLER,
        LAYOUT,
        DASHBOARD,
        NOT_FOUND,
        LIST,
        FORM,
        LOGIN,
        REGISTER,
        FORGOT_PASSWORD,
    ];
}

/// Prefix of the per-run working directory.
pub const TEMP_DIR_PREFIX: &str = "ggami-gen-";

/// Collaborators shared by every [`Step`].
pub struct StepEnv {
    pub filesystem: Box<dyn Filesystem>,
    pub renderer: Box<dyn TemplateRenderer>,
    pub registry: Arc<ModuleRegistry>,
}

/// One generation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    ValidateConfig,
    ResolveModules,
    CreateTempDir,
    Scaffold,
    ScaffoldStructured,
    GenerateCore,
    GenerateModels,
    GenerateHandlers,
    GenerateTemplates,
    GenerateMiddleware,
    InjectModules,
    Finalize,
}

impl Step {
    pub const fn name(self) -> &'static str {
        match self {
            Self::ValidateConfig => "ValidateConfig",
            Self::ResolveModules => "ResolveModules",
            Self::CreateTempDir => "CreateTempDir",
            Self::Scaffold => "Scaffold",
            Self::ScaffoldStructured => "ScaffoldStructured",
            Self::GenerateCore => "GenerateCore",
            Self::GenerateModels => "GenerateModels",
            Self::GenerateHandlers => "GenerateHandlers",
            Self::GenerateTemplates => "GenerateTemplates",
            Self::GenerateMiddleware => "GenerateMiddleware",
            Self::InjectModules => "InjectModules",
            Self::Finalize => "Finalize",
        }
    }

    /// One-line summary for plan previews.
    pub const fn description(self) -> &'static str {
        match self {
            Self::ValidateConfig => "check the project request",
            Self::ResolveModules => "order selected modules by dependency",
            Self::CreateTempDir => "create a scratch working directory",
            Self::Scaffold => "create the directory skeleton",
            Self::ScaffoldStructured => "create models/, handlers/, middleware/, templates/, assets/",
            Self::GenerateCore => "write the project manifest",
            Self::GenerateModels => "render one model file per data model",
            Self::GenerateHandlers => "render main.go and HTTP handlers",
            Self::GenerateTemplates => "render HTML views",
            Self::GenerateMiddleware => "render authentication and access control",
            Self::InjectModules => "splice module snippets into the sources",
            Self::Finalize => "move the project into place",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl PipelineStep for Step {
    type Env = StepEnv;

    fn name(&self) -> &'static str {
        Step::name(*self)
    }

    fn execute(&self, ctx: &mut PipelineContext, env: &StepEnv) -> GgamiResult<()> {
        match self {
            Self::ValidateConfig => {
                DomainValidator::validate_config(ctx.config(), ctx.language_tag())?;
                Ok(())
            }
            Self::ResolveModules => {
                ctx.modules = resolve(&ctx.config().modules, &env.registry)?;
                debug!(modules = ?ctx.module_ids(), "Modules resolved");
                Ok(())
            }
            Self::CreateTempDir => {
                let dir = env.filesystem.create_temp_dir(TEMP_DIR_PREFIX)?;
                debug!(path = %dir.display(), "Working directory created");
                ctx.set_temp_dir(dir);
                Ok(())
            }
            Self::Scaffold => {
                let dirs: &[&str] = match ctx.language()? {
                    Language::Go => &["templates", "assets"],
                    Language::Node => &["views", "public"],
                };
                create_dirs(ctx, env, dirs, self.name())
            }
            Self::ScaffoldStructured => create_dirs(
                ctx,
                env,
                &["models", "handlers", "middleware", "templates", "assets"],
                self.name(),
            ),
            Self::GenerateCore => generate_core(ctx, env),
            Self::GenerateModels => generate_models(ctx, env),
            Self::GenerateHandlers => generate_handlers(ctx, env),
            Self::GenerateTemplates => generate_templates(ctx, env),
            Self::GenerateMiddleware => generate_middleware(ctx, env),
            Self::InjectModules => inject_modules(ctx, env),
            Self::Finalize => finalize::promote(ctx, env.filesystem.as_ref()),
        }
    }

    fn rollback(&self, ctx: &mut PipelineContext, env: &StepEnv) -> GgamiResult<()> {
        match self {
            // Everything else writes inside the temp dir, which goes with it.
            Self::CreateTempDir => match ctx.temp_dir() {
                Some(dir) => {
                    info!(path = %dir.display(), "Removing working directory");
                    env.filesystem.remove_dir_all(dir).map_err(|e| {
                        ApplicationError::RollbackFailed {
                            path: dir.to_path_buf(),
                            reason: e.to_string(),
                        }
                        .into()
                    })
                }
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn work_dir(ctx: &PipelineContext, step: &'static str) -> GgamiResult<PathBuf> {
    ctx.temp_dir()
        .map(Path::to_path_buf)
        .ok_or_else(|| ApplicationError::MissingTempDir { step }.into())
}

fn create_dirs(
    ctx: &PipelineContext,
    env: &StepEnv,
    dirs: &[&str],
    step: &'static str,
) -> GgamiResult<()> {
    let root = work_dir(ctx, step)?;
    for dir in dirs {
        env.filesystem.create_dir_all(&root.join(dir))?;
    }
    Ok(())
}

/// Render `template` and write it to `root/rel`.
fn render_to(
    env: &StepEnv,
    root: &Path,
    rel: &str,
    template: &str,
    data: &Value,
    delimiters: Delimiters,
) -> GgamiResult<()> {
    let content = env.renderer.render(template, data, delimiters)?;
    debug!(file = rel, template, "Writing file");
    env.filesystem
        .write_file(&root.join(rel), &content, Permissions::read_write())
}

fn structured_data(ctx: &PipelineContext) -> StructuredData {
    StructuredData::from_config(ctx.config())
}

// ============================================================================
// Step bodies
// ============================================================================

fn generate_core(ctx: &PipelineContext, env: &StepEnv) -> GgamiResult<()> {
    let root = work_dir(ctx, Step::GenerateCore.name())?;
    let language = ctx.language()?;
    let structured = ctx.config().structured
        && !ctx.config().models.is_empty()
        && language.supports_structured();

    if structured {
        let data = structured_data(ctx).to_value()?;
        return render_to(
            env,
            &root,
            "go.mod",
            templates::STRUCTURED_GO_MOD,
            &data,
            Delimiters::STANDARD,
        );
    }

    let data = LegacyData::from_config(ctx.config()).to_value()?;
    match language {
        Language::Go => render_to(env, &root, "go.mod", templates::GO_MOD, &data, Delimiters::STANDARD),
        Language::Node => render_to(
            env,
            &root,
            "package.json",
            templates::NODE_PACKAGE,
            &data,
            Delimiters::STANDARD,
        ),
    }
}

fn generate_models(ctx: &PipelineContext, env: &StepEnv) -> GgamiResult<()> {
    let root = work_dir(ctx, Step::GenerateModels.name())?;
    let data = structured_data(ctx);

    for model in &data.models {
        render_to(
            env,
            &root,
            &format!("models/{}.go", model.file_stem),
            templates::MODEL,
            &data.for_model(model)?,
            Delimiters::STANDARD,
        )?;
    }
    Ok(())
}

fn generate_handlers(ctx: &PipelineContext, env: &StepEnv) -> GgamiResult<()> {
    let root = work_dir(ctx, Step::GenerateHandlers.name())?;
    let data = structured_data(ctx);
    let project = data.to_value()?;

    for (rel, template) in [
        ("main.go", templates::STRUCTURED_MAIN),
        ("handlers/helpers.go", templates::HELPERS),
        ("handlers/base.go", templates::BASE_HANDLER),
    ] {
        render_to(env, &root, rel, template, &project, Delimiters::STANDARD)?;
    }

    for model in &data.models {
        render_to(
            env,
            &root,
            &format!("handlers/{}.go", model.file_stem),
            templates::HANDLER,
            &data.for_model(model)?,
            Delimiters::STANDARD,
        )?;
    }
    Ok(())
}

fn generate_templates(ctx: &PipelineContext, env: &StepEnv) -> GgamiResult<()> {
    let root = work_dir(ctx, Step::GenerateTemplates.name())?;
    let data = structured_data(ctx);
    let project = data.to_value()?;

    for (rel, template) in [
        ("templates/layout.html", templates::LAYOUT),
        ("templates/dashboard.html", templates::DASHBOARD),
        ("templates/404.html", templates::NOT_FOUND),
    ] {
        render_to(env, &root, rel, template, &project, Delimiters::MARKUP)?;
    }

    for model in &data.models {
        let model_data = data.for_model(model)?;
        render_to(
            env,
            &root,
            &format!("templates/{}_list.html", model.file_stem),
            templates::LIST,
            &model_data,
            Delimiters::MARKUP,
        )?;
        render_to(
            env,
            &root,
            &format!("templates/{}_form.html", model.file_stem),
            templates::FORM,
            &model_data,
            Delimiters::MARKUP,
        )?;
    }
    Ok(())
}

fn generate_middleware(ctx: &PipelineContext, env: &StepEnv) -> GgamiResult<()> {
    let root = work_dir(ctx, Step::GenerateMiddleware.name())?;
    let project = structured_data(ctx).to_value()?;

    for (rel, template, delimiters) in [
        ("models/user.go", templates::USER_MODEL, Delimiters::STANDARD),
        ("middleware/auth.go", templates::MIDDLEWARE_AUTH, Delimiters::STANDARD),
        ("middleware/rbac.go", templates::MIDDLEWARE_RBAC, Delimiters::STANDARD),
        ("handlers/auth.go", templates::AUTH_HANDLER, Delimiters::STANDARD),
        ("templates/login.html", templates::LOGIN, Delimiters::MARKUP),
        ("templates/register.html", templates::REGISTER, Delimiters::MARKUP),
        (
            "templates/forgot_password.html",
            templates::FORGOT_PASSWORD,
            Delimiters::MARKUP,
        ),
    ] {
        render_to(env, &root, rel, template, &project, delimiters)?;
    }
    Ok(())
}

fn inject_modules(ctx: &PipelineContext, env: &StepEnv) -> GgamiResult<()> {
    let root = work_dir(ctx, Step::InjectModules.name())?;
    let language = ctx.language()?;
    let data = LegacyData::from_config(ctx.config()).to_value()?;

    let (main_rel, main_tmpl, manifest_rel, markup_rel, markup_tmpl) = match language {
        Language::Go => (
            "main.go",
            templates::GO_MAIN,
            "go.mod",
            "templates/index.html",
            templates::GO_INDEX,
        ),
        Language::Node => (
            "server.js",
            templates::NODE_SERVER,
            "package.json",
            "views/index.html",
            templates::NODE_INDEX,
        ),
    };

    let mut files = InjectionTargets {
        main_source: env.renderer.render(main_tmpl, &data, Delimiters::STANDARD)?,
        manifest: env.filesystem.read_file(&root.join(manifest_rel))?,
        markup: env.renderer.render(markup_tmpl, &data, Delimiters::STANDARD)?,
    };

    // Only markup snippets are portable; the others are Go source.
    files.apply(&ctx.modules, |target| {
        language == Language::Go || target == InjectionTarget::IndexHtml
    });
    info!(modules = ctx.modules.len(), "Modules injected");

    let fs = env.filesystem.as_ref();
    fs.write_file(&root.join(main_rel), &files.main_source, Permissions::read_write())?;
    fs.write_file(&root.join(markup_rel), &files.markup, Permissions::read_write())?;
    fs.write_file(&root.join(manifest_rel), &files.manifest, Permissions::read_write())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::*;
    use crate::{
        application::ports::MockFilesystem,
        domain::{CodeSnippet, ModelDef, ModuleCategory, ModuleDef, ProjectConfig},
    };

    /// Echoes the template name and the project name.
    struct EchoRenderer;

    impl TemplateRenderer for EchoRenderer {
        fn render(&self, template: &str, data: &Value, _d: Delimiters) -> GgamiResult<String> {
            let marker = match template {
                templates::GO_MAIN | templates::NODE_SERVER => "\n// @INJECT_ROUTES",
                templates::GO_INDEX | templates::NODE_INDEX => "\n<!-- @INJECT_BODY -->",
                _ => "",
            };
            Ok(format!("{template}:{}{marker}", data["project_name"].as_str().unwrap_or("")))
        }
    }

    fn env(fs: MockFilesystem, modules: Vec<ModuleDef>) -> StepEnv {
        StepEnv {
            filesystem: Box::new(fs),
            renderer: Box::new(EchoRenderer),
            registry: Arc::new(ModuleRegistry::new(modules).unwrap()),
        }
    }

    fn hero() -> ModuleDef {
        ModuleDef::new("hero", "Hero", ModuleCategory::Ui)
            .snippet(CodeSnippet::new(
                InjectionTarget::IndexHtml,
                "<!-- @INJECT_BODY -->",
                "<div>hero</div>",
            ))
            .snippet(CodeSnippet::new(
                InjectionTarget::MainGo,
                "// @INJECT_ROUTES",
                "route()",
            ))
    }

    fn recording_fs(written: Arc<Mutex<BTreeMap<PathBuf, String>>>) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_write_file().returning(move |path, content, _| {
            written
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), content.to_string());
            Ok(())
        });
        fs
    }

    #[test]
    fn validate_reports_bad_request() {
        let env = env(MockFilesystem::new(), vec![]);
        let mut ctx = PipelineContext::new(ProjectConfig::new("1bad", "/out/x"), "go");

        let err = Step::ValidateConfig.execute(&mut ctx, &env).unwrap_err();
        assert!(err.to_string().contains("1bad"));
    }

    #[test]
    fn resolve_stores_order_in_context() {
        let env = env(MockFilesystem::new(), vec![hero()]);
        let cfg = ProjectConfig::new("blog", "/out/blog").with_modules(["hero"]);
        let mut ctx = PipelineContext::new(cfg, "go");

        Step::ResolveModules.execute(&mut ctx, &env).unwrap();
        assert_eq!(ctx.module_ids(), ["hero"]);
    }

    #[test]
    fn temp_dir_created_and_rolled_back() {
        let mut fs = MockFilesystem::new();
        fs.expect_create_temp_dir()
            .withf(|prefix| prefix == TEMP_DIR_PREFIX)
            .returning(|_| Ok(PathBuf::from("/tmp/ggami-gen-1")));
        fs.expect_remove_dir_all()
            .withf(|p| p == Path::new("/tmp/ggami-gen-1"))
            .times(1)
            .returning(|_| Ok(()));
        let env = env(fs, vec![]);
        let mut ctx = PipelineContext::new(ProjectConfig::new("blog", "/out/blog"), "go");

        Step::CreateTempDir.execute(&mut ctx, &env).unwrap();
        assert_eq!(ctx.temp_dir(), Some(Path::new("/tmp/ggami-gen-1")));
        Step::CreateTempDir.rollback(&mut ctx, &env).unwrap();
    }

    #[test]
    fn temp_dir_rollback_is_noop_after_finalize() {
        let env = env(MockFilesystem::new(), vec![]);
        let mut ctx = PipelineContext::new(ProjectConfig::new("blog", "/out/blog"), "go");

        Step::CreateTempDir.rollback(&mut ctx, &env).unwrap();
    }

    #[test]
    fn scaffold_dirs_depend_on_language() {
        let created = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&created);
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().returning(move |p| {
            sink.lock().unwrap().push(p.to_path_buf());
            Ok(())
        });
        let env = env(fs, vec![]);

        let mut ctx = PipelineContext::new(ProjectConfig::new("app", "/out/app"), "node");
        ctx.set_temp_dir(PathBuf::from("/tmp/w"));
        Step::Scaffold.execute(&mut ctx, &env).unwrap();

        assert_eq!(
            *created.lock().unwrap(),
            [PathBuf::from("/tmp/w/views"), PathBuf::from("/tmp/w/public")]
        );
    }

    #[test]
    fn steps_need_temp_dir() {
        let env = env(MockFilesystem::new(), vec![]);
        let mut ctx = PipelineContext::new(ProjectConfig::new("blog", "/out/blog"), "go");

        let err = Step::Scaffold.execute(&mut ctx, &env).unwrap_err();
        assert!(err.to_string().contains("Scaffold"));
    }

    #[test]
    fn go_injection_writes_three_files() {
        let written = Arc::new(Mutex::new(BTreeMap::new()));
        let mut fs = recording_fs(Arc::clone(&written));
        fs.expect_read_file()
            .withf(|p| p == Path::new("/tmp/w/go.mod"))
            .returning(|_| Ok("module blog\n".into()));
        let env = env(fs, vec![hero()]);

        let mut ctx = PipelineContext::new(ProjectConfig::new("blog", "/out/blog"), "go");
        ctx.set_temp_dir(PathBuf::from("/tmp/w"));
        ctx.modules = vec![hero()];
        Step::InjectModules.execute(&mut ctx, &env).unwrap();

        let files = written.lock().unwrap();
        assert_eq!(files.len(), 3);
        assert_eq!(
            files[Path::new("/tmp/w/templates/index.html")],
            "go/legacy/index.html:blog\n<div>hero</div>\n<!-- @INJECT_BODY -->"
        );
        assert_eq!(
            files[Path::new("/tmp/w/main.go")],
            "go/legacy/main.go:blog\nroute()\n// @INJECT_ROUTES"
        );
        assert_eq!(files[Path::new("/tmp/w/go.mod")], "module blog\n");
    }

    #[test]
    fn node_injection_skips_go_snippets() {
        let written = Arc::new(Mutex::new(BTreeMap::new()));
        let mut fs = recording_fs(Arc::clone(&written));
        fs.expect_read_file().returning(|_| Ok("{}".into()));
        let env = env(fs, vec![hero()]);

        let mut ctx = PipelineContext::new(ProjectConfig::new("app", "/out/app"), "node");
        ctx.set_temp_dir(PathBuf::from("/tmp/w"));
        ctx.modules = vec![hero()];
        Step::InjectModules.execute(&mut ctx, &env).unwrap();

        let files = written.lock().unwrap();
        assert_eq!(
            files[Path::new("/tmp/w/server.js")],
            "node/server.js:app\n// @INJECT_ROUTES"
        );
        assert!(files[Path::new("/tmp/w/views/index.html")].contains("<div>hero</div>"));
    }

    #[test]
    fn structured_steps_write_per_model_files() {
        let written = Arc::new(Mutex::new(BTreeMap::new()));
        let env = env(recording_fs(Arc::clone(&written)), vec![]);

        let cfg = ProjectConfig::new("shop", "/out/shop")
            .structured(true)
            .with_model(ModelDef::new("Product").field("Title", "string"))
            .with_model(ModelDef::new("Category").field("Name", "string"));
        let mut ctx = PipelineContext::new(cfg, "go");
        ctx.set_temp_dir(PathBuf::from("/tmp/w"));

        for step in [
            Step::GenerateCore,
            Step::GenerateModels,
            Step::GenerateHandlers,
            Step::GenerateTemplates,
        ] {
            step.execute(&mut ctx, &env).unwrap();
        }

        let files = written.lock().unwrap();
        for rel in [
            "go.mod",
            "main.go",
            "handlers/helpers.go",
            "handlers/base.go",
            "models/product.go",
            "models/category.go",
            "handlers/product.go",
            "handlers/category.go",
            "templates/layout.html",
            "templates/dashboard.html",
            "templates/404.html",
            "templates/product_list.html",
            "templates/product_form.html",
            "templates/category_list.html",
            "templates/category_form.html",
        ] {
            assert!(files.contains_key(&Path::new("/tmp/w").join(rel)), "missing {rel}");
        }
        assert_eq!(files[Path::new("/tmp/w/go.mod")], "go/structured/go.mod:shop");
    }

    #[test]
    fn step_names_are_stable() {
        assert_eq!(Step::ScaffoldStructured.to_string(), "ScaffoldStructured");
        assert_eq!(PipelineStep::name(&Step::Finalize), "Finalize");
    }
}
