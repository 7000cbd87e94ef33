//! Implementation of the `ggami new` command.
//!
//! Responsibility: merge the request file, CLI flags and config defaults into
//! a `ProjectConfig`, call the generate service, and display results. No
//! generation logic lives here.

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use ggami_core::{
    application::{GenerationPlan, PlanMode},
    domain::{Language as CoreLanguage, ProjectConfig, RbacConfig},
};

use crate::{
    cli::NewArgs,
    commands::build_service,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `ggami new` command.
///
/// Dispatch sequence:
/// 1. Build the request (file, then flags, then config defaults)
/// 2. Refuse an existing directory unless `--force`
/// 3. Early-exit with the step plan if `--dry-run`
/// 4. Confirm with the user unless `--yes`, `--quiet` or piped stdin
/// 5. Run the pipeline behind a spinner
/// 6. Print next-steps guidance
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let (request, language) = build_request(&args, &config)?;
    let project_path = request.target_path.clone();

    debug!(
        language = %language,
        target = %project_path.display(),
        modules = ?request.modules,
        models = request.models.len(),
        "Request resolved"
    );

    if !args.dry_run && project_path.exists() && !args.force {
        return Err(CliError::ProjectExists { path: project_path });
    }

    let service = build_service()?;

    if args.dry_run {
        let plan = service.plan(&request, &language);
        return show_plan(&plan, &request, &language, &output);
    }

    if !output.is_quiet() && !args.yes && std::io::stdin().is_terminal() {
        show_configuration(&request, &language, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    let project_name = request.project_name.clone();
    info!(project = %project_name, path = %project_path.display(), "Generation started");

    let spinner = spinner(&output);
    spinner.set_message(format!("Generating '{project_name}'..."));
    let result = service.generate(request, &language);
    spinner.finish_and_clear();
    let path = result?;

    info!(project = %project_name, "Generation completed");

    if output.is_json() {
        let summary = serde_json::json!({ "project": project_name, "path": path });
        output.data(&serde_json::to_string_pretty(&summary)?)?;
        return Ok(());
    }

    output.success(&format!(
        "Project '{project_name}' created at {}",
        path.display()
    ))?;
    output.print("")?;
    output.print("Next steps:")?;
    for step in next_steps(&path, &language) {
        output.print(&format!("  {step}"))?;
    }

    Ok(())
}

// ── Request construction ──────────────────────────────────────────────────────

/// Contents of a `--spec` file: a `ProjectConfig` plus the language.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectFile {
    #[serde(default)]
    language: Option<String>,
    #[serde(flatten)]
    request: ProjectConfig,
}

/// Merge the request file, flags and config defaults. Flags win over the
/// file; the file wins over config defaults.
fn build_request(args: &NewArgs, config: &AppConfig) -> CliResult<(ProjectConfig, String)> {
    let file = match &args.spec {
        Some(path) => load_project_file(path)?,
        None => ProjectFile::default(),
    };
    if args.name.contains(['/', '\\']) {
        return Err(CliError::InvalidInput {
            message: format!(
                "project name '{}' contains a path separator; use --path for the location",
                args.name
            ),
        });
    }

    let ProjectFile {
        language: file_language,
        mut request,
    } = file;

    let language = args
        .language
        .map(|l| l.as_str().to_string())
        .or(file_language)
        .unwrap_or_else(|| config.defaults.language.clone());

    request.project_name = args.name.clone();
    request.target_path = match &args.path {
        Some(parent) => parent.join(&args.name),
        None if !request.target_path.as_os_str().is_empty() => request.target_path,
        None => PathBuf::from(".").join(&args.name),
    };

    if !args.modules.is_empty() {
        request.modules = args.modules.clone();
    } else if request.modules.is_empty() {
        request.modules = config.defaults.modules.clone();
    }

    request.structured |= args.structured;
    request.models.extend(args.models.iter().cloned());

    if let Some(db) = &args.db {
        request.db_type = Some(db.clone());
    } else if request.db_type.as_deref().is_none_or(str::is_empty) {
        request.db_type = Some(config.defaults.db_type.clone());
    }

    if request.port.is_none() {
        request.port = Some(config.defaults.port);
    }

    if !args.rbac_roles.is_empty() {
        let rbac = request.rbac.get_or_insert_with(RbacConfig::default);
        rbac.enabled = true;
        rbac.roles = args.rbac_roles.clone();
    }

    Ok((request, language))
}

fn load_project_file(path: &Path) -> CliResult<ProjectFile> {
    let raw = std::fs::read_to_string(path)
        .with_cli_context(|| format!("Failed to read project file '{}'", path.display()))?;

    let invalid = |reason: String| CliError::InvalidSpecFile {
        path: path.to_path_buf(),
        reason,
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => serde_json::from_str(&raw).map_err(|e| invalid(e.to_string())),
        Some("toml") => toml::from_str(&raw).map_err(|e| invalid(e.to_string())),
        _ => Err(invalid("expected a .toml or .json file".into())),
    }
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_plan(
    plan: &GenerationPlan,
    request: &ProjectConfig,
    language: &str,
    out: &OutputManager,
) -> CliResult<()> {
    if out.is_json() {
        out.data(&serde_json::to_string_pretty(plan)?)?;
        return Ok(());
    }

    out.info(&format!(
        "Dry run: would create '{}' at {}",
        request.project_name,
        plan.target.display(),
    ))?;
    out.print(&format!("  Language: {language}"))?;
    out.print(&format!("  Mode:     {}", plan.mode))?;
    if !request.modules.is_empty() {
        out.print(&format!("  Modules:  {}", request.modules.join(", ")))?;
    }
    out.print("")?;
    out.header("Steps:")?;
    let width = plan.steps.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for (i, step) in plan.steps.iter().enumerate() {
        out.print(&format!(
            "  {:>2}. {:<width$}  {}",
            i + 1,
            step.name,
            step.description
        ))?;
    }
    Ok(())
}

fn show_configuration(request: &ProjectConfig, language: &str, out: &OutputManager) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&format!("  Project:   {}", request.project_name))?;
    out.print(&format!("  Language:  {language}"))?;
    out.print(&format!(
        "  Mode:      {}",
        PlanMode::for_request(request, language)
    ))?;
    if !request.modules.is_empty() {
        out.print(&format!("  Modules:   {}", request.modules.join(", ")))?;
    }
    if !request.models.is_empty() {
        let names: Vec<_> = request.models.iter().map(|m| m.name.as_str()).collect();
        out.print(&format!("  Models:    {}", names.join(", ")))?;
    }
    if request.rbac_enabled() {
        let roles = request.rbac.as_ref().map(|r| r.roles.join(", ")).unwrap_or_default();
        out.print(&format!("  Roles:     {roles}"))?;
    }
    out.print(&format!("  Location:  {}", request.target_path.display()))?;
    out.print("")?;
    Ok(())
}

fn spinner(output: &OutputManager) -> ProgressBar {
    if !output.is_interactive() {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn next_steps(path: &Path, language: &str) -> Vec<String> {
    let mut steps = vec![format!("cd {}", path.display())];
    match language.parse::<CoreLanguage>() {
        Ok(CoreLanguage::Node) => {
            steps.push("npm install".into());
            steps.push("node server.js".into());
        }
        _ => {
            steps.push("go mod tidy".into());
            steps.push("go run .".into());
        }
    }
    steps
}

#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Continue? [Y/n] ");
    io::stdout()
        .flush()
        .with_cli_context(|| "failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .with_cli_context(|| "failed to read confirmation input")?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
