//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use ggami_core::domain::{FieldDef, ModelDef};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "ggami",
    bin_name = "ggami",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Go + HTMX project generator",
    long_about = "ggami generates ready-to-run Go or Node.js projects with an \
                  HTMX front end, either from a single main file with optional \
                  modules spliced in or from data models.",
    after_help = "EXAMPLES:\n\
        \x20 ggami new blog -m auth-login -m ui-hero\n\
        \x20 ggami new shop --structured --model Product:Name:string,Price:float64 --db postgres\n\
        \x20 ggami modules --format json\n\
        \x20 ggami completions bash > /usr/share/bash-completion/completions/ggami",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new project.
    #[command(
        visible_alias = "n",
        about = "Generate a new project",
        after_help = "EXAMPLES:\n\
            \x20 ggami new blog\n\
            \x20 ggami new blog --lang node -m ui-hero\n\
            \x20 ggami new shop --structured --model Product:ID:uint:primaryKey,Name:string\n\
            \x20 ggami new shop --structured --model Post:Title:string --rbac-role admin --rbac-role user\n\
            \x20 ggami new shop --spec shop.toml --dry-run"
    )]
    New(NewArgs),

    /// List available modules.
    #[command(
        visible_alias = "ls",
        about = "List available modules",
        after_help = "EXAMPLES:\n\
            \x20 ggami modules\n\
            \x20 ggami modules --format csv"
    )]
    Modules(ModulesArgs),

    /// Write a default configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 ggami init           # default location\n\
            \x20 ggami init --force   # overwrite an existing file\n\
            \x20 ggami -c ./ggami.toml init"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 ggami completions bash > ~/.local/share/bash-completion/completions/ggami\n\
            \x20 ggami completions zsh  > ~/.zfunc/_ggami\n\
            \x20 ggami completions fish > ~/.config/fish/completions/ggami.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the ggami configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 ggami config get defaults.language\n\
            \x20 ggami config list\n\
            \x20 ggami config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `ggami new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name. Also the Go module name and the directory created.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: String,

    /// Directory the project directory is created in.
    #[arg(
        short = 'p',
        long = "path",
        value_name = "DIR",
        help = "Parent directory (default: current directory)"
    )]
    pub path: Option<PathBuf>,

    /// Output stack.
    #[arg(
        short = 'l',
        long = "lang",
        value_name = "LANGUAGE",
        value_enum,
        help = "Language to generate (default from config)"
    )]
    pub language: Option<Language>,

    /// Modules to include. Dependencies must be listed too.
    #[arg(
        short = 'm',
        long = "module",
        value_name = "MODULE",
        value_delimiter = ',',
        help = "Module to include (repeatable)"
    )]
    pub modules: Vec<String>,

    /// Use the model-driven multi-file generator.
    #[arg(long = "structured", help = "Generate a structured (model-driven) project")]
    pub structured: bool,

    /// Data model as `Name:Field:type[:tag...],Field:type,...`.
    #[arg(
        long = "model",
        value_name = "MODEL",
        value_parser = parse_model,
        help = "Data model, e.g. Product:Name:string,Price:float64 (repeatable)"
    )]
    pub models: Vec<ModelDef>,

    /// Database for structured projects.
    #[arg(
        long = "db",
        value_name = "TYPE",
        help = "Database type: mssql, postgres, mysql, sqlite"
    )]
    pub db: Option<String>,

    /// Enable access control with these roles. The last role is the one new
    /// accounts get.
    #[arg(
        long = "rbac-role",
        value_name = "ROLE",
        help = "Enable RBAC with this role (repeatable)"
    )]
    pub rbac_roles: Vec<String>,

    /// Read the request from a TOML or JSON file; flags override it.
    #[arg(
        short = 's',
        long = "spec",
        value_name = "FILE",
        help = "Project request file (.toml or .json)"
    )]
    pub spec: Option<PathBuf>,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Replace an existing directory.
    #[arg(long = "force", help = "Replace an existing directory")]
    pub force: bool,

    /// Print the step plan without writing any files.
    #[arg(long = "dry-run", help = "Show the steps that would run")]
    pub dry_run: bool,
}

// ── modules ───────────────────────────────────────────────────────────────────

/// Arguments for `ggami modules`.
#[derive(Debug, Args)]
pub struct ModulesArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `modules` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One id per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `ggami init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `ggami completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `ggami config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.language`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Languages with a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Language {
    #[value(alias = "golang")]
    Go,
    #[value(alias = "nodejs")]
    Node,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Go => "go",
            Self::Node => "node",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── value parsers ─────────────────────────────────────────────────────────────

/// Parse `Name:Field:type[:tag...],Field:type[:tag...]` into a model.
///
/// Types and names are checked later by the generator's own validation, so
/// this only rejects input it cannot split.
pub fn parse_model(raw: &str) -> Result<ModelDef, String> {
    let (name, fields) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected Name:Field:type, got '{raw}'"))?;

    let mut model = ModelDef::new(name.trim());
    for spec in fields.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let mut parts = spec.split(':').map(str::trim);
        let field_name = parts.next().unwrap_or_default();
        let field_type = parts
            .next()
            .ok_or_else(|| format!("field '{field_name}' in '{raw}' has no type"))?;

        let field = parts
            .filter(|t| !t.is_empty())
            .fold(FieldDef::new(field_name, field_type), |f, tag| f.tag(tag));
        model = model.with_field(field);
    }

    Ok(model)
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn language_display() {
        assert_eq!(Language::Go.to_string(), "go");
        assert_eq!(Language::Node.to_string(), "node");
    }

    #[test]
    fn parse_new_command() {
        let cli = Cli::parse_from(["ggami", "new", "blog", "-m", "auth-login", "-m", "ui-hero"]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.name, "blog");
        assert_eq!(args.modules, ["auth-login", "ui-hero"]);
        assert!(args.language.is_none());
        assert!(!args.structured);
    }

    #[test]
    fn modules_accept_comma_lists() {
        let cli = Cli::parse_from(["ggami", "new", "blog", "-m", "auth-login,ui-hero"]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.modules, ["auth-login", "ui-hero"]);
    }

    #[test]
    fn golang_alias() {
        let cli = Cli::parse_from(["ggami", "new", "blog", "-l", "golang"]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.language, Some(Language::Go));
    }

    #[test]
    fn structured_flags_parse() {
        let cli = Cli::parse_from([
            "ggami",
            "new",
            "shop",
            "--structured",
            "--model",
            "Product:Name:string,Price:float64",
            "--model",
            "Order:Total:float64",
            "--db",
            "postgres",
            "--rbac-role",
            "admin",
            "--rbac-role",
            "user",
        ]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert!(args.structured);
        assert_eq!(args.models.len(), 2);
        assert_eq!(args.models[1].name, "Order");
        assert_eq!(args.db.as_deref(), Some("postgres"));
        assert_eq!(args.rbac_roles, ["admin", "user"]);
    }

    #[test]
    fn model_parser_reads_fields_and_tags() {
        let model = parse_model("Product:ID:uint:primaryKey,Name:string:not null:unique").unwrap();
        assert_eq!(model.name, "Product");
        assert_eq!(model.fields.len(), 2);
        assert_eq!(model.fields[0].field_type, "uint");
        assert!(model.fields[0].has_tag("primaryKey"));
        assert_eq!(model.fields[1].tags, ["not null", "unique"]);
    }

    #[test]
    fn model_parser_keeps_dotted_types() {
        let model = parse_model("Post:PublishedAt:time.Time").unwrap();
        assert_eq!(model.fields[0].field_type, "time.Time");
    }

    #[test]
    fn model_parser_rejects_missing_parts() {
        assert!(parse_model("Product").is_err());
        assert!(parse_model("Product:Name").is_err());
    }

    #[test]
    fn model_without_fields_is_left_to_validation() {
        let model = parse_model("Product:").unwrap();
        assert!(model.fields.is_empty());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["ggami", "--quiet", "--verbose", "modules"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_set_is_not_a_subcommand() {
        let result = Cli::try_parse_from(["ggami", "config", "set", "a", "b"]);
        assert!(result.is_err());
    }
}
