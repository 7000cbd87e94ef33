//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `GGAMI__SECTION__KEY` environment variables (`.env` is loaded first)
//! 3. Config file (`--config`, `GGAMI_CONFIG` or [`AppConfig::config_path`])
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use ggami_core::domain::{DEFAULT_PORT, DbType, Language};

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "GGAMI";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default values for new projects.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    /// Language used when `--lang` is not given.
    pub language: String,
    /// Database used by structured projects when `--db` is not given.
    pub db_type: String,
    /// Port the generated server listens on.
    pub port: u16,
    /// Modules selected when no `-m` is given.
    pub modules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`; `--output-format` overrides it.
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: Defaults {
                language: Language::Go.as_str().into(),
                db_type: DbType::default().as_str().into(),
                port: DEFAULT_PORT,
                modules: Vec::new(),
            },
            output: OutputConfig {
                no_color: false,
                format: "auto".into(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the file, then the environment.
    ///
    /// `config_file` is the path passed via `--config`. An explicit file must
    /// exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        debug!(path = %path.display(), required, "Loading configuration");

        let defaults = Self::default();
        let built = Config::builder()
            .set_default("defaults.language", defaults.defaults.language)?
            .set_default("defaults.db_type", defaults.defaults.db_type)?
            .set_default("defaults.port", i64::from(defaults.defaults.port))?
            .set_default("defaults.modules", defaults.defaults.modules)?
            .set_default("output.no_color", defaults.output.no_color)?
            .set_default("output.format", defaults.output.format)?
            .add_source(File::from(path.as_path()).format(FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("defaults.modules"),
            )
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;

        built
            .try_deserialize()
            .context("configuration has invalid values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.ggami.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "ggami", "ggami")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".ggami.toml"))
    }

    /// The file `init` writes and `config path` reports.
    pub fn active_path(explicit: Option<&Path>) -> PathBuf {
        explicit.map_or_else(Self::config_path, Path::to_path_buf)
    }

    /// Value of a dotted key, rendered for display.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "defaults.language" => self.defaults.language.clone(),
            "defaults.db_type" => self.defaults.db_type.clone(),
            "defaults.port" => self.defaults.port.to_string(),
            "defaults.modules" => self.defaults.modules.join(","),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            _ => return None,
        };
        Some(value)
    }

    /// Keys accepted by [`AppConfig::get`].
    pub const KEYS: &'static [&'static str] = &[
        "defaults.language",
        "defaults.db_type",
        "defaults.port",
        "defaults.modules",
        "output.no_color",
        "output.format",
    ];
}
