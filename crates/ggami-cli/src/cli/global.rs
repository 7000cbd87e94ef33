//! Flags accepted by every `ggami` subcommand.
//!
//! Flattened into [`super::Cli`] with `global = true`, so `ggami new blog -v`
//! and `ggami -v new blog` mean the same thing.

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        long_help = "Raise the log level on stderr. RUST_LOG overrides this.
    (none)  - warnings and errors
    -v      - info: one line per pipeline step
    -vv     - debug: resolver order, rendered template names
    -vvv    - trace: everything"
    )]
    pub verbose: u8,

    /// Only print errors and requested data
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Never emit ANSI colours (also set by NO_COLOR)
    #[arg(long = "no-color", global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Read settings from FILE instead of the platform config path
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        env = "GGAMI_CONFIG",
        value_name = "FILE"
    )]
    pub config: Option<PathBuf>,

    /// Append uncoloured logs to FILE as well as stderr
    #[arg(long = "log-file", global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Output style for messages and command results
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto"
    )]
    pub output_format: OutputFormat,
}

/// Rendering of everything `ggami` writes to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human on a terminal, plain when piped
    #[default]
    Auto,
    /// Coloured, with symbols
    Human,
    /// No colour, same text as human
    Plain,
    /// JSON documents only
    Json,
}
