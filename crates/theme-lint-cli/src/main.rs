//! theme-lint CLI tool.
//!
//! Usage:
//! ```bash
//! theme-lint check [OPTIONS] [PATH]
//! theme-lint list-rules
//! theme-lint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Linter for Handlebars themes
#[derive(Parser)]
#[command(name = "theme-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "THEME_LINT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint a theme
    Check {
        /// Theme directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated names or codes)
        #[arg(long)]
        rules: Option<String>,

        /// Rule preset (overrides the config file)
        #[arg(long)]
        preset: Option<PresetArg>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// Annotated source snippets.
    Pretty,
    /// JSON output.
    Json,
    /// One-line-per-diagnostic compact format.
    Compact,
}

/// Rule preset selectable on the command line.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum PresetArg {
    /// Rules that catch rendering breakage.
    Recommended,
    /// Every rule.
    Strict,
    /// Unknown-reference rules only.
    Minimal,
}

impl From<PresetArg> for theme_lint_rules::Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Recommended => Self::Recommended,
            PresetArg::Strict => Self::Strict,
            PresetArg::Minimal => Self::Minimal,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            rules,
            preset,
            exclude,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            let options = commands::check::CheckOptions {
                format,
                rules,
                preset: preset.map(Into::into),
                exclude,
            };
            let passed = commands::check::run(&path, options, &source)?;
            Ok(if passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init { force } => {
            commands::init::run(force)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
