// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;
use crate::dag::ExportFormat;

/// Command-line arguments for `jobdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "jobdag",
    version,
    about = "Resolve a job script into a job dependency graph and export it.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the job script.
    ///
    /// Default: `jobs.lua` in the current working directory.
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Output format for the graph.
    #[arg(long, value_enum, default_value_t = OutputFormat::Dot)]
    pub format: OutputFormat,

    /// Write the graph here instead of stdout.
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `JOBDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load and resolve, print the jobs and their dependencies, but don't
    /// export the graph.
    #[arg(long)]
    pub dry_run: bool,

    /// Export whatever resolved even when the script has config errors.
    #[arg(long)]
    pub allow_partial: bool,

    /// Fail when the job graph contains a dependency cycle.
    #[arg(long)]
    pub deny_cycles: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Graph format as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Dot,
    Toml,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Dot => ExportFormat::Dot,
            OutputFormat::Toml => ExportFormat::Toml,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
