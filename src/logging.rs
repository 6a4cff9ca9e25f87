// src/logging.rs

//! `tracing` subscriber for the `jobdag` binary.
//!
//! The filter comes from `--log-level` when given. Otherwise `JOBDAG_LOG`
//! is read as an `EnvFilter` directive string, so it takes a plain level
//! (`debug`) as well as per-module directives
//! (`jobdag::config=trace,warn`). With neither, `info` is used.
//!
//! Output goes to stderr; stdout carries the exported graph.

use anyhow::{anyhow, Result};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "JOBDAG_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let (filter, rejected) = build_filter(cli_level, env.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!(e))?;

    if let Some(directives) = rejected {
        warn!(%directives, "ignoring invalid {LOG_ENV}, logging at {DEFAULT_DIRECTIVES}");
    }
    Ok(())
}

/// The filter to install, plus the `JOBDAG_LOG` value when it had to be
/// ignored because it did not parse.
fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> (EnvFilter, Option<String>) {
    if let Some(level) = cli_level {
        return (EnvFilter::new(directive(level)), None);
    }

    match env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => match EnvFilter::try_new(directives) {
            Ok(filter) => (filter, None),
            Err(_) => (
                EnvFilter::new(DEFAULT_DIRECTIVES),
                Some(directives.to_string()),
            ),
        },
        None => (EnvFilter::new(DEFAULT_DIRECTIVES), None),
    }
}

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
