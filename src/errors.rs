// src/errors.rs

//! Crate-wide error types.
//!
//! Two tiers:
//! - [`JobdagError`]: fatal load/export failures. Nothing usable is produced.
//! - [`ConfigError`]: recoverable problems in an otherwise loadable config.
//!   These are collected into a batch next to the best-effort [`Config`].
//!
//! [`Config`]: crate::config::Config

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobdagError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("script error in {chunk}: {message}")]
    Script { chunk: String, message: String },

    #[error("job config should return a table (got {found})")]
    NotATable { found: String },

    #[error("export error: {0}")]
    Export(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, JobdagError>;

/// A recoverable problem found while resolving a job config.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the table returned by your config should only have string keys: got key '{key}'")]
    NonStringKey { key: String },

    #[error("the config with the name '{name}' was not a table")]
    EntryNotTable { name: String },

    #[error("all entries in group '{group}' must be tables, got '{found}' instead")]
    GroupEntryNotTable { group: String, found: String },

    #[error("each entry in depends_on must be a table (got '{found}')")]
    DependencyNotTable { found: String },

    #[error("the value of depends_on must be a table (got '{found}')")]
    InvalidDependsOn { found: String },

    #[error("dependency cycle between jobs: {}", jobs.join(" -> "))]
    DependencyCycle { jobs: Vec<String> },
}
