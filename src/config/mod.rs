// src/config/mod.rs

//! Job config loading.
//!
//! Responsibilities:
//! - Define the resolved data model: jobs, groups, config (`model.rs`).
//! - Evaluate a job script and resolve its tables into that model
//!   (`loader.rs`).

pub mod loader;
pub mod model;

pub use loader::{default_config_path, load_config, load_config_str, LoadReport};
pub use model::{key_of, Config, Group, GroupId, Job, JobId};
