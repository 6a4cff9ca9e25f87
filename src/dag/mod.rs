// src/dag/mod.rs

//! Job graph construction and rendering.
//!
//! - [`builder`] expands group-level dependencies into direct job edges.
//! - [`cycles`] reports dependency cycles in a built graph.
//! - [`export`] renders the graph as DOT or TOML.

pub mod builder;
pub mod cycles;
pub mod export;

pub use builder::build_job_dag;
pub use cycles::{cycle_errors, find_cycles};
pub use export::{export, to_graphviz, to_toml, ExportFormat};
