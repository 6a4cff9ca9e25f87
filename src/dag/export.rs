// src/dag/export.rs

//! Render a built job graph as text.
//!
//! - [`to_graphviz`] emits a DOT digraph for external layout tools.
//! - [`to_toml`] emits the resolved jobs as a TOML document.

use serde::Serialize;
use tracing::trace;

use crate::config::model::{key_of, Job};
use crate::errors::{JobdagError, Result};

/// Output format for [`export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Dot,
    Toml,
}

/// Render `jobs` in the given format.
pub fn export(jobs: &[Job], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Dot => Ok(to_graphviz(jobs)),
        ExportFormat::Toml => to_toml(jobs),
    }
}

/// Render `jobs` as a DOT digraph.
///
/// One quoted node line per job in list order, then one edge line per
/// `(job, dependency)` pair, jobs in list order and dependencies in edge
/// order. Edges point from a job to what it depends on; `rankdir = BT`
/// draws dependencies below their dependents.
pub fn to_graphviz(jobs: &[Job]) -> String {
    let nodes = jobs.iter().map(|job| format!("\"{}\"", escape(&job.key())));
    let edges = jobs.iter().flat_map(|job| {
        let from = escape(&job.key());
        job.depends_on
            .iter()
            .map(move |dep| format!("\"{from}\" -> \"{}\"", escape(&key_of(jobs, *dep))))
    });

    let mut out = String::from("digraph {\nrankdir = BT\n");
    for line in nodes.chain(edges) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str("}\n");

    trace!(graph = %out, "rendered graphviz");
    out
}

fn escape(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len());
    for c in key.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[derive(Debug, Serialize)]
struct ExportedGraph<'a> {
    job: Vec<ExportedJob<'a>>,
}

#[derive(Debug, Serialize)]
struct ExportedJob<'a> {
    id: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    depends_on: Vec<usize>,
}

/// Render `jobs` as a TOML document of `[[job]]` tables.
///
/// ```toml
/// [[job]]
/// id = 1
/// name = "unit"
/// depends_on = [0]
/// ```
pub fn to_toml(jobs: &[Job]) -> Result<String> {
    let graph = ExportedGraph {
        job: jobs
            .iter()
            .map(|job| ExportedJob {
                id: job.id.0,
                name: job.name.as_deref().filter(|n| !n.is_empty()),
                depends_on: job.depends_on.iter().map(|d| d.0).collect(),
            })
            .collect(),
    };

    toml::to_string(&graph).map_err(|e| JobdagError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::JobId;

    fn job(id: usize, name: Option<&str>, deps: &[usize]) -> Job {
        let mut job = Job::new(JobId(id), name.map(str::to_string));
        job.depends_on = deps.iter().map(|&d| JobId(d)).collect();
        job
    }

    #[test]
    fn graphviz_lists_nodes_then_edges() {
        let jobs = vec![job(0, Some("A"), &[]), job(1, Some("B"), &[0])];

        assert_eq!(
            to_graphviz(&jobs),
            "digraph {\nrankdir = BT\n\"A\"\n\"B\"\n\"B\" -> \"A\"\n}\n"
        );
    }

    #[test]
    fn unnamed_jobs_use_their_id() {
        let jobs = vec![job(0, None, &[]), job(1, Some(""), &[0])];
        let dot = to_graphviz(&jobs);

        assert!(dot.contains("\"1\" -> \"0\"\n"));
    }

    #[test]
    fn dependency_outside_the_list_renders_its_id() {
        let jobs = vec![job(0, Some("a"), &[5])];
        assert!(to_graphviz(&jobs).contains("\"a\" -> \"5\"\n"));
    }

    #[test]
    fn keys_are_escaped() {
        let jobs = vec![job(0, Some(r#"say "hi" \o/"#), &[])];
        assert!(to_graphviz(&jobs).contains(r#""say \"hi\" \\o/""#));
    }

    #[test]
    fn toml_export_lists_jobs() {
        let jobs = vec![job(0, Some("build"), &[]), job(1, None, &[0])];
        let text = to_toml(&jobs).unwrap();

        assert!(text.contains("[[job]]"));
        assert!(text.contains("name = \"build\""));
        assert!(text.contains("depends_on = [0]"));
    }
}
