// src/dag/cycles.rs

//! Cycle diagnostics for a built job graph.
//!
//! The builder accepts cyclic configs and passes the cycle through. These
//! helpers report cycles without touching the graph, so callers can decide
//! whether a cyclic graph is acceptable.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::config::model::{key_of, Job, JobId};
use crate::errors::ConfigError;

/// Find every dependency cycle in `jobs`.
///
/// Each cycle is a strongly connected component with more than one job, or
/// a single job that depends on itself. Job ids inside a cycle are sorted,
/// and cycles are ordered by their smallest id.
pub fn find_cycles(jobs: &[Job]) -> Vec<Vec<JobId>> {
    // Node `i` is `jobs[i]`, and `JobId(i)` indexes `jobs`.
    let mut graph: DiGraph<JobId, ()> = DiGraph::with_capacity(jobs.len(), 0);
    for job in jobs {
        graph.add_node(job.id);
    }

    for (i, job) in jobs.iter().enumerate() {
        for dep in job.depends_on.iter().filter(|dep| dep.0 < jobs.len()) {
            graph.add_edge(NodeIndex::new(i), NodeIndex::new(dep.0), ());
        }
    }

    let mut cycles: Vec<Vec<JobId>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| match component.as_slice() {
            [single] => graph.find_edge(*single, *single).is_some(),
            _ => true,
        })
        .map(|component| {
            let mut ids: Vec<JobId> = component.into_iter().map(|n| graph[n]).collect();
            ids.sort();
            ids
        })
        .collect();

    cycles.sort();
    cycles
}

/// [`find_cycles`] reported as recoverable config errors, naming jobs by key.
pub fn cycle_errors(jobs: &[Job]) -> Vec<ConfigError> {
    find_cycles(jobs)
        .into_iter()
        .map(|cycle| ConfigError::DependencyCycle {
            jobs: cycle.iter().map(|id| key_of(jobs, *id)).collect(),
        })
        .collect()
}
