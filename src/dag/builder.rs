// src/dag/builder.rs

//! Derive job-to-job edges from group-level dependencies.

use std::collections::HashSet;

use tracing::debug;

use crate::config::model::{Config, Group, Job, JobId};

/// Build the job graph for a loaded [`Config`].
///
/// For every group `G`, every group `D` in `G.depends_on`, every job `j` in
/// `G.jobs` and every job `k` in `D.jobs`, `j` gets a direct edge to `k`.
/// Edges are not transitively closed. Duplicate edges are removed once all
/// edges are in place, keeping first-occurrence order.
///
/// Takes the config by value: edge derivation is a one-shot transform and
/// running it twice over the same jobs would append every edge again.
///
/// Cycles in the config are passed through as-is; see
/// [`find_cycles`](crate::dag::find_cycles) for diagnostics.
pub fn build_job_dag(config: Config) -> Vec<Job> {
    let Config { mut jobs, groups } = config;

    let added = add_group_edges(&mut jobs, &groups);
    let removed = dedup_dependencies(&mut jobs);

    debug!(
        jobs = jobs.len(),
        groups = groups.len(),
        edges = added.saturating_sub(removed),
        duplicates = removed,
        "built job graph"
    );
    jobs
}

/// Returns the number of edges appended.
fn add_group_edges(jobs: &mut [Job], groups: &[Group]) -> usize {
    let mut added = 0;
    for group in groups {
        for dep_group in group.depends_on.iter().filter_map(|id| groups.get(id.0)) {
            for this in &group.jobs {
                let Some(job) = jobs.get_mut(this.0) else {
                    continue;
                };
                job.depends_on.extend_from_slice(&dep_group.jobs);
                added += dep_group.jobs.len();
            }
        }
    }
    added
}

/// Remove repeated targets from every job's `depends_on`, keeping the first
/// occurrence. Returns the number of entries removed.
fn dedup_dependencies(jobs: &mut [Job]) -> usize {
    let mut removed = 0;
    for job in jobs {
        let before = job.depends_on.len();
        let mut seen: HashSet<JobId> = HashSet::with_capacity(before);
        job.depends_on.retain(|dep| seen.insert(*dep));
        removed += before - job.depends_on.len();
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::GroupId;

    fn job(id: usize, name: &str) -> Job {
        Job::new(JobId(id), Some(name.to_string()))
    }

    fn group(jobs: &[usize], deps: &[usize]) -> Group {
        Group {
            name: None,
            jobs: jobs.iter().map(|&j| JobId(j)).collect(),
            depends_on: deps.iter().map(|&g| GroupId(g)).collect(),
        }
    }

    #[test]
    fn group_dependency_fans_out_to_every_job_pair() {
        let config = Config {
            jobs: vec![job(0, "a"), job(1, "b"), job(2, "c"), job(3, "d")],
            groups: vec![group(&[2, 3], &[]), group(&[0, 1], &[0])],
        };

        let jobs = build_job_dag(config);

        assert_eq!(jobs[0].depends_on, vec![JobId(2), JobId(3)]);
        assert_eq!(jobs[1].depends_on, vec![JobId(2), JobId(3)]);
        assert!(jobs[2].depends_on.is_empty());
    }

    #[test]
    fn duplicates_keep_first_occurrence_order() {
        let config = Config {
            jobs: vec![job(0, "a"), job(1, "b"), job(2, "c")],
            groups: vec![
                group(&[1, 2], &[]),
                group(&[2], &[]),
                group(&[0], &[0, 1]),
                group(&[0], &[1]),
            ],
        };

        let jobs = build_job_dag(config);

        assert_eq!(jobs[0].depends_on, vec![JobId(1), JobId(2)]);
    }

    #[test]
    fn dedup_counts_removed_entries() {
        let mut jobs = vec![job(0, "a")];
        jobs[0].depends_on = vec![JobId(1), JobId(2), JobId(1), JobId(1)];

        assert_eq!(dedup_dependencies(&mut jobs), 2);
        assert_eq!(jobs[0].depends_on, vec![JobId(1), JobId(2)]);
    }
}
