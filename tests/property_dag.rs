// tests/property_dag.rs

use std::collections::HashSet;

use jobdag::config::{Config, JobId};
use jobdag::dag::{build_job_dag, to_graphviz};
use jobdag_test_utils::builders::ConfigBuilder;
use proptest::prelude::*;

// Strategy to generate a config of groups over a shared pool of jobs.
// Groups may depend on any group (including themselves), so cycles and
// repeated pairings are both exercised.
fn config_strategy(max_groups: usize) -> impl Strategy<Value = Config> {
    (1..=max_groups).prop_flat_map(|num_groups| {
        let deps_strat = proptest::collection::vec(
            proptest::collection::vec(0..num_groups, 0..4),
            num_groups,
        );
        let members_strat = proptest::collection::vec(
            proptest::collection::vec(0..num_groups, 1..3),
            num_groups,
        );

        (deps_strat, members_strat).prop_map(move |(raw_deps, raw_members)| {
            let mut builder = ConfigBuilder::new();
            for i in 0..num_groups {
                builder = builder.with_job(&format!("job_{i}"));
            }
            for (i, members) in raw_members.iter().enumerate() {
                let names: Vec<String> = members.iter().map(|m| format!("job_{m}")).collect();
                let refs: Vec<&str> = names.iter().map(String::as_str).collect();
                builder = builder.with_group_of(&format!("group_{i}"), &refs);
            }
            for (i, deps) in raw_deps.iter().enumerate() {
                for dep in deps {
                    builder = builder.depends_on(&format!("group_{i}"), &format!("group_{dep}"));
                }
            }
            builder.build()
        })
    })
}

proptest! {
    #[test]
    fn no_job_has_duplicate_edges(cfg in config_strategy(8)) {
        let jobs = build_job_dag(cfg);
        for job in &jobs {
            let unique: HashSet<JobId> = job.depends_on.iter().copied().collect();
            prop_assert_eq!(unique.len(), job.depends_on.len());
        }
    }

    #[test]
    fn every_edge_comes_from_a_group_pairing(cfg in config_strategy(8)) {
        let mut allowed: HashSet<(JobId, JobId)> = HashSet::new();
        for group in &cfg.groups {
            for dep in &group.depends_on {
                for from in &group.jobs {
                    for to in &cfg.groups[dep.0].jobs {
                        allowed.insert((*from, *to));
                    }
                }
            }
        }

        let jobs = build_job_dag(cfg);
        let mut seen = 0;
        for job in &jobs {
            for dep in &job.depends_on {
                prop_assert!(allowed.contains(&(job.id, *dep)));
                seen += 1;
            }
        }
        prop_assert_eq!(seen, allowed.len());
    }

    #[test]
    fn graphviz_has_one_line_per_node_and_edge(cfg in config_strategy(6)) {
        let jobs = build_job_dag(cfg);
        let dot = to_graphviz(&jobs);
        let edges: usize = jobs.iter().map(|j| j.depends_on.len()).sum();

        let node_lines = dot.lines().filter(|l| l.starts_with('"') && !l.contains("->")).count();
        let edge_lines = dot.lines().filter(|l| l.contains("->")).count();
        prop_assert_eq!(node_lines, jobs.len());
        prop_assert_eq!(edge_lines, edges);
    }
}
