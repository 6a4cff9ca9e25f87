// tests/examples_multidep.rs
mod common;
use crate::common::builders::dep_names;
use crate::common::{demo_path, init_tracing};

use std::error::Error;

use jobdag::config::load_config;
use jobdag::dag::{build_job_dag, find_cycles, to_graphviz};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn multidep_demo_resolves_cleanly() -> TestResult {
    init_tracing();

    let report = load_config(demo_path("multidep.lua"))?;
    assert!(report.is_clean(), "unexpected errors: {:?}", report.errors);

    let names: Vec<String> = report.config.jobs.iter().map(|j| j.key()).collect();
    assert_eq!(
        names,
        vec!["build", "deploy", "package", "unit", "integration", "lint"]
    );

    Ok(())
}

#[test]
fn multidep_demo_edges_are_direct_only() -> TestResult {
    init_tracing();

    let report = load_config(demo_path("multidep.lua"))?;
    let jobs = build_job_dag(report.config);

    assert!(dep_names(&jobs, "build").is_empty());
    assert_eq!(dep_names(&jobs, "unit"), vec!["build"]);
    assert_eq!(dep_names(&jobs, "lint"), vec!["build"]);
    assert_eq!(
        dep_names(&jobs, "package"),
        vec!["build", "unit", "integration", "lint"]
    );
    // deploy -> package -> build, but deploy never names build itself.
    assert_eq!(dep_names(&jobs, "deploy"), vec!["package"]);
    assert!(find_cycles(&jobs).is_empty());

    Ok(())
}

#[test]
fn multidep_demo_renders_graphviz() -> TestResult {
    init_tracing();

    let report = load_config(demo_path("multidep.lua"))?;
    let dot = to_graphviz(&build_job_dag(report.config));

    assert!(dot.starts_with("digraph {\nrankdir = BT\n"));
    assert!(dot.ends_with("}\n"));
    assert!(dot.contains("\"deploy\" -> \"package\"\n"));
    assert_eq!(dot.lines().filter(|l| l.contains("->")).count(), 8);

    Ok(())
}
