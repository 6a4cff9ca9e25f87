// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod logging;
pub mod script;

use std::fs;

use anyhow::{bail, Context, Result};
use tracing::{error, info, warn};

use crate::cli::CliArgs;
use crate::config::{key_of, load_config, Job};
use crate::dag::{build_job_dag, cycle_errors, export};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - job script loading and resolution
/// - config error reporting
/// - graph building and cycle diagnostics
/// - export to stdout or a file
pub fn run(args: CliArgs) -> Result<()> {
    let report = load_config(&args.config)
        .with_context(|| format!("loading job script {:?}", args.config))?;

    for err in &report.errors {
        error!("{err}");
    }
    if !report.is_clean() && !args.allow_partial {
        bail!(
            "{} config error(s) in {:?} (use --allow-partial to export anyway)",
            report.errors.len(),
            args.config
        );
    }

    let jobs = build_job_dag(report.config);

    let cycles = cycle_errors(&jobs);
    for cycle in &cycles {
        warn!("{cycle}");
    }
    if !cycles.is_empty() && args.deny_cycles {
        bail!("job graph contains {} dependency cycle(s)", cycles.len());
    }

    if args.dry_run {
        print_dry_run(&jobs);
        return Ok(());
    }

    let rendered = export(&jobs, args.format.into())?;
    match &args.output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("writing graph to {:?}", path))?;
            info!(path = %path.display(), jobs = jobs.len(), "wrote job graph");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

/// Simple dry-run output: print jobs and their direct dependencies.
fn print_dry_run(jobs: &[Job]) {
    println!("jobdag dry-run");
    println!();

    println!("jobs ({}):", jobs.len());
    for job in jobs {
        println!("  - {} (id {})", job.key(), job.id);
        if !job.depends_on.is_empty() {
            let deps: Vec<String> = job.depends_on.iter().map(|dep| key_of(jobs, *dep)).collect();
            println!("      depends_on: {:?}", deps);
        }
    }
}
