#![allow(dead_code)]

use std::collections::HashMap;

use jobdag::config::{Config, Group, GroupId, Job, JobId};

/// Builder for `Config` to simplify graph-level test setup.
///
/// Jobs and groups are referred to by name; ids are assigned in the order
/// things are added, like the loader does.
pub struct ConfigBuilder {
    config: Config,
    jobs_by_name: HashMap<String, JobId>,
    groups_by_name: HashMap<String, GroupId>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            jobs_by_name: HashMap::new(),
            groups_by_name: HashMap::new(),
        }
    }

    /// Add a job and the one-member group a plain job table resolves to.
    pub fn with_job(mut self, name: &str) -> Self {
        let id = self.add_job(name);
        self.add_group(name, vec![id]);
        self
    }

    /// Add a group of new jobs.
    pub fn with_group(mut self, name: &str, jobs: &[&str]) -> Self {
        let ids = jobs.iter().map(|job| self.add_job(job)).collect();
        self.add_group(name, ids);
        self
    }

    /// Add a group over jobs that already exist.
    pub fn with_group_of(mut self, name: &str, jobs: &[&str]) -> Self {
        let ids = jobs.iter().map(|job| self.job_id(job)).collect();
        self.add_group(name, ids);
        self
    }

    /// Make group `group` depend on group `dep`.
    pub fn depends_on(mut self, group: &str, dep: &str) -> Self {
        let group = self.group_id(group);
        let dep = self.group_id(dep);
        self.config.groups[group.0].depends_on.push(dep);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }

    fn add_job(&mut self, name: &str) -> JobId {
        let id = JobId(self.config.jobs.len());
        self.config.jobs.push(Job::new(id, Some(name.to_string())));
        self.jobs_by_name.insert(name.to_string(), id);
        id
    }

    fn add_group(&mut self, name: &str, jobs: Vec<JobId>) {
        let id = GroupId(self.config.groups.len());
        self.config.groups.push(Group {
            name: Some(name.to_string()),
            jobs,
            depends_on: Vec::new(),
        });
        self.groups_by_name.insert(name.to_string(), id);
    }

    fn job_id(&self, name: &str) -> JobId {
        *self
            .jobs_by_name
            .get(name)
            .unwrap_or_else(|| panic!("unknown job '{name}' in ConfigBuilder"))
    }

    fn group_id(&self, name: &str) -> GroupId {
        *self
            .groups_by_name
            .get(name)
            .unwrap_or_else(|| panic!("unknown group '{name}' in ConfigBuilder"))
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Names of the jobs `job` depends on, in edge order.
pub fn dep_names(jobs: &[Job], job: &str) -> Vec<String> {
    let job = jobs
        .iter()
        .find(|j| j.name.as_deref() == Some(job))
        .unwrap_or_else(|| panic!("no job named '{job}'"));
    job.depends_on
        .iter()
        .map(|dep| jobs[dep.0].key())
        .collect()
}
