// src/config/model.rs

use std::fmt;

/// Index of a job in [`Config::jobs`]; also the job's sequential id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub usize);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a group in [`Config::groups`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub usize);

/// A leaf unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub name: Option<String>,
    /// Jobs that must complete before this one.
    ///
    /// Empty after loading; filled in by [`crate::dag::build_job_dag`].
    pub depends_on: Vec<JobId>,
}

impl Job {
    pub fn new(id: JobId, name: Option<String>) -> Self {
        Self {
            id,
            name,
            depends_on: Vec::new(),
        }
    }

    /// Display key: the name when non-empty, else the decimal id.
    pub fn key(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.id.to_string(),
        }
    }
}

/// A named or anonymous set of jobs plus group-level dependencies.
///
/// Only used while deriving job edges; groups never appear in the final
/// graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub name: Option<String>,
    /// Leaf jobs only; nested groups are flattened in.
    pub jobs: Vec<JobId>,
    pub depends_on: Vec<GroupId>,
}

impl Group {
    pub fn named(name: &str) -> Self {
        Self {
            name: if name.is_empty() {
                None
            } else {
                Some(name.to_string())
            },
            ..Self::default()
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Result of loading a job script: every job created (in creation order)
/// and every group that resolved cleanly (in completion order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub jobs: Vec<Job>,
    pub groups: Vec<Group>,
}

impl Config {
    /// First group with the given name.
    pub fn group_named(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name.as_deref() == Some(name))
    }
}

/// Display key of job `id` in a job list indexed by id, or the bare id when
/// it is out of range.
pub fn key_of(jobs: &[Job], id: JobId) -> String {
    jobs.get(id.0).map(Job::key).unwrap_or_else(|| id.to_string())
}
