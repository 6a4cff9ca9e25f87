// src/config/loader.rs

//! Turn the table returned by a job script into a [`Config`].
//!
//! Every table is interpreted with one heuristic: if it has a value at
//! index 1 it is a *group* (sequence form), otherwise it is a single *job*
//! (map form). Both forms may carry a `depends_on` field naming other
//! tables, which are resolved as groups in turn.
//!
//! Resolution is memoized by table identity, so a table shared between
//! several dependents is resolved exactly once and yields the same group
//! (and the same jobs) everywhere.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use mlua::{Table, Value};
use tracing::{debug, info, trace};

use crate::config::model::{Config, Group, GroupId, Job, JobId};
use crate::errors::{ConfigError, JobdagError, Result};
use crate::script::{self, ScriptState, TableKey};

/// A loaded config plus the recoverable errors found while loading it.
///
/// A non-empty `errors` does not mean `config` is empty: well-formed
/// sibling entries are still resolved.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub config: Config,
    pub errors: Vec<ConfigError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Evaluate a job script file and resolve it into a [`Config`].
///
/// Fails only when the file cannot be read or evaluated, or when the script
/// does not return a table. Everything else ends up in
/// [`LoadReport::errors`].
pub fn load_config(path: impl AsRef<Path>) -> Result<LoadReport> {
    let path = path.as_ref();
    let state = ScriptState::new();
    let value = state.do_file(path)?;
    let report = resolve_returned_value(value, &path.display().to_string())?;
    state.close();

    info!(
        path = %path.display(),
        jobs = report.config.jobs.len(),
        groups = report.config.groups.len(),
        errors = report.errors.len(),
        "loaded job config"
    );
    Ok(report)
}

/// Like [`load_config`], for a script held in memory.
///
/// `chunk_name` is only used in error messages.
pub fn load_config_str(source: &str, chunk_name: &str) -> Result<LoadReport> {
    let state = ScriptState::new();
    let value = state.do_string(source, chunk_name)?;
    let report = resolve_returned_value(value, chunk_name)?;
    state.close();
    Ok(report)
}

/// Default job script location: `jobs.lua` in the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("jobs.lua")
}

/// Resolve every top-level entry of the returned table.
///
/// Lua does not keep table insertion order, so string keys are visited in
/// sorted order and non-string keys are reported last, sorted by their
/// rendering. Job ids are therefore stable across runs.
fn resolve_returned_value(value: Value, chunk_name: &str) -> Result<LoadReport> {
    let root = match value {
        Value::Table(root) => root,
        other => {
            return Err(JobdagError::NotATable {
                found: script::type_name(&other).to_string(),
            });
        }
    };

    let mut entries: Vec<(String, Value)> = Vec::new();
    let mut bad_keys: Vec<String> = Vec::new();
    for pair in root.clone().pairs::<Value, Value>() {
        let (key, entry) = pair.map_err(|err| JobdagError::Script {
            chunk: chunk_name.to_string(),
            message: err.to_string(),
        })?;
        match key {
            Value::String(name) => entries.push((name.to_string_lossy().into(), entry)),
            other => bad_keys.push(script::describe(&other)),
        }
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    bad_keys.sort();

    let mut loader = Loader::default();
    let mut errors = Vec::new();

    for (name, entry) in entries {
        match entry {
            Value::Table(table) => {
                if let Err(entry_errors) = loader.resolve(&name, table) {
                    errors.extend(entry_errors);
                }
            }
            _ => errors.push(ConfigError::EntryNotTable { name }),
        }
    }
    errors.extend(bad_keys.into_iter().map(|key| ConfigError::NonStringKey { key }));

    Ok(LoadReport {
        config: loader.finish(),
        errors,
    })
}

type Resolution = std::result::Result<GroupId, Vec<ConfigError>>;

/// Identity-memoizing resolver over the tables of one script.
#[derive(Default)]
struct Loader {
    jobs: Vec<Job>,
    /// Every group started, including ones that failed or are still being
    /// resolved. Compacted into [`Config::groups`] by `finish`.
    groups: Vec<Group>,
    /// Groups whose resolution finished cleanly, in completion order.
    registered: Vec<GroupId>,
    resolved: HashMap<TableKey, GroupId>,
    in_progress: HashMap<TableKey, GroupId>,
}

/// A table whose resolution has started but not finished.
struct Frame {
    key: TableKey,
    group: GroupId,
    table: Table,
    stage: Stage,
    errors: Vec<ConfigError>,
}

/// The list of `Frame::table` currently being walked.
enum Stage {
    Members(std::vec::IntoIter<Value>),
    DependsOn(std::vec::IntoIter<Value>),
}

impl Loader {
    /// Resolve `table` into a group.
    ///
    /// Returns the group on success. On failure returns every error found
    /// below this table; the table is then not cached, so meeting it again
    /// re-runs the resolution (and reports the errors again). Jobs created
    /// along the way stay in the job list either way.
    ///
    /// Nested tables are walked depth-first on an explicit stack of frames,
    /// so nesting depth and `depends_on` chain length are bounded by memory
    /// rather than by the call stack.
    fn resolve(&mut self, default_name: &str, table: Table) -> Resolution {
        if let Some(group) = self.lookup(&table) {
            return Ok(group);
        }

        let mut stack = vec![self.enter(default_name, table)];
        let mut outcome = None;

        while let Some(frame) = stack.last_mut() {
            match self.next_table(frame) {
                Some(child) => match self.lookup(&child) {
                    Some(group) => self.absorb(frame, Ok(group)),
                    None => {
                        let child = self.enter("", child);
                        stack.push(child);
                    }
                },
                None => {
                    let Some(done) = stack.pop() else { break };
                    let result = self.leave(done);
                    match stack.last_mut() {
                        Some(parent) => self.absorb(parent, result),
                        None => outcome = Some(result),
                    }
                }
            }
        }

        outcome.unwrap_or_else(|| Err(Vec::new()))
    }

    /// The group for a table that is cached or still being resolved.
    fn lookup(&self, table: &Table) -> Option<GroupId> {
        let key = TableKey::of(table);
        if let Some(&group) = self.resolved.get(&key) {
            trace!(%key, "table already resolved");
            return Some(group);
        }
        if let Some(&group) = self.in_progress.get(&key) {
            debug!(%key, "table referenced while being resolved (reference cycle)");
            return Some(group);
        }
        None
    }

    /// Start resolving `table`: allocate its group and, for a map-shaped
    /// table, its job.
    fn enter(&mut self, default_name: &str, table: Table) -> Frame {
        let key = TableKey::of(&table);
        let group = GroupId(self.groups.len());
        self.groups.push(Group::named(default_name));
        self.in_progress.insert(key, group);

        let members = if script::is_array(&table) {
            if let Some(name) = script::string_field(&table, "name") {
                self.groups[group.0].name = Some(name);
            }
            script::sequence(&table)
        } else {
            let job = JobId(self.jobs.len());
            let name = script::string_field(&table, "name");
            trace!(%key, %job, ?name, "table is a job");
            self.jobs.push(Job::new(job, name));
            self.groups[group.0].jobs.push(job);
            Vec::new()
        };

        Frame {
            key,
            group,
            table,
            stage: Stage::Members(members.into_iter()),
            errors: Vec::new(),
        }
    }

    /// Advance `frame` to the next table it refers to: sequence elements
    /// first, then `depends_on` entries. Entries that are not tables are
    /// recorded as errors and skipped. `None` once both lists are done.
    fn next_table(&self, frame: &mut Frame) -> Option<Table> {
        loop {
            match &mut frame.stage {
                Stage::Members(members) => match members.next() {
                    Some(Value::Table(child)) => return Some(child),
                    Some(other) => frame.errors.push(ConfigError::GroupEntryNotTable {
                        group: self.groups[frame.group.0].display_name().to_string(),
                        found: script::describe(&other),
                    }),
                    None => {
                        let deps = dependency_list(&frame.table, &mut frame.errors);
                        frame.stage = Stage::DependsOn(deps.into_iter());
                    }
                },
                Stage::DependsOn(deps) => match deps.next() {
                    Some(Value::Table(dep)) => return Some(dep),
                    Some(other) => frame.errors.push(ConfigError::DependencyNotTable {
                        found: script::describe(&other),
                    }),
                    None => return None,
                },
            }
        }
    }

    /// Fold a finished child resolution into the frame that asked for it.
    fn absorb(&mut self, frame: &mut Frame, result: Resolution) {
        match (result, &frame.stage) {
            (Ok(child), Stage::Members(_)) => {
                let child_jobs = self.groups[child.0].jobs.clone();
                self.groups[frame.group.0].jobs.extend(child_jobs);
            }
            (Ok(dep), Stage::DependsOn(_)) => self.groups[frame.group.0].depends_on.push(dep),
            (Err(errors), _) => frame.errors.extend(errors),
        }
    }

    fn leave(&mut self, frame: Frame) -> Resolution {
        self.in_progress.remove(&frame.key);

        if frame.errors.is_empty() {
            let group = &self.groups[frame.group.0];
            debug!(
                key = %frame.key,
                group = group.display_name(),
                jobs = group.jobs.len(),
                deps = group.depends_on.len(),
                "resolved group"
            );
            self.resolved.insert(frame.key, frame.group);
            self.registered.push(frame.group);
            Ok(frame.group)
        } else {
            debug!(key = %frame.key, errors = frame.errors.len(), "group resolution failed");
            Err(frame.errors)
        }
    }

    /// Build the final config, keeping only cleanly resolved groups.
    fn finish(self) -> Config {
        let mut remap: Vec<Option<GroupId>> = vec![None; self.groups.len()];
        for (new_index, old) in self.registered.iter().enumerate() {
            remap[old.0] = Some(GroupId(new_index));
        }

        let mut dropped = 0usize;
        let groups = self
            .registered
            .iter()
            .map(|old| {
                let group = &self.groups[old.0];
                let depends_on = group
                    .depends_on
                    .iter()
                    .filter_map(|dep| {
                        let mapped = remap[dep.0];
                        if mapped.is_none() {
                            dropped += 1;
                        }
                        mapped
                    })
                    .collect();
                Group {
                    name: group.name.clone(),
                    jobs: group.jobs.clone(),
                    depends_on,
                }
            })
            .collect();

        if dropped > 0 {
            debug!(dropped, "dropped dependencies on groups that failed to resolve");
        }

        Config {
            jobs: self.jobs,
            groups,
        }
    }
}

/// The entries of a table's `depends_on` field.
///
/// A sequence-shaped table is a list of dependencies, any other table is a
/// single dependency. Any other non-nil value is an error.
fn dependency_list(table: &Table, errors: &mut Vec<ConfigError>) -> Vec<Value> {
    match script::field(table, "depends_on") {
        Value::Nil => Vec::new(),
        Value::Table(dep) if script::is_array(&dep) => script::sequence(&dep),
        Value::Table(dep) => vec![Value::Table(dep)],
        other => {
            errors.push(ConfigError::InvalidDependsOn {
                found: script::describe(&other),
            });
            Vec::new()
        }
    }
}
