//! CPM engine: the only write surface over the task graph.
//!
//! Every accepted mutation is followed by a full recomputation. The new
//! snapshot replaces the old one only once it is complete, and a mutation that
//! fails leaves both the graph and the snapshot exactly as they were.

use thiserror::Error;

use crate::config::{ConfigError, CpmConfig, HorizonMode};
use crate::cpm::{compute_schedule, ScheduleError};
use crate::graph::{check_new_edge, would_create_cycle, GraphError, GraphModel, SortError};
use crate::models::{Schedule, TaskSpec};
use crate::{log_changes, log_checks};

/// Errors surfaced by engine operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CpmError {
    #[error("Unknown task: {0}")]
    UnknownTask(String),
    #[error("Task {0} cannot depend on itself")]
    SelfDependency(String),
    #[error("Making {dependent} depend on {dependency} would create a circular dependency")]
    Cycle { dependent: String, dependency: String },
    #[error("Duplicate task id: {0}")]
    DuplicateTask(String),
    #[error("Task {id} has negative duration {duration}")]
    NegativeDuration { id: String, duration: i64 },
    #[error("Inconsistent graph: only {ordered} of {total} tasks could be ordered (circular dependency)")]
    InconsistentGraph { ordered: usize, total: usize },
    #[error("Finish time of task {id} overflows the day range")]
    DurationOverflow { id: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<GraphError> for CpmError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::UnknownTask(id) => CpmError::UnknownTask(id),
            GraphError::SelfDependency(id) => CpmError::SelfDependency(id),
            GraphError::Cycle {
                dependent,
                dependency,
            } => CpmError::Cycle {
                dependent,
                dependency,
            },
            GraphError::DuplicateTask(id) => CpmError::DuplicateTask(id),
            GraphError::NegativeDuration { id, duration } => {
                CpmError::NegativeDuration { id, duration }
            }
        }
    }
}

impl From<SortError> for CpmError {
    fn from(err: SortError) -> Self {
        match err {
            SortError::InconsistentGraph { ordered, total } => {
                CpmError::InconsistentGraph { ordered, total }
            }
        }
    }
}

impl From<ScheduleError> for CpmError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::Sort(e) => e.into(),
            ScheduleError::DurationOverflow { id } => CpmError::DurationOverflow { id },
        }
    }
}

impl From<ConfigError> for CpmError {
    fn from(err: ConfigError) -> Self {
        CpmError::InvalidConfig(err.to_string())
    }
}

/// Task graph plus its current CPM snapshot.
///
/// Not re-entrant: callers serialize access (wrap in a `Mutex` to share
/// across threads).
#[derive(Debug, Clone)]
pub struct CpmEngine {
    graph: GraphModel,
    schedule: Schedule,
    mode: HorizonMode,
    verbosity: u8,
}

impl CpmEngine {
    /// Create an engine with no tasks.
    pub fn new(config: &CpmConfig) -> Result<Self, CpmError> {
        Ok(Self {
            graph: GraphModel::default(),
            schedule: Schedule::default(),
            mode: config.horizon()?,
            verbosity: config.verbosity,
        })
    }

    /// Create an engine and load `tasks` into it.
    pub fn with_tasks(tasks: &[TaskSpec], config: &CpmConfig) -> Result<Self, CpmError> {
        let mut engine = Self::new(config)?;
        engine.load(tasks)?;
        Ok(engine)
    }

    /// Replace the whole graph with `tasks` and recompute.
    ///
    /// Unresolved references, duplicates, negative durations and cycles are
    /// all rejected; on error the previous graph and snapshot stay in place.
    pub fn load(&mut self, tasks: &[TaskSpec]) -> Result<(), CpmError> {
        let graph = GraphModel::load(tasks).inspect_err(|e| {
            log_changes!(self.verbosity, "load rejected: {}", e);
        })?;
        let schedule = compute_schedule(&graph, self.mode, self.verbosity).inspect_err(|e| {
            log_changes!(self.verbosity, "load rejected: {}", e);
        })?;

        log_changes!(
            self.verbosity,
            "loaded {} tasks, {} dependencies, horizon={}",
            graph.len(),
            graph.edge_count(),
            schedule.horizon
        );
        self.graph = graph;
        self.schedule = schedule;
        Ok(())
    }

    /// Make `dependent` wait on `dependency`.
    ///
    /// Returns `Ok(true)` when the edge was committed and `Ok(false)` when it
    /// already existed.
    pub fn add_dependency(&mut self, dependent: &str, dependency: &str) -> Result<bool, CpmError> {
        let dependent_idx = self.graph.idx(dependent)?;
        let dependency_idx = self.graph.idx(dependency)?;

        if dependent_idx != dependency_idx && self.graph.has_edge(dependent_idx, dependency_idx) {
            log_checks!(
                self.verbosity,
                "{} already depends on {}, nothing to do",
                dependent,
                dependency
            );
            return Ok(false);
        }

        if let Err(e) = check_new_edge(&self.graph, dependent_idx, dependency_idx) {
            log_changes!(self.verbosity, "rejected dependency: {}", e);
            return Err(e.into());
        }
        log_checks!(self.verbosity, "{} -> {} keeps the graph acyclic", dependent, dependency);

        self.graph.add_edge(dependent_idx, dependency_idx);
        if let Err(e) = self.recompute() {
            self.graph.remove_edge(dependent_idx, dependency_idx);
            return Err(e);
        }

        log_changes!(
            self.verbosity,
            "{} now depends on {} (horizon={})",
            dependent,
            dependency,
            self.schedule.horizon
        );
        Ok(true)
    }

    /// Drop the dependency of `dependent` on `dependency`.
    ///
    /// Returns `Ok(false)` without recomputing when there was no such edge.
    pub fn remove_dependency(
        &mut self,
        dependent: &str,
        dependency: &str,
    ) -> Result<bool, CpmError> {
        let dependent_idx = self.graph.idx(dependent)?;
        let dependency_idx = self.graph.idx(dependency)?;

        let Some(position) = self.graph.remove_edge(dependent_idx, dependency_idx) else {
            log_checks!(
                self.verbosity,
                "{} does not depend on {}, nothing to remove",
                dependent,
                dependency
            );
            return Ok(false);
        };

        if let Err(e) = self.recompute() {
            self.graph.insert_edge_at(dependent_idx, dependency_idx, position);
            return Err(e);
        }

        log_changes!(
            self.verbosity,
            "{} no longer depends on {} (horizon={})",
            dependent,
            dependency,
            self.schedule.horizon
        );
        Ok(true)
    }

    /// Update the duration of an existing task.
    ///
    /// Returns `Ok(false)` without recomputing when the duration is unchanged.
    pub fn set_duration(&mut self, id: &str, duration_days: i64) -> Result<bool, CpmError> {
        let idx = self.graph.idx(id)?;
        if duration_days < 0 {
            return Err(CpmError::NegativeDuration {
                id: id.to_string(),
                duration: duration_days,
            });
        }

        let previous = self.graph.duration(idx);
        if previous == duration_days {
            return Ok(false);
        }

        self.graph.set_duration(idx, duration_days);
        if let Err(e) = self.recompute() {
            self.graph.set_duration(idx, previous);
            return Err(e);
        }

        log_changes!(
            self.verbosity,
            "{} duration {} -> {} (horizon={})",
            id,
            previous,
            duration_days,
            self.schedule.horizon
        );
        Ok(true)
    }

    /// Would making `dependent` wait on `dependency` close a cycle?
    ///
    /// Read-only. An edge that already exists answers `false`.
    pub fn would_create_cycle(&self, dependent: &str, dependency: &str) -> Result<bool, CpmError> {
        let dependent_idx = self.graph.idx(dependent)?;
        let dependency_idx = self.graph.idx(dependency)?;
        if dependent_idx == dependency_idx {
            return Err(CpmError::SelfDependency(dependent.to_string()));
        }
        if self.graph.has_edge(dependent_idx, dependency_idx) {
            return Ok(false);
        }
        Ok(would_create_cycle(&self.graph, dependent_idx, dependency_idx))
    }

    pub fn has_dependency(&self, dependent: &str, dependency: &str) -> Result<bool, CpmError> {
        let dependent_idx = self.graph.idx(dependent)?;
        let dependency_idx = self.graph.idx(dependency)?;
        Ok(self.graph.has_edge(dependent_idx, dependency_idx))
    }

    /// Ids `id` waits on, in the order the edges were added.
    pub fn dependencies_of(&self, id: &str) -> Result<Vec<&str>, CpmError> {
        let idx = self.graph.idx(id)?;
        Ok(self
            .graph
            .dependencies(idx)
            .iter()
            .map(|&d| self.graph.id(d))
            .collect())
    }

    /// Ids waiting on `id`, in task insertion order.
    pub fn dependents_of(&self, id: &str) -> Result<Vec<&str>, CpmError> {
        let idx = self.graph.idx(id)?;
        Ok(self
            .graph
            .dependents(idx)
            .iter()
            .map(|&d| self.graph.id(d))
            .collect())
    }

    pub fn task_name(&self, id: &str) -> Result<&str, CpmError> {
        let idx = self.graph.idx(id)?;
        Ok(self.graph.name(idx))
    }

    pub fn task_ids(&self) -> &[String] {
        self.graph.ids()
    }

    /// The current snapshot.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn horizon_mode(&self) -> HorizonMode {
        self.mode
    }

    /// Recompute and swap in the new snapshot. The old snapshot survives a failure.
    fn recompute(&mut self) -> Result<(), CpmError> {
        let schedule = compute_schedule(&self.graph, self.mode, self.verbosity)?;
        self.schedule = schedule;
        Ok(())
    }
}
