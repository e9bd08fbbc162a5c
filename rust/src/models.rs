//! Core data types exchanged with callers.

use chrono::NaiveDate;
#[cfg(feature = "python")]
use pyo3::prelude::*;
use std::collections::HashMap;

// Note: We use std HashMap here for PyO3 interface compatibility

/// A task as delivered by the record store: identity, duration and the ids it
/// depends on.
#[cfg_attr(feature = "python", pyclass)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskSpec {
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub id: String,
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub name: String,
    /// Duration in whole calendar days. Must be non-negative.
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub duration_days: i64,
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub dependency_ids: Vec<String>,
}

impl TaskSpec {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        duration_days: i64,
        dependency_ids: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration_days,
            dependency_ids,
        }
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl TaskSpec {
    #[new]
    #[pyo3(signature = (id, duration_days, dependency_ids=Vec::new(), name=None))]
    fn py_new(
        id: String,
        duration_days: i64,
        dependency_ids: Vec<String>,
        name: Option<String>,
    ) -> Self {
        let name = name.unwrap_or_else(|| id.clone());
        Self {
            id,
            name,
            duration_days,
            dependency_ids,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "TaskSpec(id={:?}, duration_days={}, deps={})",
            self.id,
            self.duration_days,
            self.dependency_ids.len()
        )
    }
}

/// Derived timing for one task, in day offsets from the plan start.
#[cfg_attr(feature = "python", pyclass)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeRecord {
    #[cfg_attr(feature = "python", pyo3(get))]
    pub earliest_start: i64,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub earliest_finish: i64,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub latest_start: i64,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub latest_finish: i64,
    /// `latest_start - earliest_start`.
    #[cfg_attr(feature = "python", pyo3(get))]
    pub slack: i64,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub is_critical: bool,
}

#[cfg(feature = "python")]
#[pymethods]
impl TimeRecord {
    fn __repr__(&self) -> String {
        format!(
            "TimeRecord(es={}, ef={}, ls={}, lf={}, slack={})",
            self.earliest_start,
            self.earliest_finish,
            self.latest_start,
            self.latest_finish,
            self.slack
        )
    }
}

/// Read-only results of one full recomputation.
///
/// Replaced wholesale after every successful mutation; never patched.
#[cfg_attr(feature = "python", pyclass)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    #[cfg_attr(feature = "python", pyo3(get))]
    pub records: HashMap<String, TimeRecord>,
    /// Task ids in the order the passes processed them.
    #[cfg_attr(feature = "python", pyo3(get))]
    pub topological_order: Vec<String>,
    /// Zero-slack task ids, dependencies before dependents.
    #[cfg_attr(feature = "python", pyo3(get))]
    pub critical_path: Vec<String>,
    /// Plan horizon: `max(EF)` over all tasks, 0 for an empty plan.
    #[cfg_attr(feature = "python", pyo3(get))]
    pub horizon: i64,
}

impl Schedule {
    pub fn record(&self, id: &str) -> Option<&TimeRecord> {
        self.records.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl Schedule {
    #[pyo3(name = "record")]
    fn py_record(&self, id: &str) -> Option<TimeRecord> {
        self.records.get(id).copied()
    }

    #[pyo3(name = "calendar")]
    fn py_calendar(&self, plan_start: NaiveDate) -> HashMap<String, CalendarWindow> {
        self.calendar(plan_start)
    }

    fn __repr__(&self) -> String {
        format!(
            "Schedule(tasks={}, horizon={}, critical_path={:?})",
            self.records.len(),
            self.horizon,
            self.critical_path
        )
    }
}

/// A task's timing projected onto calendar dates.
#[cfg_attr(feature = "python", pyclass)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarWindow {
    #[cfg_attr(feature = "python", pyo3(get))]
    pub earliest_start: NaiveDate,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub earliest_finish: NaiveDate,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub latest_start: NaiveDate,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub latest_finish: NaiveDate,
}

#[cfg(feature = "python")]
#[pymethods]
impl CalendarWindow {
    fn __repr__(&self) -> String {
        format!(
            "CalendarWindow(es={}, ef={}, ls={}, lf={})",
            self.earliest_start, self.earliest_finish, self.latest_start, self.latest_finish
        )
    }
}
