//! Critical Path Method engine for task dependency graphs.
//!
//! Computes earliest/latest start and finish times, slack and the critical
//! path over a DAG of tasks, and keeps the graph acyclic as dependencies are
//! added and removed. Python bindings are available behind the `python`
//! feature.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

mod config;
pub mod cpm;
mod engine;
pub mod graph;
mod interner;
pub mod logging;
mod models;

pub use config::{ConfigError, CpmConfig, HorizonMode};
pub use engine::{CpmEngine, CpmError};
pub use interner::TaskIdx;
pub use models::{CalendarWindow, Schedule, TaskSpec, TimeRecord};

/// Compute a one-off CPM snapshot for `tasks` without keeping an engine around.
///
/// # Arguments
/// * `tasks` - Tasks in caller order; ids must be unique and every dependency id must exist
/// * `config` - Engine configuration (horizon mode, verbosity)
///
/// # Returns
/// * `Ok(Schedule)` with per-task timings, the critical path and the horizon
/// * `Err(CpmError)` for invalid input or a cyclic task list
pub fn compute(tasks: &[TaskSpec], config: &CpmConfig) -> Result<Schedule, CpmError> {
    let engine = CpmEngine::with_tasks(tasks, config)?;
    Ok(engine.schedule().clone())
}

#[cfg(feature = "python")]
mod python {
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use super::*;

    fn to_py_err(err: CpmError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    /// Compute a CPM snapshot for a task list.
    ///
    /// # Raises
    /// * ValueError on unknown ids, duplicates, negative durations or cycles
    #[pyfunction]
    #[pyo3(name = "compute", signature = (tasks, config=None))]
    fn py_compute(tasks: Vec<TaskSpec>, config: Option<CpmConfig>) -> PyResult<Schedule> {
        compute(&tasks, &config.unwrap_or_default()).map_err(to_py_err)
    }

    /// Stateful engine (PyO3 wrapper).
    ///
    /// PyO3's borrow tracking gives each call exclusive access, so mutations
    /// never interleave.
    #[pyclass(name = "Engine")]
    pub struct PyCpmEngine {
        inner: CpmEngine,
    }

    #[pymethods]
    impl PyCpmEngine {
        #[new]
        #[pyo3(signature = (tasks=Vec::new(), config=None))]
        fn new(tasks: Vec<TaskSpec>, config: Option<CpmConfig>) -> PyResult<Self> {
            let inner = CpmEngine::with_tasks(&tasks, &config.unwrap_or_default())
                .map_err(to_py_err)?;
            Ok(Self { inner })
        }

        fn load(&mut self, tasks: Vec<TaskSpec>) -> PyResult<()> {
            self.inner.load(&tasks).map_err(to_py_err)
        }

        fn add_dependency(&mut self, dependent: &str, dependency: &str) -> PyResult<bool> {
            self.inner
                .add_dependency(dependent, dependency)
                .map_err(to_py_err)
        }

        fn remove_dependency(&mut self, dependent: &str, dependency: &str) -> PyResult<bool> {
            self.inner
                .remove_dependency(dependent, dependency)
                .map_err(to_py_err)
        }

        fn set_duration(&mut self, id: &str, duration_days: i64) -> PyResult<bool> {
            self.inner.set_duration(id, duration_days).map_err(to_py_err)
        }

        fn would_create_cycle(&self, dependent: &str, dependency: &str) -> PyResult<bool> {
            self.inner
                .would_create_cycle(dependent, dependency)
                .map_err(to_py_err)
        }

        fn dependencies_of(&self, id: &str) -> PyResult<Vec<String>> {
            let ids = self.inner.dependencies_of(id).map_err(to_py_err)?;
            Ok(ids.into_iter().map(String::from).collect())
        }

        fn dependents_of(&self, id: &str) -> PyResult<Vec<String>> {
            let ids = self.inner.dependents_of(id).map_err(to_py_err)?;
            Ok(ids.into_iter().map(String::from).collect())
        }

        fn schedule(&self) -> Schedule {
            self.inner.schedule().clone()
        }

        fn __repr__(&self) -> String {
            let schedule = self.inner.schedule();
            format!(
                "Engine(tasks={}, horizon={}, mode={})",
                schedule.records.len(),
                schedule.horizon,
                self.inner.horizon_mode().as_str()
            )
        }
    }

    /// The cpm.rust Python module.
    #[pymodule]
    fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Core data types
        m.add_class::<TaskSpec>()?;
        m.add_class::<TimeRecord>()?;
        m.add_class::<Schedule>()?;
        m.add_class::<CalendarWindow>()?;

        // Config types
        m.add_class::<CpmConfig>()?;

        // Engine and one-shot computation
        m.add_class::<PyCpmEngine>()?;
        m.add_function(wrap_pyfunction!(py_compute, m)?)?;

        Ok(())
    }
}
