//! Critical Path Method passes.
//!
//! A full recomputation runs topological sort, the forward pass, the backward
//! pass and critical path extraction over the current graph and packs the
//! results into a fresh [`Schedule`]. Nothing is updated incrementally.

mod backward;
mod calendar;
mod critical;
mod forward;

pub use backward::backward_pass;
pub use critical::critical_path;
pub use forward::forward_pass;

use std::collections::HashMap;

use thiserror::Error;

use crate::config::HorizonMode;
use crate::graph::{topological_order, GraphModel, SortError};
use crate::models::Schedule;
use crate::log_debug;

/// Errors from a full recomputation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error(transparent)]
    Sort(#[from] SortError),
    /// A finish time would exceed `i64::MAX` days.
    #[error("Finish time of task {id} overflows the day range")]
    DurationOverflow { id: String },
}

/// Run every pass over `graph` and build a new snapshot.
///
/// Fails if the graph is not a DAG or a finish time overflows.
pub fn compute_schedule(
    graph: &GraphModel,
    mode: HorizonMode,
    verbosity: u8,
) -> Result<Schedule, ScheduleError> {
    let order = topological_order(graph)?;

    let mut timings = forward_pass(graph, &order)?;
    let horizon = backward_pass(graph, &order, &mut timings, mode);
    let critical = critical_path(graph, &timings)?;

    log_debug!(
        verbosity,
        "recomputed {} tasks ({} edges), horizon={}, mode={}",
        graph.len(),
        graph.edge_count(),
        horizon,
        mode.as_str()
    );
    for &idx in &order {
        let t = &timings[idx as usize];
        log_debug!(
            verbosity,
            "  {}: es={} ef={} ls={} lf={} slack={}{}",
            graph.id(idx),
            t.earliest_start,
            t.earliest_finish,
            t.latest_start,
            t.latest_finish,
            t.slack,
            if t.is_critical { " [critical]" } else { "" }
        );
    }

    let records: HashMap<String, _> = order
        .iter()
        .map(|&idx| (graph.id(idx).to_string(), timings[idx as usize]))
        .collect();

    Ok(Schedule {
        records,
        topological_order: order.iter().map(|&idx| graph.id(idx).to_string()).collect(),
        critical_path: critical.iter().map(|&idx| graph.id(idx).to_string()).collect(),
        horizon,
    })
}
