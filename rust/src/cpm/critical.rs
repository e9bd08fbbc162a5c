//! Critical path extraction.

use crate::graph::{topological_order_where, GraphModel, SortError};
use crate::interner::TaskIdx;
use crate::models::TimeRecord;

/// Zero-slack tasks, ordered so dependencies among them run start to end.
///
/// Only edges between two critical tasks constrain the order. An empty result
/// means nothing is critical, which can only happen for an empty graph.
pub fn critical_path(
    graph: &GraphModel,
    timings: &[TimeRecord],
) -> Result<Vec<TaskIdx>, SortError> {
    if !timings.iter().any(|t| t.is_critical) {
        return Ok(Vec::new());
    }
    topological_order_where(graph, |idx| timings[idx as usize].is_critical)
}
