//! Topological ordering (Kahn's algorithm).

use std::collections::VecDeque;

use thiserror::Error;

use crate::interner::TaskIdx;

use super::model::GraphModel;

/// Errors from topological sorting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// Some tasks could never become ready, so the graph holds a cycle.
    #[error("Inconsistent graph: only {ordered} of {total} tasks could be ordered (circular dependency)")]
    InconsistentGraph { ordered: usize, total: usize },
}

/// Order every task so each dependency precedes its dependents.
pub fn topological_order(graph: &GraphModel) -> Result<Vec<TaskIdx>, SortError> {
    topological_order_where(graph, |_| true)
}

/// Order the subgraph induced by `include`.
///
/// Only edges whose endpoints are both included count. Ready tasks are
/// processed FIFO, seeded in index (insertion) order, so the result is
/// deterministic for a given graph.
pub fn topological_order_where<F>(graph: &GraphModel, include: F) -> Result<Vec<TaskIdx>, SortError>
where
    F: Fn(TaskIdx) -> bool,
{
    let n = graph.len();
    let mut member = vec![false; n];
    let mut total = 0;
    for idx in 0..n as TaskIdx {
        if include(idx) {
            member[idx as usize] = true;
            total += 1;
        }
    }

    // In-degree = number of included dependencies
    let mut in_degree = vec![0usize; n];
    for idx in 0..n as TaskIdx {
        if !member[idx as usize] {
            continue;
        }
        in_degree[idx as usize] = graph
            .dependencies(idx)
            .iter()
            .filter(|&&dep| member[dep as usize])
            .count();
    }

    let mut queue: VecDeque<TaskIdx> = (0..n as TaskIdx)
        .filter(|&idx| member[idx as usize] && in_degree[idx as usize] == 0)
        .collect();

    let mut order: Vec<TaskIdx> = Vec::with_capacity(total);

    while let Some(idx) = queue.pop_front() {
        order.push(idx);

        for &dependent in graph.dependents(idx) {
            let d = dependent as usize;
            if !member[d] {
                continue;
            }
            in_degree[d] -= 1;
            if in_degree[d] == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if order.len() != total {
        return Err(SortError::InconsistentGraph {
            ordered: order.len(),
            total,
        });
    }

    Ok(order)
}
