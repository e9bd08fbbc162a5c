//! Backward pass: latest start and finish times, slack and criticality.

use std::collections::VecDeque;

use crate::config::HorizonMode;
use crate::graph::GraphModel;
use crate::interner::TaskIdx;
use crate::models::TimeRecord;

/// Fill LS/LF/slack for every task and return the plan horizon `max(EF)`.
///
/// `timings` must already hold the forward pass results and `order` must be
/// the same topological order the forward pass used; it is walked in reverse.
/// Sinks finish at the horizon chosen by `mode`: the single plan horizon for
/// [`HorizonMode::Shared`], or the horizon of their own weakly connected
/// component for [`HorizonMode::PerComponent`]. The returned value is the
/// plan horizon in both modes.
pub fn backward_pass(
    graph: &GraphModel,
    order: &[TaskIdx],
    timings: &mut [TimeRecord],
    mode: HorizonMode,
) -> i64 {
    let horizon = timings
        .iter()
        .map(|t| t.earliest_finish)
        .max()
        .unwrap_or(0);

    let sink_finish: Vec<i64> = match mode {
        HorizonMode::Shared => vec![horizon; graph.len()],
        HorizonMode::PerComponent => component_horizons(graph, timings),
    };

    for &idx in order.iter().rev() {
        let successors = graph.dependents(idx);
        let latest_finish = if successors.is_empty() {
            sink_finish[idx as usize]
        } else {
            // Must finish before the earliest latest-start of anything waiting on it
            successors
                .iter()
                .map(|&s| timings[s as usize].latest_start)
                .min()
                .unwrap_or(horizon)
        };

        let timing = &mut timings[idx as usize];
        timing.latest_finish = latest_finish;
        timing.latest_start = latest_finish - graph.duration(idx);
        timing.slack = timing.latest_start - timing.earliest_start;
        timing.is_critical = timing.slack == 0;
    }

    horizon
}

/// For each task, the largest EF in its weakly connected component.
fn component_horizons(graph: &GraphModel, timings: &[TimeRecord]) -> Vec<i64> {
    let n = graph.len();
    let mut component: Vec<Option<usize>> = vec![None; n];
    let mut horizons: Vec<i64> = Vec::new();
    let mut queue: VecDeque<TaskIdx> = VecDeque::new();

    for start in 0..n as TaskIdx {
        if component[start as usize].is_some() {
            continue;
        }
        let label = horizons.len();
        let mut max_finish = 0;
        component[start as usize] = Some(label);
        queue.push_back(start);

        while let Some(idx) = queue.pop_front() {
            max_finish = max_finish.max(timings[idx as usize].earliest_finish);
            let neighbours = graph
                .dependencies(idx)
                .iter()
                .chain(graph.dependents(idx).iter());
            for &next in neighbours {
                if component[next as usize].is_none() {
                    component[next as usize] = Some(label);
                    queue.push_back(next);
                }
            }
        }

        horizons.push(max_finish);
    }

    component
        .into_iter()
        .map(|label| label.map(|c| horizons[c]).unwrap_or(0))
        .collect()
}
