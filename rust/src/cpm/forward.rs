//! Forward pass: earliest start and finish times.

use crate::graph::GraphModel;
use crate::interner::TaskIdx;
use crate::models::TimeRecord;

use super::ScheduleError;

/// Compute ES/EF for every task, indexed by [`TaskIdx`].
///
/// `order` must be a topological order of the whole graph, so every
/// dependency is final before its dependents are visited. Sources start at 0.
/// Latest times are left at zero for the backward pass.
///
/// Fails with [`ScheduleError::DurationOverflow`] when a finish time does not
/// fit in an `i64`.
pub fn forward_pass(
    graph: &GraphModel,
    order: &[TaskIdx],
) -> Result<Vec<TimeRecord>, ScheduleError> {
    let mut timings = vec![TimeRecord::default(); graph.len()];

    for &idx in order {
        // Earliest start = max of all dependency finish times
        let earliest_start = graph
            .dependencies(idx)
            .iter()
            .map(|&dep| timings[dep as usize].earliest_finish)
            .max()
            .unwrap_or(0);

        let earliest_finish = earliest_start
            .checked_add(graph.duration(idx))
            .ok_or_else(|| ScheduleError::DurationOverflow {
                id: graph.id(idx).to_string(),
            })?;

        let timing = &mut timings[idx as usize];
        timing.earliest_start = earliest_start;
        timing.earliest_finish = earliest_finish;
    }

    Ok(timings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::topological_order;
    use crate::models::TaskSpec;

    fn make_task(id: &str, duration: i64, deps: Vec<&str>) -> TaskSpec {
        TaskSpec::new(id, id, duration, deps.into_iter().map(String::from).collect())
    }

    fn run(tasks: &[TaskSpec]) -> (GraphModel, Vec<TimeRecord>) {
        let graph = GraphModel::load(tasks).unwrap();
        let order = topological_order(&graph).unwrap();
        let timings = forward_pass(&graph, &order).unwrap();
        (graph, timings)
    }

    fn es_ef(graph: &GraphModel, timings: &[TimeRecord], id: &str) -> (i64, i64) {
        let t = &timings[graph.idx(id).unwrap() as usize];
        (t.earliest_start, t.earliest_finish)
    }

    #[test]
    fn test_fan_out() {
        let (graph, timings) = run(&[
            make_task("1", 3, vec![]),
            make_task("2", 2, vec!["1"]),
            make_task("3", 4, vec!["1"]),
        ]);

        assert_eq!(es_ef(&graph, &timings, "1"), (0, 3));
        assert_eq!(es_ef(&graph, &timings, "2"), (3, 5));
        assert_eq!(es_ef(&graph, &timings, "3"), (3, 7));
    }

    #[test]
    fn test_join_waits_for_slowest_dependency() {
        let (graph, timings) = run(&[
            make_task("a", 2, vec![]),
            make_task("b", 5, vec![]),
            make_task("c", 1, vec!["a", "b"]),
        ]);

        assert_eq!(es_ef(&graph, &timings, "c"), (5, 6));
    }

    #[test]
    fn test_zero_duration_milestone() {
        // a (4) -> gate (0) -> b (3)
        let (graph, timings) = run(&[
            make_task("a", 4, vec![]),
            make_task("gate", 0, vec!["a"]),
            make_task("b", 3, vec!["gate"]),
        ]);

        assert_eq!(es_ef(&graph, &timings, "gate"), (4, 4));
        assert_eq!(es_ef(&graph, &timings, "b"), (4, 7));
    }

    #[test]
    fn test_every_source_starts_at_zero() {
        let (graph, timings) = run(&[
            make_task("a", 4, vec![]),
            make_task("b", 1, vec!["a"]),
            make_task("x", 9, vec![]),
        ]);

        assert_eq!(es_ef(&graph, &timings, "a"), (0, 4));
        assert_eq!(es_ef(&graph, &timings, "x"), (0, 9));
    }

    #[test]
    fn test_finish_past_i64_range_is_reported() {
        let half = i64::MAX / 2 + 1;
        let graph =
            GraphModel::load(&[make_task("a", half, vec![]), make_task("b", half, vec!["a"])])
                .unwrap();
        let order = topological_order(&graph).unwrap();

        assert_eq!(
            forward_pass(&graph, &order),
            Err(ScheduleError::DurationOverflow { id: "b".into() })
        );
    }

    #[test]
    fn test_finish_at_i64_max_is_fine() {
        let (graph, timings) = run(&[
            make_task("a", i64::MAX - 1, vec![]),
            make_task("b", 1, vec!["a"]),
        ]);
        assert_eq!(es_ef(&graph, &timings, "b"), (i64::MAX - 1, i64::MAX));
    }
}
