//! Cycle detection for proposed dependency edges.
//!
//! The check runs a depth-first traversal over "depends on" edges starting at
//! the proposed dependency, with the candidate edge overlaid on the graph.
//! Reaching a node that is still on the current path means the candidate
//! closes a loop. The traversal keeps its own stack of (node, next child)
//! frames, so deep chains never touch the call stack.

use crate::interner::TaskIdx;

use super::model::{GraphError, GraphModel};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Finished,
}

/// Validate a candidate edge `dependent -> dependency` without mutating the graph.
///
/// Self-dependencies are rejected up front; everything else goes through
/// [`would_create_cycle`].
pub fn check_new_edge(
    graph: &GraphModel,
    dependent: TaskIdx,
    dependency: TaskIdx,
) -> Result<(), GraphError> {
    if dependent == dependency {
        return Err(GraphError::SelfDependency(graph.id(dependent).to_string()));
    }
    if would_create_cycle(graph, dependent, dependency) {
        return Err(GraphError::Cycle {
            dependent: graph.id(dependent).to_string(),
            dependency: graph.id(dependency).to_string(),
        });
    }
    Ok(())
}

/// True if adding `dependent -> dependency` would make the graph cyclic.
///
/// O(V+E). Assumes the current graph is acyclic.
pub fn would_create_cycle(graph: &GraphModel, dependent: TaskIdx, dependency: TaskIdx) -> bool {
    let candidate = (dependent, dependency);
    let mut marks = vec![Mark::Unvisited; graph.len()];
    let mut stack: Vec<(TaskIdx, usize)> = vec![(dependency, 0)];
    marks[dependency as usize] = Mark::OnPath;

    while let Some(&(node, pos)) = stack.last() {
        match next_child(graph, node, pos, candidate) {
            Some(child) => {
                if let Some(top) = stack.last_mut() {
                    top.1 = pos + 1;
                }
                match marks[child as usize] {
                    Mark::OnPath => return true,
                    Mark::Unvisited => {
                        marks[child as usize] = Mark::OnPath;
                        stack.push((child, 0));
                    }
                    Mark::Finished => {}
                }
            }
            None => {
                marks[node as usize] = Mark::Finished;
                stack.pop();
            }
        }
    }

    false
}

/// The `pos`-th "depends on" neighbour of `node`, counting the candidate edge
/// as the last neighbour of its dependent.
fn next_child(
    graph: &GraphModel,
    node: TaskIdx,
    pos: usize,
    candidate: (TaskIdx, TaskIdx),
) -> Option<TaskIdx> {
    let deps = graph.dependencies(node);
    if pos < deps.len() {
        Some(deps[pos])
    } else if node == candidate.0 && pos == deps.len() {
        Some(candidate.1)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskSpec;

    fn make_graph(tasks: Vec<(&str, Vec<&str>)>) -> GraphModel {
        let specs: Vec<TaskSpec> = tasks
            .into_iter()
            .map(|(id, deps)| {
                TaskSpec::new(id, id, 1, deps.into_iter().map(String::from).collect())
            })
            .collect();
        GraphModel::load(&specs).unwrap()
    }

    #[test]
    fn test_direct_cycle() {
        // b depends on a; a depending on b closes the loop
        let graph = make_graph(vec![("a", vec![]), ("b", vec!["a"])]);
        let a = graph.idx("a").unwrap();
        let b = graph.idx("b").unwrap();

        assert!(would_create_cycle(&graph, a, b));
        assert!(!would_create_cycle(&graph, b, a));
    }

    #[test]
    fn test_long_cycle() {
        // d -> c -> b -> a; a depending on d closes the loop
        let graph = make_graph(vec![
            ("a", vec![]),
            ("b", vec!["a"]),
            ("c", vec!["b"]),
            ("d", vec!["c"]),
        ]);
        let a = graph.idx("a").unwrap();
        let d = graph.idx("d").unwrap();

        assert!(would_create_cycle(&graph, a, d));
        assert_eq!(
            check_new_edge(&graph, a, d),
            Err(GraphError::Cycle {
                dependent: "a".into(),
                dependency: "d".into()
            })
        );
    }

    #[test]
    fn test_shortcut_edge_is_fine() {
        // diamond: d depends on b and c, both depend on a
        let graph = make_graph(vec![
            ("a", vec![]),
            ("b", vec!["a"]),
            ("c", vec!["a"]),
            ("d", vec!["b", "c"]),
        ]);
        let a = graph.idx("a").unwrap();
        let b = graph.idx("b").unwrap();
        let c = graph.idx("c").unwrap();
        let d = graph.idx("d").unwrap();

        assert!(!would_create_cycle(&graph, d, a));
        assert!(!would_create_cycle(&graph, c, b));
        assert!(would_create_cycle(&graph, a, d));
        assert!(check_new_edge(&graph, c, b).is_ok());
    }

    #[test]
    fn test_self_dependency_rejected_before_traversal() {
        let graph = make_graph(vec![("a", vec![])]);
        assert_eq!(
            check_new_edge(&graph, 0, 0),
            Err(GraphError::SelfDependency("a".into()))
        );
    }

    #[test]
    fn test_check_does_not_mutate() {
        let graph = make_graph(vec![("a", vec![]), ("b", vec!["a"])]);
        let before = graph.edge_count();
        let _ = check_new_edge(&graph, 0, 1);
        assert_eq!(graph.edge_count(), before);
        assert!(!graph.has_edge(0, 1));
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let n = 50_000;
        let ids: Vec<String> = (0..n).map(|i| format!("t{}", i)).collect();
        let specs: Vec<TaskSpec> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let deps = if i == 0 { vec![] } else { vec![ids[i - 1].clone()] };
                TaskSpec::new(id.clone(), id.clone(), 1, deps)
            })
            .collect();
        let graph = GraphModel::load(&specs).unwrap();

        let first = graph.idx("t0").unwrap();
        let last = graph.idx(&format!("t{}", n - 1)).unwrap();
        assert!(would_create_cycle(&graph, first, last));
        assert!(!would_create_cycle(&graph, last, first));
    }
}
