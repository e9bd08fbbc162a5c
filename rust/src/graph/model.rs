//! In-memory task graph with index-addressed adjacency.

use thiserror::Error;

use crate::interner::{TaskIdx, TaskInterner};
use crate::models::TaskSpec;

/// Structural errors raised by graph loading and mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
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
}

/// Canonical task graph.
///
/// Tasks live in parallel vectors addressed by [`TaskIdx`]. Edges are stored
/// twice: `dependencies[t]` lists what `t` waits on (in the order they were
/// added) and `dependents[d]` lists who waits on `d` (sorted by index).
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    index: TaskInterner,
    names: Vec<String>,
    durations: Vec<i64>,
    dependencies: Vec<Vec<TaskIdx>>,
    dependents: Vec<Vec<TaskIdx>>,
    edge_count: usize,
}

impl GraphModel {
    /// Build a graph from an external task list.
    ///
    /// Fails on duplicate ids, negative durations, self references and
    /// dependency ids that name no task. Repeated dependency ids collapse into
    /// one edge. Acyclicity is not checked here.
    pub fn load(tasks: &[TaskSpec]) -> Result<Self, GraphError> {
        let n = tasks.len();
        let mut graph = Self {
            index: TaskInterner::with_capacity(n),
            names: Vec::with_capacity(n),
            durations: Vec::with_capacity(n),
            dependencies: vec![Vec::new(); n],
            dependents: vec![Vec::new(); n],
            edge_count: 0,
        };

        for task in tasks {
            if task.duration_days < 0 {
                return Err(GraphError::NegativeDuration {
                    id: task.id.clone(),
                    duration: task.duration_days,
                });
            }
            if graph.index.insert(&task.id).is_none() {
                return Err(GraphError::DuplicateTask(task.id.clone()));
            }
            graph.names.push(task.name.clone());
            graph.durations.push(task.duration_days);
        }

        for (idx, task) in tasks.iter().enumerate() {
            let dependent = idx as TaskIdx;
            for dep_id in &task.dependency_ids {
                let dependency = graph.idx(dep_id)?;
                if dependency == dependent {
                    return Err(GraphError::SelfDependency(task.id.clone()));
                }
                graph.add_edge(dependent, dependency);
            }
        }

        Ok(graph)
    }

    /// Look up the index of a task id.
    pub fn idx(&self, id: &str) -> Result<TaskIdx, GraphError> {
        self.index
            .get(id)
            .ok_or_else(|| GraphError::UnknownTask(id.to_string()))
    }

    /// Id of the task at `idx`. Indices always come from this graph.
    pub fn id(&self, idx: TaskIdx) -> &str {
        &self.index.ids()[idx as usize]
    }

    pub fn name(&self, idx: TaskIdx) -> &str {
        &self.names[idx as usize]
    }

    pub fn duration(&self, idx: TaskIdx) -> i64 {
        self.durations[idx as usize]
    }

    pub fn set_duration(&mut self, idx: TaskIdx, duration: i64) {
        self.durations[idx as usize] = duration;
    }

    pub fn dependencies(&self, idx: TaskIdx) -> &[TaskIdx] {
        &self.dependencies[idx as usize]
    }

    pub fn dependents(&self, idx: TaskIdx) -> &[TaskIdx] {
        &self.dependents[idx as usize]
    }

    /// Task ids in insertion order.
    pub fn ids(&self) -> &[String] {
        self.index.ids()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn has_edge(&self, dependent: TaskIdx, dependency: TaskIdx) -> bool {
        self.dependencies[dependent as usize].contains(&dependency)
    }

    /// Record that `dependent` waits on `dependency`.
    ///
    /// Purely structural: no cycle check. Returns false if the edge already
    /// existed.
    pub fn add_edge(&mut self, dependent: TaskIdx, dependency: TaskIdx) -> bool {
        if self.has_edge(dependent, dependency) {
            return false;
        }
        self.dependencies[dependent as usize].push(dependency);
        let successors = &mut self.dependents[dependency as usize];
        let pos = successors.binary_search(&dependent).unwrap_or_else(|p| p);
        successors.insert(pos, dependent);
        self.edge_count += 1;
        true
    }

    /// Like [`add_edge`](Self::add_edge), but places `dependency` at `position`
    /// in the dependent's list (clamped to its length). Used to undo a removal
    /// without reordering [`dependencies`](Self::dependencies).
    pub fn insert_edge_at(
        &mut self,
        dependent: TaskIdx,
        dependency: TaskIdx,
        position: usize,
    ) -> bool {
        if !self.add_edge(dependent, dependency) {
            return false;
        }
        let deps = &mut self.dependencies[dependent as usize];
        let last = deps.len() - 1;
        deps[position.min(last)..].rotate_right(1);
        true
    }

    /// Drop the edge `dependent -> dependency`.
    ///
    /// Returns the position the dependency held in the dependent's list, or
    /// `None` if the edge was absent.
    pub fn remove_edge(&mut self, dependent: TaskIdx, dependency: TaskIdx) -> Option<usize> {
        let deps = &mut self.dependencies[dependent as usize];
        let pos = deps.iter().position(|&d| d == dependency)?;
        deps.remove(pos);
        let successors = &mut self.dependents[dependency as usize];
        if let Ok(idx) = successors.binary_search(&dependent) {
            successors.remove(idx);
        }
        self.edge_count -= 1;
        Some(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(id: &str, duration: i64, deps: Vec<&str>) -> TaskSpec {
        TaskSpec::new(
            id,
            format!("Task {}", id),
            duration,
            deps.into_iter().map(String::from).collect(),
        )
    }

    #[test]
    fn test_load_builds_both_directions() {
        let graph = GraphModel::load(&[
            make_task("a", 3, vec![]),
            make_task("b", 2, vec!["a"]),
            make_task("c", 4, vec!["a"]),
        ])
        .unwrap();

        let a = graph.idx("a").unwrap();
        let b = graph.idx("b").unwrap();
        let c = graph.idx("c").unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.dependencies(b), &[a]);
        assert_eq!(graph.dependents(a), &[b, c]);
        assert!(graph.has_edge(c, a));
        assert!(!graph.has_edge(a, c));
        assert_eq!(graph.name(a), "Task a");
        assert_eq!(graph.duration(c), 4);
    }

    #[test]
    fn test_load_rejects_unknown_dependency() {
        let result = GraphModel::load(&[make_task("a", 1, vec!["ghost"])]);
        assert_eq!(result.unwrap_err(), GraphError::UnknownTask("ghost".into()));
    }

    #[test]
    fn test_load_rejects_duplicate_id() {
        let result = GraphModel::load(&[make_task("a", 1, vec![]), make_task("a", 2, vec![])]);
        assert_eq!(result.unwrap_err(), GraphError::DuplicateTask("a".into()));
    }

    #[test]
    fn test_load_rejects_negative_duration() {
        let result = GraphModel::load(&[make_task("a", -1, vec![])]);
        assert_eq!(
            result.unwrap_err(),
            GraphError::NegativeDuration {
                id: "a".into(),
                duration: -1
            }
        );
    }

    #[test]
    fn test_load_rejects_self_reference() {
        let result = GraphModel::load(&[make_task("a", 1, vec!["a"])]);
        assert_eq!(result.unwrap_err(), GraphError::SelfDependency("a".into()));
    }

    #[test]
    fn test_load_collapses_repeated_dependency() {
        let graph =
            GraphModel::load(&[make_task("a", 1, vec![]), make_task("b", 1, vec!["a", "a"])])
                .unwrap();
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_add_and_remove_edge() {
        let mut graph = GraphModel::load(&[
            make_task("a", 1, vec![]),
            make_task("b", 1, vec![]),
            make_task("c", 1, vec![]),
        ])
        .unwrap();

        assert!(graph.add_edge(2, 0));
        assert!(graph.add_edge(1, 0));
        assert!(!graph.add_edge(1, 0));
        assert_eq!(graph.dependents(0), &[1, 2]);
        assert_eq!(graph.edge_count(), 2);

        assert_eq!(graph.remove_edge(2, 0), Some(0));
        assert_eq!(graph.remove_edge(2, 0), None);
        assert_eq!(graph.dependents(0), &[1]);
        assert!(graph.dependencies(2).is_empty());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_removed_edge_restored_in_place() {
        let mut graph = GraphModel::load(&[
            make_task("a", 1, vec![]),
            make_task("b", 1, vec![]),
            make_task("c", 1, vec![]),
            make_task("d", 1, vec!["a", "b", "c"]),
        ])
        .unwrap();

        let pos = graph.remove_edge(3, 1).unwrap();
        assert_eq!(pos, 1);
        assert_eq!(graph.dependencies(3), &[0, 2]);

        assert!(graph.insert_edge_at(3, 1, pos));
        assert_eq!(graph.dependencies(3), &[0, 1, 2]);
        assert_eq!(graph.dependents(1), &[3]);
        assert_eq!(graph.edge_count(), 3);

        // Already present: nothing moves
        assert!(!graph.insert_edge_at(3, 1, 0));
        assert_eq!(graph.dependencies(3), &[0, 1, 2]);
    }
}
