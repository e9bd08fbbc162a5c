//! Task id interning.
//!
//! Maps opaque string task ids to dense integer indices so the graph and the
//! passes can use plain vectors instead of string-keyed maps.

use rustc_hash::FxHashMap;

/// Dense task index (u32 for compact storage and fast hashing).
pub type TaskIdx = u32;

/// Bidirectional mapping between task id strings and dense indices.
///
/// Indices are handed out in insertion order, which the topological sorter
/// relies on for its tie-break.
#[derive(Debug, Clone, Default)]
pub struct TaskInterner {
    to_idx: FxHashMap<String, TaskIdx>,
    from_idx: Vec<String>,
}

impl TaskInterner {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_idx: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_idx: Vec::with_capacity(capacity),
        }
    }

    /// Register a new id. Returns `None` if the id is already registered.
    pub fn insert(&mut self, id: &str) -> Option<TaskIdx> {
        if self.to_idx.contains_key(id) {
            return None;
        }
        let idx = self.from_idx.len() as TaskIdx;
        self.from_idx.push(id.to_string());
        self.to_idx.insert(id.to_string(), idx);
        Some(idx)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<TaskIdx> {
        self.to_idx.get(id).copied()
    }

    /// Ids in insertion (index) order.
    pub fn ids(&self) -> &[String] {
        &self.from_idx
    }

    pub fn len(&self) -> usize {
        self.from_idx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_idx.is_empty()
    }
}
