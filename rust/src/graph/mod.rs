//! Task graph: storage, cycle detection and topological ordering.
//!
//! The graph itself never decides whether an edge is allowed. Callers compose
//! [`check_new_edge`] with [`GraphModel::add_edge`], which is what the engine's
//! mutation methods do.

mod cycle;
mod model;
mod topo;

pub use cycle::{check_new_edge, would_create_cycle};
pub use model::{GraphError, GraphModel};
pub use topo::{topological_order, topological_order_where, SortError};
