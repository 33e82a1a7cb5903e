//! Graph value type and construction
//!
//! A [`Graph`] is a handle to a weighted directed multigraph with labeled
//! nodes (start/accept flags) and labeled arcs (input label, output label,
//! weight). Handles are value-like: copying a handle shares the underlying
//! graph state, including the gradient accumulator.

mod core;
mod id;

pub use self::core::{Graph, Label, EPSILON};
pub use self::id::GraphId;
