//! Graph ID generation for autograd DAG tracking

use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for unique graph IDs
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a graph's shared state
///
/// Used by the autograd system to visit each graph exactly once during the
/// backward pass, no matter how many handles refer to it. IDs are guaranteed
/// to be unique within a process lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GraphId(u64);

impl GraphId {
    /// Create a new unique graph ID
    #[inline]
    pub fn new() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GraphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Graph({})", self.0)
    }
}
