//! Gradient function trait for the autograd tape

use crate::error::Result;
use crate::graph::Graph;

/// Trait for routing gradients during the backward pass
///
/// Each operation that participates in autograd has an associated `GradFn`
/// that knows how to turn the deltas accumulated on its output into gradient
/// contributions for its inputs.
///
/// Implementations receive the operation's recorded `inputs` (in the order
/// they were recorded) and the `deltas` graph, whose arc weights are the
/// accumulated partial derivatives with respect to the output's arcs. They
/// must call [`Graph::add_grad`] (or [`Graph::add_grad_vec`]) on every input
/// whose [`Graph::calc_grad`] flag is set, and must skip inputs whose flag
/// is clear.
pub trait GradFn {
    /// Route `deltas` back to the operation's inputs
    fn backward(&self, inputs: &[Graph], deltas: &Graph) -> Result<()>;

    /// Human-readable name for debugging
    fn name(&self) -> &'static str;
}
