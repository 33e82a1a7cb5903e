//! Backward pass driver

use crate::error::{Error, Result};
use crate::graph::{Graph, GraphId};
use std::collections::HashSet;

/// Compute gradients via reverse-mode automatic differentiation
///
/// Starting from a scalar (item) graph, seeds its gradient with the unit
/// item graph, then walks the recorded-input DAG in reverse topological
/// order, invoking each graph's backward function with its accumulated
/// deltas. Graphs referenced through multiple handles are visited once.
///
/// Inputs whose [`Graph::calc_grad`] flag is clear receive no gradient
/// writes; their subtrees are still traversed.
///
/// # Errors
///
/// Returns [`Error::InvalidOperation`] if `root` is not an item graph or
/// does not track gradients. Errors from individual backward functions
/// propagate out unchanged.
pub fn backward(root: &Graph) -> Result<()> {
    root.item()?;
    if !root.calc_grad() {
        return Err(Error::invalid_operation(
            "backward",
            "root graph does not track gradients",
        ));
    }
    root.add_grad(&Graph::scalar(1.0))?;

    for graph in reverse_topological_order(root) {
        if !graph.calc_grad() {
            continue;
        }
        let Some((inputs, grad_fn)) = graph.autograd_record() else {
            continue;
        };
        let Some(deltas) = graph.grad() else {
            continue;
        };
        grad_fn.backward(&inputs, &deltas)?;
    }
    Ok(())
}

/// Order the autograd DAG so every graph appears before all of its inputs
///
/// Iterative depth-first post-order over recorded inputs, reversed. Each
/// shared state is visited once regardless of how many handles refer to it.
fn reverse_topological_order(root: &Graph) -> Vec<Graph> {
    let mut visited: HashSet<GraphId> = HashSet::new();
    let mut order = Vec::new();
    let mut stack = vec![(root.clone(), false)];

    while let Some((graph, expanded)) = stack.pop() {
        if expanded {
            order.push(graph);
            continue;
        }
        if !visited.insert(graph.id()) {
            continue;
        }
        stack.push((graph.clone(), true));
        if let Some(inputs) = graph.autograd_inputs() {
            for input in inputs {
                stack.push((input, false));
            }
        }
    }

    order.reverse();
    order
}
