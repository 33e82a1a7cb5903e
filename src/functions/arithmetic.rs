//! Item-graph arithmetic

use crate::autograd::ops::{AddBackward, NegateBackward, SubtractBackward};
use crate::error::Result;
use crate::graph::Graph;
use std::rc::Rc;

/// Negate an item graph
///
/// # Errors
///
/// Returns [`crate::error::Error::InvalidOperation`] if `graph` is not an
/// item graph.
pub fn negate(graph: &Graph) -> Result<Graph> {
    let result = Graph::scalar(-graph.item()?);
    result.register_op(vec![graph.clone()], Rc::new(NegateBackward));
    Ok(result)
}

/// Add two item graphs
///
/// # Errors
///
/// Returns [`crate::error::Error::InvalidOperation`] if either input is not
/// an item graph.
pub fn add(lhs: &Graph, rhs: &Graph) -> Result<Graph> {
    let result = Graph::scalar(lhs.item()? + rhs.item()?);
    result.register_op(vec![lhs.clone(), rhs.clone()], Rc::new(AddBackward));
    Ok(result)
}

/// Subtract one item graph from another
///
/// # Errors
///
/// Returns [`crate::error::Error::InvalidOperation`] if either input is not
/// an item graph.
pub fn subtract(lhs: &Graph, rhs: &Graph) -> Result<Graph> {
    let result = Graph::scalar(lhs.item()? - rhs.item()?);
    result.register_op(vec![lhs.clone(), rhs.clone()], Rc::new(SubtractBackward));
    Ok(result)
}
