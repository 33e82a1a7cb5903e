//! Copying and label projection

use crate::autograd::ops::CloneBackward;
use crate::graph::Graph;
use std::rc::Rc;

/// Which label channel a [`clone`] keeps
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Projection {
    /// Keep both label channels
    None,
    /// Copy the input label into both channels
    Input,
    /// Copy the output label into both channels
    Output,
}

/// Copy a graph, optionally projecting onto one label channel
///
/// Nodes are copied preserving flags and order; arcs preserving order and
/// weights. With [`Projection::Input`] the result is the acceptor over input
/// labels, with [`Projection::Output`] the acceptor over output labels.
pub fn clone(graph: &Graph, projection: Projection) -> Graph {
    let result = Graph::new();
    for n in 0..graph.num_nodes() {
        result.add_node(graph.is_start(n), graph.is_accept(n));
    }
    for a in 0..graph.num_arcs() {
        let ilabel = match projection {
            Projection::Output => graph.olabel(a),
            _ => graph.ilabel(a),
        };
        let olabel = match projection {
            Projection::Input => graph.ilabel(a),
            _ => graph.olabel(a),
        };
        result.add_arc(graph.src_node(a), graph.dst_node(a), ilabel, olabel, graph.weight(a));
    }
    result.register_op(vec![graph.clone()], Rc::new(CloneBackward));
    result
}

/// The acceptor over input labels
pub fn project_input(graph: &Graph) -> Graph {
    clone(graph, Projection::Input)
}

/// The acceptor over output labels
pub fn project_output(graph: &Graph) -> Graph {
    clone(graph, Projection::Output)
}
