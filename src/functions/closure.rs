//! Kleene closure

use crate::autograd::ops::ClosureBackward;
use crate::graph::{Graph, EPSILON};
use std::rc::Rc;

/// The Kleene-star acceptor of a graph
///
/// Node 0 of the result is a fresh node that is both start and accept;
/// original node `k` becomes node `k + 1` keeping its accept flag. The
/// original arcs are re-emitted first, in order, so arc indices
/// `0..graph.num_arcs()` correspond positionally to the input. Epsilon arcs
/// then connect the new start to every original start, and every original
/// accept back to every original start.
pub fn closure(graph: &Graph) -> Graph {
    let result = Graph::new();
    result.add_node(true, true);
    for n in 0..graph.num_nodes() {
        result.add_node(false, graph.is_accept(n));
    }
    for a in 0..graph.num_arcs() {
        result.add_arc(
            graph.src_node(a) + 1,
            graph.dst_node(a) + 1,
            graph.ilabel(a),
            graph.olabel(a),
            graph.weight(a),
        );
    }
    for s in graph.start_nodes() {
        result.add_arc(0, s + 1, EPSILON, EPSILON, 0.0);
        for t in graph.accept_nodes() {
            result.add_arc(t + 1, s + 1, EPSILON, EPSILON, 0.0);
        }
    }
    result.register_op(vec![graph.clone()], Rc::new(ClosureBackward));
    result
}
