//! Graph sum (disjunction)

use crate::autograd::ops::SumBackward;
use crate::graph::Graph;
use std::rc::Rc;

/// The union of a list of graphs
///
/// Node and arc lists are concatenated in input order, renumbering each
/// graph's nodes by the cumulative node count. Start and accept flags are
/// preserved, so the result accepts exactly what some input accepts.
pub fn sum(graphs: &[Graph]) -> Graph {
    let result = Graph::new();
    let mut node_offset = 0;
    for graph in graphs {
        for n in 0..graph.num_nodes() {
            result.add_node(graph.is_start(n), graph.is_accept(n));
        }
        for a in 0..graph.num_arcs() {
            result.add_arc(
                node_offset + graph.src_node(a),
                node_offset + graph.dst_node(a),
                graph.ilabel(a),
                graph.olabel(a),
                graph.weight(a),
            );
        }
        node_offset += graph.num_nodes();
    }
    result.register_op(graphs.to_vec(), Rc::new(SumBackward));
    result
}
