//! Label removal with short-circuiting

use crate::graph::{Graph, Label};
use std::collections::{HashSet, VecDeque};

/// Remove arcs matching a single label on both channels
///
/// `remove_label(g, l)` is `remove(g, l, l)`. With [`crate::graph::EPSILON`]
/// this is epsilon-removal.
pub fn remove_label(graph: &Graph, label: Label) -> Graph {
    remove(graph, label, label)
}

/// Remove arcs whose label pair matches, short-circuiting through them
///
/// A node survives iff it is a start node or has at least one incoming arc
/// that does not match; in particular, non-start nodes reachable only
/// through matching arcs are dropped. For each kept node, a reachability
/// walk over matching arcs re-roots every non-matching arc found along the
/// way at the kept node, and marks it accepting if the walk touches an
/// accept node (including the kept node itself).
///
/// Weights on all arcs of the result are zero: scores along removed chains
/// are dropped. The result carries no backward function.
pub fn remove(graph: &Graph, ilabel: Label, olabel: Label) -> Graph {
    let matches = |a: usize| graph.ilabel(a) == ilabel && graph.olabel(a) == olabel;

    let result = Graph::new();
    let mut node_map: Vec<Option<usize>> = vec![None; graph.num_nodes()];
    for n in 0..graph.num_nodes() {
        let keep = graph.is_start(n) || graph.in_arcs(n).iter().any(|&a| !matches(a));
        if keep {
            node_map[n] = Some(result.add_node(graph.is_start(n), false));
        }
    }

    let mut to_explore = VecDeque::new();
    let mut reachable = HashSet::new();
    for n in 0..graph.num_nodes() {
        let Some(kept) = node_map[n] else {
            continue;
        };
        to_explore.push_back(n);
        reachable.insert(n);
        while let Some(next) = to_explore.pop_front() {
            if graph.is_accept(next) {
                result.make_accept(kept);
            }
            for a in graph.out_arcs(next) {
                let dn = graph.dst_node(a);
                if matches(a) {
                    if reachable.insert(dn) {
                        to_explore.push_back(dn);
                    }
                } else if let Some(mapped) = node_map[dn] {
                    // Non-matching arcs always lead to kept nodes.
                    result.add_arc(kept, mapped, graph.ilabel(a), graph.olabel(a), 0.0);
                }
            }
        }
        reachable.clear();
    }
    result
}
