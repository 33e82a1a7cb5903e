//! Transducer composition

use crate::autograd::ops::ComposeBackward;
use crate::graph::{Graph, EPSILON};
use std::collections::VecDeque;
use std::rc::Rc;

#[inline]
fn state_index(n1: usize, n2: usize, first: &Graph) -> usize {
    n1 + first.num_nodes() * n2
}

/// Find every paired state that can reach a pair of accepting states
///
/// Backward BFS from all accept pairs over incoming arcs. When a paired
/// match on some state already stepped over epsilon, following single-sided
/// epsilons from that same state would duplicate the path, so those are
/// only taken when no paired epsilon matched.
fn find_reachable(first: &Graph, second: &Graph) -> Vec<bool> {
    let mut reachable = vec![false; first.num_nodes() * second.num_nodes()];
    let mut to_explore = VecDeque::new();
    for f in first.accept_nodes() {
        for s in second.accept_nodes() {
            to_explore.push_back((f, s));
            reachable[state_index(f, s, first)] = true;
        }
    }

    while let Some((p, q)) = to_explore.pop_front() {
        let in_first = first.in_arcs(p);
        let in_second = second.in_arcs(q);

        let mut epsilon_matched = false;
        for &i in &in_first {
            for &j in &in_second {
                if first.olabel(i) != second.ilabel(j) {
                    continue;
                }
                epsilon_matched |= first.olabel(i) == EPSILON;
                let idx = state_index(first.src_node(i), second.src_node(j), first);
                if !reachable[idx] {
                    to_explore.push_back((first.src_node(i), second.src_node(j)));
                }
                reachable[idx] = true;
            }
        }
        if !epsilon_matched {
            for &i in &in_first {
                if first.olabel(i) != EPSILON {
                    continue;
                }
                let idx = state_index(first.src_node(i), q, first);
                if !reachable[idx] {
                    to_explore.push_back((first.src_node(i), q));
                }
                reachable[idx] = true;
            }
            for &j in &in_second {
                if second.ilabel(j) != EPSILON {
                    continue;
                }
                let idx = state_index(p, second.src_node(j), first);
                if !reachable[idx] {
                    to_explore.push_back((p, second.src_node(j)));
                }
                reachable[idx] = true;
            }
        }
    }
    reachable
}

/// Compose two transducers
///
/// An arc of the result consumes an input label of `first` and emits an
/// output label of `second`, pairing arcs whose inner labels agree. Output
/// epsilons of `first` and input epsilons of `second` advance one side
/// alone. States are pairs `(n1, n2)`; only pairs that can reach an accept
/// pair are materialized, in BFS order from the start pairs, and each
/// composed arc records the input arcs that produced it for the backward
/// pass.
///
/// If either side has no start or no accept nodes the result is empty.
pub fn compose(first: &Graph, second: &Graph) -> Graph {
    let reachable = find_reachable(first, second);

    let result = Graph::new();
    let mut new_nodes: Vec<Option<usize>> =
        vec![None; first.num_nodes() * second.num_nodes()];
    let mut to_explore: VecDeque<(usize, usize, usize)> = VecDeque::new();

    for s1 in first.start_nodes() {
        for s2 in second.start_nodes() {
            let idx = state_index(s1, s2, first);
            if reachable[idx] {
                let node =
                    result.add_node(true, first.is_accept(s1) && second.is_accept(s2));
                new_nodes[idx] = Some(node);
                to_explore.push_back((s1, s2, node));
            }
        }
    }

    // Materialize a destination pair, enqueueing it on first sight.
    let materialize = |dn1: usize,
                           dn2: usize,
                           new_nodes: &mut Vec<Option<usize>>,
                           to_explore: &mut VecDeque<(usize, usize, usize)>|
     -> usize {
        let idx = state_index(dn1, dn2, first);
        if let Some(node) = new_nodes[idx] {
            return node;
        }
        let node = result.add_node(
            first.is_start(dn1) && second.is_start(dn2),
            first.is_accept(dn1) && second.is_accept(dn2),
        );
        new_nodes[idx] = Some(node);
        to_explore.push_back((dn1, dn2, node));
        node
    };

    let mut provenance: Vec<(Option<usize>, Option<usize>)> = Vec::new();
    while let Some((p, q, current)) = to_explore.pop_front() {
        let out_first = first.out_arcs(p);
        let out_second = second.out_arcs(q);

        for &i in &out_first {
            for &j in &out_second {
                if first.olabel(i) != second.ilabel(j) {
                    continue;
                }
                let (dn1, dn2) = (first.dst_node(i), second.dst_node(j));
                if !reachable[state_index(dn1, dn2, first)] {
                    continue;
                }
                let dst = materialize(dn1, dn2, &mut new_nodes, &mut to_explore);
                result.add_arc(
                    current,
                    dst,
                    first.ilabel(i),
                    second.olabel(j),
                    first.weight(i) + second.weight(j),
                );
                provenance.push((Some(i), Some(j)));
            }
        }
        // Output epsilons in the first graph advance the first side alone.
        for &i in &out_first {
            if first.olabel(i) != EPSILON {
                continue;
            }
            let dn1 = first.dst_node(i);
            if !reachable[state_index(dn1, q, first)] {
                continue;
            }
            let dst = materialize(dn1, q, &mut new_nodes, &mut to_explore);
            result.add_arc(current, dst, first.ilabel(i), EPSILON, first.weight(i));
            provenance.push((Some(i), None));
        }
        // Input epsilons in the second graph advance the second side alone.
        for &j in &out_second {
            if second.ilabel(j) != EPSILON {
                continue;
            }
            let dn2 = second.dst_node(j);
            if !reachable[state_index(p, dn2, first)] {
                continue;
            }
            let dst = materialize(p, dn2, &mut new_nodes, &mut to_explore);
            result.add_arc(current, dst, EPSILON, second.olabel(j), second.weight(j));
            provenance.push((None, Some(j)));
        }
    }

    result.register_op(
        vec![first.clone(), second.clone()],
        Rc::new(ComposeBackward::new(provenance)),
    );
    result
}
