//! Log-semiring forward scoring

use crate::autograd::ops::ForwardBackward;
use crate::error::{Error, Result};
use crate::graph::{Graph, EPSILON};
use std::collections::VecDeque;
use std::rc::Rc;

/// Numerically stable log(exp(a) + exp(b))
///
/// `f32::NEG_INFINITY` is the additive identity: `log_add(-inf, x) == x`.
pub fn log_add(a: f32, b: f32) -> f32 {
    if a == f32::NEG_INFINITY {
        return b;
    }
    if b == f32::NEG_INFINITY {
        return a;
    }
    a.max(b) + (-(a - b).abs()).exp().ln_1p()
}

/// Reduce a DAG to the log-sum-exp of all start-to-accept path scores
///
/// A path's score is the sum of its arc weights. Scoring is a Kahn-style
/// topological walk accumulating `log_add` at every node, so the graph must
/// be acyclic. The result is an item graph carrying the scalar; its
/// backward uses the saved per-node scores.
///
/// # Errors
///
/// Returns [`Error::CycleDetected`] if an accept node still has unresolved
/// in-degree after the walk: the graph has a cycle, a self-loop, or an
/// accept node unreachable from any start.
pub fn forward(graph: &Graph) -> Result<Graph> {
    let num_nodes = graph.num_nodes();
    let mut scores = vec![f32::NEG_INFINITY; num_nodes];
    let mut remaining_in: Vec<usize> = (0..num_nodes).map(|n| graph.num_in(n)).collect();

    let mut queue = VecDeque::new();
    for s in graph.start_nodes() {
        scores[s] = 0.0;
        if graph.num_in(s) == 0 {
            queue.push_back(s);
        }
    }

    while let Some(n) = queue.pop_front() {
        let score = scores[n];
        for a in graph.out_arcs(n) {
            let dn = graph.dst_node(a);
            scores[dn] = log_add(score + graph.weight(a), scores[dn]);
            remaining_in[dn] -= 1;
            if remaining_in[dn] == 0 {
                queue.push_back(dn);
            }
        }
    }

    // Accumulate scores at all the accept nodes.
    let mut output = f32::NEG_INFINITY;
    for a in graph.accept_nodes() {
        if remaining_in[a] > 0 {
            return Err(Error::CycleDetected);
        }
        output = log_add(output, scores[a]);
    }

    let result = Graph::new();
    result.add_node(true, false);
    result.add_node(false, true);
    result.add_arc(0, 1, EPSILON, EPSILON, output);
    result.register_op(
        vec![graph.clone()],
        Rc::new(ForwardBackward::new(scores, output)),
    );
    Ok(result)
}
