//! Common test utilities
#![allow(dead_code)]

use fstr::prelude::*;

/// Assert two f32 slices are element-wise close within an absolute tolerance
pub fn assert_allclose(a: &[f32], b: &[f32], tol: f32, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// A linear acceptor: nodes 0..=n, start 0, accept n, arc k labeled k+1
pub fn chain_graph(weights: &[f32]) -> Graph {
    let g = Graph::new();
    g.add_node(true, weights.is_empty());
    for (k, &w) in weights.iter().enumerate() {
        g.add_node(false, k + 1 == weights.len());
        let label = (k + 1) as Label;
        g.add_arc(k, k + 1, label, label, w);
    }
    g
}

/// The four-node diamond: two parallel two-arc paths from start to accept
pub fn diamond_graph(upper: [f32; 2], lower: [f32; 2]) -> Graph {
    let g = Graph::new();
    g.add_node(true, false);
    g.add_node(false, false);
    g.add_node(false, false);
    g.add_node(false, true);
    g.add_arc(0, 1, 1, 1, upper[0]);
    g.add_arc(0, 2, 2, 2, lower[0]);
    g.add_arc(1, 3, 1, 1, upper[1]);
    g.add_arc(2, 3, 2, 2, lower[1]);
    g
}

/// Central-difference gradient of `forward(g).item()` w.r.t. every arc weight
pub fn numerical_forward_grad(g: &Graph, step: f32) -> Vec<f32> {
    numerical_grad(g, step, |g| forward(g).unwrap().item().unwrap())
}

/// Central-difference gradient of an arbitrary scalar function of `g`
pub fn numerical_grad<F>(g: &Graph, step: f32, mut f: F) -> Vec<f32>
where
    F: FnMut(&Graph) -> f32,
{
    (0..g.num_arcs())
        .map(|a| {
            let w = g.weight(a);
            g.set_weight(a, w + step);
            let hi = f(g);
            g.set_weight(a, w - step);
            let lo = f(g);
            g.set_weight(a, w);
            (hi - lo) / (2.0 * step)
        })
        .collect()
}
