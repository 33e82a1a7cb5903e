//! Integration tests for forward scoring and the backward driver
//!
//! Covers log-semiring scoring, cycle detection, gradient propagation
//! through the autograd DAG, and finite-difference verification.

mod common;

use fstr::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// Forward Tests
// ============================================================================

#[test]
fn test_forward_chain() {
    let g = common::chain_graph(&[2.0f32.ln(), 3.0f32.ln()]);

    let score = forward(&g).unwrap();
    assert!((score.item().unwrap() - 6.0f32.ln()).abs() < 1e-5);

    backward(&score).unwrap();
    common::assert_allclose(&g.grad().unwrap().weights(), &[1.0, 1.0], 1e-5, "chain grads");
}

#[test]
fn test_forward_diamond() {
    let g = common::diamond_graph([0.0, 1.0f32.ln()], [0.0, 3.0f32.ln()]);

    let score = forward(&g).unwrap();
    assert!((score.item().unwrap() - 4.0f32.ln()).abs() < 1e-5);

    backward(&score).unwrap();
    common::assert_allclose(
        &g.grad().unwrap().weights(),
        &[0.25, 0.75, 0.25, 0.75],
        1e-5,
        "diamond grads",
    );
}

#[test]
fn test_forward_single_node() {
    // The empty path from a node that is both start and accept scores 0.
    let g = Graph::new();
    g.add_node(true, true);

    let score = forward(&g).unwrap();
    assert_eq!(score.item().unwrap(), 0.0);
}

#[test]
fn test_forward_multiple_starts_and_accepts() {
    let g = Graph::new();
    g.add_node(true, false);
    g.add_node(true, false);
    g.add_node(false, true);
    g.add_node(false, true);
    g.add_arc(0, 2, 1, 1, 1.0f32.ln());
    g.add_arc(1, 3, 2, 2, 2.0f32.ln());

    let score = forward(&g).unwrap();
    assert!((score.item().unwrap() - 3.0f32.ln()).abs() < 1e-5);
}

#[test]
fn test_forward_cycle_detected() {
    let g = Graph::new();
    g.add_node(true, false);
    g.add_node(false, false);
    g.add_node(false, true);
    g.add_arc(0, 1, 1, 1, 0.0);
    g.add_arc(1, 0, 1, 1, 0.0);
    g.add_arc(1, 2, 1, 1, 0.0);

    assert!(matches!(forward(&g), Err(Error::CycleDetected)));
}

#[test]
fn test_forward_self_loop_detected() {
    let g = Graph::new();
    g.add_node(true, false);
    g.add_node(false, true);
    g.add_arc(0, 1, 1, 1, 0.0);
    g.add_arc(1, 1, 1, 1, 0.0);

    assert!(matches!(forward(&g), Err(Error::CycleDetected)));
}

#[test]
fn test_forward_disconnected_accept_detected() {
    // The accept node is fed only by a node no start can reach.
    let g = Graph::new();
    g.add_node(true, false);
    g.add_node(false, false);
    g.add_node(false, true);
    g.add_arc(1, 2, 1, 1, 0.0);

    assert!(matches!(forward(&g), Err(Error::CycleDetected)));
}

// ============================================================================
// Backward Driver Tests
// ============================================================================

#[test]
fn test_backward_requires_item_root() {
    let g = common::chain_graph(&[0.1, 0.2]);
    assert!(matches!(backward(&g), Err(Error::InvalidOperation { .. })));
}

#[test]
fn test_backward_requires_tracked_root() {
    let a = Graph::scalar(1.0);
    a.set_calc_grad(false);
    let b = Graph::scalar(2.0);
    b.set_calc_grad(false);

    let c = add(&a, &b).unwrap();
    assert!(!c.calc_grad());
    assert!(matches!(backward(&c), Err(Error::InvalidOperation { .. })));
}

#[test]
fn test_backward_shared_input_accumulates() {
    let a = Graph::scalar(2.0);

    // a feeds the result twice; its gradient is the sum of both paths.
    let c = add(&a, &a).unwrap();
    assert_eq!(c.item().unwrap(), 4.0);

    backward(&c).unwrap();
    assert_eq!(a.grad().unwrap().weights(), vec![2.0]);
}

#[test]
fn test_backward_cancelling_paths() {
    let a = Graph::scalar(2.0);

    // c = -a + a: gradients -1 and +1 cancel.
    let c = add(&negate(&a).unwrap(), &a).unwrap();
    assert_eq!(c.item().unwrap(), 0.0);

    backward(&c).unwrap();
    assert_eq!(a.grad().unwrap().weights(), vec![0.0]);
}

#[test]
fn test_backward_calc_grad_gating() {
    let a = Graph::scalar(1.0);
    let b = Graph::scalar(2.0);
    b.set_calc_grad(false);

    let c = add(&a, &b).unwrap();
    backward(&c).unwrap();

    assert_eq!(a.grad().unwrap().weights(), vec![1.0]);
    assert!(b.grad().is_none());
}

#[test]
fn test_backward_deep_expression() {
    // d = (a + b) - (-c) computed through three tape levels.
    let a = Graph::scalar(1.0);
    let b = Graph::scalar(2.0);
    let c = Graph::scalar(3.0);

    let d = subtract(&add(&a, &b).unwrap(), &negate(&c).unwrap()).unwrap();
    assert_eq!(d.item().unwrap(), 6.0);

    backward(&d).unwrap();
    assert_eq!(a.grad().unwrap().weights(), vec![1.0]);
    assert_eq!(b.grad().unwrap().weights(), vec![1.0]);
    assert_eq!(c.grad().unwrap().weights(), vec![1.0]);
}

// ============================================================================
// Numerical Gradient Tests
// ============================================================================

#[test]
fn test_gradcheck_chain() {
    let g = common::chain_graph(&[0.3, -0.2, 0.5]);

    let score = forward(&g).unwrap();
    backward(&score).unwrap();

    let numeric = common::numerical_forward_grad(&g, 1e-3);
    common::assert_allclose(&g.grad().unwrap().weights(), &numeric, 1e-3, "chain gradcheck");
}

#[test]
fn test_gradcheck_diamond() {
    let g = common::diamond_graph([0.25, -0.5], [0.75, 0.1]);

    let score = forward(&g).unwrap();
    backward(&score).unwrap();

    let numeric = common::numerical_forward_grad(&g, 1e-3);
    common::assert_allclose(
        &g.grad().unwrap().weights(),
        &numeric,
        1e-3,
        "diamond gradcheck",
    );
}

#[test]
fn test_gradcheck_random_dags() {
    let mut rng = StdRng::seed_from_u64(17);

    for trial in 0..5 {
        let num_nodes = 6;
        let g = Graph::new();
        g.add_node(true, false);
        for n in 1..num_nodes {
            g.add_node(false, n == num_nodes - 1);
        }
        // A spine keeps the accept node reachable; extra forward arcs stay
        // acyclic because sources precede destinations.
        for n in 0..num_nodes - 1 {
            g.add_arc(n, n + 1, 1, 1, rng.gen_range(-1.0..1.0));
        }
        for _ in 0..6 {
            let src = rng.gen_range(0..num_nodes - 1);
            let dst = rng.gen_range(src + 1..num_nodes);
            g.add_arc(src, dst, 1, 1, rng.gen_range(-1.0..1.0));
        }

        let score = forward(&g).unwrap();
        backward(&score).unwrap();

        let numeric = common::numerical_forward_grad(&g, 1e-3);
        common::assert_allclose(
            &g.grad().unwrap().weights(),
            &numeric,
            1e-3,
            &format!("random dag gradcheck, trial {}", trial),
        );
    }
}

#[test]
fn test_gradcheck_closure_through_compose() {
    // A one-arc acceptor under closure, constrained by a two-symbol chain:
    // the star arc is used twice, so its gradient accumulates both uses.
    let a = Graph::new();
    a.add_node(true, false);
    a.add_node(false, true);
    a.add_arc(0, 1, 1, 1, 0.3);

    let star = closure(&a);

    let two_ones = || {
        let path = Graph::new();
        path.add_node(true, false);
        path.add_node(false, false);
        path.add_node(false, true);
        path.add_arc(0, 1, 1, 1, 0.0);
        path.add_arc(1, 2, 1, 1, 0.0);
        path
    };
    let constrained = compose(&star, &two_ones());

    let score = forward(&constrained).unwrap();
    assert!((score.item().unwrap() - 0.6).abs() < 1e-5);

    backward(&score).unwrap();

    let numeric = common::numerical_grad(&a, 1e-3, |g| {
        let c = compose(&closure(g), &two_ones());
        forward(&c).unwrap().item().unwrap()
    });
    common::assert_allclose(
        &a.grad().unwrap().weights(),
        &numeric,
        1e-3,
        "closure gradcheck",
    );
    common::assert_allclose(&a.grad().unwrap().weights(), &[2.0], 1e-3, "star arc used twice");
}

// ============================================================================
// Log-Add Tests
// ============================================================================

#[test]
fn test_log_add_commutes_and_associates() {
    let values = [(-0.5f32, 1.25f32, 3.0f32), (2.0, 2.0, -4.0), (0.0, 10.0, -10.0)];
    for (a, b, c) in values {
        assert!((log_add(a, b) - log_add(b, a)).abs() < 1e-6);
        assert!((log_add(log_add(a, b), c) - log_add(a, log_add(b, c))).abs() < 1e-5);
    }
}

#[test]
fn test_log_add_neg_infinity_identity() {
    assert_eq!(log_add(f32::NEG_INFINITY, 2.5), 2.5);
    assert_eq!(log_add(2.5, f32::NEG_INFINITY), 2.5);
}
