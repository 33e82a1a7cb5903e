//! Backward implementation for forward scoring

use crate::autograd::GradFn;
use crate::error::Result;
use crate::graph::Graph;
use std::collections::VecDeque;

/// Backward for log-semiring forward scoring
///
/// Saves the per-node forward scores and the scalar output. The gradient of
/// an arc is the total probability mass of the accepting paths through it,
/// scaled by the incoming delta; it flows through the same DAG in reverse
/// topological order using exponentiated score differences.
pub struct ForwardBackward {
    scores: Vec<f32>,
    output: f32,
}

impl ForwardBackward {
    /// Create a new ForwardBackward from the saved forward state
    pub fn new(scores: Vec<f32>, output: f32) -> Self {
        Self { scores, output }
    }
}

impl GradFn for ForwardBackward {
    fn backward(&self, inputs: &[Graph], deltas: &Graph) -> Result<()> {
        let input = &inputs[0];
        if !input.calc_grad() {
            return Ok(());
        }
        let delta = deltas.item()?;

        let num_nodes = input.num_nodes();
        let mut node_grads = vec![0.0f32; num_nodes];
        let mut arc_grads = vec![0.0f32; input.num_arcs()];
        let mut remaining_out: Vec<usize> = (0..num_nodes).map(|n| input.num_out(n)).collect();

        let mut queue = VecDeque::new();
        for n in input.accept_nodes() {
            node_grads[n] = delta * (self.scores[n] - self.output).exp();
            if input.num_out(n) == 0 {
                queue.push_back(n);
            }
        }

        while let Some(n) = queue.pop_front() {
            let score = self.scores[n];
            let node_grad = node_grads[n];
            for arc in input.in_arcs(n) {
                let src = input.src_node(arc);
                let arc_grad = node_grad * (input.weight(arc) + self.scores[src] - score).exp();
                arc_grads[arc] = arc_grad;
                node_grads[src] += arc_grad;
                remaining_out[src] -= 1;
                if remaining_out[src] == 0 {
                    queue.push_back(src);
                }
            }
        }

        input.add_grad_vec(arc_grads)
    }

    fn name(&self) -> &'static str {
        "ForwardBackward"
    }
}
