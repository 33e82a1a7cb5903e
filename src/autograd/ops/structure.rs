//! Backward implementations for structural operations

use crate::autograd::GradFn;
use crate::error::Result;
use crate::graph::Graph;

// ============================================================================
// CloneBackward
// ============================================================================

/// Backward for clone and the projections
///
/// The result's arcs correspond one-to-one with the input's, so deltas pass
/// through unchanged. Label rewriting does not affect gradients.
pub struct CloneBackward;

impl GradFn for CloneBackward {
    fn backward(&self, inputs: &[Graph], deltas: &Graph) -> Result<()> {
        if inputs[0].calc_grad() {
            inputs[0].add_grad(deltas)?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "CloneBackward"
    }
}

// ============================================================================
// ClosureBackward
// ============================================================================

/// Backward for Kleene closure
///
/// Arcs `0..input.num_arcs()` of the closure are the input's arcs in
/// original order; the epsilon arcs appended after them contribute nothing.
pub struct ClosureBackward;

impl GradFn for ClosureBackward {
    fn backward(&self, inputs: &[Graph], deltas: &Graph) -> Result<()> {
        if inputs[0].calc_grad() {
            let num_arcs = inputs[0].num_arcs();
            let weights = deltas.weights();
            inputs[0].add_grad_vec(weights[..num_arcs].to_vec())?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ClosureBackward"
    }
}

// ============================================================================
// SumBackward
// ============================================================================

/// Backward for graph sum (disjunction)
///
/// Each input's gradient is the slice of deltas at the arcs it contributed,
/// located by the cumulative arc offset.
pub struct SumBackward;

impl GradFn for SumBackward {
    fn backward(&self, inputs: &[Graph], deltas: &Graph) -> Result<()> {
        let weights = deltas.weights();
        let mut arc_offset = 0;
        for input in inputs {
            let num_arcs = input.num_arcs();
            if input.calc_grad() {
                input.add_grad_vec(weights[arc_offset..arc_offset + num_arcs].to_vec())?;
            }
            arc_offset += num_arcs;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "SumBackward"
    }
}
