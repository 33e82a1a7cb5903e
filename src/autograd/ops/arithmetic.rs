//! Backward implementations for item-graph arithmetic

use crate::autograd::GradFn;
use crate::error::Result;
use crate::functions::negate;
use crate::graph::Graph;

// ============================================================================
// NegateBackward
// ============================================================================

/// Backward for negation: z = -a
///
/// dL/da = -dL/dz
pub struct NegateBackward;

impl GradFn for NegateBackward {
    fn backward(&self, inputs: &[Graph], deltas: &Graph) -> Result<()> {
        if inputs[0].calc_grad() {
            inputs[0].add_grad(&negate(deltas)?)?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "NegateBackward"
    }
}

// ============================================================================
// AddBackward
// ============================================================================

/// Backward for item addition: z = a + b
///
/// dL/da = dL/dz and dL/db = dL/dz (pass through)
pub struct AddBackward;

impl GradFn for AddBackward {
    fn backward(&self, inputs: &[Graph], deltas: &Graph) -> Result<()> {
        if inputs[0].calc_grad() {
            inputs[0].add_grad(deltas)?;
        }
        if inputs[1].calc_grad() {
            inputs[1].add_grad(deltas)?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "AddBackward"
    }
}

// ============================================================================
// SubtractBackward
// ============================================================================

/// Backward for item subtraction: z = a - b
///
/// dL/da = dL/dz and dL/db = -dL/dz
pub struct SubtractBackward;

impl GradFn for SubtractBackward {
    fn backward(&self, inputs: &[Graph], deltas: &Graph) -> Result<()> {
        if inputs[0].calc_grad() {
            inputs[0].add_grad(deltas)?;
        }
        if inputs[1].calc_grad() {
            inputs[1].add_grad(&negate(deltas)?)?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "SubtractBackward"
    }
}
