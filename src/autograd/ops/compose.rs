//! Backward implementation for composition

use crate::autograd::GradFn;
use crate::error::Result;
use crate::graph::Graph;

/// Backward for composition
///
/// Saves one provenance entry per composed arc: the pair of input-arc
/// indices that produced it, with `None` marking the side a single-sided
/// epsilon step did not advance. Routing deltas through provenance
/// disambiguates composed arcs that share endpoints and labels.
pub struct ComposeBackward {
    provenance: Vec<(Option<usize>, Option<usize>)>,
}

impl ComposeBackward {
    /// Create a new ComposeBackward from the construction-order provenance
    pub fn new(provenance: Vec<(Option<usize>, Option<usize>)>) -> Self {
        Self { provenance }
    }
}

impl GradFn for ComposeBackward {
    fn backward(&self, inputs: &[Graph], deltas: &Graph) -> Result<()> {
        let calc_first = inputs[0].calc_grad();
        let calc_second = inputs[1].calc_grad();
        if !(calc_first || calc_second) {
            return Ok(());
        }

        let mut grad_first = vec![0.0f32; inputs[0].num_arcs()];
        let mut grad_second = vec![0.0f32; inputs[1].num_arcs()];
        for (arc, &(i, j)) in self.provenance.iter().enumerate() {
            let arc_grad = deltas.weight(arc);
            if let Some(i) = i {
                grad_first[i] += arc_grad;
            }
            if let Some(j) = j {
                grad_second[j] += arc_grad;
            }
        }

        if calc_first {
            inputs[0].add_grad_vec(grad_first)?;
        }
        if calc_second {
            inputs[1].add_grad_vec(grad_second)?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ComposeBackward"
    }
}
