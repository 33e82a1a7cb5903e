//! # fstr
//!
//! **Differentiable weighted finite-state transducers for Rust.**
//!
//! fstr lets you express structured sequence losses (CTC-like, edit-distance-like,
//! lexicon-constrained) as operations on weighted graphs instead of dense tensor
//! expressions, and differentiate through them with built-in reverse-mode autodiff.
//!
//! ## Overview
//!
//! - **Graphs**: weighted directed multigraphs with start/accept flags and
//!   input/output labels on every arc. Label `0` is epsilon.
//! - **Algebra**: `negate`, `add`, `subtract`, `clone`, projections, `closure`,
//!   `sum`, `remove`, `compose`, and log-semiring `forward` scoring.
//! - **Autograd included**: every operation records its inputs and a backward
//!   function; [`autograd::backward`] propagates gradients to every arc weight.
//!
//! ## Quick Start
//!
//! ```
//! use fstr::prelude::*;
//!
//! // A three node chain accepting label 1 then label 2.
//! let g = Graph::new();
//! g.add_node(true, false);
//! g.add_node(false, false);
//! g.add_node(false, true);
//! g.add_arc(0, 1, 1, 1, 2.0f32.ln());
//! g.add_arc(1, 2, 2, 2, 3.0f32.ln());
//!
//! // Log-sum-exp over all start-to-accept path scores.
//! let score = forward(&g)?;
//! assert!((score.item()? - 6.0f32.ln()).abs() < 1e-5);
//!
//! // Gradients of the score with respect to every arc weight.
//! backward(&score)?;
//! let grads = g.grad().unwrap().weights();
//! assert!((grads[0] - 1.0).abs() < 1e-5);
//! # Ok::<(), fstr::error::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod autograd;
pub mod error;
pub mod functions;
pub mod graph;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::autograd::backward;
    pub use crate::error::{Error, Result};
    pub use crate::functions::{
        add, closure, compose, forward, log_add, negate, project_input, project_output, remove,
        remove_label, subtract, sum, Projection,
    };
    pub use crate::graph::{Graph, GraphId, Label, EPSILON};
}
