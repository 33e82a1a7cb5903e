//! The graph algebra
//!
//! Free functions that build new graphs from existing ones, recording the
//! autograd linkage on every differentiable result. Inputs are never
//! mutated; results are fresh graphs whose node and arc indices are
//! deterministic functions of the inputs.

mod arithmetic;
mod closure;
mod compose;
mod forward;
mod project;
mod remove;
mod sum;

pub use arithmetic::{add, negate, subtract};
pub use closure::closure;
pub use compose::compose;
pub use forward::{forward, log_add};
pub use project::{clone, project_input, project_output, Projection};
pub use remove::{remove, remove_label};
pub use sum::sum;
