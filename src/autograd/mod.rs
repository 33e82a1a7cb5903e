//! Automatic differentiation over graph expressions
//!
//! Every operation in [`crate::functions`] records its input graph handles
//! and a backward function on its result. Together these form a DAG of graph
//! values mirroring the expression that built the result.
//!
//! The autograd system consists of:
//!
//! - [`GradFn`]: trait implemented by one backward struct per operation,
//!   each carrying the minimal state saved during the forward computation
//! - `ops`: the backward structs themselves
//! - [`backward`]: driver that walks the DAG in reverse topological order,
//!   handing each graph's accumulated deltas to its backward function
//!
//! # Example
//!
//! ```
//! use fstr::prelude::*;
//!
//! let a = Graph::scalar(2.0);
//! let b = Graph::scalar(3.0);
//!
//! let c = add(&a, &b)?;
//! assert_eq!(c.item()?, 5.0);
//!
//! backward(&c)?;
//! assert_eq!(a.grad().unwrap().item()?, 1.0);
//! assert_eq!(b.grad().unwrap().item()?, 1.0);
//! # Ok::<(), fstr::error::Error>(())
//! ```

mod backward;
mod grad_fn;
pub mod ops;

pub use backward::backward;
pub use grad_fn::GradFn;
