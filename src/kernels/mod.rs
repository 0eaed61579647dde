//! Per-element compute kernel.
//!
//! Every output cell is one dot product of a row of A with a column of
//! B. The kernel reads its inputs, returns a value, and touches nothing
//! else, so any number of threads can run it at once on shared `&Matrix`
//! references.
//!
//! Available kernels:
//! - `dot`: naive wrapping dot product, O(k) per cell

pub mod dot;

pub use dot::compute_element;
