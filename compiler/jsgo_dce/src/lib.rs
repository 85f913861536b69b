//! Dead-code elimination over declarations.
//!
//! Code generation records an edge every time emitting one declaration
//! references another. After generation, the graph is closed over
//! reachability from the program's entry points and everything not reached
//! is left out of the output.
//!
//! # Algorithm
//!
//! Emitting a declaration can reference instances that have not been
//! emitted yet, so reachability and emission are interleaved:
//!
//! 1. Compute the set reachable from the entry points.
//! 2. Expand (emit) every reachable node not expanded before, which may add
//!    edges and nodes.
//! 3. Repeat until a pass expands nothing.
//!
//! Node keys are generic; the naming layer keys nodes by instance.

mod graph;

pub use graph::{DepGraph, Pruned};
