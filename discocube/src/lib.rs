//! Idiomatic Rust representations of discocube graphs: the adjacency graphs of the
//! 3D point sets obtained by accreting unit cubes around the origin in octahedral
//! shells.
//!
//! This crate owns everything that is fixed once an order is chosen - the vertex
//! table, the index map, adjacency, edge adjacency, node weights and the
//! z-stratification - and performs no solving of its own.

#![deny(clippy::all)]
#![deny(rustdoc::broken_intra_doc_links)]

mod graph;
mod order;
mod point;

// Re-export useful data types into the top level of the crate
pub use graph::{Edge, Graph, GraphError, NodeIdx, NodeVec, Strata};
pub use order::Order;
pub use point::{Point2, Point3};
