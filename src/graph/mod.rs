//! Graph storage and structural indexes
//!
//! This module provides the storage layer the transform engine operates on:
//!
//! - [`Graph`]: arena-owned nodes addressed by copyable handles
//! - [`NodeRef`] / [`TensorRef`] / [`Element`]: graph-tagged handles
//! - [`ControlOutputs`]: version-cached reverse control-edge index
//! - `traversal`: crate-internal reachability walks and ordering
//!
//! # Overview
//!
//! A `Graph` is the single owner of its nodes; everything else refers to
//! them through handles that carry the owning graph's id. Handle misuse
//! surfaces as `GraphMismatch` or `NotFound` at resolution time rather than
//! undefined behavior, and mutation goes through the graph so input lists
//! always point at real tensors.
//!
//! # Example
//!
//! ```ignore
//! use graft::graph::Graph;
//! use graft::attr::AttrValue;
//! use graft::proto::DataType;
//!
//! let mut graph = Graph::new();
//! let x = graph.add_node("x", "Placeholder")?;
//! graph.add_attr(x, "dtype", AttrValue::DType(DataType::Float))?;
//! graph.infer_outputs(x)?;
//!
//! let neg = graph.add_node("neg", "Neg")?;
//! graph.set_inputs(neg, &[x.output(0)])?;
//! graph.infer_outputs(neg)?;
//! ```

pub mod control;
pub mod core;
pub(crate) mod traversal;

// Re-export main types
pub use control::ControlOutputs;
pub use self::core::{
    Element, Graph, GraphId, Node, NodeRef, OutputSpec, TensorRef, CONST_OP, PLACEHOLDER_OP,
};
