//! Selective subgraph duplication and rewiring
//!
//! This module is the crate's transformation layer:
//!
//! - [`Transformer`]: the copy engine, with pluggable per-node and per-input
//!   handlers
//! - [`CorrespondenceMap`]: original ↔ transformed registry populated by one
//!   engine run
//! - [`graph_replace`]: tensor substitution built on top of the engine
//! - [`copy`], [`copy_subgraph`], [`copy_with_input_replacements`]:
//!   convenience entry points with default handlers
//!
//! # Overview
//!
//! The engine copies a selection of nodes from a source graph into a
//! destination graph (possibly the same graph), in data-dependency order.
//! Inputs produced inside the selection are rewired to their copies; inputs
//! coming from outside go through the input handler, which by default
//! creates a placeholder carrying the original tensor's dtype and shape.
//! Control edges are connected in a second pass, because they can point
//! against data order. Every (original, transformed) pair is recorded in a
//! [`CorrespondenceMap`] returned to the caller.
//!
//! # Example
//!
//! ```ignore
//! use graft::graph::Graph;
//! use graft::transform;
//!
//! let mut imported = Graph::new();
//! let map = transform::copy(&model, &mut imported, "imported", "")?;
//!
//! // follow a node into the copy
//! let twin = map.transformed_node(node)?;
//! ```

pub mod correspondence;
pub mod engine;
pub mod replace;

pub use correspondence::{find_corresponding, find_corresponding_elem, CorrespondenceMap};

pub use engine::{
    copy, copy_node_handler, copy_subgraph, copy_with_input_replacements, keep_input_handler,
    placeholder_input_handler, InputHandlerFn, OpHandlerFn, TransformContext, Transformer,
    INTERNAL_ATTR_PREFIX,
};

pub use replace::{graph_replace, graph_replace_scoped, ReplacementMap};
