//! # Graft
//!
//! In-memory dataflow graph surgery.
//!
//! This crate edits computation graphs the way a text editor edits
//! buffers: nodes and tensors stay where they are, and structural changes
//! are expressed as selective copies with rewired inputs. The two central
//! operations are copying a selection of nodes between graphs (with
//! pluggable per-node behavior) and recomputing chosen tensors as if some
//! of their upstream values were different.
//!
//! ## Features
//!
//! - **Arena graphs**: nodes owned by their graph, addressed through stable
//!   copyable handles that know which graph issued them
//! - **Selective copy**: duplicate a node selection in data-dependency
//!   order, with control edges reconnected in a second pass
//! - **Tensor substitution**: `graph_replace` copies only the nodes
//!   affected by a replacement and aliases everything else
//! - **Wire-compatible attributes**: node attributes round-trip through a
//!   TensorFlow-compatible protobuf encoding
//!
//! ## Example
//!
//! ```ignore
//! use graft::prelude::*;
//! use graft::transform;
//!
//! let mut dst = Graph::new();
//! let map = transform::copy(&model, &mut dst, "imported", "")?;
//! let twin = map.transformed_node(node)?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// ============================================================================
// Module declarations
// ============================================================================

pub mod attr;
pub mod error;
pub mod graph;
pub mod naming;
pub mod proto;
pub mod transform;
pub mod tree;

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Prelude module - import commonly used types with `use graft::prelude::*`
pub mod prelude {
    pub use crate::attr::{AttrValue, Constant, TensorShape};
    pub use crate::error::{GraphError, GraphResult};
    pub use crate::graph::{
        ControlOutputs, Element, Graph, Node, NodeRef, OutputSpec, TensorRef,
    };
    pub use crate::naming::{make_placeholder, make_placeholder_from_tensor};
    pub use crate::proto::DataType;
    pub use crate::transform::{
        copy, copy_subgraph, copy_with_input_replacements, graph_replace, graph_replace_scoped,
        CorrespondenceMap, ReplacementMap, Transformer,
    };
    pub use crate::tree::Tree;
}

// ============================================================================
// Crate-level re-exports
// ============================================================================

pub use error::{GraphError, GraphResult};
pub use graph::{Graph, NodeRef, TensorRef};

// ============================================================================
// Version information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
