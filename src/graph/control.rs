//! Reverse control-edge index
//!
//! The graph stores only forward control-input lists. `ControlOutputs`
//! answers the reverse question (which nodes control-depend on this one)
//! and is the only way higher layers discover reverse control edges.

use rustc_hash::FxHashMap;

use super::core::{Graph, GraphId, NodeRef};
use crate::error::{GraphError, GraphResult};

/// Reverse index over control edges, cached against the graph version.
///
/// Every query refreshes first: if the graph's version differs from the one
/// the index was built at, the whole index is rebuilt from scratch
/// (whole-index invalidation, no fine-grained tracking). The cache is
/// correct only under the crate's single-writer assumption; concurrent
/// mutation during a query would need external locking around
/// refresh-and-read.
#[derive(Debug)]
pub struct ControlOutputs {
    graph: GraphId,
    version: u64,
    outputs: FxHashMap<NodeRef, Vec<NodeRef>>,
}

impl ControlOutputs {
    /// Build the index for `graph`.
    pub fn new(graph: &Graph) -> Self {
        let mut index = ControlOutputs {
            graph: graph.id(),
            version: graph.version(),
            outputs: FxHashMap::default(),
        };
        index.build(graph);
        index
    }

    /// Rebuild if the graph changed since the last build. Returns whether a
    /// rebuild happened. Fails with `GraphMismatch` for any graph other than
    /// the one the index was built for.
    pub fn refresh(&mut self, graph: &Graph) -> GraphResult<bool> {
        self.check_graph(graph)?;
        if self.version == graph.version() {
            return Ok(false);
        }
        tracing::debug!(
            from = self.version,
            to = graph.version(),
            "rebuilding control-output index"
        );
        self.build(graph);
        self.version = graph.version();
        Ok(true)
    }

    /// Nodes that control-depend on `node`, in discovery order; empty when
    /// none are recorded. Refreshes automatically before answering.
    pub fn get(&mut self, graph: &Graph, node: NodeRef) -> GraphResult<&[NodeRef]> {
        self.refresh(graph)?;
        graph.node(node)?;
        Ok(self.outputs.get(&node).map(Vec::as_slice).unwrap_or(&[]))
    }

    fn build(&mut self, graph: &Graph) {
        self.outputs.clear();
        for sink in graph.nodes() {
            if let Ok(node) = graph.node(sink) {
                for &source in node.control_inputs() {
                    let entry = self.outputs.entry(source).or_default();
                    if !entry.contains(&sink) {
                        entry.push(sink);
                    }
                }
            }
        }
    }

    fn check_graph(&self, graph: &Graph) -> GraphResult<()> {
        if graph.id() != self.graph {
            return Err(GraphError::GraphMismatch(format!(
                "control-output index built for {} queried with {}",
                self.graph,
                graph.id()
            )));
        }
        Ok(())
    }
}
