//! Graph storage
//!
//! `Graph` owns its nodes in an arena (`Vec<Option<Node>>`) and hands out
//! copyable handles (`NodeRef`, `TensorRef`) instead of references. A handle
//! carries the id of its owning graph, so using it against the wrong graph
//! is a `GraphMismatch` instead of silent corruption. Removing a node
//! tombstones its slot, which keeps every other handle stable; a handle to
//! a removed node resolves to `NotFound`.
//!
//! Every structural mutation bumps a version counter, which the
//! `ControlOutputs` index uses to invalidate its cache.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::attr::{codec, AttrValue, TensorShape};
use crate::error::{GraphError, GraphResult};
use crate::proto::{AttrValueProto, DataType};

/// Operation type of placeholder nodes.
pub const PLACEHOLDER_OP: &str = "Placeholder";

/// Operation type of constant nodes; their value lives in the `value`
/// attribute.
pub const CONST_OP: &str = "Const";

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a `Graph` instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(u64);

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Handle to a node in a specific graph.
///
/// Handles order by creation order within a graph, which the engine relies
/// on for deterministic tie-breaking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef {
    pub(crate) graph: GraphId,
    pub(crate) index: u32,
}

impl NodeRef {
    /// Graph this handle belongs to.
    pub fn graph_id(&self) -> GraphId {
        self.graph
    }

    /// Handle to this node's `index`-th output tensor. Validity is checked
    /// when the tensor is resolved against its graph, not here.
    pub fn output(self, index: u32) -> TensorRef {
        TensorRef { node: self, index }
    }
}

/// Handle to one output tensor of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TensorRef {
    pub(crate) node: NodeRef,
    pub(crate) index: u32,
}

impl TensorRef {
    /// The producing node.
    pub fn node(&self) -> NodeRef {
        self.node
    }

    /// Output slot on the producing node.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Graph this handle belongs to.
    pub fn graph_id(&self) -> GraphId {
        self.node.graph
    }
}

/// Either kind of graph element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    /// A node
    Node(NodeRef),
    /// A tensor
    Tensor(TensorRef),
}

impl Element {
    /// Graph this element belongs to.
    pub fn graph_id(&self) -> GraphId {
        match self {
            Element::Node(node) => node.graph_id(),
            Element::Tensor(tensor) => tensor.graph_id(),
        }
    }

    /// This element as a node handle, or `TypeMismatch`.
    pub fn as_node(&self) -> GraphResult<NodeRef> {
        match self {
            Element::Node(node) => Ok(*node),
            Element::Tensor(tensor) => Err(GraphError::TypeMismatch {
                expected: "node",
                actual: format!("tensor {:?}", tensor),
            }),
        }
    }

    /// This element as a tensor handle, or `TypeMismatch`.
    pub fn as_tensor(&self) -> GraphResult<TensorRef> {
        match self {
            Element::Tensor(tensor) => Ok(*tensor),
            Element::Node(node) => Err(GraphError::TypeMismatch {
                expected: "tensor",
                actual: format!("node {:?}", node),
            }),
        }
    }
}

impl From<NodeRef> for Element {
    fn from(node: NodeRef) -> Self {
        Element::Node(node)
    }
}

impl From<TensorRef> for Element {
    fn from(tensor: TensorRef) -> Self {
        Element::Tensor(tensor)
    }
}

/// Static type and shape of one node output.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputSpec {
    /// Element datatype
    pub dtype: DataType,
    /// Statically known shape
    pub shape: TensorShape,
}

/// A single operation in a graph.
///
/// Nodes are only mutated through their owning `Graph`, which is what keeps
/// input references valid.
#[derive(Clone, Debug)]
pub struct Node {
    name: String,
    op_type: String,
    inputs: SmallVec<[TensorRef; 4]>,
    control_inputs: SmallVec<[NodeRef; 2]>,
    attrs: IndexMap<String, AttrValueProto>,
    outputs: Vec<OutputSpec>,
}

impl Node {
    /// Full hierarchical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operation type.
    pub fn op_type(&self) -> &str {
        &self.op_type
    }

    /// Ordered data inputs.
    pub fn inputs(&self) -> &[TensorRef] {
        &self.inputs
    }

    /// Control-dependency sources, in insertion order.
    pub fn control_inputs(&self) -> &[NodeRef] {
        &self.control_inputs
    }

    /// Attributes in wire form, insertion-ordered.
    pub fn attrs(&self) -> &IndexMap<String, AttrValueProto> {
        &self.attrs
    }

    /// One attribute in wire form.
    pub fn attr_proto(&self, name: &str) -> Option<&AttrValueProto> {
        self.attrs.get(name)
    }

    /// One attribute decoded to its native form; `Ok(None)` when absent.
    pub fn attr(&self, name: &str) -> GraphResult<Option<AttrValue>> {
        match self.attrs.get(name) {
            Some(proto) => Ok(Some(codec::decode(proto)?)),
            None => Ok(None),
        }
    }

    /// Output signatures.
    pub fn output_specs(&self) -> &[OutputSpec] {
        &self.outputs
    }

    /// Number of output tensors.
    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }
}

/// An in-memory dataflow graph with arena-owned nodes.
///
/// Not `Clone`: each instance has a distinct identity and handles are only
/// valid against the instance that issued them. Duplicating a graph is a
/// transform-level copy, not a memory copy.
#[derive(Debug)]
pub struct Graph {
    id: GraphId,
    nodes: Vec<Option<Node>>,
    by_name: FxHashMap<String, u32>,
    version: u64,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Create an empty graph with a fresh identity.
    pub fn new() -> Self {
        Graph {
            id: GraphId(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed)),
            nodes: Vec::new(),
            by_name: FxHashMap::default(),
            version: 0,
        }
    }

    /// This graph's identity.
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Mutation counter; bumped by every structural change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.by_name.len()
    }

    /// True when the graph has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Add a node with no inputs, attributes, or outputs yet.
    ///
    /// Names must be non-empty, must not contain `:` (reserved for tensor
    /// syntax), and must be unique in this graph (`DuplicateName`).
    pub fn add_node(&mut self, name: &str, op_type: &str) -> GraphResult<NodeRef> {
        if name.is_empty() {
            return Err(GraphError::InvalidInput("empty node name".to_string()));
        }
        if name.contains(':') {
            return Err(GraphError::InvalidInput(format!(
                "node name {:?} contains ':'",
                name
            )));
        }
        if self.by_name.contains_key(name) {
            return Err(GraphError::DuplicateName(name.to_string()));
        }
        let index = self.nodes.len() as u32;
        self.nodes.push(Some(Node {
            name: name.to_string(),
            op_type: op_type.to_string(),
            inputs: SmallVec::new(),
            control_inputs: SmallVec::new(),
            attrs: IndexMap::new(),
            outputs: Vec::new(),
        }));
        self.by_name.insert(name.to_string(), index);
        self.version += 1;
        Ok(NodeRef {
            graph: self.id,
            index,
        })
    }

    /// First free name derived from `base` by appending `_1`, `_2`, ...
    pub fn unique_name(&self, base: &str) -> String {
        if !self.by_name.contains_key(base) {
            return base.to_string();
        }
        let mut suffix = 1;
        loop {
            let candidate = format!("{}_{}", base, suffix);
            if !self.by_name.contains_key(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Insert or overwrite one attribute from a native value.
    pub fn add_attr(&mut self, node: NodeRef, name: &str, value: AttrValue) -> GraphResult<()> {
        let proto = codec::encode(&value)?;
        self.add_attr_proto(node, name, proto)
    }

    /// Insert or overwrite one attribute already in wire form.
    pub fn add_attr_proto(
        &mut self,
        node: NodeRef,
        name: &str,
        proto: AttrValueProto,
    ) -> GraphResult<()> {
        let slot = self.slot_mut(node)?;
        slot.attrs.insert(name.to_string(), proto);
        self.version += 1;
        Ok(())
    }

    /// Replace the ordered data-input list.
    ///
    /// Every referenced tensor is validated against this graph before
    /// anything is written.
    pub fn set_inputs(&mut self, node: NodeRef, inputs: &[TensorRef]) -> GraphResult<()> {
        self.slot(node)?;
        for &input in inputs {
            self.check_tensor(input)?;
        }
        let slot = self.slot_mut(node)?;
        slot.inputs = SmallVec::from_slice(inputs);
        self.version += 1;
        Ok(())
    }

    /// Append a control dependency if absent (set semantics).
    ///
    /// A node cannot control-depend on itself.
    pub fn add_control_input(&mut self, node: NodeRef, source: NodeRef) -> GraphResult<()> {
        if node == source {
            let name = self.slot(node)?.name.clone();
            return Err(GraphError::StructuralError(format!(
                "control input from {:?} to itself",
                name
            )));
        }
        self.slot(source)?;
        let slot = self.slot_mut(node)?;
        if slot.control_inputs.contains(&source) {
            return Ok(());
        }
        slot.control_inputs.push(source);
        self.version += 1;
        Ok(())
    }

    /// Derive the output signature from the node's op type and attributes.
    ///
    /// Placeholders read their `dtype`/`shape` attributes, constants their
    /// `value` constant; any other op gets one output whose dtype comes from
    /// a `T` attribute, else its first input, else stays unset, with unknown
    /// shape.
    pub fn infer_outputs(&mut self, node: NodeRef) -> GraphResult<()> {
        let spec = {
            let n = self.slot(node)?;
            match n.op_type.as_str() {
                PLACEHOLDER_OP => {
                    let dtype = n
                        .attr("dtype")?
                        .and_then(|v| v.as_dtype())
                        .unwrap_or(DataType::Invalid);
                    let shape = n
                        .attr("shape")?
                        .and_then(|v| v.as_shape().cloned())
                        .unwrap_or_else(TensorShape::unknown);
                    OutputSpec { dtype, shape }
                }
                CONST_OP => match n.attr("value")? {
                    Some(AttrValue::Tensor(constant)) => OutputSpec {
                        dtype: constant.dtype(),
                        shape: constant.shape(),
                    },
                    _ => OutputSpec {
                        dtype: DataType::Invalid,
                        shape: TensorShape::unknown(),
                    },
                },
                _ => {
                    let dtype = match n.attr("T")?.and_then(|v| v.as_dtype()) {
                        Some(dtype) => dtype,
                        None => match n.inputs.first() {
                            Some(&input) => self.output_spec(input)?.dtype,
                            None => DataType::Invalid,
                        },
                    };
                    OutputSpec {
                        dtype,
                        shape: TensorShape::unknown(),
                    }
                }
            }
        };
        let slot = self.slot_mut(node)?;
        slot.outputs = vec![spec];
        self.version += 1;
        Ok(())
    }

    /// Set the output signature explicitly, including arity.
    pub fn set_outputs(&mut self, node: NodeRef, outputs: Vec<OutputSpec>) -> GraphResult<()> {
        let slot = self.slot_mut(node)?;
        slot.outputs = outputs;
        self.version += 1;
        Ok(())
    }

    /// Tombstone a node: its name becomes reusable, its slot stays occupied
    /// so other handles remain stable, and any handle to it resolves to
    /// `NotFound` from now on.
    pub fn remove_node(&mut self, node: NodeRef) -> GraphResult<()> {
        let name = self.slot(node)?.name.clone();
        self.by_name.remove(&name);
        self.nodes[node.index as usize] = None;
        self.version += 1;
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Resolve a node handle.
    pub fn node(&self, node: NodeRef) -> GraphResult<&Node> {
        self.slot(node)
    }

    /// Look up a node handle by name.
    pub fn node_by_name(&self, name: &str) -> Option<NodeRef> {
        self.by_name.get(name).map(|&index| NodeRef {
            graph: self.id,
            index,
        })
    }

    /// Look up a node handle by name, failing with `NotFound`.
    pub fn find_node(&self, name: &str) -> GraphResult<NodeRef> {
        self.node_by_name(name)
            .ok_or_else(|| GraphError::NotFound(format!("node {:?}", name)))
    }

    /// Check whether a node name is in use.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Look up a tensor by `"node:i"` name; a bare `"node"` means output 0.
    pub fn find_tensor(&self, name: &str) -> GraphResult<TensorRef> {
        let (node_name, index) = match name.rsplit_once(':') {
            Some((node_name, index)) => {
                let index: u32 = index.parse().map_err(|_| {
                    GraphError::InvalidInput(format!("bad tensor index in {:?}", name))
                })?;
                (node_name, index)
            }
            None => (name, 0),
        };
        let node = self.find_node(node_name)?;
        let tensor = node.output(index);
        self.check_tensor(tensor)?;
        Ok(tensor)
    }

    /// Live node handles in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef> + '_ {
        let graph = self.id;
        self.nodes.iter().enumerate().filter_map(move |(index, slot)| {
            slot.as_ref().map(|_| NodeRef {
                graph,
                index: index as u32,
            })
        })
    }

    /// Output tensor handles of a node.
    pub fn outputs(&self, node: NodeRef) -> GraphResult<Vec<TensorRef>> {
        let n = self.slot(node)?;
        Ok((0..n.outputs.len() as u32).map(|i| node.output(i)).collect())
    }

    /// The output signature behind a tensor handle.
    pub fn output_spec(&self, tensor: TensorRef) -> GraphResult<&OutputSpec> {
        let n = self.slot(tensor.node)?;
        n.outputs.get(tensor.index as usize).ok_or_else(|| {
            GraphError::NotFound(format!("tensor {}:{}", n.name, tensor.index))
        })
    }

    /// Element datatype of a tensor.
    pub fn tensor_dtype(&self, tensor: TensorRef) -> GraphResult<DataType> {
        Ok(self.output_spec(tensor)?.dtype)
    }

    /// Statically known shape of a tensor.
    pub fn tensor_shape(&self, tensor: TensorRef) -> GraphResult<&TensorShape> {
        Ok(&self.output_spec(tensor)?.shape)
    }

    /// Render a tensor handle as `"node:i"`.
    pub fn tensor_name(&self, tensor: TensorRef) -> GraphResult<String> {
        let n = self.slot(tensor.node)?;
        if tensor.index as usize >= n.outputs.len() {
            return Err(GraphError::NotFound(format!(
                "tensor {}:{}",
                n.name, tensor.index
            )));
        }
        Ok(format!("{}:{}", n.name, tensor.index))
    }

    /// Nodes that take `tensor` as a data input, in creation order.
    ///
    /// Derived by scanning, never stored.
    pub fn consumers(&self, tensor: TensorRef) -> GraphResult<Vec<NodeRef>> {
        self.check_tensor(tensor)?;
        Ok(self
            .nodes()
            .filter(|&r| {
                self.slot(r)
                    .map(|n| n.inputs.contains(&tensor))
                    .unwrap_or(false)
            })
            .collect())
    }

    // ========================================================================
    // Internal resolution
    // ========================================================================

    fn slot(&self, node: NodeRef) -> GraphResult<&Node> {
        if node.graph != self.id {
            return Err(GraphError::GraphMismatch(format!(
                "node handle from {} used against {}",
                node.graph, self.id
            )));
        }
        self.nodes
            .get(node.index as usize)
            .and_then(Option::as_ref)
            .ok_or_else(|| GraphError::NotFound(format!("node slot {}", node.index)))
    }

    fn slot_mut(&mut self, node: NodeRef) -> GraphResult<&mut Node> {
        if node.graph != self.id {
            return Err(GraphError::GraphMismatch(format!(
                "node handle from {} used against {}",
                node.graph, self.id
            )));
        }
        self.nodes
            .get_mut(node.index as usize)
            .and_then(Option::as_mut)
            .ok_or_else(|| GraphError::NotFound(format!("node slot {}", node.index)))
    }

    pub(crate) fn check_tensor(&self, tensor: TensorRef) -> GraphResult<()> {
        let n = self.slot(tensor.node)?;
        if (tensor.index as usize) < n.outputs.len() {
            Ok(())
        } else {
            Err(GraphError::NotFound(format!(
                "tensor {}:{}",
                n.name, tensor.index
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_graph() -> (Graph, NodeRef, NodeRef, NodeRef) {
        let mut graph = Graph::new();
        let a = graph.add_node("a", PLACEHOLDER_OP).unwrap();
        graph.add_attr(a, "dtype", AttrValue::DType(DataType::Float)).unwrap();
        graph
            .add_attr(a, "shape", AttrValue::Shape(TensorShape::from_dims(&[2, 2])))
            .unwrap();
        graph.infer_outputs(a).unwrap();

        let b = graph.add_node("b", PLACEHOLDER_OP).unwrap();
        graph.add_attr(b, "dtype", AttrValue::DType(DataType::Float)).unwrap();
        graph.infer_outputs(b).unwrap();

        let add = graph.add_node("add", "Add").unwrap();
        graph.set_inputs(add, &[a.output(0), b.output(0)]).unwrap();
        graph.infer_outputs(add).unwrap();
        (graph, a, b, add)
    }

    #[test]
    fn test_add_and_resolve() {
        let (graph, a, _, add) = make_test_graph();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.node(a).unwrap().op_type(), PLACEHOLDER_OP);
        assert_eq!(graph.node(add).unwrap().inputs().len(), 2);
        assert_eq!(graph.find_node("add").unwrap(), add);
    }

    #[test]
    fn test_duplicate_name() {
        let mut graph = Graph::new();
        graph.add_node("x", "Op").unwrap();
        assert!(matches!(
            graph.add_node("x", "Op"),
            Err(GraphError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_bad_names() {
        let mut graph = Graph::new();
        assert!(graph.add_node("", "Op").is_err());
        assert!(graph.add_node("a:0", "Op").is_err());
    }

    #[test]
    fn test_unique_name() {
        let mut graph = Graph::new();
        assert_eq!(graph.unique_name("add"), "add");
        graph.add_node("add", "Add").unwrap();
        assert_eq!(graph.unique_name("add"), "add_1");
        graph.add_node("add_1", "Add").unwrap();
        assert_eq!(graph.unique_name("add"), "add_2");
    }

    #[test]
    fn test_find_tensor() {
        let (graph, a, _, add) = make_test_graph();
        assert_eq!(graph.find_tensor("a").unwrap(), a.output(0));
        assert_eq!(graph.find_tensor("a:0").unwrap(), a.output(0));
        assert_eq!(graph.find_tensor("add:0").unwrap(), add.output(0));
        assert!(matches!(
            graph.find_tensor("a:1"),
            Err(GraphError::NotFound(_))
        ));
        assert!(matches!(
            graph.find_tensor("a:x"),
            Err(GraphError::InvalidInput(_))
        ));
        assert!(matches!(
            graph.find_tensor("missing"),
            Err(GraphError::NotFound(_))
        ));
    }

    #[test]
    fn test_tensor_name() {
        let (graph, a, _, _) = make_test_graph();
        assert_eq!(graph.tensor_name(a.output(0)).unwrap(), "a:0");
        assert!(graph.tensor_name(a.output(3)).is_err());
    }

    #[test]
    fn test_graph_mismatch() {
        let (graph, a, _, _) = make_test_graph();
        let mut other = Graph::new();
        let x = other.add_node("x", "Op").unwrap();
        assert!(matches!(
            graph.node(x),
            Err(GraphError::GraphMismatch(_))
        ));
        assert!(matches!(
            other.set_inputs(x, &[a.output(0)]),
            Err(GraphError::GraphMismatch(_))
        ));
    }

    #[test]
    fn test_control_inputs() {
        let (mut graph, a, b, add) = make_test_graph();
        graph.add_control_input(add, a).unwrap();
        graph.add_control_input(add, a).unwrap(); // duplicate is a no-op
        graph.add_control_input(add, b).unwrap();
        assert_eq!(graph.node(add).unwrap().control_inputs(), &[a, b]);
        assert!(matches!(
            graph.add_control_input(add, add),
            Err(GraphError::StructuralError(_))
        ));
    }

    #[test]
    fn test_version_advances() {
        let (mut graph, a, _, add) = make_test_graph();
        let mut last = graph.version();
        graph.add_attr(add, "T", AttrValue::DType(DataType::Float)).unwrap();
        assert!(graph.version() > last);
        last = graph.version();
        graph.add_control_input(add, a).unwrap();
        assert!(graph.version() > last);
        last = graph.version();
        graph.remove_node(add).unwrap();
        assert!(graph.version() > last);
    }

    #[test]
    fn test_remove_node() {
        let (mut graph, a, b, add) = make_test_graph();
        graph.remove_node(add).unwrap();
        assert!(matches!(graph.node(add), Err(GraphError::NotFound(_))));
        assert_eq!(graph.node_count(), 2);
        // other handles stay valid, and the name frees up
        assert_eq!(graph.node(a).unwrap().name(), "a");
        assert_eq!(graph.node(b).unwrap().name(), "b");
        assert!(!graph.contains("add"));
        graph.add_node("add", "Add").unwrap();
    }

    #[test]
    fn test_infer_outputs_placeholder() {
        let (graph, a, b, _) = make_test_graph();
        let spec = graph.output_spec(a.output(0)).unwrap();
        assert_eq!(spec.dtype, DataType::Float);
        assert_eq!(spec.shape, TensorShape::from_dims(&[2, 2]));
        // no shape attribute means unknown shape
        assert_eq!(
            graph.tensor_shape(b.output(0)).unwrap(),
            &TensorShape::unknown()
        );
    }

    #[test]
    fn test_infer_outputs_const() {
        let mut graph = Graph::new();
        let c = graph.add_node("c", CONST_OP).unwrap();
        let value = crate::attr::Constant::I64(ndarray::arr1(&[1i64, 2, 3]).into_dyn());
        graph.add_attr(c, "value", AttrValue::Tensor(value)).unwrap();
        graph.infer_outputs(c).unwrap();
        let spec = graph.output_spec(c.output(0)).unwrap();
        assert_eq!(spec.dtype, DataType::Int64);
        assert_eq!(spec.shape, TensorShape::from_dims(&[3]));
    }

    #[test]
    fn test_infer_outputs_propagates_dtype() {
        let (graph, _, _, add) = make_test_graph();
        // "add" has no T attribute; dtype comes from its first input
        assert_eq!(
            graph.tensor_dtype(add.output(0)).unwrap(),
            DataType::Float
        );
    }

    #[test]
    fn test_infer_outputs_t_attr() {
        let mut graph = Graph::new();
        let n = graph.add_node("n", "Cast").unwrap();
        graph.add_attr(n, "T", AttrValue::DType(DataType::Int32)).unwrap();
        graph.infer_outputs(n).unwrap();
        assert_eq!(graph.tensor_dtype(n.output(0)).unwrap(), DataType::Int32);
    }

    #[test]
    fn test_attr_round_trip() {
        let (mut graph, _, _, add) = make_test_graph();
        graph
            .add_attr(add, "label", AttrValue::Str("sum".to_string()))
            .unwrap();
        let node = graph.node(add).unwrap();
        assert_eq!(
            node.attr("label").unwrap(),
            Some(AttrValue::Str("sum".to_string()))
        );
        assert_eq!(node.attr("missing").unwrap(), None);
    }

    #[test]
    fn test_consumers() {
        let (graph, a, _, add) = make_test_graph();
        assert_eq!(graph.consumers(a.output(0)).unwrap(), vec![add]);
        assert!(graph.consumers(add.output(0)).unwrap().is_empty());
    }

    #[test]
    fn test_nodes_iteration_order() {
        let (mut graph, _, _, add) = make_test_graph();
        let names: Vec<String> = graph
            .nodes()
            .map(|r| graph.node(r).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b", "add"]);
        graph.remove_node(add).unwrap();
        assert_eq!(graph.nodes().count(), 2);
    }

    #[test]
    fn test_set_outputs_multi() {
        let mut graph = Graph::new();
        let n = graph.add_node("split", "Split").unwrap();
        graph
            .set_outputs(
                n,
                vec![
                    OutputSpec {
                        dtype: DataType::Float,
                        shape: TensorShape::unknown(),
                    },
                    OutputSpec {
                        dtype: DataType::Float,
                        shape: TensorShape::unknown(),
                    },
                ],
            )
            .unwrap();
        assert_eq!(graph.outputs(n).unwrap().len(), 2);
        assert_eq!(graph.tensor_name(n.output(1)).unwrap(), "split:1");
    }
}
