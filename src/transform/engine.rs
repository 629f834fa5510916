//! The copy engine
//!
//! [`Transformer`] copies a selection of nodes between graphs (or within
//! one graph) while a pair of pluggable handlers decides what each node and
//! each external input become. The defaults perform a structural copy:
//! [`copy_node_handler`] duplicates a node with its attributes and output
//! signature, [`placeholder_input_handler`] turns every input from outside
//! the selection into a placeholder.
//!
//! The engine runs in two passes. Pass one visits the selection in
//! data-dependency order, resolves inputs through the map built so far, and
//! invokes the node handler. Pass two connects control edges between the
//! copies, separately because control edges can run against data order
//! (loop-carrying control structures cannot be resolved node-by-node).
//!
//! There is no rollback: a failing run leaves any nodes it already created
//! in the destination graph.

use rustc_hash::FxHashSet;

use crate::error::{GraphError, GraphResult};
use crate::graph::traversal::topo_order;
use crate::graph::{ControlOutputs, Graph, Node, NodeRef, TensorRef};
use crate::naming::{
    make_placeholder, placeholder_name, rescope, scope_finalize, PLACEHOLDER_PREFIX,
};
use crate::transform::correspondence::CorrespondenceMap;
use crate::transform::replace::ReplacementMap;

/// Attributes whose names start with this prefix are implementation-private
/// and are skipped by [`copy_node_handler`].
pub const INTERNAL_ATTR_PREFIX: &str = "_";

/// Per-node callback: receives the context, the source node, and its already
/// resolved inputs; returns the replacement node plus the tensors that stand
/// in for the source node's outputs from now on.
///
/// Returning tensors of another node lets a handler splice extra processing
/// between a copied node and its downstream consumers.
pub type OpHandlerFn = dyn FnMut(
    &mut TransformContext<'_>,
    &Node,
    &[TensorRef],
) -> GraphResult<(NodeRef, Vec<TensorRef>)>;

/// Per-external-input callback: receives the context and a source tensor
/// produced outside the selection; returns the tensor to wire instead. The
/// resolution is recorded in the map, so each external tensor is resolved
/// once per run.
pub type InputHandlerFn = dyn FnMut(&mut TransformContext<'_>, TensorRef) -> GraphResult<TensorRef>;

enum GraphPair<'a> {
    Two { src: &'a Graph, dst: &'a mut Graph },
    InPlace(&'a mut Graph),
}

impl GraphPair<'_> {
    fn src(&self) -> &Graph {
        match self {
            GraphPair::Two { src, .. } => src,
            GraphPair::InPlace(graph) => graph,
        }
    }

    fn dst(&self) -> &Graph {
        match self {
            GraphPair::Two { dst, .. } => dst,
            GraphPair::InPlace(graph) => graph,
        }
    }

    fn dst_mut(&mut self) -> &mut Graph {
        match self {
            GraphPair::Two { dst, .. } => dst,
            GraphPair::InPlace(graph) => graph,
        }
    }

    fn in_place(&self) -> bool {
        matches!(self, GraphPair::InPlace(_))
    }
}

/// What a handler sees during one engine run: the graphs, the finalized
/// scopes, and the correspondence map built so far.
pub struct TransformContext<'a> {
    graphs: GraphPair<'a>,
    src_scope: String,
    dst_scope: String,
    placeholder_prefix: String,
    map: CorrespondenceMap,
}

impl TransformContext<'_> {
    /// The graph being copied from. In an in-place run this is the same
    /// graph as [`dst`](Self::dst).
    pub fn src(&self) -> &Graph {
        self.graphs.src()
    }

    /// The graph being copied into.
    pub fn dst(&self) -> &Graph {
        self.graphs.dst()
    }

    /// Mutable access to the destination graph.
    pub fn dst_mut(&mut self) -> &mut Graph {
        self.graphs.dst_mut()
    }

    /// True when source and destination are one graph.
    pub fn in_place(&self) -> bool {
        self.graphs.in_place()
    }

    /// Finalized scope stripped from source names.
    pub fn src_scope(&self) -> &str {
        &self.src_scope
    }

    /// Finalized scope prepended to destination names.
    pub fn dst_scope(&self) -> &str {
        &self.dst_scope
    }

    /// Prefix for generated placeholder names.
    pub fn placeholder_prefix(&self) -> &str {
        &self.placeholder_prefix
    }

    /// The correspondence map built so far in this run.
    pub fn map(&self) -> &CorrespondenceMap {
        &self.map
    }

    /// Remap a source node name into the destination scope, uniquified
    /// against the destination graph.
    pub fn target_name(&self, name: &str) -> GraphResult<String> {
        let renamed = rescope(name, &self.src_scope, &self.dst_scope)?;
        Ok(self.dst().unique_name(&renamed))
    }
}

/// Default node handler: structural copy.
///
/// Creates a node of the same op type under the remapped name, copies every
/// attribute except those starting with [`INTERNAL_ATTR_PREFIX`], wires the
/// resolved inputs, and replicates the output signature.
pub fn copy_node_handler(
    ctx: &mut TransformContext<'_>,
    node: &Node,
    new_inputs: &[TensorRef],
) -> GraphResult<(NodeRef, Vec<TensorRef>)> {
    let name = ctx.target_name(node.name())?;
    let new_node = ctx.dst_mut().add_node(&name, node.op_type())?;
    for (key, value) in node.attrs() {
        if key.starts_with(INTERNAL_ATTR_PREFIX) {
            continue;
        }
        ctx.dst_mut().add_attr_proto(new_node, key, value.clone())?;
    }
    ctx.dst_mut().set_inputs(new_node, new_inputs)?;
    ctx.dst_mut().set_outputs(new_node, node.output_specs().to_vec())?;
    let outputs = (0..node.num_outputs() as u32).map(|i| new_node.output(i)).collect();
    Ok((new_node, outputs))
}

/// Default input handler: stand in with a placeholder.
///
/// The placeholder lives in the destination scope and carries the source
/// tensor's dtype and shape.
pub fn placeholder_input_handler(
    ctx: &mut TransformContext<'_>,
    tensor: TensorRef,
) -> GraphResult<TensorRef> {
    let name = placeholder_name(
        Some((ctx.src(), tensor)),
        Some(ctx.dst_scope()),
        ctx.placeholder_prefix(),
    )?;
    let spec = ctx.src().output_spec(tensor)?.clone();
    let node = make_placeholder(ctx.dst_mut(), spec.dtype, spec.shape, &name)?;
    Ok(node.output(0))
}

/// Input handler for same-graph rewiring: alias the original tensor when
/// source and destination are one graph, fall back to a placeholder
/// otherwise.
pub fn keep_input_handler(
    ctx: &mut TransformContext<'_>,
    tensor: TensorRef,
) -> GraphResult<TensorRef> {
    if ctx.in_place() {
        Ok(tensor)
    } else {
        placeholder_input_handler(ctx, tensor)
    }
}

/// The copy engine.
///
/// Both handlers are public fields, so a caller can swap either
/// independently:
///
/// ```ignore
/// let mut transformer = Transformer::new();
/// transformer.input_handler = Box::new(keep_input_handler);
/// let map = transformer.transform_in_place(&mut graph, &selection, "dup", "")?;
/// ```
pub struct Transformer {
    /// Called once per selected node, in data-dependency order.
    pub op_handler: Box<OpHandlerFn>,
    /// Called once per distinct data input from outside the selection.
    pub input_handler: Box<InputHandlerFn>,
    /// Prefix for generated placeholder names.
    pub placeholder_prefix: String,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer {
    /// Engine with the default structural-copy handlers.
    pub fn new() -> Self {
        Transformer {
            op_handler: Box::new(copy_node_handler),
            input_handler: Box::new(placeholder_input_handler),
            placeholder_prefix: PLACEHOLDER_PREFIX.to_string(),
        }
    }

    /// Copy `selection` from `src` into `dst`, stripping `src_scope` from
    /// names and prepending `dst_scope`.
    ///
    /// The selection is validated against `src` before anything is written:
    /// a handle from another graph fails with `GraphMismatch`, an empty
    /// selection with `EmptyInput`. A data cycle within the selection is a
    /// `StructuralError`.
    pub fn transform(
        &mut self,
        src: &Graph,
        selection: &[NodeRef],
        dst: &mut Graph,
        dst_scope: &str,
        src_scope: &str,
    ) -> GraphResult<CorrespondenceMap> {
        self.run(GraphPair::Two { src, dst }, selection, dst_scope, src_scope)
    }

    /// [`transform`](Self::transform) with one graph as both source and
    /// destination.
    pub fn transform_in_place(
        &mut self,
        graph: &mut Graph,
        selection: &[NodeRef],
        dst_scope: &str,
        src_scope: &str,
    ) -> GraphResult<CorrespondenceMap> {
        self.run(GraphPair::InPlace(graph), selection, dst_scope, src_scope)
    }

    fn run(
        &mut self,
        graphs: GraphPair<'_>,
        selection: &[NodeRef],
        dst_scope: &str,
        src_scope: &str,
    ) -> GraphResult<CorrespondenceMap> {
        if selection.is_empty() {
            return Err(GraphError::EmptyInput("selection"));
        }
        let src = graphs.src();
        for &node in selection {
            src.node(node)?;
        }
        let order = topo_order(src, selection)?;
        let selected: FxHashSet<NodeRef> = order.iter().copied().collect();
        let mut index = ControlOutputs::new(graphs.src());

        let mut ctx = TransformContext {
            graphs,
            src_scope: scope_finalize(src_scope),
            dst_scope: scope_finalize(dst_scope),
            placeholder_prefix: self.placeholder_prefix.clone(),
            map: CorrespondenceMap::new(),
        };

        // Pass one: copy nodes in data order, resolving inputs as we go.
        for &node_ref in &order {
            let node = ctx.src().node(node_ref)?.clone();
            let mut new_inputs = Vec::with_capacity(node.inputs().len());
            for &input in node.inputs() {
                let resolved = match ctx.map.tensor_hit(input) {
                    Some(tensor) => tensor,
                    None => {
                        if selected.contains(&input.node()) {
                            return Err(GraphError::StructuralError(format!(
                                "input {} is inside the selection but was not transformed",
                                ctx.src().tensor_name(input)?
                            )));
                        }
                        let tensor = (self.input_handler)(&mut ctx, input)?;
                        ctx.map.record_tensor(input, tensor);
                        tensor
                    }
                };
                new_inputs.push(resolved);
            }
            let (new_node, outputs) = (self.op_handler)(&mut ctx, &node, &new_inputs)?;
            ctx.map.record_node(node_ref, new_node);
            for (i, &stand_in) in outputs.iter().enumerate().take(node.num_outputs()) {
                ctx.map.record_tensor(node_ref.output(i as u32), stand_in);
            }
            tracing::trace!(node = node.name(), "transformed");
        }

        // Pass two: control edges whose endpoints are both in the selection.
        for &node_ref in &order {
            let sinks = index.get(ctx.src(), node_ref)?.to_vec();
            for sink in sinks {
                if !selected.contains(&sink) {
                    continue;
                }
                let new_source = ctx.map.transformed_node(node_ref).map_err(|_| {
                    control_edge_error(ctx.src(), node_ref)
                })?;
                let new_sink = ctx
                    .map
                    .transformed_node(sink)
                    .map_err(|_| control_edge_error(ctx.src(), sink))?;
                ctx.dst_mut().add_control_input(new_sink, new_source)?;
            }
        }

        tracing::debug!(
            nodes = order.len(),
            dst_scope = %ctx.dst_scope,
            "transformed selection"
        );
        Ok(ctx.map)
    }
}

fn control_edge_error(graph: &Graph, node: NodeRef) -> GraphError {
    let name = graph
        .node(node)
        .map(|n| n.name().to_string())
        .unwrap_or_else(|_| format!("{:?}", node));
    GraphError::StructuralError(format!(
        "control edge endpoint {:?} has no transformed counterpart",
        name
    ))
}

/// Copy a whole graph with the default handlers.
///
/// Fails with `EmptyInput` when `src` has no nodes.
pub fn copy(
    src: &Graph,
    dst: &mut Graph,
    dst_scope: &str,
    src_scope: &str,
) -> GraphResult<CorrespondenceMap> {
    let selection: Vec<NodeRef> = src.nodes().collect();
    Transformer::new().transform(src, &selection, dst, dst_scope, src_scope)
}

/// Copy an explicit selection with the default handlers.
pub fn copy_subgraph(
    src: &Graph,
    selection: &[NodeRef],
    dst: &mut Graph,
    dst_scope: &str,
    src_scope: &str,
) -> GraphResult<CorrespondenceMap> {
    Transformer::new().transform(src, selection, dst, dst_scope, src_scope)
}

/// Copy a selection, wiring a replacement tensor wherever a node consumes
/// one of the replaced tensors. Other external inputs are aliased when
/// source and destination are one graph, otherwise turned into
/// placeholders.
pub fn copy_with_input_replacements(
    src: &Graph,
    selection: &[NodeRef],
    replacements: &ReplacementMap,
    dst: &mut Graph,
    dst_scope: &str,
    src_scope: &str,
) -> GraphResult<CorrespondenceMap> {
    let mut transformer = Transformer::new();
    let replacements = replacements.clone();
    transformer.input_handler = Box::new(move |ctx, tensor| match replacements.get(tensor) {
        Some(replacement) => Ok(replacement),
        None => keep_input_handler(ctx, tensor),
    });
    transformer.transform(src, selection, dst, dst_scope, src_scope)
}
