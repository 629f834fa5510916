//! Placeholder naming and creation
//!
//! Placeholders stand in for values supplied from outside a copied
//! selection. Their names are deterministic: deriving a name twice from the
//! same tensor and scope gives the same string, and re-deriving from a node
//! that is already a generated placeholder returns its name unchanged
//! instead of stacking prefixes.

use crate::attr::{AttrValue, TensorShape};
use crate::error::GraphResult;
use crate::graph::{Graph, NodeRef, TensorRef, PLACEHOLDER_OP};
use crate::naming::{scope_basename, scope_dirname, scope_finalize};
use crate::proto::DataType;

/// Reserved prefix marking generated placeholder names.
pub const PLACEHOLDER_PREFIX: &str = "gph";

/// Derive the deterministic name for a placeholder.
///
/// With a source tensor the name is
/// `scope + prefix + "__" + basename + "_" + output_index`, except that a
/// basename already carrying `prefix + "__"` is reused as is. When `scope`
/// is `None` the source node's own scope is kept. With no source tensor the
/// name is just `scope + prefix`.
pub fn placeholder_name(
    source: Option<(&Graph, TensorRef)>,
    scope: Option<&str>,
    prefix: &str,
) -> GraphResult<String> {
    let scope = scope.map(scope_finalize);
    if let Some((graph, tensor)) = source {
        let name = graph.node(tensor.node())?.name().to_string();
        let scope = match scope {
            Some(scope) => scope,
            None => scope_dirname(&name).to_string(),
        };
        let basename = scope_basename(&name);
        let marker = format!("{}__", prefix);
        if basename.starts_with(&marker) {
            Ok(format!("{}{}", scope, basename))
        } else {
            Ok(format!("{}{}{}_{}", scope, marker, basename, tensor.index()))
        }
    } else {
        Ok(format!("{}{}", scope.unwrap_or_default(), prefix))
    }
}

/// Add a placeholder node carrying `dtype` and `shape` attributes, no
/// inputs, and one inferred output.
///
/// The requested name is uniquified against the graph, so creating two
/// placeholders from the same derived name yields `name` and `name_1`
/// rather than a `DuplicateName` error.
pub fn make_placeholder(
    graph: &mut Graph,
    dtype: DataType,
    shape: TensorShape,
    name: &str,
) -> GraphResult<NodeRef> {
    let name = graph.unique_name(name);
    let node = graph.add_node(&name, PLACEHOLDER_OP)?;
    graph.add_attr(node, "dtype", AttrValue::DType(dtype))?;
    graph.add_attr(node, "shape", AttrValue::Shape(shape))?;
    graph.infer_outputs(node)?;
    tracing::trace!(name = %name, "created placeholder");
    Ok(node)
}

/// Create, in `dst_graph`, a placeholder standing in for `tensor` from
/// `src_graph`, carrying the tensor's dtype and shape. With `scope = None`
/// the source node's own scope is kept.
pub fn make_placeholder_from_tensor(
    src_graph: &Graph,
    tensor: TensorRef,
    dst_graph: &mut Graph,
    scope: Option<&str>,
) -> GraphResult<TensorRef> {
    let name = placeholder_name(Some((src_graph, tensor)), scope, PLACEHOLDER_PREFIX)?;
    let spec = src_graph.output_spec(tensor)?.clone();
    let node = make_placeholder(dst_graph, spec.dtype, spec.shape, &name)?;
    Ok(node.output(0))
}
