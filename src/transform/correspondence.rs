//! Original ↔ transformed correspondence
//!
//! One engine run produces one [`CorrespondenceMap`]. It records every node
//! and tensor pair the run touched, including input-handler substitutions,
//! and supports lookup in both directions. [`find_corresponding_elem`] is
//! the name-based variant for callers that only know the destination graph
//! and the scope remapping that was applied.

use rustc_hash::FxHashMap;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Element, Graph, NodeRef, TensorRef};
use crate::naming::rescope;
use crate::tree::Tree;

/// Bidirectional registry of (original, transformed) pairs.
///
/// Populated by the engine during one invocation; lookups on elements the
/// invocation never touched fail with `NotFound`.
#[derive(Clone, Debug, Default)]
pub struct CorrespondenceMap {
    node_forward: FxHashMap<NodeRef, NodeRef>,
    node_backward: FxHashMap<NodeRef, NodeRef>,
    tensor_forward: FxHashMap<TensorRef, TensorRef>,
    tensor_backward: FxHashMap<TensorRef, TensorRef>,
}

impl CorrespondenceMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_node(&mut self, original: NodeRef, transformed: NodeRef) {
        self.node_forward.insert(original, transformed);
        self.node_backward.insert(transformed, original);
    }

    pub(crate) fn record_tensor(&mut self, original: TensorRef, transformed: TensorRef) {
        self.tensor_forward.insert(original, transformed);
        self.tensor_backward.insert(transformed, original);
    }

    pub(crate) fn tensor_hit(&self, original: TensorRef) -> Option<TensorRef> {
        self.tensor_forward.get(&original).copied()
    }

    /// The transformed counterpart of an original node.
    pub fn transformed_node(&self, original: NodeRef) -> GraphResult<NodeRef> {
        self.node_forward.get(&original).copied().ok_or_else(|| {
            GraphError::NotFound(format!("no transformed counterpart for {:?}", original))
        })
    }

    /// The original behind a transformed node.
    pub fn original_node(&self, transformed: NodeRef) -> GraphResult<NodeRef> {
        self.node_backward.get(&transformed).copied().ok_or_else(|| {
            GraphError::NotFound(format!("no original counterpart for {:?}", transformed))
        })
    }

    /// The transformed counterpart of an original tensor.
    pub fn transformed_tensor(&self, original: TensorRef) -> GraphResult<TensorRef> {
        self.tensor_forward.get(&original).copied().ok_or_else(|| {
            GraphError::NotFound(format!("no transformed counterpart for {:?}", original))
        })
    }

    /// The original behind a transformed tensor.
    pub fn original_tensor(&self, transformed: TensorRef) -> GraphResult<TensorRef> {
        self.tensor_backward.get(&transformed).copied().ok_or_else(|| {
            GraphError::NotFound(format!("no original counterpart for {:?}", transformed))
        })
    }

    /// Element-level forward lookup.
    pub fn transformed(&self, original: Element) -> GraphResult<Element> {
        match original {
            Element::Node(node) => Ok(Element::Node(self.transformed_node(node)?)),
            Element::Tensor(tensor) => Ok(Element::Tensor(self.transformed_tensor(tensor)?)),
        }
    }

    /// Element-level backward lookup.
    pub fn original(&self, transformed: Element) -> GraphResult<Element> {
        match transformed {
            Element::Node(node) => Ok(Element::Node(self.original_node(node)?)),
            Element::Tensor(tensor) => Ok(Element::Tensor(self.original_tensor(tensor)?)),
        }
    }

    /// Recorded (original, transformed) node pairs, in no particular order.
    pub fn node_pairs(&self) -> impl Iterator<Item = (NodeRef, NodeRef)> + '_ {
        self.node_forward.iter().map(|(&o, &t)| (o, t))
    }

    /// Recorded (original, transformed) tensor pairs, in no particular order.
    pub fn tensor_pairs(&self) -> impl Iterator<Item = (TensorRef, TensorRef)> + '_ {
        self.tensor_forward.iter().map(|(&o, &t)| (o, t))
    }

    /// Number of recorded node pairs.
    pub fn node_count(&self) -> usize {
        self.node_forward.len()
    }

    /// Number of recorded tensor pairs.
    pub fn tensor_count(&self) -> usize {
        self.tensor_forward.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.node_forward.is_empty() && self.tensor_forward.is_empty()
    }
}

/// Resolve the counterpart of `target` by name.
///
/// Strips the finalized `src_scope` from the target's name (`ScopeMismatch`
/// when the name does not literally start with it), prepends the finalized
/// `dst_scope`, and resolves the result in `dst_graph`'s node or tensor
/// namespace according to the target's kind (`NotFound` when absent).
pub fn find_corresponding_elem(
    src_graph: &Graph,
    target: Element,
    dst_graph: &Graph,
    dst_scope: &str,
    src_scope: &str,
) -> GraphResult<Element> {
    match target {
        Element::Node(node) => {
            let name = src_graph.node(node)?.name().to_string();
            let dst_name = rescope(&name, src_scope, dst_scope)?;
            Ok(Element::Node(dst_graph.find_node(&dst_name)?))
        }
        Element::Tensor(tensor) => {
            let name = src_graph.tensor_name(tensor)?;
            let dst_name = rescope(&name, src_scope, dst_scope)?;
            Ok(Element::Tensor(dst_graph.find_tensor(&dst_name)?))
        }
    }
}

/// [`find_corresponding_elem`] applied leaf-wise to a tree of targets,
/// preserving the tree's shape.
pub fn find_corresponding(
    src_graph: &Graph,
    targets: &Tree<Element>,
    dst_graph: &Graph,
    dst_scope: &str,
    src_scope: &str,
) -> GraphResult<Tree<Element>> {
    targets.try_map(|&target| {
        find_corresponding_elem(src_graph, target, dst_graph, dst_scope, src_scope)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::{AttrValue, TensorShape};
    use crate::graph::PLACEHOLDER_OP;
    use crate::proto::DataType;

    fn make_graph(scope: &str) -> (Graph, NodeRef) {
        let mut graph = Graph::new();
        let node = graph
            .add_node(&format!("{}add", scope), PLACEHOLDER_OP)
            .unwrap();
        graph
            .add_attr(node, "dtype", AttrValue::DType(DataType::Float))
            .unwrap();
        graph
            .add_attr(node, "shape", AttrValue::Shape(TensorShape::scalar()))
            .unwrap();
        graph.infer_outputs(node).unwrap();
        (graph, node)
    }

    #[test]
    fn test_record_and_lookup() {
        let (src, a) = make_graph("layer/");
        let (dst, b) = make_graph("copy/");
        let mut map = CorrespondenceMap::new();
        map.record_node(a, b);
        map.record_tensor(a.output(0), b.output(0));

        assert_eq!(map.transformed_node(a).unwrap(), b);
        assert_eq!(map.original_node(b).unwrap(), a);
        assert_eq!(map.transformed_tensor(a.output(0)).unwrap(), b.output(0));
        assert_eq!(map.original_tensor(b.output(0)).unwrap(), a.output(0));
        assert_eq!(map.node_count(), 1);
        assert_eq!(map.tensor_count(), 1);
        drop((src, dst));
    }

    #[test]
    fn test_lookup_unknown_fails() {
        let (_src, a) = make_graph("");
        let map = CorrespondenceMap::new();
        assert!(matches!(
            map.transformed_node(a),
            Err(GraphError::NotFound(_))
        ));
        assert!(matches!(
            map.original_tensor(a.output(0)),
            Err(GraphError::NotFound(_))
        ));
        assert!(map.is_empty());
    }

    #[test]
    fn test_element_lookup() {
        let (_src, a) = make_graph("");
        let (_dst, b) = make_graph("copy/");
        let mut map = CorrespondenceMap::new();
        map.record_node(a, b);
        map.record_tensor(a.output(0), b.output(0));

        assert_eq!(
            map.transformed(Element::Node(a)).unwrap(),
            Element::Node(b)
        );
        assert_eq!(
            map.original(Element::Tensor(b.output(0))).unwrap(),
            Element::Tensor(a.output(0))
        );
    }

    #[test]
    fn test_find_corresponding_elem() {
        let (src, a) = make_graph("layer/");
        let (dst, b) = make_graph("copy/");

        let node = find_corresponding_elem(&src, Element::Node(a), &dst, "copy", "layer").unwrap();
        assert_eq!(node.as_node().unwrap(), b);
        assert!(matches!(
            node.as_tensor(),
            Err(GraphError::TypeMismatch { .. })
        ));

        let tensor =
            find_corresponding_elem(&src, Element::Tensor(a.output(0)), &dst, "copy", "layer")
                .unwrap();
        assert_eq!(tensor.as_tensor().unwrap(), b.output(0));
    }

    #[test]
    fn test_find_corresponding_elem_scope_mismatch() {
        let (src, a) = make_graph("layer/");
        let (dst, _) = make_graph("copy/");
        let err =
            find_corresponding_elem(&src, Element::Node(a), &dst, "copy", "other").unwrap_err();
        assert!(matches!(err, GraphError::ScopeMismatch { .. }));
    }

    #[test]
    fn test_find_corresponding_elem_missing() {
        let (src, a) = make_graph("layer/");
        let (dst, _) = make_graph("other/");
        let err =
            find_corresponding_elem(&src, Element::Node(a), &dst, "copy", "layer").unwrap_err();
        assert!(matches!(err, GraphError::NotFound(_)));
    }

    #[test]
    fn test_find_corresponding_tree() {
        let (src, a) = make_graph("layer/");
        let (dst, b) = make_graph("copy/");
        let targets = Tree::Record(vec![
            ("node".to_string(), Tree::Leaf(Element::Node(a))),
            ("tensor".to_string(), Tree::Leaf(Element::Tensor(a.output(0)))),
        ]);

        let found = find_corresponding(&src, &targets, &dst, "copy", "layer").unwrap();
        match found {
            Tree::Record(fields) => {
                assert_eq!(fields[0].1, Tree::Leaf(Element::Node(b)));
                assert_eq!(fields[1].1, Tree::Leaf(Element::Tensor(b.output(0))));
            }
            other => panic!("record shape not preserved: {:?}", other),
        }
    }
}
