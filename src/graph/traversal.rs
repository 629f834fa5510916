//! Reachability and ordering walks
//!
//! Internal support for the transform layer: a topological ordering
//! restricted to a selection, and forward/backward reachability over data
//! and control edges with cut tensors that are never traversed through.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use rustc_hash::{FxHashMap, FxHashSet};

use super::control::ControlOutputs;
use super::core::{Graph, NodeRef, TensorRef};
use crate::error::{GraphError, GraphResult};

/// Order `selection` so every node comes after its in-selection data
/// producers. Ties break by creation order, so the result is deterministic.
/// Duplicates in the input collapse; a data cycle inside the selection is a
/// `StructuralError`.
pub(crate) fn topo_order(graph: &Graph, selection: &[NodeRef]) -> GraphResult<Vec<NodeRef>> {
    let mut members = FxHashSet::default();
    for &node in selection {
        graph.node(node)?;
        members.insert(node);
    }

    let mut indegree: FxHashMap<NodeRef, usize> = FxHashMap::default();
    let mut consumers: FxHashMap<NodeRef, Vec<NodeRef>> = FxHashMap::default();
    for &node in &members {
        indegree.entry(node).or_insert(0);
        for input in graph.node(node)?.inputs() {
            let producer = input.node();
            if members.contains(&producer) {
                *indegree.entry(node).or_insert(0) += 1;
                consumers.entry(producer).or_default().push(node);
            }
        }
    }

    let mut ready: BinaryHeap<Reverse<NodeRef>> = indegree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(&node, _)| Reverse(node))
        .collect();

    let mut order = Vec::with_capacity(members.len());
    while let Some(Reverse(node)) = ready.pop() {
        order.push(node);
        if let Some(next) = consumers.get(&node) {
            for &consumer in next {
                let degree = indegree.get_mut(&consumer).ok_or_else(|| {
                    GraphError::StructuralError(format!("unknown consumer {:?}", consumer))
                })?;
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(consumer));
                }
            }
        }
    }

    if order.len() != members.len() {
        return Err(GraphError::StructuralError(
            "data cycle within the selection".to_string(),
        ));
    }
    Ok(order)
}

/// Nodes reachable downstream of `seeds`, following data edges and control
/// edges. Traversal enters the consumers of every seed tensor but never
/// walks through a tensor in `cuts`.
pub(crate) fn forward_reach(
    graph: &Graph,
    index: &mut ControlOutputs,
    seeds: &[TensorRef],
    cuts: &FxHashSet<TensorRef>,
) -> GraphResult<FxHashSet<NodeRef>> {
    let consumers = consumer_map(graph)?;
    let mut queue: VecDeque<NodeRef> = VecDeque::new();
    for &seed in seeds {
        graph.check_tensor(seed)?;
        if let Some(direct) = consumers.get(&seed) {
            queue.extend(direct.iter().copied());
        }
    }

    let mut reached = FxHashSet::default();
    while let Some(node) = queue.pop_front() {
        if !reached.insert(node) {
            continue;
        }
        for output in graph.outputs(node)? {
            if cuts.contains(&output) {
                continue;
            }
            if let Some(next) = consumers.get(&output) {
                queue.extend(next.iter().copied());
            }
        }
        for &sink in index.get(graph, node)? {
            queue.push_back(sink);
        }
    }
    Ok(reached)
}

/// Nodes reachable upstream of `targets`, following data edges and control
/// edges. A target that is itself a cut tensor contributes nothing, and the
/// walk never follows an input edge carrying a cut tensor.
pub(crate) fn backward_reach(
    graph: &Graph,
    targets: &[TensorRef],
    cuts: &FxHashSet<TensorRef>,
) -> GraphResult<FxHashSet<NodeRef>> {
    let mut queue: VecDeque<NodeRef> = VecDeque::new();
    for &target in targets {
        graph.check_tensor(target)?;
        if !cuts.contains(&target) {
            queue.push_back(target.node());
        }
    }

    let mut reached = FxHashSet::default();
    while let Some(node) = queue.pop_front() {
        if !reached.insert(node) {
            continue;
        }
        let n = graph.node(node)?;
        for &input in n.inputs() {
            if cuts.contains(&input) {
                continue;
            }
            queue.push_back(input.node());
        }
        for &source in n.control_inputs() {
            queue.push_back(source);
        }
    }
    Ok(reached)
}

fn consumer_map(graph: &Graph) -> GraphResult<FxHashMap<TensorRef, Vec<NodeRef>>> {
    let mut consumers: FxHashMap<TensorRef, Vec<NodeRef>> = FxHashMap::default();
    for node in graph.nodes() {
        for &input in graph.node(node)?.inputs() {
            consumers.entry(input).or_default().push(node);
        }
    }
    Ok(consumers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::AttrValue;
    use crate::proto::DataType;

    // a -> b -> c, with d control-depending on b
    fn make_chain() -> (Graph, NodeRef, NodeRef, NodeRef, NodeRef) {
        let mut graph = Graph::new();
        let a = graph.add_node("a", "Placeholder").unwrap();
        graph.add_attr(a, "dtype", AttrValue::DType(DataType::Float)).unwrap();
        graph.infer_outputs(a).unwrap();
        let b = graph.add_node("b", "Neg").unwrap();
        graph.set_inputs(b, &[a.output(0)]).unwrap();
        graph.infer_outputs(b).unwrap();
        let c = graph.add_node("c", "Neg").unwrap();
        graph.set_inputs(c, &[b.output(0)]).unwrap();
        graph.infer_outputs(c).unwrap();
        let d = graph.add_node("d", "Op").unwrap();
        graph.infer_outputs(d).unwrap();
        graph.add_control_input(d, b).unwrap();
        (graph, a, b, c, d)
    }

    #[test]
    fn test_topo_order_respects_data_deps() {
        let (graph, a, b, c, _) = make_chain();
        assert_eq!(topo_order(&graph, &[c, a, b]).unwrap(), vec![a, b, c]);
        // producers outside the selection do not constrain the order
        assert_eq!(topo_order(&graph, &[c, a]).unwrap(), vec![a, c]);
    }

    #[test]
    fn test_topo_order_dedupes() {
        let (graph, a, b, _, _) = make_chain();
        assert_eq!(topo_order(&graph, &[b, a, b, a]).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_topo_order_cycle() {
        let mut graph = Graph::new();
        let x = graph.add_node("x", "Op").unwrap();
        graph.infer_outputs(x).unwrap();
        let y = graph.add_node("y", "Op").unwrap();
        graph.set_inputs(y, &[x.output(0)]).unwrap();
        graph.infer_outputs(y).unwrap();
        graph.set_inputs(x, &[y.output(0)]).unwrap();
        assert!(matches!(
            topo_order(&graph, &[x, y]),
            Err(GraphError::StructuralError(_))
        ));
    }

    #[test]
    fn test_forward_reach_follows_control() {
        let (graph, a, b, c, d) = make_chain();
        let mut index = ControlOutputs::new(&graph);
        let reached =
            forward_reach(&graph, &mut index, &[a.output(0)], &FxHashSet::default()).unwrap();
        // d is reached through the control edge from b
        assert_eq!(
            reached,
            [b, c, d].into_iter().collect::<FxHashSet<_>>()
        );
    }

    #[test]
    fn test_forward_reach_cuts() {
        let (graph, a, b, _, d) = make_chain();
        let mut index = ControlOutputs::new(&graph);
        let cuts: FxHashSet<TensorRef> = [b.output(0)].into_iter().collect();
        let reached = forward_reach(&graph, &mut index, &[a.output(0)], &cuts).unwrap();
        // the cut stops the data edge to c; the control edge to d still runs
        assert_eq!(reached, [b, d].into_iter().collect::<FxHashSet<_>>());
    }

    #[test]
    fn test_backward_reach() {
        let (graph, a, b, c, d) = make_chain();
        let reached = backward_reach(&graph, &[c.output(0)], &FxHashSet::default()).unwrap();
        assert_eq!(reached, [a, b, c].into_iter().collect::<FxHashSet<_>>());
        // control inputs are followed too
        let reached = backward_reach(&graph, &[d.output(0)], &FxHashSet::default()).unwrap();
        assert_eq!(reached, [a, b, d].into_iter().collect::<FxHashSet<_>>());
    }

    #[test]
    fn test_backward_reach_cuts() {
        let (graph, _, b, c, _) = make_chain();
        let cuts: FxHashSet<TensorRef> = [b.output(0)].into_iter().collect();
        let reached = backward_reach(&graph, &[c.output(0)], &cuts).unwrap();
        assert_eq!(reached, [c].into_iter().collect::<FxHashSet<_>>());
    }

    #[test]
    fn test_cut_target_contributes_nothing() {
        let (graph, _, b, _, _) = make_chain();
        let cuts: FxHashSet<TensorRef> = [b.output(0)].into_iter().collect();
        let reached = backward_reach(&graph, &[b.output(0)], &cuts).unwrap();
        assert!(reached.is_empty());
    }
}
