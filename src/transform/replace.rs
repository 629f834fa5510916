//! In-graph tensor substitution
//!
//! [`graph_replace`] recomputes a tree of target tensors as if some of the
//! tensors they depend on had different values. The nodes that actually
//! feel a replacement are the intersection of what is forward-reachable
//! from the replaced tensors and backward-reachable from the targets,
//! following both data and control edges; those are duplicated in place
//! with their inputs rewired, and everything else is aliased unchanged.
//! Replaced tensors act as cut points: no walk traverses through them, so
//! their producers are never copied.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::error::{GraphError, GraphResult};
use crate::graph::traversal::{backward_reach, forward_reach};
use crate::graph::{ControlOutputs, Graph, NodeRef, TensorRef};
use crate::transform::correspondence::CorrespondenceMap;
use crate::transform::engine::{keep_input_handler, Transformer};
use crate::tree::Tree;

/// Ordered mapping from replaced tensors to their replacements.
#[derive(Clone, Debug, Default)]
pub struct ReplacementMap {
    entries: IndexMap<TensorRef, TensorRef>,
}

impl ReplacementMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `original` to `replacement`, returning any previous replacement.
    pub fn insert(&mut self, original: TensorRef, replacement: TensorRef) -> Option<TensorRef> {
        self.entries.insert(original, replacement)
    }

    /// The replacement for `original`, if one was registered.
    pub fn get(&self, original: TensorRef) -> Option<TensorRef> {
        self.entries.get(&original).copied()
    }

    /// True when `original` is a replaced tensor.
    pub fn contains(&self, original: TensorRef) -> bool {
        self.entries.contains_key(&original)
    }

    /// (original, replacement) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (TensorRef, TensorRef)> + '_ {
        self.entries.iter().map(|(&original, &replacement)| (original, replacement))
    }

    /// Number of replaced tensors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no replacement is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(TensorRef, TensorRef)> for ReplacementMap {
    fn from_iter<I: IntoIterator<Item = (TensorRef, TensorRef)>>(iter: I) -> Self {
        ReplacementMap {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Recompute `targets` with `replacements` substituted, copying only the
/// affected nodes.
///
/// The result tree mirrors the target tree's shape. A target that does not
/// depend on any replaced tensor comes back aliased, not copied; a target
/// that is itself a replaced tensor comes back as its replacement. Fails
/// with `StructuralError` when no target depends on any replacement.
///
/// Copies keep their original names with a `_N` suffix; use
/// [`graph_replace_scoped`] to put them under a fresh scope instead.
pub fn graph_replace(
    graph: &mut Graph,
    targets: &Tree<TensorRef>,
    replacements: &ReplacementMap,
) -> GraphResult<Tree<TensorRef>> {
    graph_replace_scoped(graph, targets, replacements, "", "")
}

/// [`graph_replace`] with scope remapping applied to the copied nodes:
/// `src_scope` is stripped from their names and `dst_scope` prepended.
pub fn graph_replace_scoped(
    graph: &mut Graph,
    targets: &Tree<TensorRef>,
    replacements: &ReplacementMap,
    dst_scope: &str,
    src_scope: &str,
) -> GraphResult<Tree<TensorRef>> {
    let leaves: Vec<TensorRef> = targets.flatten()?.into_iter().copied().collect();
    for &leaf in &leaves {
        graph.check_tensor(leaf)?;
    }
    for (original, replacement) in replacements.iter() {
        graph.check_tensor(original)?;
        graph.check_tensor(replacement)?;
    }

    let map = replace_closure(graph, &leaves, replacements, dst_scope, src_scope)?;

    targets.try_map(|&target| Ok(map.transformed_tensor(target).unwrap_or(target)))
}

/// Copy the affected closure in place and return the populated map.
fn replace_closure(
    graph: &mut Graph,
    leaves: &[TensorRef],
    replacements: &ReplacementMap,
    dst_scope: &str,
    src_scope: &str,
) -> GraphResult<CorrespondenceMap> {
    let seeds: Vec<TensorRef> = replacements.iter().map(|(original, _)| original).collect();
    let cuts: FxHashSet<TensorRef> = seeds.iter().copied().collect();

    let mut index = ControlOutputs::new(graph);
    let forward = forward_reach(graph, &mut index, &seeds, &cuts)?;
    let backward = backward_reach(graph, leaves, &cuts)?;

    let mut closure: Vec<NodeRef> = forward.intersection(&backward).copied().collect();
    closure.sort_unstable();
    if closure.is_empty() {
        return Err(GraphError::StructuralError(
            "targets and replacements are not connected".to_string(),
        ));
    }
    tracing::debug!(affected = closure.len(), "computed replacement closure");

    let mut transformer = Transformer::new();
    let wired = replacements.clone();
    transformer.input_handler = Box::new(move |ctx, tensor| match wired.get(tensor) {
        Some(replacement) => Ok(replacement),
        None => keep_input_handler(ctx, tensor),
    });
    transformer.transform_in_place(graph, &closure, dst_scope, src_scope)
}
