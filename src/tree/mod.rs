//! Nested value containers
//!
//! Callers hand selections and replacement targets to the engine in nested
//! containers. `Tree` is the closed set of container shapes the crate
//! accepts:
//! - `Leaf`: a single value
//! - `Seq`: an ordered sequence
//! - `Tuple`: a fixed-arity tuple
//! - `Record`: named fields in declaration order
//! - `Map`: a string-keyed mapping whose key order carries no meaning
//!
//! `flatten` lists the leaves depth-first and `map`/`try_map` rebuild the
//! identical shape with every leaf replaced, so
//! `flatten(map(t, f)) == [f(x) for x in flatten(t)]` holds for every tree.
//! Map children are visited in ascending key order, which makes leaf order
//! deterministic for equal trees.

use std::collections::BTreeMap;

use crate::error::{GraphError, GraphResult};

/// Recursion limit for tree traversal; deeper trees are rejected as
/// `InvalidInput` instead of overflowing the stack.
pub const MAX_DEPTH: usize = 1024;

/// A nested container of values.
#[derive(Clone, Debug, PartialEq)]
pub enum Tree<T> {
    /// Single value
    Leaf(T),
    /// Ordered sequence
    Seq(Vec<Tree<T>>),
    /// Fixed-arity tuple
    Tuple(Vec<Tree<T>>),
    /// Named fields in declaration order
    Record(Vec<(String, Tree<T>)>),
    /// String-keyed mapping; keys sort ascending on traversal
    Map(BTreeMap<String, Tree<T>>),
}

impl<T> Tree<T> {
    /// Build a sequence of leaves.
    pub fn from_leaves(items: impl IntoIterator<Item = T>) -> Self {
        Tree::Seq(items.into_iter().map(Tree::Leaf).collect())
    }

    /// List the leaves depth-first.
    pub fn flatten(&self) -> GraphResult<Vec<&T>> {
        let mut leaves = Vec::new();
        self.flatten_into(0, &mut leaves)?;
        Ok(leaves)
    }

    /// Rebuild the same shape with every leaf replaced by `f(leaf)`.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> GraphResult<Tree<U>> {
        self.try_map(|leaf| Ok(f(leaf)))
    }

    /// Rebuild the same shape with every leaf replaced by `f(leaf)?`,
    /// stopping at the first failure.
    pub fn try_map<U>(&self, mut f: impl FnMut(&T) -> GraphResult<U>) -> GraphResult<Tree<U>> {
        self.try_map_at(0, &mut f)
    }

    fn flatten_into<'a>(&'a self, depth: usize, leaves: &mut Vec<&'a T>) -> GraphResult<()> {
        check_depth(depth)?;
        match self {
            Tree::Leaf(leaf) => leaves.push(leaf),
            Tree::Seq(items) | Tree::Tuple(items) => {
                for item in items {
                    item.flatten_into(depth + 1, leaves)?;
                }
            }
            Tree::Record(fields) => {
                for (_, item) in fields {
                    item.flatten_into(depth + 1, leaves)?;
                }
            }
            Tree::Map(entries) => {
                for item in entries.values() {
                    item.flatten_into(depth + 1, leaves)?;
                }
            }
        }
        Ok(())
    }

    fn try_map_at<U>(
        &self,
        depth: usize,
        f: &mut impl FnMut(&T) -> GraphResult<U>,
    ) -> GraphResult<Tree<U>> {
        check_depth(depth)?;
        match self {
            Tree::Leaf(leaf) => Ok(Tree::Leaf(f(leaf)?)),
            Tree::Seq(items) => Ok(Tree::Seq(
                items
                    .iter()
                    .map(|item| item.try_map_at(depth + 1, f))
                    .collect::<GraphResult<_>>()?,
            )),
            Tree::Tuple(items) => Ok(Tree::Tuple(
                items
                    .iter()
                    .map(|item| item.try_map_at(depth + 1, f))
                    .collect::<GraphResult<_>>()?,
            )),
            Tree::Record(fields) => Ok(Tree::Record(
                fields
                    .iter()
                    .map(|(name, item)| Ok((name.clone(), item.try_map_at(depth + 1, f)?)))
                    .collect::<GraphResult<_>>()?,
            )),
            Tree::Map(entries) => Ok(Tree::Map(
                entries
                    .iter()
                    .map(|(key, item)| Ok((key.clone(), item.try_map_at(depth + 1, f)?)))
                    .collect::<GraphResult<_>>()?,
            )),
        }
    }
}

fn check_depth(depth: usize) -> GraphResult<()> {
    if depth > MAX_DEPTH {
        return Err(GraphError::InvalidInput(format!(
            "tree nested deeper than {} levels",
            MAX_DEPTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tree<i32> {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), Tree::Leaf(4));
        map.insert("a".to_string(), Tree::Leaf(3));
        Tree::Seq(vec![
            Tree::Leaf(1),
            Tree::Tuple(vec![Tree::Leaf(2), Tree::Map(map)]),
            Tree::Record(vec![
                ("x".to_string(), Tree::Leaf(5)),
                ("y".to_string(), Tree::Leaf(6)),
            ]),
        ])
    }

    #[test]
    fn test_flatten_order() {
        let leaves: Vec<i32> = sample().flatten().unwrap().into_iter().copied().collect();
        // map keys visit in ascending order; record fields in declaration order
        assert_eq!(leaves, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_map_preserves_shape() {
        let doubled = sample().map(|x| x * 2).unwrap();
        match &doubled {
            Tree::Seq(items) => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[0], Tree::Leaf(2));
                assert!(matches!(items[1], Tree::Tuple(_)));
                assert!(matches!(items[2], Tree::Record(_)));
            }
            other => panic!("expected Seq, got {:?}", other),
        }
    }

    #[test]
    fn test_flatten_map_commute() {
        let tree = sample();
        let mapped_then_flat: Vec<i32> = tree
            .map(|x| x + 10)
            .unwrap()
            .flatten()
            .unwrap()
            .into_iter()
            .copied()
            .collect();
        let flat_then_mapped: Vec<i32> = tree
            .flatten()
            .unwrap()
            .into_iter()
            .map(|x| x + 10)
            .collect();
        assert_eq!(mapped_then_flat, flat_then_mapped);
    }

    #[test]
    fn test_try_map_stops_on_error() {
        let tree = Tree::from_leaves([1, 2, 3]);
        let result = tree.try_map(|&x| {
            if x == 2 {
                Err(GraphError::InvalidInput("two".to_string()))
            } else {
                Ok(x)
            }
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_depth_guard() {
        let deep = (0..MAX_DEPTH + 2).fold(Tree::Leaf(0), |tree, _| Tree::Seq(vec![tree]));
        assert!(matches!(
            deep.flatten(),
            Err(GraphError::InvalidInput(_))
        ));
        assert!(deep.map(|x| *x).is_err());
    }

    #[test]
    fn test_from_leaves() {
        let tree = Tree::from_leaves([7, 8]);
        assert_eq!(tree, Tree::Seq(vec![Tree::Leaf(7), Tree::Leaf(8)]));
    }
}
