//! Hierarchical name handling
//!
//! Node names form a `/`-delimited hierarchy. This module provides:
//! - Scope normalization and splitting (`scope_finalize`, `scope_dirname`,
//!   `scope_basename`)
//! - Moving a name from one scope to another (`rescope`)
//! - Deterministic placeholder naming and creation (`placeholder`)
//!
//! A finalized scope always ends with `/` unless it is empty, so finalized
//! scopes concatenate directly with relative names.

pub mod placeholder;

pub use placeholder::{
    make_placeholder, make_placeholder_from_tensor, placeholder_name, PLACEHOLDER_PREFIX,
};

use crate::error::{GraphError, GraphResult};

/// Normalize a scope so it is either empty or ends with `/`.
pub fn scope_finalize(scope: &str) -> String {
    if !scope.is_empty() && !scope.ends_with('/') {
        format!("{}/", scope)
    } else {
        scope.to_string()
    }
}

/// Everything up to and including the last `/`, or `""` when the name has
/// no scope.
pub fn scope_dirname(name: &str) -> &str {
    match name.rfind('/') {
        Some(slash) => &name[..=slash],
        None => "",
    }
}

/// Everything after the last `/`, or the whole name when it has no scope.
pub fn scope_basename(name: &str) -> &str {
    match name.rfind('/') {
        Some(slash) => &name[slash + 1..],
        None => name,
    }
}

/// Move `name` from `src_scope` into `dst_scope`.
///
/// Both scopes are finalized first. Fails with `ScopeMismatch` when the
/// name does not literally start with the finalized source scope; an empty
/// source scope matches every name.
pub fn rescope(name: &str, src_scope: &str, dst_scope: &str) -> GraphResult<String> {
    let src = scope_finalize(src_scope);
    let dst = scope_finalize(dst_scope);
    match name.strip_prefix(&src) {
        Some(relative) => Ok(format!("{}{}", dst, relative)),
        None => Err(GraphError::ScopeMismatch {
            name: name.to_string(),
            scope: src,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_finalize() {
        assert_eq!(scope_finalize(""), "");
        assert_eq!(scope_finalize("foo"), "foo/");
        assert_eq!(scope_finalize("foo/"), "foo/");
        assert_eq!(scope_finalize("foo/bar"), "foo/bar/");
    }

    #[test]
    fn test_scope_dirname() {
        assert_eq!(scope_dirname("foo/bar/add"), "foo/bar/");
        assert_eq!(scope_dirname("add"), "");
        assert_eq!(scope_dirname("foo/"), "foo/");
    }

    #[test]
    fn test_scope_basename() {
        assert_eq!(scope_basename("foo/bar/add"), "add");
        assert_eq!(scope_basename("add"), "add");
        assert_eq!(scope_basename("foo/"), "");
    }

    #[test]
    fn test_rescope() {
        assert_eq!(rescope("layer/add", "layer", "copy").unwrap(), "copy/add");
        assert_eq!(rescope("layer/add", "layer/", "copy/").unwrap(), "copy/add");
        assert_eq!(rescope("add", "", "copy").unwrap(), "copy/add");
        assert_eq!(rescope("layer/add", "layer", "").unwrap(), "add");
    }

    #[test]
    fn test_rescope_mismatch() {
        let err = rescope("other/add", "layer", "copy").unwrap_err();
        assert!(matches!(err, GraphError::ScopeMismatch { .. }));
    }

    #[test]
    fn test_rescope_requires_whole_component() {
        // "layer" finalizes to "layer/", which "layers/add" does not start with
        assert!(rescope("layers/add", "layer", "copy").is_err());
    }
}
