//! Error types for graft
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Main error type for graph editing operations
#[derive(Error, Debug)]
pub enum GraphError {
    /// An input had a different type or kind than the operation accepts
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// What the operation accepts
        expected: &'static str,
        /// What was actually supplied
        actual: String,
    },

    /// An element belongs to a different graph than the operation requires
    #[error("Graph mismatch: {0}")]
    GraphMismatch(String),

    /// A required collection argument was empty
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    /// A name did not start with the expected scope prefix
    #[error("Name {name:?} does not start with scope {scope:?}")]
    ScopeMismatch {
        /// The offending name
        name: String,
        /// The scope it was expected under
        scope: String,
    },

    /// A named element was looked up but does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A value kind the attribute codec cannot represent
    #[error("Unsupported attribute type: {0}")]
    UnsupportedType(String),

    /// The graph or selection violated a structural precondition
    #[error("Structural error: {0}")]
    StructuralError(String),

    /// A node name that already exists in the graph
    #[error("Duplicate node name: {0}")]
    DuplicateName(String),

    /// An argument was malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Wire decode error
    #[error("Wire decode error: {0}")]
    Decode(#[from] prost::DecodeError),
}

/// Result type alias for graph editing operations
pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GraphError::NotFound("foo/bar:0".to_string());
        assert!(err.to_string().contains("foo/bar:0"));
    }

    #[test]
    fn test_scope_mismatch_display() {
        let err = GraphError::ScopeMismatch {
            name: "other/add".to_string(),
            scope: "layer/".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("other/add"));
        assert!(text.contains("layer/"));
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = GraphError::TypeMismatch {
            expected: "tensor reference",
            actual: "node reference".to_string(),
        };
        assert!(err.to_string().contains("tensor reference"));
    }
}
