//! Node attribute values
//!
//! This module provides the attribute layer shared by every node in a graph:
//! - Native attribute representation (`value`)
//! - Shape descriptors with optional rank and dimensions (`shape`)
//! - Dense constants backed by ndarray (`constant`)
//! - Codec between native values and the wire form (`codec`)
//!
//! # Example
//!
//! ```ignore
//! use graft::attr::{codec, AttrValue};
//!
//! // Encode a native value into its wire form
//! let proto = codec::encode(&AttrValue::Int(7))?;
//!
//! // Decode it back
//! let value = codec::decode(&proto)?;
//! assert_eq!(value, AttrValue::Int(7));
//! ```

pub mod codec;
pub mod constant;
pub mod shape;
pub mod value;

// Re-export commonly used items
pub use codec::{decode, decode_bytes, encode, encode_bytes};
pub use constant::Constant;
pub use shape::TensorShape;
pub use value::AttrValue;
