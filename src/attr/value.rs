//! Native attribute representation
//!
//! `AttrValue` is the in-memory form of a node attribute. The wire form
//! (`AttrValueProto`) is produced and consumed by the `codec` submodule;
//! everything else in the crate works with this type.

use crate::attr::constant::Constant;
use crate::attr::shape::TensorShape;
use crate::proto::DataType;

/// A decoded node attribute.
///
/// The variants mirror the wire encoding one-to-one, so every representable
/// attribute has exactly one native form. Lists hold scalar and structured
/// elements but never other lists; the wire format has no nesting.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// UTF-8 string
    Str(String),
    /// 64-bit integer
    Int(i64),
    /// 32-bit float
    Float(f32),
    /// Boolean
    Bool(bool),
    /// Element datatype
    DType(DataType),
    /// Shape descriptor
    Shape(TensorShape),
    /// Dense constant
    Tensor(Constant),
    /// List of non-list values
    List(Vec<AttrValue>),
}

impl AttrValue {
    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            AttrValue::Str(_) => "str",
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::Bool(_) => "bool",
            AttrValue::DType(_) => "dtype",
            AttrValue::Shape(_) => "shape",
            AttrValue::Tensor(_) => "tensor",
            AttrValue::List(_) => "list",
        }
    }

    /// Get the string payload if this is a string attribute.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer payload if this is an integer attribute.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the datatype payload if this is a datatype attribute.
    pub fn as_dtype(&self) -> Option<DataType> {
        match self {
            AttrValue::DType(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Get the shape payload if this is a shape attribute.
    pub fn as_shape(&self) -> Option<&TensorShape> {
        match self {
            AttrValue::Shape(shape) => Some(shape),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<f32> for AttrValue {
    fn from(value: f32) -> Self {
        AttrValue::Float(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<DataType> for AttrValue {
    fn from(value: DataType) -> Self {
        AttrValue::DType(value)
    }
}

impl From<TensorShape> for AttrValue {
    fn from(value: TensorShape) -> Self {
        AttrValue::Shape(value)
    }
}

impl From<Constant> for AttrValue {
    fn from(value: Constant) -> Self {
        AttrValue::Tensor(value)
    }
}

impl From<Vec<AttrValue>> for AttrValue {
    fn from(value: Vec<AttrValue>) -> Self {
        AttrValue::List(value)
    }
}
