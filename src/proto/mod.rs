//! Wire-format protocol buffer types
//!
//! Message types for the attribute wire encoding. Field numbers match the
//! TensorFlow `attr_value.proto` / `tensor.proto` / `tensor_shape.proto` /
//! `types.proto` schema, so bytes produced here interchange with any tooling
//! speaking that format. The subset needed by this crate is small and stable,
//! which is why the messages are written out by hand instead of generated at
//! build time; the `prost` attributes are exactly what `prost-build` would
//! emit for the same schema.
//!
//! Extension methods are provided in the `extensions` submodule.

/// Extension methods for wire types
pub mod extensions;

/// Wire form of a single node attribute.
///
/// Exactly one variant of the inner oneof is populated at a time. A message
/// with no populated variant is rejected by the codec with an
/// `UnsupportedType` error.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AttrValueProto {
    /// The populated variant, if any.
    #[prost(oneof = "attr_value_proto::Value", tags = "1, 2, 3, 4, 5, 6, 7, 8")]
    pub value: Option<attr_value_proto::Value>,
}

/// Nested types for [`AttrValueProto`].
pub mod attr_value_proto {
    /// The tagged union carried by an [`AttrValueProto`](super::AttrValueProto).
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Value {
        /// List of values; element kinds share the parallel repeated fields
        /// of [`ListValue`](super::ListValue).
        #[prost(message, tag = "1")]
        List(super::ListValue),
        /// UTF-8 string payload, stored as bytes on the wire.
        #[prost(bytes, tag = "2")]
        S(Vec<u8>),
        /// 64-bit integer.
        #[prost(int64, tag = "3")]
        I(i64),
        /// 32-bit float.
        #[prost(float, tag = "4")]
        F(f32),
        /// Boolean.
        #[prost(bool, tag = "5")]
        B(bool),
        /// Datatype code (see [`DataType`](super::DataType)).
        #[prost(enumeration = "super::DataType", tag = "6")]
        Type(i32),
        /// Shape descriptor.
        #[prost(message, tag = "7")]
        Shape(super::TensorShapeProto),
        /// Dense constant.
        #[prost(message, tag = "8")]
        Tensor(super::TensorProto),
    }
}

/// Wire form of a list attribute.
///
/// Elements are grouped into parallel repeated fields by kind, one field per
/// scalar variant; interleaving order across kinds is not preserved on the
/// wire.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListValue {
    /// String elements.
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub s: Vec<Vec<u8>>,
    /// Integer elements.
    #[prost(int64, repeated, tag = "3")]
    pub i: Vec<i64>,
    /// Float elements.
    #[prost(float, repeated, tag = "4")]
    pub f: Vec<f32>,
    /// Boolean elements.
    #[prost(bool, repeated, tag = "5")]
    pub b: Vec<bool>,
    /// Datatype code elements.
    #[prost(enumeration = "DataType", repeated, tag = "6")]
    pub r#type: Vec<i32>,
    /// Shape elements.
    #[prost(message, repeated, tag = "7")]
    pub shape: Vec<TensorShapeProto>,
    /// Dense constant elements.
    #[prost(message, repeated, tag = "8")]
    pub tensor: Vec<TensorProto>,
}

/// Wire form of a shape descriptor.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TensorShapeProto {
    /// Dimensions, outermost first. A negative size marks an unknown
    /// dimension. Meaningless when `unknown_rank` is set.
    #[prost(message, repeated, tag = "2")]
    pub dim: Vec<tensor_shape_proto::Dim>,
    /// If true, the rank itself is unknown and `dim` must be empty.
    #[prost(bool, tag = "3")]
    pub unknown_rank: bool,
}

/// Nested types for [`TensorShapeProto`].
pub mod tensor_shape_proto {
    /// One dimension of a shape.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Dim {
        /// Size of this dimension; -1 if unknown.
        #[prost(int64, tag = "1")]
        pub size: i64,
        /// Optional dimension name.
        #[prost(string, tag = "2")]
        pub name: String,
    }
}

/// Wire form of a dense constant.
///
/// Element data lives either in `tensor_content` (packed little-endian
/// bytes) or in the typed `*_val` field matching `dtype`, never both.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TensorProto {
    /// Element datatype code.
    #[prost(enumeration = "DataType", tag = "1")]
    pub dtype: i32,
    /// Shape of the constant.
    #[prost(message, optional, tag = "2")]
    pub tensor_shape: Option<TensorShapeProto>,
    /// Serialization version; 0 for this layout.
    #[prost(int32, tag = "3")]
    pub version_number: i32,
    /// Packed little-endian element bytes in row-major order.
    #[prost(bytes = "vec", tag = "4")]
    pub tensor_content: Vec<u8>,
    /// Elements of a float constant.
    #[prost(float, repeated, tag = "5")]
    pub float_val: Vec<f32>,
    /// Elements of a double constant.
    #[prost(double, repeated, tag = "6")]
    pub double_val: Vec<f64>,
    /// Elements of an int32 constant.
    #[prost(int32, repeated, tag = "7")]
    pub int_val: Vec<i32>,
    /// Elements of a string constant.
    #[prost(bytes = "vec", repeated, tag = "8")]
    pub string_val: Vec<Vec<u8>>,
    /// Elements of an int64 constant.
    #[prost(int64, repeated, tag = "10")]
    pub int64_val: Vec<i64>,
    /// Elements of a boolean constant.
    #[prost(bool, repeated, tag = "11")]
    pub bool_val: Vec<bool>,
}

/// Element datatype codes, numerically identical to the interchange schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum DataType {
    /// Unset or unknown datatype.
    Invalid = 0,
    /// 32-bit float.
    Float = 1,
    /// 64-bit float.
    Double = 2,
    /// 32-bit signed integer.
    Int32 = 3,
    /// 8-bit unsigned integer.
    UInt8 = 4,
    /// 16-bit signed integer.
    Int16 = 5,
    /// 8-bit signed integer.
    Int8 = 6,
    /// Variable-length byte string.
    String = 7,
    /// Single-precision complex.
    Complex64 = 8,
    /// 64-bit signed integer.
    Int64 = 9,
    /// Boolean.
    Bool = 10,
    /// Quantized 8-bit signed integer.
    QInt8 = 11,
    /// Quantized 8-bit unsigned integer.
    QUInt8 = 12,
    /// Quantized 32-bit signed integer.
    QInt32 = 13,
    /// bfloat16.
    BFloat16 = 14,
    /// Quantized 16-bit signed integer.
    QInt16 = 15,
    /// Quantized 16-bit unsigned integer.
    QUInt16 = 16,
    /// 16-bit unsigned integer.
    UInt16 = 17,
    /// Double-precision complex.
    Complex128 = 18,
    /// 16-bit float.
    Half = 19,
    /// Opaque resource handle.
    Resource = 20,
    /// Opaque variant value.
    Variant = 21,
    /// 32-bit unsigned integer.
    UInt32 = 22,
    /// 64-bit unsigned integer.
    UInt64 = 23,
}
