//! Attribute codec
//!
//! Converts between native `AttrValue`s and the wire form. Every native
//! variant maps to exactly one wire field, so `decode(encode(v))` returns
//! `v` for any scalar or structured value. Lists are the one lossy spot:
//! the wire groups list elements into parallel per-kind fields, so a mixed
//! list decodes with its elements reordered by kind (wire field order) while
//! a homogeneous list round-trips exactly.

use prost::Message;

use crate::attr::constant::Constant;
use crate::attr::shape::TensorShape;
use crate::attr::value::AttrValue;
use crate::error::{GraphError, GraphResult};
use crate::proto::attr_value_proto::Value;
use crate::proto::{AttrValueProto, DataType, ListValue};

/// Encode a native value into its wire form.
///
/// Fails with `UnsupportedType` for a list nested inside a list, which the
/// wire format cannot represent.
pub fn encode(value: &AttrValue) -> GraphResult<AttrValueProto> {
    let value = match value {
        AttrValue::Str(s) => Value::S(s.as_bytes().to_vec()),
        AttrValue::Int(i) => Value::I(*i),
        AttrValue::Float(f) => Value::F(*f),
        AttrValue::Bool(b) => Value::B(*b),
        AttrValue::DType(dt) => Value::Type(*dt as i32),
        AttrValue::Shape(shape) => Value::Shape(shape.to_proto()),
        AttrValue::Tensor(constant) => Value::Tensor(constant.to_proto()),
        AttrValue::List(items) => Value::List(encode_list(items)?),
    };
    Ok(AttrValueProto { value: Some(value) })
}

/// Decode a wire value into its native form.
///
/// Fails with `UnsupportedType` when no wire field is populated or a
/// datatype code is out of range, and with `InvalidInput` for malformed
/// payloads such as non-UTF-8 strings.
pub fn decode(proto: &AttrValueProto) -> GraphResult<AttrValue> {
    let value = proto.value.as_ref().ok_or_else(|| {
        GraphError::UnsupportedType("attribute with no populated field".to_string())
    })?;
    match value {
        Value::S(bytes) => Ok(AttrValue::Str(string_from_wire(bytes)?)),
        Value::I(i) => Ok(AttrValue::Int(*i)),
        Value::F(f) => Ok(AttrValue::Float(*f)),
        Value::B(b) => Ok(AttrValue::Bool(*b)),
        Value::Type(code) => Ok(AttrValue::DType(dtype_from_wire(*code)?)),
        Value::Shape(shape) => Ok(AttrValue::Shape(TensorShape::from_proto(shape))),
        Value::Tensor(tensor) => Ok(AttrValue::Tensor(Constant::from_proto(tensor)?)),
        Value::List(list) => Ok(AttrValue::List(decode_list(list)?)),
    }
}

/// Encode a native value into wire bytes.
pub fn encode_bytes(value: &AttrValue) -> GraphResult<Vec<u8>> {
    Ok(encode(value)?.encode_to_vec())
}

/// Decode wire bytes into a native value.
pub fn decode_bytes(bytes: &[u8]) -> GraphResult<AttrValue> {
    let proto = AttrValueProto::decode(bytes)?;
    decode(&proto)
}

fn encode_list(items: &[AttrValue]) -> GraphResult<ListValue> {
    let mut list = ListValue::default();
    for item in items {
        match item {
            AttrValue::Str(s) => list.s.push(s.as_bytes().to_vec()),
            AttrValue::Int(i) => list.i.push(*i),
            AttrValue::Float(f) => list.f.push(*f),
            AttrValue::Bool(b) => list.b.push(*b),
            AttrValue::DType(dt) => list.r#type.push(*dt as i32),
            AttrValue::Shape(shape) => list.shape.push(shape.to_proto()),
            AttrValue::Tensor(constant) => list.tensor.push(constant.to_proto()),
            AttrValue::List(_) => {
                return Err(GraphError::UnsupportedType(
                    "nested list attribute".to_string(),
                ))
            }
        }
    }
    Ok(list)
}

// Elements come back grouped by wire field, in field-number order.
fn decode_list(list: &ListValue) -> GraphResult<Vec<AttrValue>> {
    let mut items = Vec::new();
    for bytes in &list.s {
        items.push(AttrValue::Str(string_from_wire(bytes)?));
    }
    for &i in &list.i {
        items.push(AttrValue::Int(i));
    }
    for &f in &list.f {
        items.push(AttrValue::Float(f));
    }
    for &b in &list.b {
        items.push(AttrValue::Bool(b));
    }
    for &code in &list.r#type {
        items.push(AttrValue::DType(dtype_from_wire(code)?));
    }
    for shape in &list.shape {
        items.push(AttrValue::Shape(TensorShape::from_proto(shape)));
    }
    for tensor in &list.tensor {
        items.push(AttrValue::Tensor(Constant::from_proto(tensor)?));
    }
    Ok(items)
}

fn string_from_wire(bytes: &[u8]) -> GraphResult<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| GraphError::InvalidInput("attribute string is not valid UTF-8".to_string()))
}

fn dtype_from_wire(code: i32) -> GraphResult<DataType> {
    DataType::try_from(code)
        .map_err(|_| GraphError::UnsupportedType(format!("datatype code {}", code)))
}
