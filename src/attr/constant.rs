//! Dense constants
//!
//! Conversion between the wire form of a constant (`TensorProto`) and
//! ndarray-backed native storage. Element data on the wire lives either in
//! the packed little-endian byte field or in the typed repeated field
//! matching the datatype; decoding accepts both, encoding always uses the
//! typed field.

use ndarray::{Array, ArrayD, IxDyn};

use crate::attr::shape::TensorShape;
use crate::error::{GraphError, GraphResult};
use crate::proto::{tensor_shape_proto, DataType, TensorProto, TensorShapeProto};

/// A dense constant with a fully defined shape.
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    /// 32-bit float elements
    F32(ArrayD<f32>),
    /// 64-bit float elements
    F64(ArrayD<f64>),
    /// 32-bit integer elements
    I32(ArrayD<i32>),
    /// 64-bit integer elements
    I64(ArrayD<i64>),
    /// Boolean elements
    Bool(ArrayD<bool>),
}

impl Constant {
    /// Element datatype of this constant.
    pub fn dtype(&self) -> DataType {
        match self {
            Constant::F32(_) => DataType::Float,
            Constant::F64(_) => DataType::Double,
            Constant::I32(_) => DataType::Int32,
            Constant::I64(_) => DataType::Int64,
            Constant::Bool(_) => DataType::Bool,
        }
    }

    /// Dimensions of this constant, outermost first.
    pub fn dims(&self) -> Vec<i64> {
        let dims = match self {
            Constant::F32(a) => a.shape(),
            Constant::F64(a) => a.shape(),
            Constant::I32(a) => a.shape(),
            Constant::I64(a) => a.shape(),
            Constant::Bool(a) => a.shape(),
        };
        dims.iter().map(|&d| d as i64).collect()
    }

    /// Shape of this constant; always fully defined.
    pub fn shape(&self) -> TensorShape {
        TensorShape::from_dims(&self.dims())
    }

    /// Total number of elements.
    pub fn num_elements(&self) -> usize {
        match self {
            Constant::F32(a) => a.len(),
            Constant::F64(a) => a.len(),
            Constant::I32(a) => a.len(),
            Constant::I64(a) => a.len(),
            Constant::Bool(a) => a.len(),
        }
    }

    /// Convert to the wire form. Elements go to the typed repeated field in
    /// row-major order.
    pub fn to_proto(&self) -> TensorProto {
        let tensor_shape = Some(TensorShapeProto {
            dim: self
                .dims()
                .iter()
                .map(|&size| tensor_shape_proto::Dim {
                    size,
                    name: String::new(),
                })
                .collect(),
            unknown_rank: false,
        });
        match self {
            Constant::F32(a) => TensorProto {
                dtype: DataType::Float as i32,
                tensor_shape,
                float_val: a.iter().copied().collect(),
                ..Default::default()
            },
            Constant::F64(a) => TensorProto {
                dtype: DataType::Double as i32,
                tensor_shape,
                double_val: a.iter().copied().collect(),
                ..Default::default()
            },
            Constant::I32(a) => TensorProto {
                dtype: DataType::Int32 as i32,
                tensor_shape,
                int_val: a.iter().copied().collect(),
                ..Default::default()
            },
            Constant::I64(a) => TensorProto {
                dtype: DataType::Int64 as i32,
                tensor_shape,
                int64_val: a.iter().copied().collect(),
                ..Default::default()
            },
            Constant::Bool(a) => TensorProto {
                dtype: DataType::Bool as i32,
                tensor_shape,
                bool_val: a.iter().copied().collect(),
                ..Default::default()
            },
        }
    }

    /// Convert from the wire form.
    ///
    /// The shape must be fully defined. Element data is read from the packed
    /// byte field when present, otherwise from the typed repeated field, and
    /// the element count must match the shape exactly.
    pub fn from_proto(tensor: &TensorProto) -> GraphResult<Self> {
        let dtype = DataType::try_from(tensor.dtype)
            .map_err(|_| GraphError::UnsupportedType(format!("datatype code {}", tensor.dtype)))?;
        let shape = proto_dims(tensor)?;
        match dtype {
            DataType::Float => {
                let data = if tensor.has_tensor_content() {
                    content_to_f32(&tensor.tensor_content)?
                } else {
                    tensor.float_val.clone()
                };
                build_array(&shape, data).map(Constant::F32)
            }
            DataType::Double => {
                let data = if tensor.has_tensor_content() {
                    content_to_f64(&tensor.tensor_content)?
                } else {
                    tensor.double_val.clone()
                };
                build_array(&shape, data).map(Constant::F64)
            }
            DataType::Int32 => {
                let data = if tensor.has_tensor_content() {
                    content_to_i32(&tensor.tensor_content)?
                } else {
                    tensor.int_val.clone()
                };
                build_array(&shape, data).map(Constant::I32)
            }
            DataType::Int64 => {
                let data = if tensor.has_tensor_content() {
                    content_to_i64(&tensor.tensor_content)?
                } else {
                    tensor.int64_val.clone()
                };
                build_array(&shape, data).map(Constant::I64)
            }
            DataType::Bool => {
                let data = if tensor.has_tensor_content() {
                    content_to_bool(&tensor.tensor_content)
                } else {
                    tensor.bool_val.clone()
                };
                build_array(&shape, data).map(Constant::Bool)
            }
            other => Err(GraphError::UnsupportedType(format!(
                "constant datatype {:?}",
                other
            ))),
        }
    }
}

/// Extract fully defined dimensions from the wire form. A missing shape
/// message means a scalar.
fn proto_dims(tensor: &TensorProto) -> GraphResult<Vec<usize>> {
    let shape = match tensor.tensor_shape.as_ref() {
        Some(shape) => shape,
        None => return Ok(Vec::new()),
    };
    if shape.unknown_rank {
        return Err(GraphError::InvalidInput(
            "constant shape has unknown rank".to_string(),
        ));
    }
    shape
        .dim
        .iter()
        .map(|dim| {
            if dim.size < 0 {
                Err(GraphError::InvalidInput(format!(
                    "constant dimension of size {} is not fully defined",
                    dim.size
                )))
            } else {
                Ok(dim.size as usize)
            }
        })
        .collect()
}

fn build_array<T>(shape: &[usize], data: Vec<T>) -> GraphResult<ArrayD<T>> {
    let expected: usize = shape.iter().product();
    if data.len() != expected {
        return Err(GraphError::InvalidInput(format!(
            "constant has {} elements but shape {:?} implies {}",
            data.len(),
            shape,
            expected
        )));
    }
    Array::from_shape_vec(IxDyn(shape), data)
        .map_err(|e| GraphError::InvalidInput(format!("constant shape error: {}", e)))
}

fn content_to_f32(content: &[u8]) -> GraphResult<Vec<f32>> {
    if content.len() % 4 != 0 {
        return Err(GraphError::InvalidInput(format!(
            "packed content length {} is not a multiple of 4",
            content.len()
        )));
    }
    Ok(content
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn content_to_f64(content: &[u8]) -> GraphResult<Vec<f64>> {
    if content.len() % 8 != 0 {
        return Err(GraphError::InvalidInput(format!(
            "packed content length {} is not a multiple of 8",
            content.len()
        )));
    }
    Ok(content
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
        .collect())
}

fn content_to_i32(content: &[u8]) -> GraphResult<Vec<i32>> {
    if content.len() % 4 != 0 {
        return Err(GraphError::InvalidInput(format!(
            "packed content length {} is not a multiple of 4",
            content.len()
        )));
    }
    Ok(content
        .chunks_exact(4)
        .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn content_to_i64(content: &[u8]) -> GraphResult<Vec<i64>> {
    if content.len() % 8 != 0 {
        return Err(GraphError::InvalidInput(format!(
            "packed content length {} is not a multiple of 8",
            content.len()
        )));
    }
    Ok(content
        .chunks_exact(8)
        .map(|c| i64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
        .collect())
}

fn content_to_bool(content: &[u8]) -> Vec<bool> {
    content.iter().map(|&b| b != 0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    fn wire_shape(dims: &[i64]) -> Option<TensorShapeProto> {
        Some(TensorShapeProto {
            dim: dims
                .iter()
                .map(|&size| tensor_shape_proto::Dim {
                    size,
                    name: String::new(),
                })
                .collect(),
            unknown_rank: false,
        })
    }

    #[test]
    fn test_round_trip_f32() {
        let array = arr2(&[[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]]).into_dyn();
        let constant = Constant::F32(array.clone());
        let proto = constant.to_proto();
        assert_eq!(proto.dtype, DataType::Float as i32);
        assert_eq!(proto.float_val, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(Constant::from_proto(&proto).unwrap(), Constant::F32(array));
    }

    #[test]
    fn test_from_packed_content() {
        let mut content = Vec::new();
        for v in [1.5f32, -2.0, 0.25, 8.0] {
            content.extend_from_slice(&v.to_le_bytes());
        }
        let proto = TensorProto {
            dtype: DataType::Float as i32,
            tensor_shape: wire_shape(&[2, 2]),
            tensor_content: content,
            ..Default::default()
        };
        let constant = Constant::from_proto(&proto).unwrap();
        assert_eq!(
            constant,
            Constant::F32(arr2(&[[1.5f32, -2.0], [0.25, 8.0]]).into_dyn())
        );
    }

    #[test]
    fn test_scalar_without_shape_message() {
        let proto = TensorProto {
            dtype: DataType::Int64 as i32,
            int64_val: vec![42],
            ..Default::default()
        };
        let constant = Constant::from_proto(&proto).unwrap();
        assert_eq!(constant.dims(), Vec::<i64>::new());
        assert_eq!(constant.num_elements(), 1);
    }

    #[test]
    fn test_bool_content() {
        let proto = TensorProto {
            dtype: DataType::Bool as i32,
            tensor_shape: wire_shape(&[3]),
            tensor_content: vec![1, 0, 2],
            ..Default::default()
        };
        let constant = Constant::from_proto(&proto).unwrap();
        assert_eq!(
            constant,
            Constant::Bool(ndarray::arr1(&[true, false, true]).into_dyn())
        );
    }

    #[test]
    fn test_length_mismatch() {
        let proto = TensorProto {
            dtype: DataType::Float as i32,
            tensor_shape: wire_shape(&[2, 3]),
            float_val: vec![1.0, 2.0],
            ..Default::default()
        };
        assert!(matches!(
            Constant::from_proto(&proto),
            Err(GraphError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_ragged_content() {
        let proto = TensorProto {
            dtype: DataType::Float as i32,
            tensor_shape: wire_shape(&[1]),
            tensor_content: vec![0, 0, 0],
            ..Default::default()
        };
        assert!(matches!(
            Constant::from_proto(&proto),
            Err(GraphError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unsupported_dtype() {
        let proto = TensorProto {
            dtype: DataType::String as i32,
            tensor_shape: wire_shape(&[1]),
            string_val: vec![b"x".to_vec()],
            ..Default::default()
        };
        assert!(matches!(
            Constant::from_proto(&proto),
            Err(GraphError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_partial_shape_rejected() {
        let proto = TensorProto {
            dtype: DataType::Float as i32,
            tensor_shape: wire_shape(&[-1, 2]),
            float_val: vec![1.0, 2.0],
            ..Default::default()
        };
        assert!(Constant::from_proto(&proto).is_err());
    }
}
