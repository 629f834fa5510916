//! Shape descriptors
//!
//! A `TensorShape` tracks what is statically known about a value's shape:
//! nothing at all (unknown rank), the rank with some unknown dimensions, or
//! every dimension. On the wire an unknown dimension is a negative size and
//! unknown rank is a dedicated flag; both normalize to `None` here.

use std::fmt;

use crate::proto::{tensor_shape_proto, TensorShapeProto};

/// Statically known shape information for a tensor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TensorShape {
    /// `None` when the rank itself is unknown; otherwise one entry per
    /// dimension, `None` for dimensions of unknown size.
    dims: Option<Vec<Option<i64>>>,
}

impl TensorShape {
    /// Shape with unknown rank.
    pub fn unknown() -> Self {
        TensorShape { dims: None }
    }

    /// Rank-zero shape.
    pub fn scalar() -> Self {
        TensorShape { dims: Some(Vec::new()) }
    }

    /// Shape with every dimension known. Negative sizes mark unknown
    /// dimensions, matching the wire convention.
    pub fn from_dims(dims: &[i64]) -> Self {
        TensorShape {
            dims: Some(
                dims.iter()
                    .map(|&d| if d < 0 { None } else { Some(d) })
                    .collect(),
            ),
        }
    }

    /// Shape with known rank, where each dimension is individually optional.
    pub fn from_partial(dims: Vec<Option<i64>>) -> Self {
        TensorShape { dims: Some(dims) }
    }

    /// Number of dimensions, if the rank is known.
    pub fn rank(&self) -> Option<usize> {
        self.dims.as_ref().map(Vec::len)
    }

    /// The dimensions, if the rank is known.
    pub fn dims(&self) -> Option<&[Option<i64>]> {
        self.dims.as_deref()
    }

    /// True when the rank and every dimension are known.
    pub fn is_fully_defined(&self) -> bool {
        match &self.dims {
            Some(dims) => dims.iter().all(Option::is_some),
            None => false,
        }
    }

    /// Total element count, when the shape is fully defined.
    pub fn num_elements(&self) -> Option<usize> {
        let dims = self.dims.as_ref()?;
        let mut count: usize = 1;
        for dim in dims {
            count = count.checked_mul((*dim)? as usize)?;
        }
        Some(count)
    }

    /// Convert to the wire form.
    pub fn to_proto(&self) -> TensorShapeProto {
        match &self.dims {
            None => TensorShapeProto {
                dim: Vec::new(),
                unknown_rank: true,
            },
            Some(dims) => TensorShapeProto {
                dim: dims
                    .iter()
                    .map(|dim| tensor_shape_proto::Dim {
                        size: dim.unwrap_or(-1),
                        name: String::new(),
                    })
                    .collect(),
                unknown_rank: false,
            },
        }
    }

    /// Convert from the wire form, normalizing negative sizes to unknown
    /// dimensions.
    pub fn from_proto(proto: &TensorShapeProto) -> Self {
        if proto.unknown_rank {
            return TensorShape::unknown();
        }
        TensorShape {
            dims: Some(
                proto
                    .dim
                    .iter()
                    .map(|d| if d.size < 0 { None } else { Some(d.size) })
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.dims {
            None => write!(f, "unknown"),
            Some(dims) => {
                write!(f, "[")?;
                for (i, dim) in dims.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match dim {
                        Some(size) => write!(f, "{}", size)?,
                        None => write!(f, "?")?,
                    }
                }
                write!(f, "]")
            }
        }
    }
}
