//! Extension methods for wire types
//!
//! Small helpers shared by the attribute codec and the constant decoder.

use super::{attr_value_proto, AttrValueProto, ListValue, TensorProto};

// ============================================================================
// AttrValueProto extensions
// ============================================================================

impl AttrValueProto {
    /// Name of the populated wire field, or `"unset"` when no variant is
    /// present. Used in diagnostics.
    pub fn field_name(&self) -> &'static str {
        match &self.value {
            Some(attr_value_proto::Value::List(_)) => "list",
            Some(attr_value_proto::Value::S(_)) => "s",
            Some(attr_value_proto::Value::I(_)) => "i",
            Some(attr_value_proto::Value::F(_)) => "f",
            Some(attr_value_proto::Value::B(_)) => "b",
            Some(attr_value_proto::Value::Type(_)) => "type",
            Some(attr_value_proto::Value::Shape(_)) => "shape",
            Some(attr_value_proto::Value::Tensor(_)) => "tensor",
            None => "unset",
        }
    }
}

// ============================================================================
// ListValue extensions
// ============================================================================

impl ListValue {
    /// Check whether every parallel field is empty.
    pub fn is_empty(&self) -> bool {
        self.s.is_empty()
            && self.i.is_empty()
            && self.f.is_empty()
            && self.b.is_empty()
            && self.r#type.is_empty()
            && self.shape.is_empty()
            && self.tensor.is_empty()
    }
}

// ============================================================================
// TensorProto extensions
// ============================================================================

impl TensorProto {
    /// Total number of elements implied by the shape, or `None` when the
    /// shape is missing, has unknown rank, or contains an unknown dimension.
    pub fn num_elements(&self) -> Option<usize> {
        let shape = self.tensor_shape.as_ref()?;
        if shape.unknown_rank {
            return None;
        }
        let mut count: usize = 1;
        for dim in &shape.dim {
            if dim.size < 0 {
                return None;
            }
            count = count.checked_mul(dim.size as usize)?;
        }
        Some(count)
    }

    /// Check whether element data is carried in the packed byte field.
    pub fn has_tensor_content(&self) -> bool {
        !self.tensor_content.is_empty()
    }
}
