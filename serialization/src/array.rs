//! Native n-dimensional arrays.
//!
//! [`NdArray`] is the typed, homogeneous counterpart of nested [`Value`] lists. It keeps its
//! elements in one flat buffer laid out in the array's [`MemoryOrder`], which is exactly the
//! layout written to `.npy` payloads.

mod build;
mod dtype;
mod text;

pub use dtype::DType;

use crate::value::{format_float, format_float32, Value};
use thiserror::Error;

/// Error raised while constructing or casting an array.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayError {
  /// The element count does not match the product of the shape.
  #[error("cannot reshape array of size {len} into shape {shape:?}")]
  ShapeMismatch {
    /// Requested shape.
    shape: Vec<usize>,
    /// Number of elements supplied.
    len: usize,
  },
  /// Nested sequences have different lengths at the same depth.
  #[error("setting an array element with a sequence: inhomogeneous shape after {depth} dimensions")]
  Inhomogeneous {
    /// Depth at which the lengths diverge.
    depth: usize,
  },
  /// A value of this type cannot be stored in a native array.
  #[error("cannot store a value of type {type_name} in an array")]
  UnsupportedElement {
    /// Type name of the offending value.
    type_name: String,
  },
  /// A value cannot be converted to the requested element type.
  #[error("cannot convert {value} to {dtype}")]
  InvalidCast {
    /// Textual form of the value.
    value: String,
    /// Requested element type.
    dtype: DType,
  },
  /// A numeric value is out of range for the requested element type.
  #[error("value {value} out of bounds for {dtype}")]
  OutOfBounds {
    /// Textual form of the value.
    value: String,
    /// Requested element type.
    dtype: DType,
  },
}

/// Layout of the flat element buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoryOrder {
  /// Row-major: the last axis varies fastest.
  #[default]
  C,
  /// Column-major: the first axis varies fastest.
  Fortran,
}

/// Typed element storage.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
  /// `bool` elements.
  Bool(Vec<bool>),
  /// `int8` elements.
  Int8(Vec<i8>),
  /// `int16` elements.
  Int16(Vec<i16>),
  /// `int32` elements.
  Int32(Vec<i32>),
  /// `int64` elements.
  Int64(Vec<i64>),
  /// `uint8` elements.
  UInt8(Vec<u8>),
  /// `uint16` elements.
  UInt16(Vec<u16>),
  /// `uint32` elements.
  UInt32(Vec<u32>),
  /// `uint64` elements.
  UInt64(Vec<u64>),
  /// `float32` elements.
  Float32(Vec<f32>),
  /// `float64` elements.
  Float64(Vec<f64>),
  /// Unicode string elements.
  Str(Vec<String>),
}

macro_rules! for_each_data {
  ($data:expr, $items:ident => $body:expr) => {
    match $data {
      ArrayData::Bool($items) => $body,
      ArrayData::Int8($items) => $body,
      ArrayData::Int16($items) => $body,
      ArrayData::Int32($items) => $body,
      ArrayData::Int64($items) => $body,
      ArrayData::UInt8($items) => $body,
      ArrayData::UInt16($items) => $body,
      ArrayData::UInt32($items) => $body,
      ArrayData::UInt64($items) => $body,
      ArrayData::Float32($items) => $body,
      ArrayData::Float64($items) => $body,
      ArrayData::Str($items) => $body,
    }
  };
}

impl ArrayData {
  /// Element type of the storage.
  #[must_use]
  pub fn dtype(&self) -> DType {
    match self {
      ArrayData::Bool(_) => DType::Bool,
      ArrayData::Int8(_) => DType::Int8,
      ArrayData::Int16(_) => DType::Int16,
      ArrayData::Int32(_) => DType::Int32,
      ArrayData::Int64(_) => DType::Int64,
      ArrayData::UInt8(_) => DType::UInt8,
      ArrayData::UInt16(_) => DType::UInt16,
      ArrayData::UInt32(_) => DType::UInt32,
      ArrayData::UInt64(_) => DType::UInt64,
      ArrayData::Float32(_) => DType::Float32,
      ArrayData::Float64(_) => DType::Float64,
      ArrayData::Str(_) => DType::Str,
    }
  }

  /// Number of stored elements.
  #[must_use]
  pub fn len(&self) -> usize {
    for_each_data!(self, items => items.len())
  }

  /// Whether no elements are stored.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn value_at(&self, index: usize) -> Value {
    match self {
      ArrayData::Bool(items) => Value::Bool(items[index]),
      ArrayData::Int8(items) => Value::from(items[index]),
      ArrayData::Int16(items) => Value::from(items[index]),
      ArrayData::Int32(items) => Value::from(items[index]),
      ArrayData::Int64(items) => Value::from(items[index]),
      ArrayData::UInt8(items) => Value::from(items[index]),
      ArrayData::UInt16(items) => Value::from(items[index]),
      ArrayData::UInt32(items) => Value::from(items[index]),
      ArrayData::UInt64(items) => Value::from(items[index]),
      ArrayData::Float32(items) => Value::from(items[index]),
      ArrayData::Float64(items) => Value::from(items[index]),
      ArrayData::Str(items) => Value::Str(items[index].clone()),
    }
  }

  fn text_at(&self, index: usize) -> String {
    match self {
      ArrayData::Bool(items) => (if items[index] { "True" } else { "False" }).to_string(),
      ArrayData::Float32(items) => format_float32(items[index]),
      ArrayData::Float64(items) => format_float(items[index]),
      ArrayData::Str(items) => items[index].clone(),
      ArrayData::Int8(items) => items[index].to_string(),
      ArrayData::Int16(items) => items[index].to_string(),
      ArrayData::Int32(items) => items[index].to_string(),
      ArrayData::Int64(items) => items[index].to_string(),
      ArrayData::UInt8(items) => items[index].to_string(),
      ArrayData::UInt16(items) => items[index].to_string(),
      ArrayData::UInt32(items) => items[index].to_string(),
      ArrayData::UInt64(items) => items[index].to_string(),
    }
  }
}

macro_rules! array_data_from_vec {
  ($($ty:ty => $variant:ident),* $(,)?) => {
    $(
      impl From<Vec<$ty>> for ArrayData {
        fn from(items: Vec<$ty>) -> Self {
          ArrayData::$variant(items)
        }
      }
    )*
  };
}

array_data_from_vec!(
  bool => Bool,
  i8 => Int8,
  i16 => Int16,
  i32 => Int32,
  i64 => Int64,
  u8 => UInt8,
  u16 => UInt16,
  u32 => UInt32,
  u64 => UInt64,
  f32 => Float32,
  f64 => Float64,
  String => Str,
);

/// A homogeneous, typed, n-dimensional array.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
  shape: Vec<usize>,
  order: MemoryOrder,
  data: ArrayData,
}

impl NdArray {
  /// Creates a row-major array from a shape and its elements.
  pub fn new(shape: Vec<usize>, data: impl Into<ArrayData>) -> Result<Self, ArrayError> {
    Self::with_order(shape, MemoryOrder::C, data)
  }

  /// Creates an array whose elements are laid out in the given memory order.
  ///
  /// Arrays with fewer than two dimensions are the same in both orders and are stored as
  /// row-major.
  pub fn with_order(shape: Vec<usize>, order: MemoryOrder, data: impl Into<ArrayData>) -> Result<Self, ArrayError> {
    let data = data.into();
    let expected = shape.iter().product::<usize>();
    if expected != data.len() {
      return Err(ArrayError::ShapeMismatch { shape, len: data.len() });
    }
    let order = if shape.len() < 2 { MemoryOrder::C } else { order };
    Ok(Self { shape, order, data })
  }

  /// Creates a one-dimensional array.
  #[must_use]
  pub fn from_vec(items: impl Into<ArrayData>) -> Self {
    let data = items.into();
    Self {
      shape: vec![data.len()],
      order: MemoryOrder::C,
      data,
    }
  }

  /// Builds an array from a value, casting leaves to `dtype` when one is given.
  ///
  /// Without a declared type the element type is the promotion of all leaves
  /// (`bool` < `int64` < `float64` < `str`). Arrays nested inside lists bring their own element
  /// type, so a list of `int32` rows stays `int32`. Nested lists must be rectangular.
  pub fn from_value(value: &Value, dtype: Option<DType>) -> Result<Self, ArrayError> {
    build::from_value(value, dtype)
  }

  /// Builds an array from a list of values; see [`NdArray::from_value`].
  pub fn from_values(values: &[Value], dtype: Option<DType>) -> Result<Self, ArrayError> {
    build::from_values(values, dtype)
  }

  /// Element type.
  #[must_use]
  pub fn dtype(&self) -> DType {
    self.data.dtype()
  }

  /// Extent of each axis.
  #[must_use]
  pub fn shape(&self) -> &[usize] {
    &self.shape
  }

  /// Number of axes.
  #[must_use]
  pub fn ndim(&self) -> usize {
    self.shape.len()
  }

  /// Total number of elements.
  #[must_use]
  pub fn size(&self) -> usize {
    self.data.len()
  }

  /// Layout of the element buffer.
  #[must_use]
  pub fn order(&self) -> MemoryOrder {
    self.order
  }

  /// Element buffer in [`NdArray::order`].
  #[must_use]
  pub fn data(&self) -> &ArrayData {
    &self.data
  }

  /// Buffer positions of the elements, visited in row-major order.
  fn row_major_positions(&self) -> Vec<usize> {
    let size = self.size();
    if self.order == MemoryOrder::C {
      return (0..size).collect();
    }
    let mut strides = Vec::with_capacity(self.shape.len());
    let mut stride = 1;
    for extent in &self.shape {
      strides.push(stride);
      stride *= extent;
    }
    (0..size)
      .map(|linear| {
        let mut rest = linear;
        let mut position = 0;
        for (extent, stride) in self.shape.iter().zip(&strides).rev() {
          position += (rest % extent) * stride;
          rest /= extent;
        }
        position
      })
      .collect()
  }

  /// Elements flattened in row-major order.
  #[must_use]
  pub fn flatten(&self) -> Vec<Value> {
    self
      .row_major_positions()
      .into_iter()
      .map(|position| self.data.value_at(position))
      .collect()
  }

  /// Cell texts of the elements flattened in row-major order.
  pub(crate) fn row_major_fields(&self) -> Vec<String> {
    self
      .row_major_positions()
      .into_iter()
      .map(|position| self.data.text_at(position))
      .collect()
  }

  /// Converts the array into nested lists; a zero-dimensional array becomes its only element.
  #[must_use]
  pub fn to_value(&self) -> Value {
    let flat = self.flatten();
    if self.shape.is_empty() {
      return flat.into_iter().next().unwrap_or(Value::Null);
    }
    nest(&flat, &self.shape)
  }
}

fn nest(flat: &[Value], shape: &[usize]) -> Value {
  match shape {
    [] | [_] => Value::List(flat.to_vec()),
    [extent, rest @ ..] => {
      let stride = rest.iter().product::<usize>();
      let rows = (0..*extent)
        .map(|row| nest(&flat[row * stride..(row + 1) * stride], rest))
        .collect();
      Value::List(rows)
    }
  }
}

#[cfg(test)]
mod tests;
