//! Serializer producing `.npy` payloads.

use crate::array::{DType, NdArray};
use crate::datum::{drain, Datum};
use crate::error::SerializationError;
use crate::npy;
use crate::serializer::{Payload, Serializer};
use crate::value::Value;

/// Serializes arrays and lists into `application/x-npy`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumpySerializer {
  dtype: Option<DType>,
}

impl NumpySerializer {
  /// Content type of the produced payload.
  pub const CONTENT_TYPE: &'static str = "application/x-npy";

  /// Creates a serializer that infers element types.
  #[must_use]
  pub const fn new() -> Self {
    Self { dtype: None }
  }

  /// Creates a serializer that casts list input to `dtype`.
  #[must_use]
  pub const fn with_dtype(dtype: DType) -> Self {
    Self { dtype: Some(dtype) }
  }

  /// The declared element type, if any.
  #[must_use]
  pub const fn dtype(&self) -> Option<DType> {
    self.dtype
  }

  fn serialize_array(&self, array: &NdArray) -> Result<Payload, SerializationError> {
    let bytes = npy::encode(array)?;
    tracing::debug!(
      "NumpySerializer::serialize: {} array of shape {:?} into {} bytes",
      array.dtype(),
      array.shape(),
      bytes.len()
    );
    Ok(Payload::Binary(bytes))
  }
}

impl Serializer for NumpySerializer {
  fn content_type(&self) -> &'static str {
    Self::CONTENT_TYPE
  }

  fn serialize(&self, data: Datum) -> Result<Payload, SerializationError> {
    tracing::debug!("NumpySerializer::serialize: {} input", data.kind());
    match data {
      Datum::NativeArray(array) => {
        if array.size() == 0 {
          return Err(SerializationError::EmptyInput);
        }
        self.serialize_array(&array)
      }
      Datum::FlatSequence(items) | Datum::NestedSequence(items) => {
        if items.is_empty() {
          return Err(SerializationError::EmptyInput);
        }
        let array = NdArray::from_values(&items, self.dtype)?;
        self.serialize_array(&array)
      }
      Datum::Stream(reader) => Ok(Payload::Binary(drain(reader)?)),
      Datum::Scalar(value) => self.serialize_array(&NdArray::from_value(&value, None)?),
      Datum::Mapping(mapping) => self.serialize_array(&NdArray::from_value(&Value::Map(mapping), None)?),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::array::{ArrayData, ArrayError, MemoryOrder};
  use crate::value::Mapping;
  use rstest::rstest;
  use std::io::Cursor;

  fn round_trip(serializer: &NumpySerializer, data: Datum) -> NdArray {
    let payload = serializer.serialize(data).expect("serialize");
    let Payload::Binary(bytes) = payload else {
      panic!("expected binary payload");
    };
    npy::decode(&bytes).expect("decode")
  }

  #[test]
  fn content_type_is_x_npy() {
    assert_eq!(NumpySerializer::new().content_type(), "application/x-npy");
  }

  #[rstest]
  #[case(NdArray::from_vec(vec![1.0_f64, 2.0, 3.0]))]
  #[case(NdArray::new(vec![2, 2], vec![1_u8, 2, 3, 4]).expect("array"))]
  #[case(NdArray::with_order(vec![2, 3], MemoryOrder::Fortran, vec![1_i16, 4, 2, 5, 3, 6]).expect("array"))]
  #[case(NdArray::from_vec(vec!["x".to_string(), "yz".to_string()]))]
  fn arrays_round_trip_with_shape_and_dtype(#[case] array: NdArray) {
    let decoded = round_trip(&NumpySerializer::new(), Datum::from(array.clone()));
    assert_eq!(decoded, array);
  }

  #[test]
  fn declared_dtype_does_not_apply_to_native_arrays() {
    let array = NdArray::from_vec(vec![1_i64, 2]);
    let decoded = round_trip(&NumpySerializer::with_dtype(DType::Float32), Datum::from(array.clone()));
    assert_eq!(decoded, array);
  }

  #[test]
  fn builds_arrays_from_nested_lists() {
    let decoded = round_trip(&NumpySerializer::new(), Datum::from(vec![vec![1, 2], vec![3, 4]]));
    assert_eq!(decoded.shape(), &[2, 2]);
    assert_eq!(decoded.data(), &ArrayData::Int64(vec![1, 2, 3, 4]));
  }

  #[test]
  fn lists_of_typed_rows_keep_the_row_element_type() {
    let rows = vec![
      Value::Array(NdArray::from_vec(vec![1_i32, 2])),
      Value::Array(NdArray::from_vec(vec![3_i32, 4])),
    ];
    let decoded = round_trip(&NumpySerializer::new(), Datum::from(rows));
    assert_eq!(decoded.dtype(), DType::Int32);
    assert_eq!(decoded.shape(), &[2, 2]);
    assert_eq!(decoded.data(), &ArrayData::Int32(vec![1, 2, 3, 4]));
  }

  #[test]
  fn casts_lists_to_declared_dtype() {
    let decoded = round_trip(&NumpySerializer::with_dtype(DType::Float32), Datum::from(vec![1, 2, 3]));
    assert_eq!(decoded.data(), &ArrayData::Float32(vec![1.0, 2.0, 3.0]));
  }

  #[test]
  fn scalars_become_zero_dimensional_arrays() {
    let decoded = round_trip(&NumpySerializer::with_dtype(DType::Int8), Datum::classify(Value::Float(2.5)));
    assert!(decoded.shape().is_empty());
    assert_eq!(decoded.data(), &ArrayData::Float64(vec![2.5]));
  }

  #[rstest]
  #[case(Datum::from(Vec::<Value>::new()))]
  #[case(Datum::from(NdArray::from_vec(Vec::<i32>::new())))]
  #[case(Datum::from(NdArray::new(vec![3, 0], Vec::<i32>::new()).expect("array")))]
  fn rejects_empty_input(#[case] data: Datum) {
    let err = NumpySerializer::new().serialize(data).expect_err("empty");
    assert!(matches!(err, SerializationError::EmptyInput));
  }

  #[test]
  fn surfaces_cast_failures() {
    let err = NumpySerializer::with_dtype(DType::UInt8)
      .serialize(Datum::from(vec![256]))
      .expect_err("overflow");
    assert!(matches!(err, SerializationError::Array(ArrayError::OutOfBounds { .. })));
  }

  #[test]
  fn rejects_mappings() {
    let mapping = [("a", 1)].into_iter().collect::<Mapping>();
    let err = NumpySerializer::new().serialize(Datum::from(mapping)).expect_err("mapping");
    assert!(matches!(err, SerializationError::Array(ArrayError::UnsupportedElement { .. })));
  }

  #[test]
  fn passes_streams_through_unchanged() {
    let content = npy::encode(&NdArray::from_vec(vec![7_i32])).expect("encode");
    let payload = NumpySerializer::new()
      .serialize(Datum::stream(Cursor::new(content.clone())))
      .expect("serialize");
    assert_eq!(payload.into_bytes(), content);
  }
}
