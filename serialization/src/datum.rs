//! Classified serializer input.

use crate::array::NdArray;
use crate::value::{Mapping, Value};
use std::fmt;
use std::io::{self, Read};

/// Input handed to [`Serializer::serialize`](crate::Serializer::serialize).
///
/// The shape of the input is decided once, either by the caller or by [`Datum::classify`],
/// and each serializer dispatches on the variant.
pub enum Datum {
  /// A readable source whose content is already in the target format.
  Stream(Box<dyn Read + Send>),
  /// A single value without rows: a number, boolean, string, null, or opaque value.
  Scalar(Value),
  /// A sequence whose first element is not itself a sequence.
  FlatSequence(Vec<Value>),
  /// A sequence of rows, detected from its first element.
  NestedSequence(Vec<Value>),
  /// A native n-dimensional array.
  NativeArray(NdArray),
  /// A string keyed mapping.
  Mapping(Mapping),
}

impl Datum {
  /// Classifies a value.
  ///
  /// A list is a [`Datum::NestedSequence`] when its first element is a list, an array or a
  /// string; only the first element is inspected.
  #[must_use]
  pub fn classify(value: Value) -> Self {
    match value {
      Value::List(items) if items.first().is_some_and(Value::is_sequence_like) => Datum::NestedSequence(items),
      Value::List(items) => Datum::FlatSequence(items),
      Value::Array(array) => Datum::NativeArray(array),
      Value::Map(mapping) => Datum::Mapping(mapping),
      scalar => Datum::Scalar(scalar),
    }
  }

  /// Wraps a reader whose content is passed through unchanged.
  pub fn stream(reader: impl Read + Send + 'static) -> Self {
    Datum::Stream(Box::new(reader))
  }

  /// Name of the variant, used in log output.
  #[must_use]
  pub fn kind(&self) -> &'static str {
    match self {
      Datum::Stream(_) => "stream",
      Datum::Scalar(_) => "scalar",
      Datum::FlatSequence(_) => "flat sequence",
      Datum::NestedSequence(_) => "nested sequence",
      Datum::NativeArray(_) => "native array",
      Datum::Mapping(_) => "mapping",
    }
  }
}

/// Reads everything left in a stream.
pub(crate) fn drain(mut reader: Box<dyn Read + Send>) -> io::Result<Vec<u8>> {
  let mut content = Vec::new();
  reader.read_to_end(&mut content)?;
  tracing::debug!("passing through {} bytes of stream content", content.len());
  Ok(content)
}

impl fmt::Debug for Datum {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Datum::Stream(_) => f.write_str("Stream(..)"),
      Datum::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
      Datum::FlatSequence(items) => f.debug_tuple("FlatSequence").field(items).finish(),
      Datum::NestedSequence(items) => f.debug_tuple("NestedSequence").field(items).finish(),
      Datum::NativeArray(array) => f.debug_tuple("NativeArray").field(array).finish(),
      Datum::Mapping(mapping) => f.debug_tuple("Mapping").field(mapping).finish(),
    }
  }
}

impl From<Value> for Datum {
  fn from(value: Value) -> Self {
    Datum::classify(value)
  }
}

impl From<NdArray> for Datum {
  fn from(array: NdArray) -> Self {
    Datum::NativeArray(array)
  }
}

impl From<Mapping> for Datum {
  fn from(mapping: Mapping) -> Self {
    Datum::Mapping(mapping)
  }
}

impl<T: Into<Value>> From<Vec<T>> for Datum {
  fn from(values: Vec<T>) -> Self {
    Datum::classify(Value::from(values))
  }
}

impl From<&str> for Datum {
  fn from(value: &str) -> Self {
    Datum::Scalar(Value::from(value))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lists_of_lists_are_nested_sequences() {
    let datum = Datum::from(vec![vec![1, 2], vec![3, 4]]);
    assert!(matches!(datum, Datum::NestedSequence(rows) if rows.len() == 2));
  }

  #[test]
  fn lists_of_strings_are_nested_sequences() {
    assert!(matches!(Datum::from(vec!["ab", "cd"]), Datum::NestedSequence(_)));
  }

  #[test]
  fn only_the_first_element_decides() {
    let value = Value::List(vec![Value::Int(1), Value::from(vec![2, 3])]);
    assert!(matches!(Datum::classify(value), Datum::FlatSequence(_)));
  }

  #[test]
  fn empty_lists_are_flat_sequences() {
    assert!(matches!(Datum::from(Vec::<Value>::new()), Datum::FlatSequence(items) if items.is_empty()));
  }

  #[test]
  fn other_values_are_scalars() {
    assert!(matches!(Datum::classify(Value::Int(3)), Datum::Scalar(Value::Int(3))));
    assert!(matches!(Datum::from("abc"), Datum::Scalar(Value::Str(_))));
    assert!(matches!(Datum::classify(Value::Map(Mapping::new())), Datum::Mapping(_)));
  }

  #[test]
  fn drains_streams_completely() {
    let datum = Datum::stream(io::Cursor::new(b"1,2\n3,4".to_vec()));
    let Datum::Stream(reader) = datum else {
      panic!("expected a stream");
    };
    assert_eq!(drain(reader).expect("drain"), b"1,2\n3,4");
  }
}
