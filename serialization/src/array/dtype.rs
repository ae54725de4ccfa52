//! Element type descriptors.

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Element type of a [`NdArray`](crate::array::NdArray).
///
/// Parses numpy style names and type codes, so `"float32"`, `"f4"` and `"<f4"` all resolve to
/// [`DType::Float32`]. String arrays have no declared width: the width written on the wire is
/// the longest element, measured in code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum DType {
  /// Booleans stored as one byte each.
  #[strum(to_string = "bool", serialize = "?", serialize = "b1", serialize = "|b1")]
  Bool,
  /// Signed 8-bit integer.
  #[strum(to_string = "int8", serialize = "i1", serialize = "|i1")]
  Int8,
  /// Signed 16-bit integer.
  #[strum(to_string = "int16", serialize = "i2", serialize = "<i2")]
  Int16,
  /// Signed 32-bit integer.
  #[strum(to_string = "int32", serialize = "i4", serialize = "<i4")]
  Int32,
  /// Signed 64-bit integer.
  #[strum(to_string = "int64", serialize = "int", serialize = "i8", serialize = "<i8")]
  Int64,
  /// Unsigned 8-bit integer.
  #[strum(to_string = "uint8", serialize = "u1", serialize = "|u1")]
  UInt8,
  /// Unsigned 16-bit integer.
  #[strum(to_string = "uint16", serialize = "u2", serialize = "<u2")]
  UInt16,
  /// Unsigned 32-bit integer.
  #[strum(to_string = "uint32", serialize = "u4", serialize = "<u4")]
  UInt32,
  /// Unsigned 64-bit integer.
  #[strum(to_string = "uint64", serialize = "uint", serialize = "u8", serialize = "<u8")]
  UInt64,
  /// Single precision float.
  #[strum(to_string = "float32", serialize = "f4", serialize = "<f4")]
  Float32,
  /// Double precision float.
  #[strum(to_string = "float64", serialize = "float", serialize = "f8", serialize = "<f8")]
  Float64,
  /// Fixed width unicode string.
  #[strum(to_string = "str", serialize = "U", serialize = "<U", serialize = "unicode")]
  Str,
}

impl DType {
  /// Size in bytes of one element; string elements report the size of a single code point.
  #[must_use]
  pub const fn item_size(self) -> usize {
    match self {
      DType::Bool | DType::Int8 | DType::UInt8 => 1,
      DType::Int16 | DType::UInt16 => 2,
      DType::Int32 | DType::UInt32 | DType::Float32 | DType::Str => 4,
      DType::Int64 | DType::UInt64 | DType::Float64 => 8,
    }
  }

  /// Whether the type is one of the integer types.
  #[must_use]
  pub const fn is_integer(self) -> bool {
    matches!(
      self,
      DType::Int8 | DType::Int16 | DType::Int32 | DType::Int64 | DType::UInt8 | DType::UInt16 | DType::UInt32 | DType::UInt64
    )
  }

  /// Canonical name, e.g. `"float32"`.
  #[must_use]
  pub fn name(self) -> &'static str {
    self.into()
  }
}
