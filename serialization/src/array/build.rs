//! Construction of arrays from dynamic values.

use super::{ArrayData, ArrayError, DType, NdArray};
use crate::value::{format_float, Value};

pub(super) fn from_value(value: &Value, dtype: Option<DType>) -> Result<NdArray, ArrayError> {
  match value {
    Value::List(items) => from_values(items, dtype),
    Value::Array(array) if dtype.is_none() || dtype == Some(array.dtype()) => Ok(array.clone()),
    other => {
      let shape = shape_of(other, 0)?;
      let mut leaves = Leaves::default();
      leaves.collect(other);
      leaves.build(shape, dtype)
    }
  }
}

pub(super) fn from_values(values: &[Value], dtype: Option<DType>) -> Result<NdArray, ArrayError> {
  let shape = list_shape(values, 0)?;
  let mut leaves = Leaves::default();
  for value in values {
    leaves.collect(value);
  }
  leaves.build(shape, dtype)
}

fn shape_of(value: &Value, depth: usize) -> Result<Vec<usize>, ArrayError> {
  match value {
    Value::List(items) => list_shape(items, depth),
    Value::Array(array) => Ok(array.shape().to_vec()),
    _ => Ok(Vec::new()),
  }
}

fn list_shape(items: &[Value], depth: usize) -> Result<Vec<usize>, ArrayError> {
  let mut inner: Option<Vec<usize>> = None;
  for item in items {
    let item_shape = shape_of(item, depth + 1)?;
    match &inner {
      None => inner = Some(item_shape),
      Some(expected) if *expected == item_shape => {}
      Some(_) => return Err(ArrayError::Inhomogeneous { depth: depth + 1 }),
    }
  }
  let mut shape = vec![items.len()];
  shape.extend(inner.unwrap_or_default());
  Ok(shape)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Kind {
  Bool,
  Int,
  Float,
  Str,
}

/// Leaves of a nested value in row-major order, with what is known about their element type.
///
/// Loose values are typed by kind. Nested arrays contribute their own dtype, which is promoted
/// against the loose kind the way numpy combines array dtypes.
#[derive(Debug, Default)]
struct Leaves {
  values: Vec<Value>,
  kind: Option<Kind>,
  has_negative: bool,
  has_wide_unsigned: bool,
  untyped: Option<ArrayError>,
  array_dtype: Option<DType>,
}

impl Leaves {
  fn collect(&mut self, value: &Value) {
    match value {
      Value::List(items) => {
        for item in items {
          self.collect(item);
        }
      }
      Value::Array(array) => {
        self.array_dtype = Some(match self.array_dtype {
          Some(dtype) => promote(dtype, array.dtype()),
          None => array.dtype(),
        });
        self.values.extend(array.flatten());
      }
      leaf => {
        self.observe(leaf);
        self.values.push(leaf.clone());
      }
    }
  }

  fn observe(&mut self, leaf: &Value) {
    let kind = match leaf {
      Value::Bool(_) => Kind::Bool,
      Value::Int(i) => {
        self.has_negative |= *i < 0;
        Kind::Int
      }
      Value::UInt(_) => {
        self.has_wide_unsigned = true;
        Kind::Int
      }
      Value::Float(_) => Kind::Float,
      Value::Str(_) => Kind::Str,
      other => {
        if self.untyped.is_none() {
          self.untyped = Some(unsupported(other));
        }
        return;
      }
    };
    self.kind = self.kind.max(Some(kind));
  }

  fn loose_dtype(&self) -> Option<DType> {
    Some(match self.kind? {
      Kind::Float => DType::Float64,
      Kind::Bool => DType::Bool,
      Kind::Int if self.has_wide_unsigned && self.has_negative => DType::Float64,
      Kind::Int if self.has_wide_unsigned => DType::UInt64,
      Kind::Int => DType::Int64,
      Kind::Str => DType::Str,
    })
  }

  fn infer_dtype(&mut self) -> Result<DType, ArrayError> {
    if let Some(err) = self.untyped.take() {
      return Err(err);
    }
    Ok(match (self.loose_dtype(), self.array_dtype) {
      (Some(loose), Some(array)) => promote(loose, array),
      (Some(dtype), None) | (None, Some(dtype)) => dtype,
      (None, None) => DType::Float64,
    })
  }

  fn build(mut self, shape: Vec<usize>, dtype: Option<DType>) -> Result<NdArray, ArrayError> {
    let dtype = match dtype {
      Some(dtype) => dtype,
      None => self.infer_dtype()?,
    };
    tracing::debug!("building {} array with shape {:?}", dtype, shape);
    let data = cast_leaves(&self.values, dtype)?;
    NdArray::new(shape, data)
  }
}

/// Smallest type both `a` and `b` convert to without losing range, following numpy's table.
fn promote(a: DType, b: DType) -> DType {
  if a == b {
    return a;
  }
  match (a, b) {
    (DType::Str, _) | (_, DType::Str) => DType::Str,
    (DType::Bool, other) | (other, DType::Bool) => other,
    (DType::Float64, _) | (_, DType::Float64) => DType::Float64,
    (DType::Float32, other) | (other, DType::Float32) if other.item_size() <= 2 => DType::Float32,
    (DType::Float32, _) | (_, DType::Float32) => DType::Float64,
    _ => promote_integers(a, b),
  }
}

fn promote_integers(a: DType, b: DType) -> DType {
  let signed = |dtype: DType| matches!(dtype, DType::Int8 | DType::Int16 | DType::Int32 | DType::Int64);
  if signed(a) == signed(b) {
    return if a.item_size() >= b.item_size() { a } else { b };
  }
  let (signed, unsigned) = if signed(a) { (a, b) } else { (b, a) };
  if signed.item_size() > unsigned.item_size() {
    return signed;
  }
  match unsigned.item_size() {
    1 => DType::Int16,
    2 => DType::Int32,
    4 => DType::Int64,
    _ => DType::Float64,
  }
}

fn cast_leaves(leaves: &[Value], dtype: DType) -> Result<ArrayData, ArrayError> {
  fn all<T>(leaves: &[Value], f: impl Fn(&Value) -> Result<T, ArrayError>) -> Result<Vec<T>, ArrayError> {
    leaves.iter().map(f).collect()
  }

  Ok(match dtype {
    DType::Bool => ArrayData::Bool(all(leaves, to_bool)?),
    DType::Int8 => ArrayData::Int8(all(leaves, |v| to_int(v, dtype))?),
    DType::Int16 => ArrayData::Int16(all(leaves, |v| to_int(v, dtype))?),
    DType::Int32 => ArrayData::Int32(all(leaves, |v| to_int(v, dtype))?),
    DType::Int64 => ArrayData::Int64(all(leaves, |v| to_int(v, dtype))?),
    DType::UInt8 => ArrayData::UInt8(all(leaves, |v| to_int(v, dtype))?),
    DType::UInt16 => ArrayData::UInt16(all(leaves, |v| to_int(v, dtype))?),
    DType::UInt32 => ArrayData::UInt32(all(leaves, |v| to_int(v, dtype))?),
    DType::UInt64 => ArrayData::UInt64(all(leaves, |v| to_int(v, dtype))?),
    DType::Float32 => ArrayData::Float32(all(leaves, |v| to_float(v, dtype).map(|f| f as f32))?),
    DType::Float64 => ArrayData::Float64(all(leaves, |v| to_float(v, dtype))?),
    DType::Str => ArrayData::Str(all(leaves, to_text)?),
  })
}

fn unsupported(value: &Value) -> ArrayError {
  ArrayError::UnsupportedElement {
    type_name: value.type_name().to_string(),
  }
}

fn invalid_cast(value: &Value, dtype: DType) -> ArrayError {
  ArrayError::InvalidCast {
    value: value.to_field_text(),
    dtype,
  }
}

fn to_bool(value: &Value) -> Result<bool, ArrayError> {
  match value {
    Value::Null => Ok(false),
    Value::Bool(b) => Ok(*b),
    Value::Int(i) => Ok(*i != 0),
    Value::UInt(u) => Ok(*u != 0),
    Value::Float(f) => Ok(*f != 0.0),
    Value::Str(s) => Ok(!s.is_empty()),
    other => Err(unsupported(other)),
  }
}

fn to_int<T>(value: &Value, dtype: DType) -> Result<T, ArrayError>
where
  T: TryFrom<i128>, {
  let wide = match value {
    Value::Bool(b) => i128::from(*b),
    Value::Int(i) => i128::from(*i),
    Value::UInt(u) => i128::from(*u),
    // Saturating conversion; anything past the target range fails below.
    Value::Float(f) if f.is_finite() => f.trunc() as i128,
    Value::Str(s) => s.trim().parse::<i128>().map_err(|_| invalid_cast(value, dtype))?,
    Value::Null | Value::Float(_) => return Err(invalid_cast(value, dtype)),
    other => return Err(unsupported(other)),
  };
  T::try_from(wide).map_err(|_| ArrayError::OutOfBounds {
    value: value.to_field_text(),
    dtype,
  })
}

fn to_float(value: &Value, dtype: DType) -> Result<f64, ArrayError> {
  match value {
    Value::Null => Ok(f64::NAN),
    Value::Bool(b) => Ok(f64::from(u8::from(*b))),
    Value::Int(i) => Ok(*i as f64),
    Value::UInt(u) => Ok(*u as f64),
    Value::Float(f) => Ok(*f),
    Value::Str(s) => s.trim().parse::<f64>().map_err(|_| invalid_cast(value, dtype)),
    other => Err(unsupported(other)),
  }
}

fn to_text(value: &Value) -> Result<String, ArrayError> {
  match value {
    Value::Null => Ok("None".to_string()),
    Value::Bool(b) => Ok((if *b { "True" } else { "False" }).to_string()),
    Value::Int(i) => Ok(i.to_string()),
    Value::UInt(u) => Ok(u.to_string()),
    Value::Float(f) => Ok(format_float(*f)),
    Value::Str(s) => Ok(s.clone()),
    other => Err(unsupported(other)),
  }
}
