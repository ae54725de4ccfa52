//! Dynamic values handed to the serializers.

use crate::array::NdArray;
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer as SerdeSerializer};

/// A dynamically typed datum element.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  /// Absence of a value.
  Null,
  /// Boolean.
  Bool(bool),
  /// Signed integer.
  Int(i64),
  /// Unsigned integer that may exceed `i64::MAX`.
  UInt(u64),
  /// Double precision float, non-finite values included.
  Float(f64),
  /// UTF-8 string.
  Str(String),
  /// Ordered sequence of values.
  List(Vec<Value>),
  /// String keyed mapping with insertion order.
  Map(Mapping),
  /// Native n-dimensional array.
  Array(NdArray),
  /// A value none of the wire formats can represent.
  Opaque {
    /// Name reported in error messages.
    type_name: String,
  },
}

impl Value {
  /// Returns a short name of the value's type, used in error messages.
  #[must_use]
  pub fn type_name(&self) -> &str {
    match self {
      Value::Null => "null",
      Value::Bool(_) => "bool",
      Value::Int(_) | Value::UInt(_) => "int",
      Value::Float(_) => "float",
      Value::Str(_) => "str",
      Value::List(_) => "list",
      Value::Map(_) => "mapping",
      Value::Array(_) => "ndarray",
      Value::Opaque { type_name } => type_name,
    }
  }

  /// Whether the value can be iterated and indexed like a row of cells.
  ///
  /// Strings count as sequences, so a list of strings is treated as a list of rows.
  #[must_use]
  pub fn is_sequence_like(&self) -> bool {
    matches!(self, Value::List(_) | Value::Array(_) | Value::Str(_))
  }

  /// Creates an opaque value carrying the given type name.
  #[must_use]
  pub fn opaque(type_name: impl Into<String>) -> Self {
    Value::Opaque {
      type_name: type_name.into(),
    }
  }

  /// Text written into a CSV cell for this value.
  pub(crate) fn to_field_text(&self) -> String {
    match self {
      Value::Null => String::new(),
      Value::Str(s) => s.clone(),
      Value::Array(array) => array.to_cell_text(),
      other => other.to_repr(),
    }
  }

  /// Literal representation used when a value is nested inside a cell.
  fn to_repr(&self) -> String {
    match self {
      Value::Null => "None".to_string(),
      Value::Bool(true) => "True".to_string(),
      Value::Bool(false) => "False".to_string(),
      Value::Int(i) => i.to_string(),
      Value::UInt(u) => u.to_string(),
      Value::Float(f) => format_float(*f),
      Value::Str(s) => quote_str(s),
      Value::List(items) => {
        let inner = items.iter().map(Value::to_repr).collect::<Vec<_>>();
        format!("[{}]", inner.join(", "))
      }
      Value::Map(mapping) => {
        let inner = mapping
          .iter()
          .map(|(key, value)| format!("{}: {}", quote_str(key), value.to_repr()))
          .collect::<Vec<_>>();
        format!("{{{}}}", inner.join(", "))
      }
      Value::Array(array) => array.to_literal(),
      Value::Opaque { type_name } => format!("<{type_name}>"),
    }
  }
}

/// Quotes a string the way Python's `repr` does.
///
/// Single quotes are used unless the text contains a single quote and no double quote.
pub(crate) fn quote_str(text: &str) -> String {
  let quote = if text.contains('\'') && !text.contains('"') { '"' } else { '\'' };
  let mut quoted = String::with_capacity(text.len() + 2);
  quoted.push(quote);
  for ch in text.chars() {
    match ch {
      '\\' => quoted.push_str("\\\\"),
      '\n' => quoted.push_str("\\n"),
      '\r' => quoted.push_str("\\r"),
      '\t' => quoted.push_str("\\t"),
      ch if ch == quote => {
        quoted.push('\\');
        quoted.push(ch);
      }
      ch if ch.is_control() => quoted.push_str(&format!("\\x{:02x}", u32::from(ch))),
      ch => quoted.push(ch),
    }
  }
  quoted.push(quote);
  quoted
}

/// Formats a float in its shortest round-trip form, always keeping a fractional part or an exponent.
///
/// Exponents carry an explicit sign and at least two digits (`1e+16`, `1e-05`).
pub(crate) fn format_float(value: f64) -> String {
  if value.is_nan() {
    return "nan".to_string();
  }
  if value.is_infinite() {
    return (if value.is_sign_positive() { "inf" } else { "-inf" }).to_string();
  }
  let text = format!("{value:?}");
  normalize_exponent(text)
}

/// Same as [`format_float`] for single precision elements.
pub(crate) fn format_float32(value: f32) -> String {
  if value.is_nan() || value.is_infinite() {
    return format_float(f64::from(value));
  }
  normalize_exponent(format!("{value:?}"))
}

fn normalize_exponent(text: String) -> String {
  match text.split_once('e') {
    Some((mantissa, exponent)) => {
      let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
      };
      format!("{mantissa}e{sign}{digits:0>2}")
    }
    None => text,
  }
}

impl Serialize for Value {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: SerdeSerializer, {
    match self {
      Value::Null => serializer.serialize_unit(),
      Value::Bool(b) => serializer.serialize_bool(*b),
      Value::Int(i) => serializer.serialize_i64(*i),
      Value::UInt(u) => serializer.serialize_u64(*u),
      Value::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
      Value::Float(f) => Err(S::Error::custom(format!(
        "out of range float values are not JSON compliant: {}",
        format_float(*f)
      ))),
      Value::Str(s) => serializer.serialize_str(s),
      Value::List(items) => {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
          seq.serialize_element(item)?;
        }
        seq.end()
      }
      Value::Map(mapping) => mapping.serialize(serializer),
      Value::Array(_) => Err(S::Error::custom("object of type ndarray is not JSON serializable")),
      Value::Opaque { type_name } => Err(S::Error::custom(format!(
        "object of type {type_name} is not JSON serializable"
      ))),
    }
  }
}

/// String keyed mapping that iterates in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
  entries: Vec<(String, Value)>,
}

impl Mapping {
  /// Creates an empty mapping.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts a value, replacing an existing entry in place and returning the previous value.
  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
    let key = key.into();
    let value = value.into();
    match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
      Some((_, slot)) => Some(std::mem::replace(slot, value)),
      None => {
        self.entries.push((key, value));
        None
      }
    }
  }

  /// Looks up a value by key.
  #[must_use]
  pub fn get(&self, key: &str) -> Option<&Value> {
    self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
  }

  /// Number of entries.
  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Whether the mapping has no entries.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Iterates entries in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
    self.entries.iter().map(|(k, v)| (k, v))
  }

  /// Iterates keys in insertion order.
  pub fn keys(&self) -> impl Iterator<Item = &String> {
    self.entries.iter().map(|(k, _)| k)
  }
}

impl<K, V> FromIterator<(K, V)> for Mapping
where
  K: Into<String>,
  V: Into<Value>,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut mapping = Mapping::new();
    for (key, value) in iter {
      mapping.insert(key, value);
    }
    mapping
  }
}

impl IntoIterator for Mapping {
  type IntoIter = std::vec::IntoIter<(String, Value)>;
  type Item = (String, Value);

  fn into_iter(self) -> Self::IntoIter {
    self.entries.into_iter()
  }
}

impl Serialize for Mapping {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: SerdeSerializer, {
    let mut map = serializer.serialize_map(Some(self.entries.len()))?;
    for (key, value) in &self.entries {
      map.serialize_entry(key, value)?;
    }
    map.end()
  }
}

macro_rules! value_from_int {
  ($($ty:ty),*) => {
    $(
      impl From<$ty> for Value {
        fn from(value: $ty) -> Self {
          Value::Int(i64::from(value))
        }
      }
    )*
  };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
  fn from(value: u64) -> Self {
    match i64::try_from(value) {
      Ok(i) => Value::Int(i),
      Err(_) => Value::UInt(value),
    }
  }
}

impl From<bool> for Value {
  fn from(value: bool) -> Self {
    Value::Bool(value)
  }
}

impl From<f32> for Value {
  fn from(value: f32) -> Self {
    Value::Float(f64::from(value))
  }
}

impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Value::Float(value)
  }
}

impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Value::Str(value.to_string())
  }
}

impl From<String> for Value {
  fn from(value: String) -> Self {
    Value::Str(value)
  }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
  fn from(values: Vec<T>) -> Self {
    Value::List(values.into_iter().map(Into::into).collect())
  }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(value: Option<T>) -> Self {
    value.map_or(Value::Null, Into::into)
  }
}

impl From<Mapping> for Value {
  fn from(value: Mapping) -> Self {
    Value::Map(value)
  }
}

impl From<NdArray> for Value {
  fn from(value: NdArray) -> Self {
    Value::Array(value)
  }
}

impl From<serde_json::Value> for Value {
  fn from(value: serde_json::Value) -> Self {
    match value {
      serde_json::Value::Null => Value::Null,
      serde_json::Value::Bool(b) => Value::Bool(b),
      serde_json::Value::Number(n) => {
        if let Some(i) = n.as_i64() {
          Value::Int(i)
        } else if let Some(u) = n.as_u64() {
          Value::UInt(u)
        } else {
          Value::Float(n.as_f64().unwrap_or(f64::NAN))
        }
      }
      serde_json::Value::String(s) => Value::Str(s),
      serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
      serde_json::Value::Object(object) => Value::Map(object.into_iter().collect()),
    }
  }
}
