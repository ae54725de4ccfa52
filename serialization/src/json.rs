//! Serializer producing JSON text, backed by `serde_json`.

use crate::datum::{drain, Datum};
use crate::error::SerializationError;
use crate::serializer::{Payload, Serializer};
use crate::value::{format_float, format_float32, Mapping, Value};
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

/// Serializes mappings, arrays and plain values into `application/json`.
///
/// Items are separated by `", "` and keys by `": "`. With `ensure_ascii` (the default) every
/// non-ASCII character is written as a `\uXXXX` escape.
#[derive(Debug, Clone, Copy)]
pub struct JsonSerializer {
  ensure_ascii: bool,
}

impl Default for JsonSerializer {
  fn default() -> Self {
    Self::new()
  }
}

impl JsonSerializer {
  /// Content type of the produced payload.
  pub const CONTENT_TYPE: &'static str = "application/json";

  /// Creates a serializer that escapes non-ASCII characters.
  #[must_use]
  pub const fn new() -> Self {
    Self { ensure_ascii: true }
  }

  /// Creates a serializer with the given non-ASCII escaping behavior.
  #[must_use]
  pub const fn with_ensure_ascii(ensure_ascii: bool) -> Self {
    Self { ensure_ascii }
  }

  /// Whether non-ASCII characters are escaped.
  #[must_use]
  pub const fn ensure_ascii(&self) -> bool {
    self.ensure_ascii
  }

  /// Encodes any serde value with this serializer's formatting.
  pub fn to_json<T>(&self, value: &T) -> Result<String, SerializationError>
  where
    T: Serialize + ?Sized, {
    let mut buffer = Vec::new();
    let formatter = SpacedFormatter {
      ensure_ascii: self.ensure_ascii,
    };
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    let text = String::from_utf8(buffer).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    Ok(text)
  }
}

impl Serializer for JsonSerializer {
  fn content_type(&self) -> &'static str {
    Self::CONTENT_TYPE
  }

  fn serialize(&self, data: Datum) -> Result<Payload, SerializationError> {
    tracing::debug!("JsonSerializer::serialize: {} input", data.kind());
    let text = match data {
      Datum::Mapping(mapping) => {
        let converted = mapping
          .into_iter()
          .map(|(key, value)| match value {
            Value::Array(array) => (key, array.to_value()),
            other => (key, other),
          })
          .collect::<Mapping>();
        self.to_json(&converted)?
      }
      Datum::Stream(reader) => return Ok(Payload::Binary(drain(reader)?)),
      Datum::NativeArray(array) => self.to_json(&array.to_value())?,
      Datum::Scalar(value) => self.to_json(&value)?,
      Datum::FlatSequence(items) | Datum::NestedSequence(items) => self.to_json(&items)?,
    };
    Ok(Payload::Text(text))
  }
}

/// Formatter writing `", "` and `": "` separators and optionally escaping non-ASCII text.
struct SpacedFormatter {
  ensure_ascii: bool,
}

impl Formatter for SpacedFormatter {
  fn write_f32<W>(&mut self, writer: &mut W, value: f32) -> io::Result<()>
  where
    W: ?Sized + io::Write, {
    writer.write_all(format_float32(value).as_bytes())
  }

  fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
  where
    W: ?Sized + io::Write, {
    writer.write_all(format_float(value).as_bytes())
  }

  fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
  where
    W: ?Sized + io::Write, {
    if first {
      Ok(())
    } else {
      writer.write_all(b", ")
    }
  }

  fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
  where
    W: ?Sized + io::Write, {
    if first {
      Ok(())
    } else {
      writer.write_all(b", ")
    }
  }

  fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
  where
    W: ?Sized + io::Write, {
    writer.write_all(b": ")
  }

  fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
  where
    W: ?Sized + io::Write, {
    if !self.ensure_ascii || fragment.bytes().all(|b| b.is_ascii() && b != 0x7f) {
      return writer.write_all(fragment.as_bytes());
    }
    let mut units = [0_u16; 2];
    for ch in fragment.chars() {
      if ch.is_ascii() && ch != '\x7f' {
        writer.write_all(&[ch as u8])?;
      } else {
        for unit in ch.encode_utf16(&mut units).iter() {
          write!(writer, "\\u{unit:04x}")?;
        }
      }
    }
    Ok(())
  }
}
