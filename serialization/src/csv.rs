//! Serializer producing comma-separated text.

use crate::array::NdArray;
use crate::datum::{drain, Datum};
use crate::error::SerializationError;
use crate::serializer::{Payload, Serializer};
use crate::value::Value;

/// Serializes rows of values into `text/csv`.
///
/// A sequence of rows becomes one record per line, joined by `\n` with no trailing line
/// terminator. Strings are taken as already formatted rows and are not quoted again.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSerializer;

impl CsvSerializer {
  /// Content type of the produced payload.
  pub const CONTENT_TYPE: &'static str = "text/csv";

  /// Creates a new CSV serializer.
  #[must_use]
  pub const fn new() -> Self {
    Self
  }

  fn serialize_rows(&self, rows: Vec<Value>) -> Result<String, SerializationError> {
    tracing::debug!("CsvSerializer::serialize: {} rows", rows.len());
    let lines = rows
      .into_iter()
      .map(|row| self.serialize_row(row))
      .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
  }

  fn serialize_row(&self, row: Value) -> Result<String, SerializationError> {
    match row {
      Value::Str(text) => Ok(text),
      Value::Array(array) => self.write_record(&array.row_major_fields()),
      Value::List(items) => {
        let fields = items.iter().map(Value::to_field_text).collect::<Vec<_>>();
        self.write_record(&fields)
      }
      other => Err(SerializationError::unsupported_shape(other.type_name())),
    }
  }

  fn serialize_array(&self, array: &NdArray) -> Result<String, SerializationError> {
    let fields = array.row_major_fields();
    match array.shape() {
      [rows, ..] if array.ndim() >= 2 && *rows > 0 => {
        let row_len = fields.len() / rows;
        if row_len == 0 {
          return Err(SerializationError::EmptyInput);
        }
        tracing::debug!("CsvSerializer::serialize: {} array rows of {} cells", rows, row_len);
        let lines = fields
          .chunks(row_len)
          .map(|row| self.write_record(row))
          .collect::<Result<Vec<_>, _>>()?;
        Ok(lines.join("\n"))
      }
      _ => self.write_record(&fields),
    }
  }

  /// Writes a single record with minimal quoting and strips the line terminator.
  fn write_record(&self, fields: &[String]) -> Result<String, SerializationError> {
    if fields.is_empty() {
      return Err(SerializationError::EmptyInput);
    }
    let mut writer = ::csv::WriterBuilder::new()
      .has_headers(false)
      .quote_style(::csv::QuoteStyle::Necessary)
      .terminator(::csv::Terminator::CRLF)
      .from_writer(Vec::new());
    writer.write_record(fields)?;
    let buffer = writer.into_inner().map_err(|err| err.into_error())?;
    let record = String::from_utf8(buffer).map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    Ok(record.trim_end_matches(&['\r', '\n'][..]).to_string())
  }
}

impl Serializer for CsvSerializer {
  fn content_type(&self) -> &'static str {
    Self::CONTENT_TYPE
  }

  fn serialize(&self, data: Datum) -> Result<Payload, SerializationError> {
    tracing::debug!("CsvSerializer::serialize: {} input", data.kind());
    let text = match data {
      Datum::Stream(reader) => return Ok(Payload::Binary(drain(reader)?)),
      Datum::NestedSequence(rows) => self.serialize_rows(rows)?,
      Datum::NativeArray(array) => self.serialize_array(&array)?,
      Datum::FlatSequence(items) => self.serialize_row(Value::List(items))?,
      Datum::Scalar(value) => self.serialize_row(value)?,
      Datum::Mapping(mapping) if mapping.is_empty() => return Err(SerializationError::EmptyInput),
      Datum::Mapping(_) => return Err(SerializationError::unsupported_shape("mapping")),
    };
    Ok(Payload::Text(text))
  }
}
