//! Serializer trait defining the boundary between in-memory data and request payloads.

use crate::datum::Datum;
use crate::error::SerializationError;
use crate::message::SerializedPayload;

/// Encoded request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
  /// Text produced by the CSV and JSON serializers.
  Text(String),
  /// Bytes produced by the NPY serializer, and stream content passed through as is.
  Binary(Vec<u8>),
}

impl Payload {
  /// Borrows the payload as bytes.
  #[must_use]
  pub fn as_bytes(&self) -> &[u8] {
    match self {
      Payload::Text(text) => text.as_bytes(),
      Payload::Binary(bytes) => bytes,
    }
  }

  /// Consumes the payload, returning its bytes.
  #[must_use]
  pub fn into_bytes(self) -> Vec<u8> {
    match self {
      Payload::Text(text) => text.into_bytes(),
      Payload::Binary(bytes) => bytes,
    }
  }

  /// Returns the text of a [`Payload::Text`].
  #[must_use]
  pub fn as_text(&self) -> Option<&str> {
    match self {
      Payload::Text(text) => Some(text),
      Payload::Binary(_) => None,
    }
  }

  /// Length in bytes.
  #[must_use]
  pub fn len(&self) -> usize {
    self.as_bytes().len()
  }

  /// Whether the payload has no bytes.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Abstraction implemented by the concrete payload encoders.
pub trait Serializer: Send + Sync {
  /// Describes the wire-level content type produced by this serializer (e.g. `application/json`).
  ///
  /// The value never depends on the input.
  fn content_type(&self) -> &'static str;

  /// Converts `data` into a request payload.
  fn serialize(&self, data: Datum) -> Result<Payload, SerializationError>;

  /// Serializes `data` and pairs the payload with [`Serializer::content_type`].
  fn serialize_with_content_type(&self, data: Datum) -> Result<SerializedPayload, SerializationError> {
    let payload = self.serialize(data)?;
    Ok(SerializedPayload::new(self.content_type(), payload))
  }
}
