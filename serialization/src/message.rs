//! Serialized payload paired with its content type.

use crate::serializer::Payload;

/// Header name carrying [`SerializedPayload::content_type`].
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Output of [`Serializer::serialize_with_content_type`](crate::Serializer::serialize_with_content_type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedPayload {
  /// Content type of the serializer that produced the payload.
  pub content_type: &'static str,
  /// Encoded request body.
  pub payload: Payload,
}

impl SerializedPayload {
  /// Pairs a payload with its content type.
  #[must_use]
  pub fn new(content_type: &'static str, payload: Payload) -> Self {
    Self { content_type, payload }
  }

  /// The `Content-Type` header entry for this payload.
  #[must_use]
  pub fn header(&self) -> (&'static str, &'static str) {
    (CONTENT_TYPE_HEADER, self.content_type)
  }

  /// Splits into content type and payload.
  #[must_use]
  pub fn into_parts(self) -> (&'static str, Payload) {
    (self.content_type, self.payload)
  }
}
