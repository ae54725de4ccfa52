//! Error types used across the serializers.

use crate::array::ArrayError;
use crate::npy::NpyError;
use thiserror::Error;

/// Error returned when a datum cannot be serialized.
#[derive(Debug, Error)]
pub enum SerializationError {
  /// A collection of length zero was handed to the CSV or NPY serializer.
  #[error("cannot serialize empty array")]
  EmptyInput,
  /// A CSV row is neither a string nor a sequence.
  #[error("unable to handle input format: {type_name}")]
  UnsupportedShape {
    /// Type name of the offending input.
    type_name: String,
  },
  /// Building a native array failed.
  #[error(transparent)]
  Array(#[from] ArrayError),
  /// Writing or reading `.npy` data failed.
  #[error(transparent)]
  Npy(#[from] NpyError),
  /// The JSON encoder rejected the value.
  #[error(transparent)]
  Json(#[from] serde_json::Error),
  /// The CSV writer failed.
  #[error(transparent)]
  Csv(#[from] csv::Error),
  /// Reading a stream failed.
  #[error("failed to read stream: {0}")]
  Io(#[from] std::io::Error),
}

impl SerializationError {
  pub(crate) fn unsupported_shape(type_name: impl Into<String>) -> Self {
    SerializationError::UnsupportedShape {
      type_name: type_name.into(),
    }
  }
}

/// Errors raised by the serializer registry.
#[derive(Debug, Error)]
pub enum RegistryError {
  /// A serializer for the content type is already registered.
  #[error("serializer for content type {0} already registered")]
  DuplicateEntry(String),
  /// No serializer is registered for the content type.
  #[error("no serializer registered for content type {0}")]
  UnknownContentType(String),
  /// The selected serializer failed.
  #[error(transparent)]
  Serialization(#[from] SerializationError),
}

static_assertions::assert_impl_all!(SerializationError: Send, Sync);
static_assertions::assert_impl_all!(RegistryError: Send, Sync);
