//! Content-type keyed serializer registry.

use crate::config::Config;
use crate::datum::Datum;
use crate::error::RegistryError;
use crate::message::SerializedPayload;
use crate::serializer::Serializer;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe lookup of serializers by the content type they produce.
///
/// Lookups ignore ASCII case and any parameters after `;`, so `"text/csv; charset=utf-8"`
/// resolves to the `text/csv` serializer.
#[derive(Clone, Default)]
pub struct SerializerRegistry {
  inner: Arc<DashMap<String, Arc<dyn Serializer>>>,
}

impl SerializerRegistry {
  /// Creates a new, empty registry.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a registry holding the CSV, NPY and JSON serializers with default settings.
  #[must_use]
  pub fn with_defaults() -> Self {
    Self::with_config(&Config::default())
  }

  /// Creates a registry holding the CSV, NPY and JSON serializers built from `config`.
  #[must_use]
  pub fn with_config(config: &Config) -> Self {
    let registry = Self::new();
    registry.replace(Arc::new(config.csv_serializer()));
    registry.replace(Arc::new(config.numpy_serializer()));
    registry.replace(Arc::new(config.json_serializer()));
    registry
  }

  /// Registers a serializer under its content type.
  pub fn register(&self, serializer: Arc<dyn Serializer>) -> Result<(), RegistryError> {
    let key = normalize(serializer.content_type());
    match self.inner.entry(key) {
      Entry::Occupied(entry) => Err(RegistryError::DuplicateEntry(entry.key().clone())),
      Entry::Vacant(entry) => {
        entry.insert(serializer);
        Ok(())
      }
    }
  }

  /// Registers a serializer, returning the one it replaces.
  pub fn replace(&self, serializer: Arc<dyn Serializer>) -> Option<Arc<dyn Serializer>> {
    let key = normalize(serializer.content_type());
    let previous = self.inner.insert(key, serializer);
    if let Some(previous) = &previous {
      tracing::warn!("replacing serializer for content type {}", previous.content_type());
    }
    previous
  }

  /// Retrieves the serializer for the provided content type.
  #[must_use]
  pub fn get(&self, content_type: &str) -> Option<Arc<dyn Serializer>> {
    self.inner.get(&normalize(content_type)).map(|entry| Arc::clone(entry.value()))
  }

  /// Registered content types, sorted.
  #[must_use]
  pub fn content_types(&self) -> Vec<String> {
    let mut content_types = self.inner.iter().map(|entry| entry.key().clone()).collect::<Vec<_>>();
    content_types.sort();
    content_types
  }

  /// Serializes `data` with the serializer registered for `content_type`.
  pub fn serialize(&self, content_type: &str, data: Datum) -> Result<SerializedPayload, RegistryError> {
    let serializer = self
      .get(content_type)
      .ok_or_else(|| RegistryError::UnknownContentType(content_type.to_string()))?;
    Ok(serializer.serialize_with_content_type(data)?)
  }
}

fn normalize(content_type: &str) -> String {
  content_type
    .split(';')
    .next()
    .unwrap_or_default()
    .trim()
    .to_ascii_lowercase()
}
