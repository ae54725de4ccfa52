//! Serializer settings.

use crate::array::DType;
use crate::config_option::ConfigOption;
use crate::csv::CsvSerializer;
use crate::json::JsonSerializer;
use crate::numpy::NumpySerializer;

/// Settings used to build the default serializers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// Element type list input is cast to by the NPY serializer; `None` infers it.
  pub npy_dtype: Option<DType>,
  /// Whether the JSON serializer escapes non-ASCII characters.
  pub json_ensure_ascii: bool,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      npy_dtype: None,
      json_ensure_ascii: true,
    }
  }
}

impl Config {
  /// Builds a configuration by applying `options` over the defaults, in order.
  pub fn from(options: impl IntoIterator<Item = ConfigOption>) -> Config {
    let mut config = Config::default();
    for option in options {
      option.apply(&mut config);
    }
    config
  }

  /// The CSV serializer; it has no settings.
  #[must_use]
  pub fn csv_serializer(&self) -> CsvSerializer {
    CsvSerializer::new()
  }

  /// The NPY serializer using [`Config::npy_dtype`].
  #[must_use]
  pub fn numpy_serializer(&self) -> NumpySerializer {
    match self.npy_dtype {
      Some(dtype) => NumpySerializer::with_dtype(dtype),
      None => NumpySerializer::new(),
    }
  }

  /// The JSON serializer using [`Config::json_ensure_ascii`].
  #[must_use]
  pub fn json_serializer(&self) -> JsonSerializer {
    JsonSerializer::with_ensure_ascii(self.json_ensure_ascii)
  }
}
