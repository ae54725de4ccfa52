//! Options applied to a [`Config`](crate::config::Config).

use crate::array::DType;
use crate::config::Config;

/// A single change applied to a [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOption {
  /// Sets [`Config::npy_dtype`].
  SetNpyDtype(Option<DType>),
  /// Sets [`Config::json_ensure_ascii`].
  SetJsonEnsureAscii(bool),
}

impl ConfigOption {
  /// Applies the option to `config`.
  pub fn apply(&self, config: &mut Config) {
    match self {
      ConfigOption::SetNpyDtype(dtype) => {
        config.npy_dtype = *dtype;
      }
      ConfigOption::SetJsonEnsureAscii(ensure_ascii) => {
        config.json_ensure_ascii = *ensure_ascii;
      }
    }
  }

  /// Casts NPY list input to `dtype`.
  pub fn with_npy_dtype(dtype: DType) -> ConfigOption {
    ConfigOption::SetNpyDtype(Some(dtype))
  }

  /// Lets the NPY serializer infer element types.
  pub fn with_inferred_npy_dtype() -> ConfigOption {
    ConfigOption::SetNpyDtype(None)
  }

  /// Controls escaping of non-ASCII characters in JSON output.
  pub fn with_json_ensure_ascii(ensure_ascii: bool) -> ConfigOption {
    ConfigOption::SetJsonEnsureAscii(ensure_ascii)
  }
}
