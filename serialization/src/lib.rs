#![deny(missing_docs)]

//! Serializers turning in-memory data into request payloads for inference endpoints.
//!
//! Three encoders share the [`Serializer`] trait:
//!
//! - [`CsvSerializer`] (`text/csv`) writes rows of values as comma-separated records.
//! - [`NumpySerializer`] (`application/x-npy`) writes native arrays in the `.npy` format.
//! - [`JsonSerializer`] (`application/json`) writes mappings, arrays and plain values as JSON.
//!
//! Input is a [`Datum`], usually obtained from a [`Value`] through [`Datum::classify`].
//! Readable streams are passed through untouched by every encoder.

pub mod array;
pub mod config;
pub mod config_option;
pub mod csv;
pub mod datum;
pub mod error;
pub mod json;
pub mod message;
pub mod npy;
pub mod numpy;
pub mod registry;
pub mod serializer;
pub mod value;

pub use array::{ArrayData, ArrayError, DType, MemoryOrder, NdArray};
pub use config::Config;
pub use config_option::ConfigOption;
pub use crate::csv::CsvSerializer;
pub use datum::Datum;
pub use error::{RegistryError, SerializationError};
pub use json::JsonSerializer;
pub use message::{SerializedPayload, CONTENT_TYPE_HEADER};
pub use npy::NpyError;
pub use numpy::NumpySerializer;
pub use registry::SerializerRegistry;
pub use serializer::{Payload, Serializer};
pub use value::{Mapping, Value};
