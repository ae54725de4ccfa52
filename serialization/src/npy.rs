//! Reader and writer for the `.npy` binary array format.
//!
//! A payload is the magic string `\x93NUMPY`, a major/minor version pair, a little-endian
//! header length, an ASCII header dictionary describing element type, memory order and shape,
//! and the raw element data. The header is padded with spaces and terminated by `\n` so that
//! the data starts at a multiple of [`ARRAY_ALIGN`] bytes.

use crate::array::{ArrayData, DType, MemoryOrder, NdArray};
use thiserror::Error;

/// Magic bytes opening every payload.
pub const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Alignment of the start of the element data.
pub const ARRAY_ALIGN: usize = 64;

/// Spare spaces reserved so the growth axis can be rewritten in place.
const GROWTH_AXIS_MAX_DIGITS: usize = 21;

const MAGIC_LEN: usize = MAGIC.len() + 2;

/// Error raised while reading or writing a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NpyError {
  /// The payload does not start with [`MAGIC`].
  #[error("the magic string is not correct")]
  BadMagic,
  /// The format version is not understood.
  #[error("unsupported format version {major}.{minor}")]
  UnsupportedVersion {
    /// Major version.
    major: u8,
    /// Minor version.
    minor: u8,
  },
  /// The header dictionary could not be parsed.
  #[error("malformed header: {0}")]
  MalformedHeader(String),
  /// The element type descriptor is not supported.
  #[error("unsupported descr {0:?}")]
  UnsupportedDescr(String),
  /// The payload ends before the declared data.
  #[error("payload truncated: expected {expected} bytes, found {actual}")]
  Truncated {
    /// Bytes required.
    expected: usize,
    /// Bytes available.
    actual: usize,
  },
  /// The header does not fit the largest supported length field.
  #[error("header length {0} too big for version 2.0")]
  HeaderTooLarge(usize),
}

/// Encodes an array into a complete `.npy` payload.
pub fn encode(array: &NdArray) -> Result<Vec<u8>, NpyError> {
  let str_width = string_width(array.data());
  let header = header_text(array, str_width);
  let mut buffer = wrap_header(&header)?;
  buffer.reserve(array.size() * array.dtype().item_size() * str_width.max(1));
  write_data(&mut buffer, array.data(), str_width);
  Ok(buffer)
}

/// Width in code points of string elements; zero for other element types.
fn string_width(data: &ArrayData) -> usize {
  match data {
    ArrayData::Str(items) => items.iter().map(|s| s.chars().count()).max().unwrap_or(0).max(1),
    _ => 0,
  }
}

fn descr(dtype: DType, str_width: usize) -> String {
  match dtype {
    DType::Bool => "|b1".to_string(),
    DType::Int8 => "|i1".to_string(),
    DType::UInt8 => "|u1".to_string(),
    DType::Int16 => "<i2".to_string(),
    DType::Int32 => "<i4".to_string(),
    DType::Int64 => "<i8".to_string(),
    DType::UInt16 => "<u2".to_string(),
    DType::UInt32 => "<u4".to_string(),
    DType::UInt64 => "<u8".to_string(),
    DType::Float32 => "<f4".to_string(),
    DType::Float64 => "<f8".to_string(),
    DType::Str => format!("<U{str_width}"),
  }
}

pub(crate) fn shape_repr(shape: &[usize]) -> String {
  match shape {
    [] => "()".to_string(),
    [only] => format!("({only},)"),
    _ => {
      let items = shape.iter().map(ToString::to_string).collect::<Vec<_>>();
      format!("({})", items.join(", "))
    }
  }
}

fn header_text(array: &NdArray, str_width: usize) -> String {
  // With at most one axis longer than 1 both layouts coincide and the array counts as C order.
  let fortran_order =
    array.order() == MemoryOrder::Fortran && array.shape().iter().filter(|extent| **extent > 1).count() >= 2;
  let mut header = format!(
    "{{'descr': '{}', 'fortran_order': {}, 'shape': {}, }}",
    descr(array.dtype(), str_width),
    if fortran_order { "True" } else { "False" },
    shape_repr(array.shape()),
  );
  let growth_axis = if fortran_order {
    array.shape().last()
  } else {
    array.shape().first()
  };
  if let Some(extent) = growth_axis {
    let digits = extent.to_string().len();
    header.push_str(&" ".repeat(GROWTH_AXIS_MAX_DIGITS.saturating_sub(digits)));
  }
  header
}

/// Prefixes the header with magic, version and length, padding it to [`ARRAY_ALIGN`].
fn wrap_header(header: &str) -> Result<Vec<u8>, NpyError> {
  let header_len = header.len() + 1;
  let pad = |prefix_len: usize| ARRAY_ALIGN - ((prefix_len + header_len) % ARRAY_ALIGN);

  let v1_pad = pad(MAGIC_LEN + 2);
  let mut buffer = Vec::with_capacity(MAGIC_LEN + 4 + header_len + ARRAY_ALIGN);
  buffer.extend_from_slice(MAGIC);
  if let Ok(total) = u16::try_from(header_len + v1_pad) {
    buffer.extend_from_slice(&[1, 0]);
    buffer.extend_from_slice(&total.to_le_bytes());
    push_padded(&mut buffer, header, v1_pad);
    return Ok(buffer);
  }

  let v2_pad = pad(MAGIC_LEN + 4);
  let total = u32::try_from(header_len + v2_pad).map_err(|_| NpyError::HeaderTooLarge(header_len))?;
  tracing::debug!("npy header of {} bytes needs format version 2.0", header_len);
  buffer.extend_from_slice(&[2, 0]);
  buffer.extend_from_slice(&total.to_le_bytes());
  push_padded(&mut buffer, header, v2_pad);
  Ok(buffer)
}

fn push_padded(buffer: &mut Vec<u8>, header: &str, pad: usize) {
  buffer.extend_from_slice(header.as_bytes());
  buffer.extend(std::iter::repeat(b' ').take(pad));
  buffer.push(b'\n');
}

fn write_data(buffer: &mut Vec<u8>, data: &ArrayData, str_width: usize) {
  match data {
    ArrayData::Bool(items) => buffer.extend(items.iter().map(|b| u8::from(*b))),
    ArrayData::Str(items) => {
      for item in items {
        let mut written = 0;
        for ch in item.chars() {
          buffer.extend_from_slice(&u32::from(ch).to_le_bytes());
          written += 1;
        }
        buffer.extend(std::iter::repeat(0_u8).take((str_width - written) * 4));
      }
    }
    numeric => write_numeric(buffer, numeric),
  }
}

fn write_numeric(buffer: &mut Vec<u8>, data: &ArrayData) {
  macro_rules! le {
    ($items:expr) => {
      for item in $items {
        buffer.extend_from_slice(&item.to_le_bytes());
      }
    };
  }
  match data {
    ArrayData::Int8(items) => le!(items),
    ArrayData::Int16(items) => le!(items),
    ArrayData::Int32(items) => le!(items),
    ArrayData::Int64(items) => le!(items),
    ArrayData::UInt8(items) => buffer.extend_from_slice(items),
    ArrayData::UInt16(items) => le!(items),
    ArrayData::UInt32(items) => le!(items),
    ArrayData::UInt64(items) => le!(items),
    ArrayData::Float32(items) => le!(items),
    ArrayData::Float64(items) => le!(items),
    ArrayData::Bool(_) | ArrayData::Str(_) => {}
  }
}

/// Decodes a `.npy` payload.
///
/// Accepts format versions 1.0 to 3.0 with little-endian or single-byte element types.
pub fn decode(bytes: &[u8]) -> Result<NdArray, NpyError> {
  if bytes.len() < MAGIC_LEN || &bytes[..MAGIC.len()] != MAGIC {
    return Err(NpyError::BadMagic);
  }
  let (major, minor) = (bytes[6], bytes[7]);
  let (header_start, header_len) = match major {
    1 => (MAGIC_LEN + 2, usize::from(u16::from_le_bytes(read_array(bytes, MAGIC_LEN)?))),
    2 | 3 => (
      MAGIC_LEN + 4,
      u32::from_le_bytes(read_array(bytes, MAGIC_LEN)?) as usize,
    ),
    _ => return Err(NpyError::UnsupportedVersion { major, minor }),
  };
  let data_start = header_start + header_len;
  let header_bytes = bytes.get(header_start..data_start).ok_or(NpyError::Truncated {
    expected: data_start,
    actual: bytes.len(),
  })?;
  let header = std::str::from_utf8(header_bytes).map_err(|err| NpyError::MalformedHeader(err.to_string()))?;

  let descr = quoted(entry(header, "descr")?)?;
  let fortran_order = boolean(entry(header, "fortran_order")?)?;
  let shape = tuple(entry(header, "shape")?)?;
  let (dtype, str_width) = parse_descr(descr)?;

  let count = shape.iter().product::<usize>();
  let item_size = if dtype == DType::Str { 4 * str_width } else { dtype.item_size() };
  let body = &bytes[data_start..];
  let expected = count * item_size;
  if body.len() < expected {
    return Err(NpyError::Truncated {
      expected: data_start + expected,
      actual: bytes.len(),
    });
  }
  let data = read_data(&body[..expected], dtype, count, str_width);
  let order = if fortran_order { MemoryOrder::Fortran } else { MemoryOrder::C };
  NdArray::with_order(shape, order, data).map_err(|err| NpyError::MalformedHeader(err.to_string()))
}

fn read_array<const N: usize>(bytes: &[u8], at: usize) -> Result<[u8; N], NpyError> {
  bytes
    .get(at..at + N)
    .and_then(|slice| slice.try_into().ok())
    .ok_or(NpyError::Truncated {
      expected: at + N,
      actual: bytes.len(),
    })
}

/// Returns the text following `'key':` in the header dictionary.
fn entry<'a>(header: &'a str, key: &str) -> Result<&'a str, NpyError> {
  ["'", "\""]
    .iter()
    .find_map(|quote| {
      let needle = format!("{quote}{key}{quote}");
      header.find(&needle).map(|at| &header[at + needle.len()..])
    })
    .and_then(|rest| rest.trim_start().strip_prefix(':'))
    .map(str::trim_start)
    .ok_or_else(|| NpyError::MalformedHeader(format!("missing key {key:?}")))
}

fn quoted(text: &str) -> Result<&str, NpyError> {
  let quote = text
    .chars()
    .next()
    .filter(|c| *c == '\'' || *c == '"')
    .ok_or_else(|| NpyError::MalformedHeader("descr is not a string".to_string()))?;
  let rest = &text[1..];
  rest
    .find(quote)
    .map(|end| &rest[..end])
    .ok_or_else(|| NpyError::MalformedHeader("unterminated descr".to_string()))
}

fn boolean(text: &str) -> Result<bool, NpyError> {
  if text.starts_with("True") {
    Ok(true)
  } else if text.starts_with("False") {
    Ok(false)
  } else {
    Err(NpyError::MalformedHeader("fortran_order is not a boolean".to_string()))
  }
}

fn tuple(text: &str) -> Result<Vec<usize>, NpyError> {
  let inner = text
    .strip_prefix('(')
    .and_then(|rest| rest.find(')').map(|end| &rest[..end]))
    .ok_or_else(|| NpyError::MalformedHeader("shape is not a tuple".to_string()))?;
  inner
    .split(',')
    .map(str::trim)
    .filter(|item| !item.is_empty())
    .map(|item| {
      item
        .trim_end_matches('L')
        .parse::<usize>()
        .map_err(|err| NpyError::MalformedHeader(format!("bad shape entry {item:?}: {err}")))
    })
    .collect()
}

fn parse_descr(descr: &str) -> Result<(DType, usize), NpyError> {
  let unsupported = || NpyError::UnsupportedDescr(descr.to_string());
  let mut chars = descr.chars();
  let byte_order = chars.next().ok_or_else(unsupported)?;
  let code = chars.as_str();
  if let Some(width) = code.strip_prefix('U') {
    if byte_order != '<' && byte_order != '=' {
      return Err(unsupported());
    }
    let width = width.parse::<usize>().map_err(|_| unsupported())?;
    return Ok((DType::Str, width));
  }
  let dtype = match code {
    "b1" => DType::Bool,
    "i1" => DType::Int8,
    "u1" => DType::UInt8,
    "i2" => DType::Int16,
    "i4" => DType::Int32,
    "i8" => DType::Int64,
    "u2" => DType::UInt16,
    "u4" => DType::UInt32,
    "u8" => DType::UInt64,
    "f4" => DType::Float32,
    "f8" => DType::Float64,
    _ => return Err(unsupported()),
  };
  match byte_order {
    '<' | '|' | '=' => Ok((dtype, 0)),
    '>' if dtype.item_size() == 1 => Ok((dtype, 0)),
    _ => Err(unsupported()),
  }
}

fn read_data(body: &[u8], dtype: DType, count: usize, str_width: usize) -> ArrayData {
  macro_rules! le {
    ($ty:ty, $variant:ident) => {
      ArrayData::$variant(
        body
          .chunks_exact(std::mem::size_of::<$ty>())
          .map(|chunk| {
            let mut raw = [0_u8; std::mem::size_of::<$ty>()];
            raw.copy_from_slice(chunk);
            <$ty>::from_le_bytes(raw)
          })
          .collect(),
      )
    };
  }
  match dtype {
    DType::Bool => ArrayData::Bool(body.iter().map(|b| *b != 0).collect()),
    DType::Int8 => le!(i8, Int8),
    DType::Int16 => le!(i16, Int16),
    DType::Int32 => le!(i32, Int32),
    DType::Int64 => le!(i64, Int64),
    DType::UInt8 => ArrayData::UInt8(body.to_vec()),
    DType::UInt16 => le!(u16, UInt16),
    DType::UInt32 => le!(u32, UInt32),
    DType::UInt64 => le!(u64, UInt64),
    DType::Float32 => le!(f32, Float32),
    DType::Float64 => le!(f64, Float64),
    DType::Str if str_width == 0 => ArrayData::Str(vec![String::new(); count]),
    DType::Str => ArrayData::Str(
      body
        .chunks_exact(4 * str_width)
        .map(|element| {
          element
            .chunks_exact(4)
            .map(|unit| u32::from_le_bytes([unit[0], unit[1], unit[2], unit[3]]))
            .take_while(|code| *code != 0)
            .map(|code| char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
        })
        .collect(),
    ),
  }
}

#[cfg(test)]
mod tests;
