//! Text forms of arrays laid out like numpy's `str` and `repr`.

use super::{ArrayData, DType, NdArray};
use crate::npy::shape_repr;
use crate::value::quote_str;
use std::fmt::{Display, LowerExp};

/// Fraction digits kept per element before rounding.
const MAX_FRACTION_DIGITS: usize = 8;
const LITERAL_PREFIX: &str = "array(";

impl NdArray {
  /// Text of the array standing alone in a cell, e.g. `[[1 2]\n [3 4]]`.
  ///
  /// Zero-dimensional arrays print as their element.
  pub(crate) fn to_cell_text(&self) -> String {
    if self.size() == 0 {
      return "[]".to_string();
    }
    if self.shape.is_empty() {
      return self.data.text_at(0);
    }
    nest_texts(&self.element_texts(), &self.shape, " ", 0, 0)
  }

  /// Literal form of an array nested inside another value, e.g. `array([1, 2], dtype=int32)`.
  pub(crate) fn to_literal(&self) -> String {
    let mut text = String::from(LITERAL_PREFIX);
    if self.size() == 0 {
      text.push_str("[]");
      if self.ndim() > 1 {
        text.push_str(&format!(", shape={}", shape_repr(&self.shape)));
      }
    } else {
      text.push_str(&nest_texts(&self.element_texts(), &self.shape, ", ", LITERAL_PREFIX.len(), 0));
    }
    let implied = matches!(self.dtype(), DType::Bool | DType::Int64 | DType::Float64);
    if self.size() == 0 || !implied {
      text.push_str(&format!(", dtype={}", self.dtype_literal()));
    }
    text.push(')');
    text
  }

  fn dtype_literal(&self) -> String {
    match &self.data {
      ArrayData::Str(items) => {
        let width = items.iter().map(|item| item.chars().count()).max().unwrap_or(0).max(1);
        format!("'<U{width}'")
      }
      data => data.dtype().name().to_string(),
    }
  }

  /// Element texts in row-major order, padded to a common width.
  fn element_texts(&self) -> Vec<String> {
    let positions = self.row_major_positions();
    match &self.data {
      ArrayData::Bool(items) => {
        let width = if positions.iter().any(|&p| !items[p]) { 5 } else { 4 };
        positions
          .iter()
          .map(|&p| format!("{:>width$}", if items[p] { "True" } else { "False" }))
          .collect()
      }
      ArrayData::Float32(items) => format_floats(positions.iter().map(|&p| FloatDigits::of(items[p])).collect()),
      ArrayData::Float64(items) => format_floats(positions.iter().map(|&p| FloatDigits::of(items[p])).collect()),
      ArrayData::Str(items) => positions.iter().map(|&p| quote_str(&items[p])).collect(),
      integers => {
        let texts = positions.iter().map(|&p| integers.text_at(p)).collect::<Vec<_>>();
        let width = texts.iter().map(String::len).max().unwrap_or(0);
        texts.into_iter().map(|text| format!("{text:>width$}")).collect()
      }
    }
  }
}

fn nest_texts(texts: &[String], shape: &[usize], separator: &str, indent: usize, depth: usize) -> String {
  match shape {
    [] => texts.first().cloned().unwrap_or_default(),
    [_] => format!("[{}]", texts.join(separator)),
    [extent, rest @ ..] => {
      let stride = rest.iter().product::<usize>();
      let row_break = format!(
        "{}{}{}",
        separator.trim_end(),
        "\n".repeat(rest.len()),
        " ".repeat(indent + depth + 1)
      );
      let rows = (0..*extent)
        .map(|row| nest_texts(&texts[row * stride..(row + 1) * stride], rest, separator, indent, depth + 1))
        .collect::<Vec<_>>();
      format!("[{}]", rows.join(&row_break))
    }
  }
}

/// Shortest digits of one float in positional and scientific notation.
struct FloatDigits {
  value: f64,
  positional: String,
  scientific: String,
}

impl FloatDigits {
  fn of<T>(value: T) -> Self
  where
    T: Copy + Display + LowerExp + Into<f64>, {
    let positional = format!("{value}");
    let positional = if fraction_len(&positional) > MAX_FRACTION_DIGITS {
      trim_zeros(&format!("{value:.prec$}", prec = MAX_FRACTION_DIGITS))
    } else {
      positional
    };
    let scientific = format!("{value:e}");
    let scientific = match scientific.split_once('e') {
      Some((mantissa, _)) if fraction_len(mantissa) > MAX_FRACTION_DIGITS => {
        let rounded = format!("{value:.prec$e}", prec = MAX_FRACTION_DIGITS);
        match rounded.split_once('e') {
          Some((mantissa, exponent)) => format!("{}e{exponent}", trim_zeros(mantissa)),
          None => rounded,
        }
      }
      _ => scientific,
    };
    Self {
      value: value.into(),
      positional,
      scientific,
    }
  }
}

fn fraction_len(number: &str) -> usize {
  number.split_once('.').map_or(0, |(_, fraction)| fraction.len())
}

fn trim_zeros(number: &str) -> String {
  if number.contains('.') {
    number.trim_end_matches('0').trim_end_matches('.').to_string()
  } else {
    number.to_string()
  }
}

fn split_point(number: &str) -> (String, String) {
  match number.split_once('.') {
    Some((integer, fraction)) => (integer.to_string(), fraction.to_string()),
    None => (number.to_string(), String::new()),
  }
}

/// Formats floats with a shared layout: positional unless magnitudes call for an exponent,
/// integer parts right-aligned and fractions left-aligned.
fn format_floats(digits: Vec<FloatDigits>) -> Vec<String> {
  let magnitudes = digits
    .iter()
    .map(|d| d.value.abs())
    .filter(|m| m.is_finite() && *m != 0.0)
    .collect::<Vec<_>>();
  let max = magnitudes.iter().copied().fold(f64::NAN, f64::max);
  let min = magnitudes.iter().copied().fold(f64::NAN, f64::min);
  let exponential = !magnitudes.is_empty() && (max >= 1e8 || min < 1e-4 || max / min > 1e3);

  let parts = digits
    .iter()
    .filter(|d| d.value.is_finite())
    .map(|d| {
      if exponential {
        let (mantissa, exponent) = d.scientific.split_once('e').unwrap_or((d.scientific.as_str(), "0"));
        let (integer, fraction) = split_point(mantissa);
        (integer, fraction, exponent.parse::<i32>().unwrap_or(0))
      } else {
        let (integer, fraction) = split_point(&d.positional);
        (integer, fraction, 0)
      }
    })
    .collect::<Vec<_>>();
  let pad_left = parts.iter().map(|(integer, ..)| integer.len()).max().unwrap_or(0);
  let pad_right = parts.iter().map(|(_, fraction, _)| fraction.len()).max().unwrap_or(0);
  let exp_digits = parts
    .iter()
    .map(|(.., exponent)| exponent.unsigned_abs().to_string().len())
    .max()
    .unwrap_or(0)
    .max(2);
  let width = match (parts.is_empty(), exponential) {
    (true, _) => 0,
    (false, true) => pad_left + pad_right + exp_digits + 3,
    (false, false) => pad_left + pad_right + 1,
  };

  let mut finite = parts.into_iter();
  digits
    .iter()
    .map(|d| {
      if !d.value.is_finite() {
        let text = if d.value.is_nan() {
          "nan"
        } else if d.value > 0.0 {
          "inf"
        } else {
          "-inf"
        };
        return format!("{text:>width$}");
      }
      let (integer, fraction, exponent) = finite.next().unwrap_or_default();
      if exponential {
        let sign = if exponent < 0 { '-' } else { '+' };
        let magnitude = exponent.unsigned_abs();
        format!("{integer:>pad_left$}.{fraction:0<pad_right$}e{sign}{magnitude:0>exp_digits$}")
      } else {
        format!("{integer:>pad_left$}.{fraction:<pad_right$}")
      }
    })
    .collect()
}
