//! Numeric rendering and prefix parsing on stack scratch buffers.
//!
//! The string type formats numbers into a fixed-size local buffer first and
//! then appends the rendered text, so a failed append never leaves half a
//! number behind. Decimal integers go through `itoa` at the call sites;
//! this module covers the other-radix and fixed-precision float paths plus
//! the `atol`/`atod`-style prefix parsers.

use core::fmt;
use core::fmt::Write;
use core::str;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Fixed-size render target. 72 bytes covers a 64-bit integer in base 2
/// plus sign, and any float the fixed-precision formatter is expected to
/// handle (wider renderings fail the append instead of overflowing).
pub(crate) struct Scratch {
  buf: [u8; Scratch::SIZE],
  len: usize,
}

impl Scratch {
  const SIZE: usize = 72;

  const fn new() -> Self {
    Self {
      buf: [0u8; Scratch::SIZE],
      len: 0,
    }
  }

  pub(crate) fn as_bytes(&self) -> &[u8] {
    &self.buf[..self.len]
  }
}

impl fmt::Write for Scratch {
  fn write_str(&mut self, s: &str) -> fmt::Result {
    let bytes = s.as_bytes();
    if self.len + bytes.len() > Scratch::SIZE {
      return Err(fmt::Error);
    }
    self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
    self.len += bytes.len();
    Ok(())
  }
}

/// Renders `value` in `radix` with lowercase digits. A radix outside
/// `2..=36` is treated as 10 (defined, non-fatal, like the rest of the
/// crate's out-of-range handling).
pub(crate) fn format_radix(mut value: u64, radix: u32) -> Scratch {
  let radix = if (2..=36).contains(&radix) { radix } else { 10 } as u64;
  let mut tail = [0u8; Scratch::SIZE];
  let mut pos = tail.len();
  loop {
    pos -= 1;
    tail[pos] = DIGITS[(value % radix) as usize];
    value /= radix;
    if value == 0 {
      break;
    }
  }
  let mut scratch = Scratch::new();
  scratch.len = tail.len() - pos;
  scratch.buf[..scratch.len].copy_from_slice(&tail[pos..]);
  scratch
}

/// Renders `value` with exactly `decimals` digits after the point.
/// Returns `None` when the rendering does not fit the scratch buffer
/// (extremely large magnitudes), which callers surface as a failed append.
pub(crate) fn format_float(value: f64, decimals: u8) -> Option<Scratch> {
  let mut scratch = Scratch::new();
  let precision = decimals as usize;
  write!(scratch, "{value:.precision$}").ok()?;
  Some(scratch)
}

/// `atol`-style prefix parse: skips ASCII whitespace, accepts an optional
/// sign and a run of decimal digits, stops at the first other byte.
/// Saturates on overflow; no digits yields 0.
pub(crate) fn parse_int_prefix(bytes: &[u8]) -> i64 {
  let mut rest = bytes;
  while let [b, tail @ ..] = rest {
    if !b.is_ascii_whitespace() {
      break;
    }
    rest = tail;
  }
  let negative = match rest.first() {
    Some(b'-') => {
      rest = &rest[1..];
      true
    }
    Some(b'+') => {
      rest = &rest[1..];
      false
    }
    _ => false,
  };
  let mut value: i64 = 0;
  for &b in rest {
    if !b.is_ascii_digit() {
      break;
    }
    let digit = (b - b'0') as i64;
    value = if negative {
      value.saturating_mul(10).saturating_sub(digit)
    } else {
      value.saturating_mul(10).saturating_add(digit)
    };
  }
  value
}

/// `atod`-style prefix parse: skips ASCII whitespace, then takes the
/// longest leading run that forms a decimal float (optional sign, digits,
/// fraction, exponent) and parses it. No valid prefix yields 0.0.
pub(crate) fn parse_float_prefix(bytes: &[u8]) -> f64 {
  let mut start = 0;
  while start < bytes.len() && bytes[start].is_ascii_whitespace() {
    start += 1;
  }
  let rest = &bytes[start..];
  let mut end = 0;
  if matches!(rest.first(), Some(b'+') | Some(b'-')) {
    end += 1;
  }
  let mut mantissa_digits = 0;
  while end < rest.len() && rest[end].is_ascii_digit() {
    end += 1;
    mantissa_digits += 1;
  }
  if end < rest.len() && rest[end] == b'.' {
    end += 1;
    while end < rest.len() && rest[end].is_ascii_digit() {
      end += 1;
      mantissa_digits += 1;
    }
  }
  if mantissa_digits == 0 {
    return 0.0;
  }
  if end < rest.len() && (rest[end] == b'e' || rest[end] == b'E') {
    let mut exp_end = end + 1;
    if matches!(rest.get(exp_end), Some(b'+') | Some(b'-')) {
      exp_end += 1;
    }
    let exp_digits_start = exp_end;
    while exp_end < rest.len() && rest[exp_end].is_ascii_digit() {
      exp_end += 1;
    }
    // The exponent only counts if it has at least one digit.
    if exp_end > exp_digits_start {
      end = exp_end;
    }
  }
  str::from_utf8(&rest[..end])
    .ok()
    .and_then(|text| text.parse::<f64>().ok())
    .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn radix_rendering() {
    assert_eq!(format_radix(255, 16).as_bytes(), b"ff");
    assert_eq!(format_radix(5, 2).as_bytes(), b"101");
    assert_eq!(format_radix(0, 8).as_bytes(), b"0");
    assert_eq!(format_radix(35, 36).as_bytes(), b"z");
    assert_eq!(format_radix(u64::MAX, 2).as_bytes().len(), 64);
  }

  #[test]
  fn bad_radix_falls_back_to_decimal() {
    assert_eq!(format_radix(42, 1).as_bytes(), b"42");
    assert_eq!(format_radix(42, 99).as_bytes(), b"42");
  }

  #[test]
  fn float_rendering() {
    assert_eq!(format_float(1.5, 2).unwrap().as_bytes(), b"1.50");
    assert_eq!(format_float(-0.125, 3).unwrap().as_bytes(), b"-0.125");
    assert_eq!(format_float(2.0, 0).unwrap().as_bytes(), b"2");
  }

  #[test]
  fn oversized_float_rendering_is_refused() {
    assert!(format_float(1e300, 6).is_none());
  }

  #[test]
  fn int_prefix_parsing() {
    assert_eq!(parse_int_prefix(b"  42abc"), 42);
    assert_eq!(parse_int_prefix(b"-17"), -17);
    assert_eq!(parse_int_prefix(b"+9 "), 9);
    assert_eq!(parse_int_prefix(b"abc"), 0);
    assert_eq!(parse_int_prefix(b""), 0);
    assert_eq!(parse_int_prefix(b"-"), 0);
    assert_eq!(parse_int_prefix(b"999999999999999999999999"), i64::MAX);
  }

  #[test]
  fn float_prefix_parsing() {
    assert_eq!(parse_float_prefix(b" 3.25xyz"), 3.25);
    assert_eq!(parse_float_prefix(b"-0.5"), -0.5);
    assert_eq!(parse_float_prefix(b"1e3"), 1000.0);
    assert_eq!(parse_float_prefix(b"2e"), 2.0);
    assert_eq!(parse_float_prefix(b".5"), 0.5);
    assert_eq!(parse_float_prefix(b"."), 0.0);
    assert_eq!(parse_float_prefix(b"x1"), 0.0);
  }
}
