//! Read-only constant byte data.
//!
//! [`RomBytes`] marks a byte sequence as living in immutable program
//! memory (flash or rodata). The marker keeps the API honest about which
//! inputs can never alias a string's own buffer: every copy out of
//! constant data goes through [`copy_from_rom`], which relies on that
//! guarantee.

use core::fmt;

use bstr::ByteSlice;

/// A reference to immutable, program-lifetime byte data.
///
/// Build one with the [`rom!`](crate::rom!) macro:
///
/// ```rust
/// use smallbytes::ByteString;
/// use smallbytes::rom;
///
/// static GREETING: smallbytes::RomBytes = rom!("hello");
///
/// let mut s = ByteString::new();
/// assert!(s.push_rom(GREETING));
/// assert_eq!(s, "hello");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RomBytes(&'static [u8]);

impl RomBytes {
  /// Wraps a static byte slice. For byte-string literals call this
  /// directly; `rom!` covers string literals.
  pub const fn new(bytes: &'static [u8]) -> Self {
    Self(bytes)
  }

  /// Length of the constant data in bytes.
  #[inline]
  pub const fn len(self) -> usize {
    self.0.len()
  }

  /// Returns `true` when the constant data is empty.
  #[inline]
  pub const fn is_empty(self) -> bool {
    self.0.is_empty()
  }

  /// The constant data as a plain slice.
  #[inline]
  pub const fn as_bytes(self) -> &'static [u8] {
    self.0
  }
}

impl fmt::Display for RomBytes {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(self.0.as_bstr(), f)
  }
}

/// Copies constant data into a string buffer. `src` has program
/// lifetime and is immutable, so it cannot overlap `dst`; the copy needs
/// no overlap handling even while the destination string is mid-growth.
pub(crate) fn copy_from_rom(dst: &mut [u8], src: RomBytes) {
  dst.copy_from_slice(src.as_bytes());
}

/// Wraps a string literal as [`RomBytes`] constant data.
#[macro_export]
macro_rules! rom {
  ($s:literal) => {
    $crate::RomBytes::new($s.as_bytes())
  };
}

#[cfg(test)]
mod tests {
  use crate::ByteString;
  use crate::RomBytes;

  static BANNER: RomBytes = rom!("boot ok");

  #[test]
  fn assign_and_push_from_rom() {
    let mut s = ByteString::from(BANNER);
    assert_eq!(s, "boot ok");
    assert!(s.push_rom(RomBytes::new(b"!")));
    assert_eq!(s, "boot ok!");
    assert!(s.assign_rom(rom!("replaced")));
    assert_eq!(s, "replaced");
  }

  #[test]
  fn add_assign_from_rom() {
    let mut s = ByteString::from("v");
    s += rom!("1.2");
    assert_eq!(s, "v1.2");
  }

  #[test]
  fn empty_rom_push_is_a_no_op() {
    let mut s = ByteString::from("x");
    assert!(s.push_rom(RomBytes::new(b"")));
    assert_eq!(s, "x");
  }

  #[test]
  fn rom_accessors() {
    assert_eq!(BANNER.len(), 7);
    assert!(!BANNER.is_empty());
    assert_eq!(BANNER.as_bytes(), b"boot ok");
  }
}
