//! Operator and trait implementations for [`ByteString`].
//!
//! Equality, ordering and hashing are defined on the content bytes, so an
//! invalid string compares equal to a valid empty one. The `+`/`+=`
//! family follows the accumulator rule: a failed growth while summing
//! invalidates the accumulator instead of silently keeping a partial
//! result, so the failure is still observable at the end of a chain of
//! appends.

use core::cmp::Ordering;
use core::fmt;
use core::hash::Hash;
use core::hash::Hasher;
use core::ops::Add;
use core::ops::AddAssign;
use core::ops::Deref;
use core::ops::DerefMut;

use alloc::vec::Vec;

use bstr::ByteSlice;

use crate::byte_string::ByteString;
use crate::rom::RomBytes;

impl Deref for ByteString {
  type Target = [u8];

  #[inline]
  fn deref(&self) -> &[u8] {
    self.as_bytes()
  }
}

impl DerefMut for ByteString {
  #[inline]
  fn deref_mut(&mut self) -> &mut [u8] {
    self.as_bytes_mut()
  }
}

impl AsRef<[u8]> for ByteString {
  #[inline]
  fn as_ref(&self) -> &[u8] {
    self.as_bytes()
  }
}

impl core::borrow::Borrow<[u8]> for ByteString {
  #[inline]
  fn borrow(&self) -> &[u8] {
    self.as_bytes()
  }
}

impl Default for ByteString {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Clone for ByteString {
  fn clone(&self) -> Self {
    let mut out = Self::new();
    if self.is_valid() {
      out.assign(self.as_bytes());
    }
    out
  }

  /// Reuses the existing allocation when it is large enough.
  fn clone_from(&mut self, source: &Self) {
    if source.is_valid() {
      self.assign(source.as_bytes());
    } else {
      self.repr.invalidate();
    }
  }
}

impl From<&[u8]> for ByteString {
  /// Copies the bytes in. On allocation failure the result is the
  /// invalid empty string rather than a panic.
  fn from(src: &[u8]) -> Self {
    let mut s = Self::new();
    s.assign(src);
    s
  }
}

impl<const N: usize> From<&[u8; N]> for ByteString {
  fn from(src: &[u8; N]) -> Self {
    Self::from(src.as_slice())
  }
}

impl From<&str> for ByteString {
  fn from(src: &str) -> Self {
    Self::from(src.as_bytes())
  }
}

impl From<u8> for ByteString {
  fn from(byte: u8) -> Self {
    Self::from(&[byte][..])
  }
}

impl From<char> for ByteString {
  fn from(c: char) -> Self {
    let mut s = Self::new();
    s.push_char(c);
    s
  }
}

impl From<RomBytes> for ByteString {
  fn from(src: RomBytes) -> Self {
    let mut s = Self::new();
    s.assign_rom(src);
    s
  }
}

impl PartialEq for ByteString {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl Eq for ByteString {}

impl PartialEq<[u8]> for ByteString {
  #[inline]
  fn eq(&self, other: &[u8]) -> bool {
    self.as_bytes() == other
  }
}

impl PartialEq<&[u8]> for ByteString {
  #[inline]
  fn eq(&self, other: &&[u8]) -> bool {
    self.as_bytes() == *other
  }
}

impl<const N: usize> PartialEq<&[u8; N]> for ByteString {
  #[inline]
  fn eq(&self, other: &&[u8; N]) -> bool {
    self.as_bytes() == other.as_slice()
  }
}

impl PartialEq<Vec<u8>> for ByteString {
  #[inline]
  fn eq(&self, other: &Vec<u8>) -> bool {
    self.as_bytes() == other.as_slice()
  }
}

impl PartialEq<ByteString> for Vec<u8> {
  #[inline]
  fn eq(&self, other: &ByteString) -> bool {
    self.as_slice() == other.as_bytes()
  }
}

impl PartialEq<str> for ByteString {
  #[inline]
  fn eq(&self, other: &str) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialEq<&str> for ByteString {
  #[inline]
  fn eq(&self, other: &&str) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialEq<ByteString> for [u8] {
  #[inline]
  fn eq(&self, other: &ByteString) -> bool {
    self == other.as_bytes()
  }
}

impl PartialEq<ByteString> for str {
  #[inline]
  fn eq(&self, other: &ByteString) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialEq<ByteString> for &str {
  #[inline]
  fn eq(&self, other: &ByteString) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialOrd for ByteString {
  #[inline]
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for ByteString {
  #[inline]
  fn cmp(&self, other: &Self) -> Ordering {
    self.as_bytes().cmp(other.as_bytes())
  }
}

impl Hash for ByteString {
  #[inline]
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.as_bytes().hash(state);
  }
}

impl AddAssign<&ByteString> for ByteString {
  fn add_assign(&mut self, rhs: &ByteString) {
    if !self.append(rhs) {
      self.repr.invalidate();
    }
  }
}

impl AddAssign<&[u8]> for ByteString {
  fn add_assign(&mut self, rhs: &[u8]) {
    if !self.push_bytes(rhs) {
      self.repr.invalidate();
    }
  }
}

impl AddAssign<&str> for ByteString {
  fn add_assign(&mut self, rhs: &str) {
    if !self.push_str(rhs) {
      self.repr.invalidate();
    }
  }
}

impl AddAssign<u8> for ByteString {
  fn add_assign(&mut self, rhs: u8) {
    if !self.push(rhs) {
      self.repr.invalidate();
    }
  }
}

impl AddAssign<char> for ByteString {
  fn add_assign(&mut self, rhs: char) {
    if !self.push_char(rhs) {
      self.repr.invalidate();
    }
  }
}

impl AddAssign<RomBytes> for ByteString {
  fn add_assign(&mut self, rhs: RomBytes) {
    if !self.push_rom(rhs) {
      self.repr.invalidate();
    }
  }
}

impl Add<&ByteString> for ByteString {
  type Output = ByteString;

  fn add(mut self, rhs: &ByteString) -> ByteString {
    self += rhs;
    self
  }
}

impl Add<&[u8]> for ByteString {
  type Output = ByteString;

  fn add(mut self, rhs: &[u8]) -> ByteString {
    self += rhs;
    self
  }
}

impl Add<&str> for ByteString {
  type Output = ByteString;

  fn add(mut self, rhs: &str) -> ByteString {
    self += rhs;
    self
  }
}

impl Add<u8> for ByteString {
  type Output = ByteString;

  fn add(mut self, rhs: u8) -> ByteString {
    self += rhs;
    self
  }
}

impl Add<char> for ByteString {
  type Output = ByteString;

  fn add(mut self, rhs: char) -> ByteString {
    self += rhs;
    self
  }
}

impl Extend<u8> for ByteString {
  fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
    let iter = iter.into_iter();
    let (low, _) = iter.size_hint();
    self.reserve(self.len() + low);
    for byte in iter {
      if !self.push(byte) {
        self.repr.invalidate();
        return;
      }
    }
  }
}

impl<'a> Extend<&'a u8> for ByteString {
  fn extend<I: IntoIterator<Item = &'a u8>>(&mut self, iter: I) {
    self.extend(iter.into_iter().copied());
  }
}

impl FromIterator<u8> for ByteString {
  fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
    let mut s = Self::new();
    s.extend(iter);
    s
  }
}

impl fmt::Write for ByteString {
  fn write_str(&mut self, s: &str) -> fmt::Result {
    if self.push_str(s) {
      Ok(())
    } else {
      Err(fmt::Error)
    }
  }
}

impl fmt::Debug for ByteString {
  /// Escaped rendering of the content, so binary strings print readably
  /// in logs and assertions.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Debug::fmt(self.as_bytes().as_bstr(), f)
  }
}

impl fmt::Display for ByteString {
  /// Lossy display: invalid UTF-8 sequences render as the replacement
  /// character.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(self.as_bytes().as_bstr(), f)
  }
}

#[cfg(feature = "serde")]
mod serde_impl {
  use core::fmt;

  use serde::de;
  use serde::Deserialize;
  use serde::Deserializer;
  use serde::Serialize;
  use serde::Serializer;

  use crate::byte_string::ByteString;

  impl Serialize for ByteString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
      serializer.serialize_bytes(self.as_bytes())
    }
  }

  impl<'de> Deserialize<'de> for ByteString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
      deserializer.deserialize_bytes(ByteStringVisitor)
    }
  }

  struct ByteStringVisitor;

  impl ByteStringVisitor {
    fn collect<E: de::Error>(self, src: &[u8]) -> Result<ByteString, E> {
      ByteString::try_from_bytes(src)
        .map_err(|_| E::custom("byte string exceeds the capacity bound"))
    }
  }

  impl<'de> de::Visitor<'de> for ByteStringVisitor {
    type Value = ByteString;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str("a byte string")
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<ByteString, E> {
      self.collect(v)
    }

    fn visit_borrowed_bytes<E: de::Error>(
      self,
      v: &'de [u8],
    ) -> Result<ByteString, E> {
      self.collect(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ByteString, E> {
      self.collect(v.as_bytes())
    }

    fn visit_seq<A: de::SeqAccess<'de>>(
      self,
      mut seq: A,
    ) -> Result<ByteString, A::Error> {
      let mut s = ByteString::new();
      s.reserve(seq.size_hint().unwrap_or(0).min(crate::MAX_CAPACITY));
      while let Some(byte) = seq.next_element::<u8>()? {
        if !s.push(byte) {
          return Err(de::Error::custom(
            "byte string exceeds the capacity bound",
          ));
        }
      }
      Ok(s)
    }
  }
}

#[cfg(test)]
mod tests {
  use core::fmt::Write;

  use super::*;

  #[test]
  fn content_equality_ignores_representation() {
    let mut invalid = ByteString::new();
    let mut valid_empty = ByteString::new();
    valid_empty.reserve(0);
    assert_eq!(invalid, valid_empty);

    invalid.push_str("abc");
    assert_eq!(invalid, b"abc".as_slice());
    assert_eq!(invalid, "abc");
    assert_eq!("abc", invalid);
    assert_eq!(invalid, b"abc".to_vec());
  }

  #[test]
  fn ordering_is_bytewise() {
    let a = ByteString::from("abc");
    let b = ByteString::from("abd");
    let prefix = ByteString::from("ab");
    assert!(a < b);
    assert!(prefix < a);
    assert_eq!(a.cmp(&a), Ordering::Equal);
    assert!(ByteString::new() < a);
  }

  #[test]
  fn clone_and_clone_from() {
    let src = ByteString::from("clone me, a string long enough for heap");
    let dup = src.clone();
    assert_eq!(dup, src);

    let mut target = ByteString::from("also fairly long content sitting here");
    let cap = target.capacity();
    target.clone_from(&ByteString::from("short"));
    assert_eq!(target, "short");
    assert_eq!(target.capacity(), cap);

    target.clone_from(&ByteString::new());
    assert!(!target.is_valid());
  }

  #[test]
  fn add_assign_family() {
    let mut s = ByteString::from("n=");
    s += "1";
    s += b", ".as_slice();
    s += b'2';
    s += ',';
    s += &ByteString::from(" 3");
    assert_eq!(s, "n=1, 2, 3");
  }

  #[test]
  fn add_chains() {
    let s = ByteString::from("a") + "b" + b'c' + &ByteString::from("d");
    assert_eq!(s, "abcd");
  }

  #[test]
  fn add_assign_invalid_rhs_invalidates_accumulator() {
    let mut s = ByteString::from("kept?");
    s += &ByteString::new();
    assert!(!s.is_valid());
    assert!(s.is_empty());
  }

  #[test]
  fn extend_and_collect() {
    let mut s = ByteString::from("ab");
    s.extend([b'c', b'd']);
    assert_eq!(s, "abcd");
    let collected: ByteString = (b'a'..=b'e').collect();
    assert_eq!(collected, "abcde");
  }

  #[test]
  fn fmt_write_appends() {
    let mut s = ByteString::new();
    write!(s, "x={} y={:04}", 3, 7).unwrap();
    assert_eq!(s, "x=3 y=0007");
  }

  #[test]
  fn debug_escapes_binary() {
    let s = ByteString::from(&b"a\xffb\n"[..]);
    let rendered = alloc::format!("{s:?}");
    assert!(rendered.starts_with('"') && rendered.ends_with('"'));
    assert!(rendered.to_ascii_lowercase().contains("\\xff"));
    assert!(rendered.contains("\\n"));
  }

  #[cfg(feature = "serde")]
  mod serde {
    use crate::byte_string::ByteString;

    #[test]
    fn round_trips_through_json() {
      let s = ByteString::from("hello json");
      let json = serde_json::to_string(&s).unwrap();
      let back: ByteString = serde_json::from_str(&json).unwrap();
      assert_eq!(back, s);
    }

    #[test]
    fn deserializes_from_str_and_seq() {
      let from_str: ByteString = serde_json::from_str("\"abc\"").unwrap();
      assert_eq!(from_str, "abc");
      let from_seq: ByteString = serde_json::from_str("[97, 98, 99]").unwrap();
      assert_eq!(from_seq, "abc");
    }
  }
}
