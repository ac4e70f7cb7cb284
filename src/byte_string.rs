//! The dynamic byte string type.
//!
//! [`ByteString`] is a growable, NUL-terminated byte sequence with inline
//! storage for short content and a single exclusively owned heap block for
//! longer content. All mutating operations run through the buffer manager
//! in [`crate::raw`], so representation transitions never tear the
//! structure: a failed growth either leaves the string unchanged
//! (concatenation-style calls) or resets it to the empty Invalid state
//! (assignment-style calls), and nothing panics.

use alloc::vec::Vec;
use core::ops::Range;

use crate::numfmt;
use crate::raw::Repr;
use crate::raw::ReserveError;
use crate::rom;
use crate::rom::RomBytes;

/// A small-buffer-optimized dynamic byte string.
///
/// Content is raw bytes; nothing here is UTF-8 aware, and case conversion
/// is ASCII-only. The string dereferences to `[u8]`, so slice methods are
/// available directly:
///
/// ```rust
/// use smallbytes::ByteString;
///
/// let mut s = ByteString::from("mixed CASE");
/// s.make_ascii_uppercase();
/// assert_eq!(&s[..5], b"MIXED");
/// ```
///
/// A default-constructed string is *invalid*: it has no buffer, reads as
/// empty, and [`is_valid`](ByteString::is_valid) returns `false`. Any
/// successful reserve or write validates it. This mirrors how a string
/// behaves after an assignment-style allocation failure.
pub struct ByteString {
  pub(crate) repr: Repr,
}

// SAFETY: the heap block is exclusively owned by this value and the type
// has no interior mutability, so transferring or sharing it across threads
// follows the usual `&`/`&mut` rules.
unsafe impl Send for ByteString {}
unsafe impl Sync for ByteString {}

/// The process-wide empty string: immutable, valid to read, never
/// allocated. Useful where an API hands out `&ByteString` and has nothing
/// to return.
pub static EMPTY_STRING: ByteString = ByteString::new();

impl ByteString {
  /// Creates an empty, unallocated string. Note that a fresh string is
  /// not [valid](ByteString::is_valid) until something reserves or writes
  /// into it; it still reads as empty.
  pub const fn new() -> Self {
    Self { repr: Repr::new() }
  }

  /// Creates an empty string with at least `capacity` bytes reserved.
  /// On allocation failure the result is the invalid empty string.
  pub fn with_capacity(capacity: usize) -> Self {
    let mut s = Self::new();
    s.reserve(capacity);
    s
  }

  /// Fallible construction from a byte slice, for callers that need to
  /// distinguish an allocation failure from genuinely empty input. A
  /// `TryFrom` impl would collide with the blanket `TryFrom` that core
  /// derives from [`From<&[u8]>`], so this is an inherent constructor.
  pub fn try_from_bytes(src: &[u8]) -> Result<Self, ReserveError> {
    let mut s = Self::new();
    if s.assign(src) {
      Ok(s)
    } else {
      Err(ReserveError)
    }
  }

  /// Formats an integer in base 10.
  pub fn from_int<T: itoa::Integer>(value: T) -> Self {
    let mut s = Self::new();
    s.push_int(value);
    s
  }

  /// Formats an unsigned integer in the given radix (2..=36).
  pub fn from_radix(value: u64, radix: u32) -> Self {
    let mut s = Self::new();
    s.push_radix(value, radix);
    s
  }

  /// Formats a float with exactly `decimals` digits after the point.
  pub fn from_float(value: f64, decimals: u8) -> Self {
    let mut s = Self::new();
    s.push_float(value, decimals);
    s
  }

  /// Content length in bytes, excluding the terminator.
  #[inline]
  pub fn len(&self) -> usize {
    self.repr.len()
  }

  /// Returns `true` if the string holds no bytes.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns `true` if the string has a buffer. An invalid string (never
  /// written, or reset by a failed assignment) reads as empty but reports
  /// `false` here.
  #[inline]
  pub fn is_valid(&self) -> bool {
    self.repr.is_valid()
  }

  /// Returns `true` if the content currently lives in the inline buffer.
  #[inline]
  pub fn is_inline(&self) -> bool {
    self.repr.is_inline()
  }

  /// Content capacity in bytes, excluding the terminator slot.
  #[inline]
  pub fn capacity(&self) -> usize {
    self.repr.capacity()
  }

  /// Ensures capacity for at least `size` content bytes. Returns `false`
  /// and leaves the string unchanged when the allocator refuses or the
  /// request exceeds [`crate::MAX_CAPACITY`]. `reserve(0)` validates an
  /// invalid string.
  pub fn reserve(&mut self, size: usize) -> bool {
    self.repr.reserve(size)
  }

  /// `Result`-shaped [`reserve`](ByteString::reserve).
  pub fn try_reserve(&mut self, size: usize) -> Result<(), ReserveError> {
    if self.repr.reserve(size) {
      Ok(())
    } else {
      Err(ReserveError)
    }
  }

  /// Drops the content, keeping the buffer and capacity.
  pub fn clear(&mut self) {
    self.repr.set_len(0);
  }

  /// The content as a slice, without the terminator.
  #[inline]
  pub fn as_bytes(&self) -> &[u8] {
    self.repr.as_slice()
  }

  /// Mutable view of the content. Overwriting bytes in place is fine;
  /// length changes must go through the string's own API.
  #[inline]
  pub fn as_bytes_mut(&mut self) -> &mut [u8] {
    self.repr.as_mut_slice()
  }

  /// The content plus its NUL terminator: a C-style view, stable until
  /// the next mutation. An invalid string yields `&[0]`.
  #[inline]
  pub fn as_bytes_with_nul(&self) -> &[u8] {
    self.repr.as_slice_with_nul()
  }

  /// Byte at `index`, or 0 past the end (the terminator a C caller would
  /// see). Use slice indexing for a panicking bounds check.
  pub fn byte_at(&self, index: usize) -> u8 {
    self.as_bytes().get(index).copied().unwrap_or(0)
  }

  /// Overwrites the byte at `index`; out of range is a no-op.
  pub fn set_byte_at(&mut self, index: usize, byte: u8) {
    if let Some(slot) = self.as_bytes_mut().get_mut(index) {
      *slot = byte;
    }
  }

  /// Copies content starting at `from` into `dst`, NUL-terminating it.
  /// Returns the number of content bytes copied (at most
  /// `dst.len() - 1`).
  pub fn copy_to(&self, dst: &mut [u8], from: usize) -> usize {
    if dst.is_empty() {
      return 0;
    }
    let len = self.len();
    if from >= len {
      dst[0] = 0;
      return 0;
    }
    let n = (dst.len() - 1).min(len - from);
    dst[..n].copy_from_slice(&self.as_bytes()[from..from + n]);
    dst[n] = 0;
    n
  }

  /// Replaces the whole content with `src`. On allocation failure the
  /// string is reset to the invalid empty state and `false` is returned.
  pub fn assign(&mut self, src: &[u8]) -> bool {
    if !self.repr.reserve(src.len()) {
      self.repr.invalidate();
      return false;
    }
    self.repr.buffer_mut()[..src.len()].copy_from_slice(src);
    self.repr.set_len(src.len());
    true
  }

  /// [`assign`](ByteString::assign) from a read-only constant source,
  /// routed through the dedicated constant-data copy primitive.
  pub fn assign_rom(&mut self, src: RomBytes) -> bool {
    let len = src.len();
    if !self.repr.reserve(len) {
      self.repr.invalidate();
      return false;
    }
    rom::copy_from_rom(&mut self.repr.buffer_mut()[..len], src);
    self.repr.set_len(len);
    true
  }

  /// Appends `src`. Returns `false` and leaves the string unchanged when
  /// growth fails.
  pub fn push_bytes(&mut self, src: &[u8]) -> bool {
    if src.is_empty() {
      return true;
    }
    let old_len = self.len();
    let new_len = old_len + src.len();
    if !self.repr.reserve(new_len) {
      return false;
    }
    self.repr.buffer_mut()[old_len..new_len].copy_from_slice(src);
    self.repr.set_len(new_len);
    true
  }

  /// Appends the bytes of a string slice.
  #[inline]
  pub fn push_str(&mut self, src: &str) -> bool {
    self.push_bytes(src.as_bytes())
  }

  /// Appends one byte.
  #[inline]
  pub fn push(&mut self, byte: u8) -> bool {
    self.push_bytes(&[byte])
  }

  /// Appends a char as UTF-8 bytes.
  pub fn push_char(&mut self, c: char) -> bool {
    let mut buf = [0u8; 4];
    self.push_bytes(c.encode_utf8(&mut buf).as_bytes())
  }

  /// Appends another string. Appending an invalid string fails; appending
  /// an empty valid one succeeds without change.
  pub fn append(&mut self, other: &ByteString) -> bool {
    if !other.is_valid() {
      return false;
    }
    self.push_bytes(other.as_bytes())
  }

  /// Appends the string to itself, doubling the content. Growth may move
  /// the buffer, so the existing content is copied into the tail after
  /// the reserve rather than read from a stale source.
  pub fn append_self(&mut self) -> bool {
    if !self.is_valid() {
      return false;
    }
    let len = self.len();
    if len == 0 {
      return true;
    }
    let new_len = 2 * len;
    if !self.repr.reserve(new_len) {
      return false;
    }
    self.repr.buffer_mut().copy_within(..len, len);
    self.repr.set_len(new_len);
    true
  }

  /// Appends a subrange of the string's own content (the
  /// `s += &s[1..3]` case). The copy happens inside the (possibly
  /// relocated) buffer, so the source range can never dangle. Bounds are
  /// clamped to the current length; an empty clamped range succeeds.
  pub fn push_from_range(&mut self, range: Range<usize>) -> bool {
    let len = self.len();
    let start = range.start.min(len);
    let end = range.end.min(len);
    if start >= end {
      return true;
    }
    let count = end - start;
    if !self.repr.reserve(len + count) {
      return false;
    }
    self.repr.buffer_mut().copy_within(start..end, len);
    self.repr.set_len(len + count);
    true
  }

  /// Appends from a read-only constant source.
  pub fn push_rom(&mut self, src: RomBytes) -> bool {
    if src.is_empty() {
      return true;
    }
    let old_len = self.len();
    let new_len = old_len + src.len();
    if !self.repr.reserve(new_len) {
      return false;
    }
    rom::copy_from_rom(&mut self.repr.buffer_mut()[old_len..new_len], src);
    self.repr.set_len(new_len);
    true
  }

  /// Appends an integer in base 10.
  pub fn push_int<T: itoa::Integer>(&mut self, value: T) -> bool {
    let mut buf = itoa::Buffer::new();
    self.push_bytes(buf.format(value).as_bytes())
  }

  /// Appends an unsigned integer in the given radix (2..=36; anything
  /// else is treated as 10).
  pub fn push_radix(&mut self, value: u64, radix: u32) -> bool {
    self.push_bytes(numfmt::format_radix(value, radix).as_bytes())
  }

  /// Appends a float with exactly `decimals` digits after the point.
  /// Fails (no change) when the rendering cannot be produced.
  pub fn push_float(&mut self, value: f64, decimals: u8) -> bool {
    match numfmt::format_float(value, decimals) {
      Some(scratch) => self.push_bytes(scratch.as_bytes()),
      None => false,
    }
  }

  /// First position of `byte` at or after `from`.
  pub fn index_of_byte(&self, byte: u8, from: usize) -> Option<usize> {
    if from >= self.len() {
      return None;
    }
    self.as_bytes()[from..]
      .iter()
      .position(|&b| b == byte)
      .map(|i| i + from)
  }

  /// Case-insensitive (ASCII) version of
  /// [`index_of_byte`](ByteString::index_of_byte).
  pub fn index_of_byte_ignore_case(
    &self,
    byte: u8,
    from: usize,
  ) -> Option<usize> {
    if from >= self.len() {
      return None;
    }
    self.as_bytes()[from..]
      .iter()
      .position(|b| b.eq_ignore_ascii_case(&byte))
      .map(|i| i + from)
  }

  /// First position of `needle` at or after `from`. An empty needle
  /// matches at `from`.
  pub fn index_of(&self, needle: &[u8], from: usize) -> Option<usize> {
    if from >= self.len() {
      return None;
    }
    if needle.is_empty() {
      return Some(from);
    }
    find_sub(&self.as_bytes()[from..], needle).map(|i| i + from)
  }

  /// Case-insensitive (ASCII) version of
  /// [`index_of`](ByteString::index_of).
  pub fn index_of_ignore_case(
    &self,
    needle: &[u8],
    from: usize,
  ) -> Option<usize> {
    let len = self.len();
    if needle.is_empty() || len == 0 || needle.len() > len || from >= len {
      return None;
    }
    self.as_bytes()[from..]
      .windows(needle.len())
      .position(|w| w.eq_ignore_ascii_case(needle))
      .map(|i| i + from)
  }

  /// Last position of `byte` at or before `from` (clamped to the end).
  pub fn last_index_of_byte(&self, byte: u8, from: usize) -> Option<usize> {
    let len = self.len();
    if len == 0 {
      return None;
    }
    let bound = from.min(len - 1);
    self.as_bytes()[..=bound].iter().rposition(|&b| b == byte)
  }

  /// Last position where `needle` starts at or before `from` (clamped).
  /// No native reverse substring search exists, so this scans forward
  /// tracking the last match inside the bound.
  pub fn last_index_of(&self, needle: &[u8], from: usize) -> Option<usize> {
    let len = self.len();
    if needle.is_empty() || len == 0 || needle.len() > len {
      return None;
    }
    last_match(self.as_bytes(), needle, from.min(len - 1))
  }

  /// Returns `true` if the content starts with `prefix`. An empty prefix
  /// never matches.
  pub fn starts_with(&self, prefix: &[u8]) -> bool {
    self.starts_with_at(prefix, 0)
  }

  /// [`starts_with`](ByteString::starts_with) at a byte offset.
  pub fn starts_with_at(&self, prefix: &[u8], offset: usize) -> bool {
    !prefix.is_empty()
      && self.len() >= prefix.len() + offset
      && &self.as_bytes()[offset..offset + prefix.len()] == prefix
  }

  /// ASCII-case-insensitive prefix check at a byte offset.
  pub fn starts_with_ignore_case_at(
    &self,
    prefix: &[u8],
    offset: usize,
  ) -> bool {
    !prefix.is_empty()
      && self.len() >= prefix.len() + offset
      && self.as_bytes()[offset..offset + prefix.len()]
        .eq_ignore_ascii_case(prefix)
  }

  /// Returns `true` if the content ends with `suffix`. An empty suffix
  /// never matches.
  pub fn ends_with(&self, suffix: &[u8]) -> bool {
    !suffix.is_empty()
      && self.len() >= suffix.len()
      && &self.as_bytes()[self.len() - suffix.len()..] == suffix
  }

  /// ASCII-case-insensitive suffix check.
  pub fn ends_with_ignore_case(&self, suffix: &[u8]) -> bool {
    !suffix.is_empty()
      && self.len() >= suffix.len()
      && self.as_bytes()[self.len() - suffix.len()..]
        .eq_ignore_ascii_case(suffix)
  }

  /// Replaces every non-overlapping occurrence of `find` with `with`,
  /// scanning left to right. Returns `false` when there is nothing to do
  /// (empty string or empty pattern) or when a required growth fails; a
  /// failed growth leaves the string unchanged.
  ///
  /// Three in-place strategies, chosen by the size relation:
  /// equal-length overwrites each match; a shorter replacement compacts
  /// left-to-right with a read cursor ahead of a write cursor; a longer
  /// one first counts matches to size the buffer, then processes matches
  /// from the end backward so shifted tails never overwrite unprocessed
  /// content.
  pub fn replace(&mut self, find: &[u8], with: &[u8]) -> bool {
    if self.is_empty() || find.is_empty() {
      return false;
    }
    if with.len() == find.len() {
      self.replace_same_len(find, with);
      true
    } else if with.len() < find.len() {
      self.replace_shrinking(find, with);
      true
    } else {
      self.replace_growing(find, with)
    }
  }

  fn replace_same_len(&mut self, find: &[u8], with: &[u8]) {
    let len = self.len();
    let buf = self.repr.as_mut_slice();
    let mut at = 0;
    while at < len {
      let Some(i) = find_sub(&buf[at..], find) else {
        break;
      };
      let pos = at + i;
      buf[pos..pos + with.len()].copy_from_slice(with);
      at = pos + with.len();
    }
  }

  fn replace_shrinking(&mut self, find: &[u8], with: &[u8]) {
    let len = self.len();
    let buf = self.repr.as_mut_slice();
    let mut read = 0;
    let mut write = 0;
    while read < len {
      let Some(i) = find_sub(&buf[read..], find) else {
        break;
      };
      let pos = read + i;
      buf.copy_within(read..pos, write);
      write += pos - read;
      buf[write..write + with.len()].copy_from_slice(with);
      write += with.len();
      read = pos + find.len();
    }
    buf.copy_within(read..len, write);
    let new_len = write + (len - read);
    self.repr.set_len(new_len);
  }

  fn replace_growing(&mut self, find: &[u8], with: &[u8]) -> bool {
    let len = self.len();
    let diff = with.len() - find.len();
    // The match set is fixed by one forward non-overlapping scan of the
    // original content. The backward pass must not search again: a
    // written replacement can form a new occurrence with the bytes to
    // its left, and re-matching it would overrun the sized buffer.
    let mut positions: Vec<usize> = Vec::new();
    {
      let bytes = self.repr.as_slice();
      let mut at = 0;
      while let Some(i) = find_sub(&bytes[at..], find) {
        positions.push(at + i);
        at += i + find.len();
      }
    }
    if positions.is_empty() {
      return true;
    }
    let final_len = len + positions.len() * diff;
    if final_len > self.capacity() && !self.repr.change_buffer(final_len) {
      return false;
    }
    // Backward pass: each iteration shifts the unmatched tail forward by
    // `diff` and writes the replacement, so regions not yet processed are
    // never clobbered.
    let mut cur_len = len;
    for &pos in positions.iter().rev() {
      let tail = pos + find.len();
      let buf = self.repr.buffer_mut();
      buf.copy_within(tail..cur_len, tail + diff);
      buf[pos..pos + with.len()].copy_from_slice(with);
      cur_len += diff;
      self.repr.set_len(cur_len);
    }
    true
  }

  /// Deletes the byte range `[index, index + count)`, clamping `count` to
  /// the available tail. Removing at or past the end is a no-op.
  pub fn remove(&mut self, index: usize, count: usize) {
    let len = self.len();
    if index >= len || count == 0 {
      return;
    }
    let count = count.min(len - index);
    self
      .repr
      .as_mut_slice()
      .copy_within(index + count..len, index);
    self.repr.set_len(len - count);
  }

  /// Deletes everything from `index` to the end.
  pub fn remove_from(&mut self, index: usize) {
    self.remove(index, usize::MAX);
  }

  /// Shortens the content to at most `len` bytes.
  pub fn truncate(&mut self, len: usize) {
    if len < self.len() {
      self.repr.set_len(len);
    }
  }

  /// Strips ASCII whitespace from both ends.
  pub fn trim(&mut self) {
    self.trim_ends(true, true, |b| b.is_ascii_whitespace());
  }

  /// Strips ASCII whitespace from the start.
  pub fn trim_start(&mut self) {
    self.trim_ends(true, false, |b| b.is_ascii_whitespace());
  }

  /// Strips ASCII whitespace from the end.
  pub fn trim_end(&mut self) {
    self.trim_ends(false, true, |b| b.is_ascii_whitespace());
  }

  /// Strips any byte in `set` from both ends.
  pub fn trim_matches(&mut self, set: &[u8]) {
    self.trim_ends(true, true, |b| set.contains(&b));
  }

  /// Strips any byte in `set` from the start.
  pub fn trim_start_matches(&mut self, set: &[u8]) {
    self.trim_ends(true, false, |b| set.contains(&b));
  }

  /// Strips any byte in `set` from the end.
  pub fn trim_end_matches(&mut self, set: &[u8]) {
    self.trim_ends(false, true, |b| set.contains(&b));
  }

  /// Right trim adjusts the length only; left trim goes through the
  /// generic remove primitive, which shifts the survivors to the start.
  fn trim_ends(&mut self, left: bool, right: bool, pred: impl Fn(u8) -> bool) {
    let mut len = self.len();
    if len == 0 {
      return;
    }
    if right {
      let bytes = self.repr.as_slice();
      while len > 0 && pred(bytes[len - 1]) {
        len -= 1;
      }
      self.repr.set_len(len);
    }
    if left {
      let bytes = self.repr.as_slice();
      let mut leading = 0;
      while leading < len && pred(bytes[leading]) {
        leading += 1;
      }
      self.remove(0, leading);
    }
  }

  /// ASCII-lowercases every byte in place. No-op on an empty or invalid
  /// string.
  pub fn make_ascii_lowercase(&mut self) {
    self.repr.as_mut_slice().make_ascii_lowercase();
  }

  /// ASCII-uppercases every byte in place.
  pub fn make_ascii_uppercase(&mut self) {
    self.repr.as_mut_slice().make_ascii_uppercase();
  }

  /// Copies out the range `[from, to)`. Reversed bounds are swapped and
  /// both are clamped to the length; an empty result is the invalid
  /// empty string.
  pub fn substring(&self, from: usize, to: usize) -> ByteString {
    let (left, right) = if from <= to { (from, to) } else { (to, from) };
    let len = self.len();
    if left >= len {
      return ByteString::new();
    }
    ByteString::from(&self.as_bytes()[left..right.min(len)])
  }

  /// Copies out everything from `from` to the end.
  pub fn substring_from(&self, from: usize) -> ByteString {
    self.substring(from, self.len())
  }

  /// `atol`-style prefix parse of the content: leading ASCII whitespace,
  /// optional sign, decimal digits. Saturates on overflow; returns 0 when
  /// no digits lead the content.
  pub fn to_int(&self) -> i64 {
    numfmt::parse_int_prefix(self.as_bytes())
  }

  /// `atod`-style prefix parse of the content as a float.
  pub fn to_float(&self) -> f64 {
    numfmt::parse_float_prefix(self.as_bytes())
  }

  /// Equality that does not leak the mismatch position through timing:
  /// for equal lengths, every byte is visited and the two tallies are
  /// combined with a bitwise AND, so there is no early exit in the
  /// comparison loop. Unequal lengths return `false` immediately (length
  /// is not treated as secret).
  pub fn equals_constant_time(&self, other: &ByteString) -> bool {
    let len = self.len();
    if len != other.len() {
      return false;
    }
    if len == 0 {
      return true;
    }
    let mut equal: usize = 0;
    let mut diff: usize = 0;
    for (&a, &b) in self.as_bytes().iter().zip(other.as_bytes()) {
      if a == b {
        equal += 1;
      } else {
        diff += 1;
      }
    }
    (equal == len) & (diff == 0)
  }
}

/// First occurrence of `needle` in `haystack`. Callers guarantee a
/// non-empty needle.
fn find_sub(haystack: &[u8], needle: &[u8]) -> Option<usize> {
  if needle.len() > haystack.len() {
    return None;
  }
  haystack.windows(needle.len()).position(|w| w == needle)
}

/// Last occurrence of `needle` starting at or before `bound`.
fn last_match(bytes: &[u8], needle: &[u8], bound: usize) -> Option<usize> {
  let mut found = None;
  let mut at = 0;
  while let Some(i) = find_sub(&bytes[at..], needle) {
    let pos = at + i;
    if pos > bound {
      break;
    }
    found = Some(pos);
    at = pos + 1;
  }
  found
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::raw::INLINE_CAPACITY;

  #[test]
  fn new_string_is_falsy_and_empty() {
    let s = ByteString::new();
    assert!(!s.is_valid());
    assert_eq!(s.len(), 0);
    assert!(s.is_empty());
    assert_eq!(s.as_bytes(), b"");
    assert_eq!(s.as_bytes_with_nul(), b"\0");
  }

  #[test]
  fn append_correctness() {
    let a_orig = ByteString::from("foo");
    let b = ByteString::from("barbaz");
    let mut a = a_orig.clone();
    assert!(a.append(&b));
    assert_eq!(a.len(), a_orig.len() + b.len());
    let tail = a.substring_from(a.len() - b.len());
    assert_eq!(tail.as_bytes(), b.as_bytes());
  }

  #[test]
  fn append_invalid_fails_append_empty_succeeds() {
    let mut s = ByteString::from("x");
    assert!(!s.append(&ByteString::new()));
    let mut empty = ByteString::new();
    empty.reserve(0);
    assert!(s.append(&empty));
    assert_eq!(s, "x");
  }

  #[test]
  fn self_concatenation_doubles() {
    let mut s = ByteString::from("ab");
    assert!(s.append_self());
    assert_eq!(s, "abab");
    assert_eq!(s.as_bytes_with_nul(), b"abab\0");
  }

  #[test]
  fn self_subrange_append() {
    let mut s = ByteString::from("hello");
    assert!(s.push_from_range(1..3));
    assert_eq!(s, "helloel");
    // Out-of-range bounds clamp to a no-op.
    assert!(s.push_from_range(40..50));
    assert_eq!(s, "helloel");
  }

  #[test]
  fn representation_round_trip() {
    let long = "this is long enough to force a heap allocation for sure";
    let mut s = ByteString::from(long);
    assert!(!s.is_inline());
    assert!(s.assign(b"short"));
    // Assignment reserves the smaller size; shrinking back to inline goes
    // through the buffer manager explicitly.
    assert!(s.repr.change_buffer(5));
    assert!(s.is_inline());
    assert_eq!(s, "short");
  }

  #[test]
  fn spill_preserves_content() {
    let mut s = ByteString::from("seed");
    while s.len() <= INLINE_CAPACITY {
      assert!(s.push(b'!'));
    }
    assert!(!s.is_inline());
    assert!(s.starts_with(b"seed"));
    assert_eq!(s.byte_at(s.len() - 1), b'!');
  }

  #[test]
  fn replace_equal_length() {
    let mut s = ByteString::from("aXbXc");
    assert!(s.replace(b"X", b"Y"));
    assert_eq!(s, "aYbYc");
  }

  #[test]
  fn replace_shrinking() {
    let mut s = ByteString::from("aXXbXXc");
    assert!(s.replace(b"XX", b""));
    assert_eq!(s, "abc");
    assert_eq!(s.as_bytes_with_nul(), b"abc\0");
  }

  #[test]
  fn replace_growing() {
    let mut s = ByteString::from("a.b.c");
    assert!(s.replace(b".", b"::"));
    assert_eq!(s, "a::b::c");
  }

  #[test]
  fn replace_growing_adjacent_matches() {
    let mut s = ByteString::from("...");
    assert!(s.replace(b".", b"ab"));
    assert_eq!(s, "ababab");
  }

  #[test]
  fn replace_growing_never_rematches_its_own_output() {
    // "bbb" written at position 1 puts a fresh "ab" at position 0; the
    // match set must come from the original content only.
    let mut s = ByteString::from("aab");
    assert!(s.replace(b"ab", b"bbb"));
    assert_eq!(s, "abbb");
  }

  #[test]
  fn replace_growing_rematch_prone_pattern_at_scale() {
    let mut s = ByteString::new();
    let mut expected = ByteString::new();
    for _ in 0..16 {
      assert!(s.push_str("aab"));
      assert!(expected.push_str("abbb"));
    }
    assert!(s.replace(b"ab", b"bbb"));
    assert_eq!(s, expected);
    assert_eq!(s.as_bytes_with_nul().last(), Some(&0));
  }

  #[test]
  fn replace_no_match_and_empty_pattern() {
    let mut s = ByteString::from("abc");
    assert!(s.replace(b"zz", b"yy"));
    assert_eq!(s, "abc");
    assert!(!s.replace(b"", b"yy"));
    let mut empty = ByteString::new();
    assert!(!empty.replace(b"a", b"b"));
  }

  #[test]
  fn replace_overlapping_candidates_consume_matches() {
    let mut s = ByteString::from("aaa");
    assert!(s.replace(b"aa", b"b"));
    // Non-overlapping scan: the first two bytes match, the third stays.
    assert_eq!(s, "ba");
  }

  #[test]
  fn trim_whitespace_and_sets() {
    let mut s = ByteString::from("  hi  ");
    s.trim();
    assert_eq!(s, "hi");

    let mut s = ByteString::from("xxhixx");
    s.trim_matches(b"x");
    assert_eq!(s, "hi");

    let mut s = ByteString::from("  hi");
    s.trim_end();
    assert_eq!(s, "  hi");
    s.trim_start();
    assert_eq!(s, "hi");

    let mut all = ByteString::from("   ");
    all.trim();
    assert_eq!(all.len(), 0);
  }

  #[test]
  fn remove_clamps_and_shifts() {
    let mut s = ByteString::from("hello world");
    s.remove(5, 1);
    assert_eq!(s, "helloworld");
    s.remove(50, 3);
    assert_eq!(s, "helloworld");
    s.remove(5, 9999);
    assert_eq!(s, "hello");
    s.remove_from(2);
    assert_eq!(s, "he");
  }

  #[test]
  fn truncate_only_shortens() {
    let mut s = ByteString::from("abcdef");
    s.truncate(100);
    assert_eq!(s, "abcdef");
    s.truncate(2);
    assert_eq!(s, "ab");
    assert_eq!(s.as_bytes_with_nul(), b"ab\0");
  }

  #[test]
  fn case_conversion_is_idempotent() {
    let mut s = ByteString::from("MiXed 123!");
    s.make_ascii_uppercase();
    let once = s.clone();
    s.make_ascii_uppercase();
    assert_eq!(s, once);
    assert_eq!(s, "MIXED 123!");
    s.make_ascii_lowercase();
    assert_eq!(s, "mixed 123!");
  }

  #[test]
  fn search_bytes() {
    let s = ByteString::from("hello");
    assert_eq!(s.index_of_byte(b'l', 0), Some(2));
    assert_eq!(s.index_of_byte(b'l', 3), Some(3));
    assert_eq!(s.index_of_byte(b'z', 0), None);
    assert_eq!(s.index_of_byte(b'h', 9), None);
    assert_eq!(s.index_of_byte_ignore_case(b'L', 0), Some(2));
    assert_eq!(s.last_index_of_byte(b'l', s.len() - 1), Some(3));
    assert_eq!(s.last_index_of_byte(b'l', 2), Some(2));
  }

  #[test]
  fn search_substrings() {
    let s = ByteString::from("one two one two");
    assert_eq!(s.index_of(b"two", 0), Some(4));
    assert_eq!(s.index_of(b"two", 5), Some(12));
    assert_eq!(s.index_of(b"three", 0), None);
    assert_eq!(s.index_of_ignore_case(b"TWO", 0), Some(4));
    assert_eq!(s.last_index_of(b"one", s.len() - 1), Some(8));
    assert_eq!(s.last_index_of(b"one", 7), Some(0));
    assert_eq!(s.last_index_of(b"", 0), None);
  }

  #[test]
  fn prefix_suffix_checks() {
    let s = ByteString::from("Hello World");
    assert!(s.starts_with(b"Hello"));
    assert!(!s.starts_with(b""));
    assert!(s.starts_with_at(b"World", 6));
    assert!(s.starts_with_ignore_case_at(b"world", 6));
    assert!(s.ends_with(b"World"));
    assert!(s.ends_with_ignore_case(b"WORLD"));
    assert!(!s.ends_with(b"Hello"));
  }

  #[test]
  fn substring_swaps_and_clamps() {
    let s = ByteString::from("hamburger");
    assert_eq!(s.substring(4, 8), "urge");
    assert_eq!(s.substring(8, 4), "urge");
    assert_eq!(s.substring(4, 100), "urger");
    let empty = s.substring(20, 30);
    assert!(!empty.is_valid());
    assert!(empty.is_empty());
  }

  #[test]
  fn assign_replaces_content() {
    let mut s = ByteString::from("something long enough to be on the heap");
    let cap = s.capacity();
    assert!(s.assign(b"tiny"));
    assert_eq!(s, "tiny");
    // Full replacement reuses the existing allocation.
    assert_eq!(s.capacity(), cap);
  }

  #[test]
  fn numeric_constructors_and_appends() {
    assert_eq!(ByteString::from_int(-42), "-42");
    assert_eq!(ByteString::from_int(7u8), "7");
    assert_eq!(ByteString::from_radix(255, 16), "ff");
    assert_eq!(ByteString::from_float(1.5, 2), "1.50");

    let mut s = ByteString::from("v=");
    assert!(s.push_int(10));
    assert!(s.push(b'/'));
    assert!(s.push_radix(10, 2));
    assert_eq!(s, "v=10/1010");
  }

  #[test]
  fn oversized_float_append_leaves_string_unchanged() {
    let mut s = ByteString::from("x");
    assert!(!s.push_float(1e300, 4));
    assert_eq!(s, "x");
  }

  #[test]
  fn prefix_parsers() {
    assert_eq!(ByteString::from(" 42abc").to_int(), 42);
    assert_eq!(ByteString::from("-7").to_int(), -7);
    assert_eq!(ByteString::from("abc").to_int(), 0);
    assert_eq!(ByteString::new().to_int(), 0);
    assert_eq!(ByteString::from("2.5x").to_float(), 2.5);
    assert_eq!(ByteString::from("").to_float(), 0.0);
  }

  #[test]
  fn constant_time_equality() {
    let a = ByteString::from("secret");
    let b = ByteString::from("secret");
    let c = ByteString::from("seCret");
    let d = ByteString::from("secret!");
    assert!(a.equals_constant_time(&b));
    assert!(!a.equals_constant_time(&c));
    assert!(!a.equals_constant_time(&d));
    assert!(ByteString::new().equals_constant_time(&ByteString::new()));
  }

  #[test]
  fn byte_access() {
    let mut s = ByteString::from("abc");
    assert_eq!(s.byte_at(1), b'b');
    assert_eq!(s.byte_at(10), 0);
    s.set_byte_at(1, b'X');
    assert_eq!(s, "aXc");
    s.set_byte_at(10, b'!');
    assert_eq!(s, "aXc");
  }

  #[test]
  fn copy_to_clamps_and_terminates() {
    let s = ByteString::from("hello");
    let mut buf = [0xffu8; 4];
    assert_eq!(s.copy_to(&mut buf, 0), 3);
    assert_eq!(&buf, b"hel\0");
    let mut buf = [0xffu8; 16];
    assert_eq!(s.copy_to(&mut buf, 3), 2);
    assert_eq!(&buf[..3], b"lo\0");
    assert_eq!(s.copy_to(&mut buf, 9), 0);
    assert_eq!(buf[0], 0);
  }

  #[test]
  fn try_from_bytes_constructs() {
    let s = ByteString::try_from_bytes(b"ok").unwrap();
    assert_eq!(s, "ok");
    // The blanket conversion core derives from `From<&[u8]>` stays
    // usable alongside the inherent fallible constructor.
    let t: ByteString = b"ok".as_slice().try_into().unwrap();
    assert_eq!(t, s);
  }

  #[test]
  fn growth_beyond_bound_fails_cleanly() {
    let mut s = ByteString::from("keep me");
    assert!(!s.reserve(crate::MAX_CAPACITY + 1));
    assert_eq!(s, "keep me");
    assert!(s.is_valid());
  }

  #[test]
  fn empty_singleton_reads_as_empty() {
    assert!(!EMPTY_STRING.is_valid());
    assert_eq!(EMPTY_STRING.len(), 0);
    assert_eq!(EMPTY_STRING.as_bytes_with_nul(), b"\0");
  }

  #[test]
  fn clear_keeps_capacity() {
    let mut s = ByteString::from("some rather long content on the heap!!");
    let cap = s.capacity();
    s.clear();
    assert!(s.is_empty());
    assert!(s.is_valid());
    assert_eq!(s.capacity(), cap);
  }
}
