//! Storage representations and the buffer manager.
//!
//! A [`crate::ByteString`] owns exactly one [`Repr`] at a time. All
//! representation transitions (inline↔heap, invalidation) happen here, so
//! the rest of the crate can treat the storage as "a buffer that is always
//! NUL-terminated at `len`". Heap growth rounds requests up to
//! [`BLOCK`]-byte boundaries and is bounded by [`MAX_CAPACITY`].

use alloc::alloc::Layout;
use alloc::alloc::alloc;
use alloc::alloc::alloc_zeroed;
use alloc::alloc::dealloc;
use alloc::alloc::realloc;
use core::mem::size_of;
use core::ptr;
use core::ptr::NonNull;
use core::slice;

/// Content bytes an inline string can hold, excluding the NUL terminator.
///
/// Sized so the whole structure (buffer, terminator slot, and length byte)
/// spans three machine words: 22 bytes on 64-bit targets, 10 on 32-bit.
pub const INLINE_CAPACITY: usize = 3 * size_of::<usize>() - 2;

/// Granularity heap capacity requests are rounded up to.
pub(crate) const BLOCK: usize = 16;

/// Upper bound on a heap allocation in bytes, including the terminator.
///
/// Chosen so length and capacity always fit their 32-bit fields; the
/// `large-buffers` feature raises it for targets with external RAM.
#[cfg(not(feature = "large-buffers"))]
pub const MAX_CAPACITY: usize = 65_535;
#[cfg(feature = "large-buffers")]
pub const MAX_CAPACITY: usize = 3_145_728;

/// Error returned by `Result`-shaped capacity operations when a request
/// exceeds [`MAX_CAPACITY`] or the allocator refuses it.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error,
)]
#[display("capacity request exceeded the maximum bound or allocation failed")]
pub struct ReserveError;

/// Inline storage: fixed buffer plus terminator slot, length in one byte.
#[derive(Clone, Copy)]
pub(crate) struct InlineBuf {
  pub(crate) buf: [u8; INLINE_CAPACITY + 1],
  pub(crate) len: u8,
}

impl InlineBuf {
  pub(crate) const fn new() -> Self {
    Self {
      buf: [0u8; INLINE_CAPACITY + 1],
      len: 0,
    }
  }
}

/// Heap storage: exclusively owned allocation of `cap + 1` bytes.
///
/// `cap` and `len` count content bytes only; the extra byte holds the NUL
/// terminator. Both fit in 32 bits by the [`MAX_CAPACITY`] bound.
pub(crate) struct HeapBuf {
  ptr: NonNull<u8>,
  cap: u32,
  len: u32,
}

impl Drop for HeapBuf {
  fn drop(&mut self) {
    if let Ok(layout) = Layout::array::<u8>(self.cap as usize + 1) {
      // SAFETY: `ptr` was allocated by this module with exactly this
      // layout and is exclusively owned.
      unsafe { dealloc(self.ptr.as_ptr(), layout) }
    }
  }
}

/// The active storage of a byte string.
///
/// `Invalid` is the "null buffer" state: no storage, length zero, falsy.
/// It is the default-constructed state and the state entered when an
/// assignment-style allocation fails.
pub(crate) enum Repr {
  Invalid,
  Inline(InlineBuf),
  Heap(HeapBuf),
}

impl Repr {
  pub(crate) const fn new() -> Self {
    Repr::Invalid
  }

  pub(crate) const fn is_valid(&self) -> bool {
    !matches!(self, Repr::Invalid)
  }

  pub(crate) const fn is_inline(&self) -> bool {
    matches!(self, Repr::Inline(_))
  }

  pub(crate) fn len(&self) -> usize {
    match self {
      Repr::Invalid => 0,
      Repr::Inline(inline) => inline.len as usize,
      Repr::Heap(heap) => heap.len as usize,
    }
  }

  /// Content capacity in bytes, excluding the terminator slot.
  pub(crate) fn capacity(&self) -> usize {
    match self {
      Repr::Invalid => 0,
      Repr::Inline(_) => INLINE_CAPACITY,
      Repr::Heap(heap) => heap.cap as usize,
    }
  }

  pub(crate) fn as_slice(&self) -> &[u8] {
    match self {
      Repr::Invalid => &[],
      Repr::Inline(inline) => &inline.buf[..inline.len as usize],
      // SAFETY: the first `len` bytes of the allocation are initialized
      // content; `len <= cap` holds by construction.
      Repr::Heap(heap) => unsafe {
        slice::from_raw_parts(heap.ptr.as_ptr(), heap.len as usize)
      },
    }
  }

  pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
    match self {
      Repr::Invalid => &mut [],
      Repr::Inline(inline) => &mut inline.buf[..inline.len as usize],
      // SAFETY: as in `as_slice`; `&mut self` guarantees exclusivity.
      Repr::Heap(heap) => unsafe {
        slice::from_raw_parts_mut(heap.ptr.as_ptr(), heap.len as usize)
      },
    }
  }

  /// Content plus the NUL terminator. The Invalid state borrows a static
  /// terminator so callers always get a C-style view.
  pub(crate) fn as_slice_with_nul(&self) -> &[u8] {
    match self {
      Repr::Invalid => &[0],
      Repr::Inline(inline) => &inline.buf[..inline.len as usize + 1],
      // SAFETY: `set_len` keeps a NUL at `len`, inside the allocation.
      Repr::Heap(heap) => unsafe {
        slice::from_raw_parts(heap.ptr.as_ptr(), heap.len as usize + 1)
      },
    }
  }

  /// The whole writable buffer including the terminator slot, regardless
  /// of the current length. Mutation algorithms (concat tails, replace,
  /// remove) stage bytes here before committing a new length.
  pub(crate) fn buffer_mut(&mut self) -> &mut [u8] {
    match self {
      Repr::Invalid => &mut [],
      Repr::Inline(inline) => &mut inline.buf[..],
      // SAFETY: the allocation spans `cap + 1` bytes and is exclusively
      // owned; every byte is initialized (zero-filled on growth).
      Repr::Heap(heap) => unsafe {
        slice::from_raw_parts_mut(heap.ptr.as_ptr(), heap.cap as usize + 1)
      },
    }
  }

  /// Sets the content length and writes the terminator. Callers must have
  /// ensured `len <= capacity()` through the buffer manager first.
  pub(crate) fn set_len(&mut self, len: usize) {
    match self {
      Repr::Invalid => debug_assert_eq!(len, 0),
      Repr::Inline(inline) => {
        debug_assert!(len <= INLINE_CAPACITY);
        inline.len = len as u8;
        inline.buf[len] = 0;
      }
      Repr::Heap(heap) => {
        debug_assert!(len <= heap.cap as usize);
        heap.len = len as u32;
        // SAFETY: `len <= cap`, and the allocation has `cap + 1` bytes.
        unsafe { *heap.ptr.as_ptr().add(len) = 0 };
      }
    }
  }

  /// Releases any heap block and resets to the Invalid state.
  pub(crate) fn invalidate(&mut self) {
    *self = Repr::Invalid;
  }

  /// Ensures the active buffer can hold `size` content bytes. Returns
  /// `false` (structure unchanged) only when the allocator refuses or the
  /// request exceeds [`MAX_CAPACITY`]. `reserve(0)` validates an Invalid
  /// string.
  pub(crate) fn reserve(&mut self, size: usize) -> bool {
    if self.is_valid() && self.capacity() >= size {
      return true;
    }
    if self.change_buffer(size) {
      if self.len() == 0 {
        self.set_len(0);
      }
      return true;
    }
    false
  }

  /// Changes the representation so at least `max_len` content bytes fit,
  /// preserving content and length.
  pub(crate) fn change_buffer(&mut self, max_len: usize) -> bool {
    // Take the inline path only when the current content also fits, so a
    // heap→inline shrink can never truncate.
    if max_len <= INLINE_CAPACITY && self.len() <= INLINE_CAPACITY {
      match self {
        Repr::Inline(_) => return true,
        Repr::Invalid => {
          *self = Repr::Inline(InlineBuf::new());
          return true;
        }
        Repr::Heap(heap) => {
          let len = heap.len as usize;
          let mut inline = InlineBuf::new();
          // SAFETY: the first `len` bytes are initialized content.
          inline.buf[..len].copy_from_slice(unsafe {
            slice::from_raw_parts(heap.ptr.as_ptr(), len)
          });
          inline.len = len as u8;
          // Replacing the variant drops `HeapBuf`, freeing the block.
          *self = Repr::Inline(inline);
          return true;
        }
      }
    }

    let new_size = (max_len + BLOCK) & !(BLOCK - 1);
    if new_size > MAX_CAPACITY {
      return false;
    }
    match self {
      Repr::Heap(heap) => {
        // A shrink request never goes below the current content and its
        // terminator; `len <= cap` must hold across the realloc.
        let content = heap.len as usize + 1;
        let new_size = new_size.max((content + BLOCK - 1) & !(BLOCK - 1));
        let old_size = heap.cap as usize + 1;
        let Ok(old_layout) = Layout::array::<u8>(old_size) else {
          return false;
        };
        // SAFETY: `ptr` was allocated with `old_layout`; `new_size` is
        // non-zero and within `MAX_CAPACITY`.
        let grown =
          unsafe { realloc(heap.ptr.as_ptr(), old_layout, new_size) };
        let Some(grown) = NonNull::new(grown) else {
          return false;
        };
        if new_size > old_size {
          // SAFETY: the tail `[old_size, new_size)` lies inside the new
          // allocation. Zero-filled for determinism.
          unsafe {
            ptr::write_bytes(
              grown.as_ptr().add(old_size),
              0,
              new_size - old_size,
            )
          };
        }
        heap.ptr = grown;
        heap.cap = (new_size - 1) as u32;
        true
      }
      Repr::Inline(inline) => {
        let Ok(layout) = Layout::array::<u8>(new_size) else {
          return false;
        };
        // SAFETY: `layout` has non-zero size.
        let raw = unsafe { alloc(layout) };
        let Some(raw) = NonNull::new(raw) else {
          return false;
        };
        let copied = inline.buf.len();
        // SAFETY: `new_size >= copied` (the smallest rounded heap block
        // already exceeds the inline array); source and destination are
        // distinct allocations.
        unsafe {
          ptr::copy_nonoverlapping(inline.buf.as_ptr(), raw.as_ptr(), copied);
          ptr::write_bytes(raw.as_ptr().add(copied), 0, new_size - copied);
        }
        *self = Repr::Heap(HeapBuf {
          ptr: raw,
          cap: (new_size - 1) as u32,
          len: inline.len as u32,
        });
        true
      }
      Repr::Invalid => {
        let Ok(layout) = Layout::array::<u8>(new_size) else {
          return false;
        };
        // SAFETY: `layout` has non-zero size.
        let raw = unsafe { alloc_zeroed(layout) };
        let Some(raw) = NonNull::new(raw) else {
          return false;
        };
        *self = Repr::Heap(HeapBuf {
          ptr: raw,
          cap: (new_size - 1) as u32,
          len: 0,
        });
        true
      }
    }
  }
}

impl Default for Repr {
  fn default() -> Self {
    Repr::new()
  }
}
