//! # smallbytes
//!
//! A small-buffer-optimized, singly-owned dynamic byte string for
//! constrained targets.
//!
//! The crate provides one main type, [`ByteString`]: a growable sequence of
//! bytes that stores short content inline (no heap allocation) and spills to
//! a single, exclusively owned heap block for longer content. There is no
//! reference counting and no copy-on-write; cloning is a deep copy and
//! moving transfers the buffer.
//!
//! ## Example
//!
//! ```rust
//! use smallbytes::ByteString;
//!
//! let mut s = ByteString::from("hello");
//! s.push_str(" world");
//! assert_eq!(s, "hello world");
//!
//! assert!(s.replace(b"world", b"there"));
//! assert_eq!(s, "hello there");
//! ```
//!
//! ## Representation
//!
//! Exactly one of three representations is active at any time:
//!
//! - **Invalid**: no buffer. The default state, also entered when an
//!   assignment-style operation cannot allocate. Reads behave as an empty
//!   string and [`ByteString::is_valid`] returns `false`.
//! - **Inline**: a fixed array embedded in the value itself, sized to
//!   [`INLINE_CAPACITY`] content bytes plus a NUL terminator.
//! - **Heap**: an exclusively owned allocation with 32-bit length and
//!   capacity fields. Growth rounds the requested size up to 16-byte
//!   blocks and is bounded by [`MAX_CAPACITY`]; exceeding the bound fails
//!   the operation (a `false` return), it never aborts.
//!
//! Content is NUL-terminated at `len` in every buffered representation, so
//! [`ByteString::as_bytes_with_nul`] can hand a C-style view to
//! collaborators without copying.
//!
//! ## Allocation failure
//!
//! Capacity-affecting operations report failure through their return value.
//! Concatenation-style calls leave the string unchanged on failure;
//! assignment-style calls reset it to the Invalid state. Nothing panics.
//!
//! ## Read-only constant sources
//!
//! [`RomBytes`] preserves the distinction between normal-memory sources and
//! read-only constant data (flash/PROGMEM on embedded targets): a second
//! source kind with its own copy primitive that is never aliased against
//! the destination buffer. The [`rom!`] macro wraps literals.
//!
//! ## `no_std` support
//!
//! The crate is `no_std` + `alloc` by default; the `std` feature enables
//! standard-library integration for serde and `bstr`.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub mod byte_string;
mod numfmt;
mod ops;
pub mod raw;
pub mod rom;

pub use byte_string::ByteString;
pub use byte_string::EMPTY_STRING;
pub use raw::INLINE_CAPACITY;
pub use raw::MAX_CAPACITY;
pub use raw::ReserveError;
pub use rom::RomBytes;
