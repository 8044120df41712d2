//! The `const_buffers` crate describes scatter/gather data as views over
//! arrays of [`IoSlice`]s, without ever copying, allocating, or mutating
//! the underlying bytes.
//!
//! A [`ConstBufferSpan`] borrows a whole array of [`IoSlice`]s.  Trimming
//! it (or any view) with `prefix`/`suffix` yields a [`ConstBufferSubspan`]:
//! a view over a contiguous run of the same array's entries, where the
//! first and last entries may be cut at an arbitrary byte offset.  Views
//! are small `Copy` values, trims compose, and the cost of a trim is
//! linear in the number of entries it walks over.
//!
//! Iterating over a [`ConstBufferSubspan`] yields the trimmed
//! [`IoSlice`]s, which may be passed as is to vectored writes.
//!
//! Generic code should go through [`ConstBufferSequence`] and
//! [`TrimBuffers`] (or the [`prefix`], [`suffix`], and [`buffer_size`]
//! helpers); when the kind of sequence is only known at runtime,
//! [`ConstBuffers`] enumerates them.
//!
//! # Examples
//!
//! ```rust
//! use std::io::IoSlice;
//! use const_buffers::ConstBufferSpan;
//!
//! let entries = [IoSlice::new(b"Hello "), IoSlice::new(b"World")];
//! let span = ConstBufferSpan::new(&entries);
//!
//! let hell: Vec<u8> = span.prefix(4).iter().flat_map(|slice| slice.to_vec()).collect();
//! assert_eq!(hell, b"Hell");
//!
//! // "lo Wo", over both entries.
//! let inner = span.suffix(8).prefix(5);
//! assert_eq!(inner.entry_count(), 2);
//! assert_eq!(inner.len(), 5);
//! assert_eq!(&*inner.first().unwrap(), b"lo ");
//! assert_eq!(&*inner.last().unwrap(), b"Wo");
//! ```
//!
//! ```rust
//! use std::io::IoSlice;
//! use const_buffers::{buffer_size, prefix, suffix, ConstBuffers, ConstBufferSpan, TrimBuffers};
//!
//! fn drop_header<'a, B: TrimBuffers<'a>>(buffers: &B, header: usize) -> B::Trimmed {
//!     let size = buffer_size(buffers);
//!     suffix(buffers, size - header.min(size))
//! }
//!
//! let entries = [IoSlice::new(b"HDRpayload")];
//! let single = IoSlice::new(b"HDRpayload");
//!
//! assert_eq!(&*drop_header(&single, 3), b"payload");
//! assert_eq!(drop_header(&ConstBufferSpan::new(&entries), 3).len(), 7);
//!
//! let dynamic = ConstBuffers::from(ConstBufferSpan::new(&entries));
//! assert_eq!(buffer_size(&prefix(&dynamic, 3)), 3);
//! ```
//!
//! [`IoSlice`]: std::io::IoSlice
mod ioslice;
mod sequence;
mod span;
mod subspan;

pub use sequence::buffer_size;
pub use sequence::prefix;
pub use sequence::suffix;
pub use sequence::ConstBufferSequence;
pub use sequence::ConstBuffers;
pub use sequence::ConstBuffersIter;
pub use sequence::TrimBuffers;
pub use span::ConstBufferSpan;
pub use subspan::ConstBufferSubspan;
pub use subspan::SubspanIter;
