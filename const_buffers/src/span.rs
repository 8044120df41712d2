use std::io::IoSlice;
use std::iter::Copied;

use crate::ConstBufferSubspan;

/// A [`ConstBufferSpan`] is a borrowed array of [`IoSlice`]s, used
/// whole.  It's the root of every [`ConstBufferSubspan`]: trimming a
/// span always yields a subspan over the same array.
#[derive(Clone, Copy, Default)]
#[repr(transparent)]
pub struct ConstBufferSpan<'a> {
    entries: &'a [IoSlice<'a>],
}

impl<'a> ConstBufferSpan<'a> {
    /// Creates a span over all of `entries`.
    #[must_use]
    #[inline(always)]
    pub const fn new(entries: &'a [IoSlice<'a>]) -> Self {
        ConstBufferSpan { entries }
    }

    /// Returns the backing array of `IoSlice`s.
    #[must_use]
    #[inline(always)]
    pub fn as_slices(&self) -> &'a [IoSlice<'a>] {
        self.entries
    }

    /// Returns the number of entries in the span.
    #[must_use]
    #[inline(always)]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns the total number of bytes in the span.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.iter().map(|slice| slice.len()).sum()
    }

    /// Determines whether the span covers 0 bytes.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|slice| slice.is_empty())
    }

    /// Returns an iterator over the span's entries.
    #[inline(always)]
    pub fn iter(&self) -> Copied<std::slice::Iter<'a, IoSlice<'a>>> {
        self.entries.iter().copied()
    }

    /// Returns a view of the first `n` bytes in the span.
    #[must_use]
    #[inline]
    pub fn prefix(&self, n: usize) -> ConstBufferSubspan<'a> {
        ConstBufferSubspan::from(*self).prefix(n)
    }

    /// Returns a view of the last `n` bytes in the span.
    #[must_use]
    #[inline]
    pub fn suffix(&self, n: usize) -> ConstBufferSubspan<'a> {
        ConstBufferSubspan::from(*self).suffix(n)
    }
}

impl<'a> From<&'a [IoSlice<'a>]> for ConstBufferSpan<'a> {
    #[inline(always)]
    fn from(entries: &'a [IoSlice<'a>]) -> ConstBufferSpan<'a> {
        ConstBufferSpan::new(entries)
    }
}

impl<'a, const N: usize> From<&'a [IoSlice<'a>; N]> for ConstBufferSpan<'a> {
    #[inline(always)]
    fn from(entries: &'a [IoSlice<'a>; N]) -> ConstBufferSpan<'a> {
        ConstBufferSpan::new(entries)
    }
}

impl<'a> IntoIterator for ConstBufferSpan<'a> {
    type Item = IoSlice<'a>;
    type IntoIter = Copied<std::slice::Iter<'a, IoSlice<'a>>>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for ConstBufferSpan<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstBufferSpan")
            .field("entries", &self.entries.as_ptr())
            .field("entry_count", &self.entries.len())
            .finish()
    }
}

#[test]
fn test_span_miri() {
    let entries = [IoSlice::new(b"Hello "), IoSlice::new(b""), IoSlice::new(b"World")];
    let span = ConstBufferSpan::from(&entries);

    assert_eq!(span.entry_count(), 3);
    assert_eq!(span.len(), 11);
    assert!(!span.is_empty());
    assert_eq!(span.as_slices().as_ptr(), entries.as_ptr());

    let lens: Vec<usize> = span.iter().map(|slice| slice.len()).collect();
    assert_eq!(lens, vec![6, 0, 5]);
}

#[test]
fn test_span_trim_miri() {
    let entries = [IoSlice::new(b"Hello "), IoSlice::new(b"World")];
    let span = ConstBufferSpan::new(&entries);

    let hell: Vec<u8> = span.prefix(4).iter().flat_map(|slice| slice.to_vec()).collect();
    assert_eq!(hell, b"Hell");

    let rld: Vec<u8> = span.suffix(3).iter().flat_map(|slice| slice.to_vec()).collect();
    assert_eq!(rld, b"rld");

    assert_eq!(span.prefix(0).entry_count(), 0);
    assert_eq!(span.suffix(100).len(), 11);
}

#[test]
fn test_empty_span_miri() {
    let span = ConstBufferSpan::default();
    assert_eq!(span.entry_count(), 0);
    assert_eq!(span.len(), 0);
    assert!(span.is_empty());
    assert!(span.iter().next().is_none());
    assert_eq!(span.prefix(5).entry_count(), 0);
    assert_eq!(span.suffix(5).entry_count(), 0);

    let blanks = [IoSlice::new(b""), IoSlice::new(b"")];
    assert!(ConstBufferSpan::from(&blanks[..]).is_empty());
}
