//! Generic access to buffer sequences: the [`ConstBufferSequence`] and
//! [`TrimBuffers`] traits let algorithms iterate over and trim any
//! buffer sequence without knowing its concrete type, and
//! [`ConstBuffers`] covers the closed set of sequence kinds when the
//! choice must happen at runtime.
use std::io::IoSlice;

use crate::ConstBufferSpan;
use crate::ConstBufferSubspan;
use crate::SubspanIter;

/// A [`ConstBufferSequence`] is a (cheaply restartable) sequence of
/// [`IoSlice`]s that represent one logical byte stream.
pub trait ConstBufferSequence<'a> {
    /// The iterator returned by [`ConstBufferSequence::buffers`].
    type Iter: Iterator<Item = IoSlice<'a>>;

    /// Returns an iterator over the sequence's slices, from the start.
    fn buffers(&self) -> Self::Iter;

    /// Returns the total number of bytes in the sequence.
    fn buffer_size(&self) -> usize {
        self.buffers().map(|slice| slice.len()).sum()
    }
}

/// A [`TrimBuffers`] sequence can produce views of its first or last
/// `n` bytes without copying any byte.
///
/// Both operations clamp `n` to the sequence's length, and return an
/// empty sequence for `n == 0`.
pub trait TrimBuffers<'a>: ConstBufferSequence<'a> {
    /// The type of the trimmed views.
    type Trimmed: ConstBufferSequence<'a>;

    /// Returns a view of the first `n` bytes in `self`.
    fn prefix(&self, n: usize) -> Self::Trimmed;

    /// Returns a view of the last `n` bytes in `self`.
    fn suffix(&self, n: usize) -> Self::Trimmed;
}

/// Returns a view of the first `n` bytes in `buffers`.
#[must_use]
#[inline(always)]
pub fn prefix<'a, B: TrimBuffers<'a>>(buffers: &B, n: usize) -> B::Trimmed {
    buffers.prefix(n)
}

/// Returns a view of the last `n` bytes in `buffers`.
#[must_use]
#[inline(always)]
pub fn suffix<'a, B: TrimBuffers<'a>>(buffers: &B, n: usize) -> B::Trimmed {
    buffers.suffix(n)
}

/// Returns the total number of bytes in `buffers`.
#[must_use]
#[inline(always)]
pub fn buffer_size<'a, B: ConstBufferSequence<'a>>(buffers: &B) -> usize {
    buffers.buffer_size()
}

impl<'a> ConstBufferSequence<'a> for IoSlice<'a> {
    type Iter = std::iter::Once<IoSlice<'a>>;

    #[inline(always)]
    fn buffers(&self) -> Self::Iter {
        std::iter::once(*self)
    }

    #[inline(always)]
    fn buffer_size(&self) -> usize {
        self.len()
    }
}

impl<'a> TrimBuffers<'a> for IoSlice<'a> {
    type Trimmed = IoSlice<'a>;

    #[inline]
    fn prefix(&self, n: usize) -> IoSlice<'a> {
        crate::ioslice::trim_ioslice(*self, 0, n.min(self.len()))
    }

    #[inline]
    fn suffix(&self, n: usize) -> IoSlice<'a> {
        let len = self.len();
        crate::ioslice::trim_ioslice(*self, len - n.min(len), len)
    }
}

impl<'a> ConstBufferSequence<'a> for ConstBufferSpan<'a> {
    type Iter = std::iter::Copied<std::slice::Iter<'a, IoSlice<'a>>>;

    #[inline(always)]
    fn buffers(&self) -> Self::Iter {
        self.iter()
    }

    #[inline(always)]
    fn buffer_size(&self) -> usize {
        self.len()
    }
}

impl<'a> TrimBuffers<'a> for ConstBufferSpan<'a> {
    type Trimmed = ConstBufferSubspan<'a>;

    #[inline(always)]
    fn prefix(&self, n: usize) -> ConstBufferSubspan<'a> {
        ConstBufferSpan::prefix(self, n)
    }

    #[inline(always)]
    fn suffix(&self, n: usize) -> ConstBufferSubspan<'a> {
        ConstBufferSpan::suffix(self, n)
    }
}

impl<'a> ConstBufferSequence<'a> for ConstBufferSubspan<'a> {
    type Iter = SubspanIter<'a>;

    #[inline(always)]
    fn buffers(&self) -> SubspanIter<'a> {
        self.iter()
    }

    #[inline(always)]
    fn buffer_size(&self) -> usize {
        self.len()
    }
}

impl<'a> TrimBuffers<'a> for ConstBufferSubspan<'a> {
    type Trimmed = ConstBufferSubspan<'a>;

    #[inline(always)]
    fn prefix(&self, n: usize) -> ConstBufferSubspan<'a> {
        ConstBufferSubspan::prefix(self, n)
    }

    #[inline(always)]
    fn suffix(&self, n: usize) -> ConstBufferSubspan<'a> {
        ConstBufferSubspan::suffix(self, n)
    }
}

/// [`ConstBuffers`] is the closed set of buffer sequence kinds, for
/// callers that only know at runtime what they're handed.
///
/// Trimming a `Span` yields a `Subspan`; the other variants keep their kind.
#[derive(Clone, Copy, Debug)]
pub enum ConstBuffers<'a> {
    Single(IoSlice<'a>),
    Span(ConstBufferSpan<'a>),
    Subspan(ConstBufferSubspan<'a>),
}

impl Default for ConstBuffers<'_> {
    fn default() -> Self {
        ConstBuffers::Subspan(ConstBufferSubspan::empty())
    }
}

impl<'a> From<IoSlice<'a>> for ConstBuffers<'a> {
    #[inline(always)]
    fn from(slice: IoSlice<'a>) -> Self {
        ConstBuffers::Single(slice)
    }
}

impl<'a> From<ConstBufferSpan<'a>> for ConstBuffers<'a> {
    #[inline(always)]
    fn from(span: ConstBufferSpan<'a>) -> Self {
        ConstBuffers::Span(span)
    }
}

impl<'a> From<ConstBufferSubspan<'a>> for ConstBuffers<'a> {
    #[inline(always)]
    fn from(subspan: ConstBufferSubspan<'a>) -> Self {
        ConstBuffers::Subspan(subspan)
    }
}

/// Iterator over the slices of a [`ConstBuffers`].
#[derive(Clone, Debug)]
pub enum ConstBuffersIter<'a> {
    Single(std::iter::Once<IoSlice<'a>>),
    Span(std::iter::Copied<std::slice::Iter<'a, IoSlice<'a>>>),
    Subspan(SubspanIter<'a>),
}

impl<'a> Iterator for ConstBuffersIter<'a> {
    type Item = IoSlice<'a>;

    #[inline]
    fn next(&mut self) -> Option<IoSlice<'a>> {
        match self {
            ConstBuffersIter::Single(iter) => iter.next(),
            ConstBuffersIter::Span(iter) => iter.next(),
            ConstBuffersIter::Subspan(iter) => iter.next(),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            ConstBuffersIter::Single(iter) => iter.size_hint(),
            ConstBuffersIter::Span(iter) => iter.size_hint(),
            ConstBuffersIter::Subspan(iter) => iter.size_hint(),
        }
    }
}

impl<'a> ConstBufferSequence<'a> for ConstBuffers<'a> {
    type Iter = ConstBuffersIter<'a>;

    fn buffers(&self) -> ConstBuffersIter<'a> {
        match self {
            ConstBuffers::Single(slice) => ConstBuffersIter::Single(slice.buffers()),
            ConstBuffers::Span(span) => ConstBuffersIter::Span(span.buffers()),
            ConstBuffers::Subspan(subspan) => ConstBuffersIter::Subspan(subspan.buffers()),
        }
    }

    fn buffer_size(&self) -> usize {
        match self {
            ConstBuffers::Single(slice) => slice.len(),
            ConstBuffers::Span(span) => span.len(),
            ConstBuffers::Subspan(subspan) => subspan.len(),
        }
    }
}

impl<'a> TrimBuffers<'a> for ConstBuffers<'a> {
    type Trimmed = ConstBuffers<'a>;

    fn prefix(&self, n: usize) -> ConstBuffers<'a> {
        match self {
            ConstBuffers::Single(slice) => ConstBuffers::Single(TrimBuffers::prefix(slice, n)),
            ConstBuffers::Span(span) => ConstBuffers::Subspan(span.prefix(n)),
            ConstBuffers::Subspan(subspan) => ConstBuffers::Subspan(subspan.prefix(n)),
        }
    }

    fn suffix(&self, n: usize) -> ConstBuffers<'a> {
        match self {
            ConstBuffers::Single(slice) => ConstBuffers::Single(TrimBuffers::suffix(slice, n)),
            ConstBuffers::Span(span) => ConstBuffers::Subspan(span.suffix(n)),
            ConstBuffers::Subspan(subspan) => ConstBuffers::Subspan(subspan.suffix(n)),
        }
    }
}

#[cfg(test)]
fn flatten<'a>(buffers: &impl ConstBufferSequence<'a>) -> Vec<u8> {
    let mut ret = Vec::new();
    for slice in buffers.buffers() {
        ret.extend_from_slice(&slice);
    }

    ret
}

#[test]
fn test_ioslice_miri() {
    let slice = IoSlice::new(b"Hello World");

    assert_eq!(buffer_size(&slice), 11);
    assert_eq!(flatten(&prefix(&slice, 4)), b"Hell");
    assert_eq!(flatten(&suffix(&slice, 3)), b"rld");
    assert_eq!(flatten(&prefix(&slice, 100)), b"Hello World");
    assert_eq!(flatten(&suffix(&slice, 100)), b"Hello World");
    assert_eq!(buffer_size(&prefix(&slice, 0)), 0);
    assert_eq!(buffer_size(&suffix(&slice, 0)), 0);
}

#[test]
fn test_generic_dispatch_miri() {
    fn middle<'a, B>(buffers: &B, skip: usize, take: usize) -> Vec<u8>
    where
        B: TrimBuffers<'a>,
        B::Trimmed: TrimBuffers<'a>,
    {
        let size = buffer_size(buffers);
        let tail = suffix(buffers, size - skip.min(size));
        flatten(&prefix(&tail, take))
    }

    let entries = [IoSlice::new(b"Hello "), IoSlice::new(b"World")];
    let span = ConstBufferSpan::new(&entries);
    let subspan = ConstBufferSubspan::new(&entries);

    assert_eq!(middle(&span, 4, 4), b"o Wo");
    assert_eq!(middle(&subspan, 4, 4), b"o Wo");
    assert_eq!(middle(&entries[0], 1, 3), b"ell");
    assert_eq!(middle(&ConstBuffers::from(span), 4, 4), b"o Wo");
}

#[test]
fn test_runtime_dispatch_miri() {
    let entries = [IoSlice::new(b"Hello "), IoSlice::new(b"World")];
    let all: [ConstBuffers<'_>; 3] = [
        ConstBuffers::from(IoSlice::new(b"Hello World")),
        ConstBufferSpan::new(&entries).into(),
        ConstBufferSubspan::new(&entries).into(),
    ];

    for buffers in all.iter() {
        assert_eq!(buffers.buffer_size(), 11);
        assert_eq!(flatten(buffers), b"Hello World");
        assert_eq!(flatten(&buffers.prefix(4)), b"Hell");
        assert_eq!(flatten(&buffers.suffix(3)), b"rld");
        assert_eq!(flatten(&buffers.prefix(6)), b"Hello ");
        assert_eq!(flatten(&buffers.suffix(11)), b"Hello World");
        assert_eq!(buffers.prefix(0).buffer_size(), 0);
        assert_eq!(buffers.suffix(0).buffer_size(), 0);
    }

    assert!(matches!(all[0].prefix(3), ConstBuffers::Single(_)));
    assert!(matches!(all[1].prefix(3), ConstBuffers::Subspan(_)));
    assert!(matches!(all[2].suffix(3), ConstBuffers::Subspan(_)));
}

#[test]
fn test_default_is_empty_miri() {
    let buffers = ConstBuffers::default();
    assert_eq!(buffers.buffer_size(), 0);
    assert_eq!(buffers.buffers().count(), 0);
    assert_eq!(buffers.prefix(5).buffer_size(), 0);
    assert_eq!(buffers.suffix(5).buffer_size(), 0);
}

#[test]
fn test_write_vectored() {
    use std::io::Write;

    let entries = [IoSlice::new(b"Hello "), IoSlice::new(b"World")];
    let view = ConstBufferSubspan::new(&entries).skip_prefix(2).skip_suffix(2);
    let slices: Vec<IoSlice<'_>> = view.buffers().collect();

    let mut dst = Vec::new();
    let written = dst.write_vectored(&slices).expect("Vec writes never fail");
    assert_eq!(written, 7);
    assert_eq!(dst, b"llo Wor");
}

#[test]
fn test_send_sync() {
    fn check<T: Send + Sync + Copy>() {}

    check::<ConstBufferSpan<'static>>();
    check::<ConstBufferSubspan<'static>>();
    check::<ConstBuffers<'static>>();
}
