use std::io::IoSlice;

use crate::ioslice::trim_ioslice;
use crate::ConstBufferSpan;

mod iter;

pub use iter::SubspanIter;

/// A [`ConstBufferSubspan`] is a non-owning view over a contiguous run
/// of [`IoSlice`]s, with the first entry trimmed from the front and the
/// last entry trimmed from the back.
///
/// `p0` is the number of bytes skipped at the front of the first entry,
/// and `p1` the number of bytes kept from the front of the last entry.
/// When there is a single entry, the view covers `[p0, p1)` of that
/// entry.  Entries strictly between the first and last are used whole.
///
/// Views are `Copy`: deriving a prefix or suffix never touches the
/// source view or the backing array.
#[derive(Clone, Copy, Default)]
pub struct ConstBufferSubspan<'a> {
    entries: &'a [IoSlice<'a>],
    p0: usize,
    p1: usize,
}

impl<'a> ConstBufferSubspan<'a> {
    /// Returns a view with no entry (and thus no byte).
    #[must_use]
    #[inline(always)]
    pub const fn empty() -> Self {
        ConstBufferSubspan {
            entries: &[],
            p0: 0,
            p1: 0,
        }
    }

    /// Returns an untrimmed view of all of `entries`.
    #[must_use]
    #[inline]
    pub fn new(entries: &'a [IoSlice<'a>]) -> Self {
        match entries.last() {
            None => Self::empty(),
            Some(last) => Self::from_raw_parts(entries, 0, last.len()),
        }
    }

    /// Builds a view with arbitrary trims.  Only the crate may call this:
    /// public constructors always start from untrimmed entries.
    #[must_use]
    #[inline(always)]
    pub(crate) fn from_raw_parts(entries: &'a [IoSlice<'a>], p0: usize, p1: usize) -> Self {
        let ret = ConstBufferSubspan { entries, p0, p1 };
        ret.check_rep();
        ret
    }

    #[cfg_attr(test, mutants::skip)] // obviously, removing checks will not be detected.
    #[inline(always)]
    fn check_rep(&self) {
        match self.entries {
            [] => debug_assert!(self.p0 == 0 && self.p1 == 0, "{:?}", self),
            [only] => debug_assert!(self.p0 <= self.p1 && self.p1 <= only.len(), "{:?}", self),
            [first, .., last] => {
                debug_assert!(self.p0 <= first.len(), "{:?}", self);
                debug_assert!(self.p1 <= last.len(), "{:?}", self);
            }
        }
    }

    /// Returns the number of (possibly trimmed) entries in the view.
    #[must_use]
    #[inline(always)]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns the total number of bytes in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.entries {
            [] => 0,
            [_] => self.p1 - self.p0,
            [first, middle @ .., _] => {
                (first.len() - self.p0)
                    + middle.iter().map(|slice| slice.len()).sum::<usize>()
                    + self.p1
            }
        }
    }

    /// Determines whether the view spans 0 bytes.  A view may have
    /// entries and still be empty, e.g., if all its entries are empty.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the trimmed entry at `index`, or `None` if out of bounds.
    #[must_use]
    #[inline]
    pub fn get(&self, index: usize) -> Option<IoSlice<'a>> {
        let count = self.entries.len();
        let slice = *self.entries.get(index)?;

        let begin = if index == 0 { self.p0 } else { 0 };
        let end = if index + 1 == count {
            self.p1
        } else {
            slice.len()
        };

        Some(trim_ioslice(slice, begin, end))
    }

    /// Returns the first trimmed entry, if any.
    #[must_use]
    #[inline]
    pub fn first(&self) -> Option<IoSlice<'a>> {
        self.get(0)
    }

    /// Returns the last trimmed entry, if any.
    #[must_use]
    #[inline]
    pub fn last(&self) -> Option<IoSlice<'a>> {
        self.get(self.entries.len().wrapping_sub(1))
    }

    /// Returns an iterator over the trimmed entries in the view.
    #[inline(always)]
    pub fn iter(&self) -> SubspanIter<'a> {
        SubspanIter::new(*self)
    }

    /// Returns a view of the first `n` bytes in `self`, or `self` if
    /// it spans `n` bytes or fewer.
    ///
    /// Only looks at the entries up to the one that contains the `n`th
    /// byte.
    #[must_use]
    pub fn prefix(&self, n: usize) -> Self {
        let entries = self.entries;
        if n == 0 || entries.is_empty() {
            return Self::empty();
        }

        if entries.len() == 1 {
            if n >= self.p1 - self.p0 {
                return *self;
            }

            return Self::from_raw_parts(entries, self.p0, self.p0 + n);
        }

        // The first entry is already missing its first `p0` bytes, and the
        // last one only contributes its first `p1` bytes.
        let last_index = entries.len() - 1;
        let mut remaining = n;
        for (index, slice) in entries.iter().enumerate() {
            let (begin, available) = match index {
                0 => (self.p0, slice.len() - self.p0),
                i if i == last_index => (0, self.p1),
                _ => (0, slice.len()),
            };

            if remaining <= available {
                if remaining == available && self.nothing_after(index) {
                    return *self;
                }

                return Self::from_raw_parts(&entries[..=index], self.p0, begin + remaining);
            }

            remaining -= available;
        }

        *self
    }

    /// Returns a view of the last `n` bytes in `self`, or `self` if
    /// it spans `n` bytes or fewer.
    ///
    /// Only looks at the entries from the one that contains the `n`th
    /// byte from the end.
    #[must_use]
    pub fn suffix(&self, n: usize) -> Self {
        let entries = self.entries;
        if n == 0 || entries.is_empty() {
            return Self::empty();
        }

        if entries.len() == 1 {
            if n >= self.p1 - self.p0 {
                return *self;
            }

            return Self::from_raw_parts(entries, self.p1 - n, self.p1);
        }

        let last_index = entries.len() - 1;
        let mut remaining = n;
        for (index, slice) in entries.iter().enumerate().rev() {
            // `end` is where the entry's contribution stops, so the new
            // `p0` is `end - remaining` once we find enough bytes.
            let (end, available) = match index {
                i if i == last_index => (self.p1, self.p1),
                0 => (slice.len(), slice.len() - self.p0),
                _ => (slice.len(), slice.len()),
            };

            if remaining <= available {
                if remaining == available && self.nothing_before(index) {
                    return *self;
                }

                return Self::from_raw_parts(&entries[index..], end - remaining, self.p1);
            }

            remaining -= available;
        }

        *self
    }

    /// Determines whether the entries after `index` contribute no byte.
    fn nothing_after(&self, index: usize) -> bool {
        let last_index = self.entries.len() - 1;
        (index + 1..=last_index).all(|i| {
            if i == last_index {
                self.p1 == 0
            } else {
                self.entries[i].is_empty()
            }
        })
    }

    /// Determines whether the entries before `index` contribute no byte.
    fn nothing_before(&self, index: usize) -> bool {
        (0..index).all(|i| {
            if i == 0 {
                self.entries[i].len() == self.p0
            } else {
                self.entries[i].is_empty()
            }
        })
    }

    /// Returns a view of `self` without its first `n` bytes.
    #[must_use]
    #[inline]
    pub fn skip_prefix(&self, n: usize) -> Self {
        let len = self.len();
        self.suffix(len - n.min(len))
    }

    /// Returns a view of `self` without its last `n` bytes.
    #[must_use]
    #[inline]
    pub fn skip_suffix(&self, n: usize) -> Self {
        let len = self.len();
        self.prefix(len - n.min(len))
    }
}

impl<'a> From<ConstBufferSpan<'a>> for ConstBufferSubspan<'a> {
    #[inline(always)]
    fn from(span: ConstBufferSpan<'a>) -> ConstBufferSubspan<'a> {
        ConstBufferSubspan::new(span.as_slices())
    }
}

impl<'a> From<&'a [IoSlice<'a>]> for ConstBufferSubspan<'a> {
    #[inline(always)]
    fn from(entries: &'a [IoSlice<'a>]) -> ConstBufferSubspan<'a> {
        ConstBufferSubspan::new(entries)
    }
}

impl<'a> IntoIterator for ConstBufferSubspan<'a> {
    type Item = IoSlice<'a>;
    type IntoIter = SubspanIter<'a>;

    #[inline(always)]
    fn into_iter(self) -> SubspanIter<'a> {
        SubspanIter::new(self)
    }
}

impl<'a> IntoIterator for &ConstBufferSubspan<'a> {
    type Item = IoSlice<'a>;
    type IntoIter = SubspanIter<'a>;

    #[inline(always)]
    fn into_iter(self) -> SubspanIter<'a> {
        self.iter()
    }
}

// The bytes may be arbitrarily large (and sensitive), so only print the shape.
impl std::fmt::Debug for ConstBufferSubspan<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstBufferSubspan")
            .field("entries", &self.entries.as_ptr())
            .field("entry_count", &self.entries.len())
            .field("p0", &self.p0)
            .field("p1", &self.p1)
            .finish()
    }
}

#[cfg(test)]
impl<'a> ConstBufferSubspan<'a> {
    /// Returns the identity of the backing array, the entry count, `p0` and `p1`.
    pub(crate) fn raw_parts(&self) -> (*const IoSlice<'a>, usize, usize, usize) {
        (self.entries.as_ptr(), self.entries.len(), self.p0, self.p1)
    }
}

#[cfg(test)]
fn flatten<'a>(buffers: impl IntoIterator<Item = IoSlice<'a>>) -> Vec<u8> {
    let mut ret = Vec::new();
    for slice in buffers {
        ret.extend_from_slice(&slice);
    }

    ret
}

#[cfg(test)]
fn make_entries<'a>(chunks: &'a [Vec<u8>]) -> Vec<IoSlice<'a>> {
    chunks.iter().map(|chunk| IoSlice::new(chunk)).collect()
}

#[test]
fn test_empty_miri() {
    let view = ConstBufferSubspan::empty();
    assert_eq!(view.entry_count(), 0);
    assert_eq!(view.len(), 0);
    assert!(view.is_empty());
    assert!(view.first().is_none());
    assert!(view.last().is_none());
    assert_eq!(ConstBufferSubspan::default().entry_count(), 0);

    let entries: [IoSlice<'_>; 0] = [];
    let view = ConstBufferSubspan::new(&entries);
    assert_eq!(view.entry_count(), 0);
    assert_eq!(view.iter().next().map(|s| s.len()), None);
    assert_eq!(view.prefix(5).entry_count(), 0);
    assert_eq!(view.suffix(5).entry_count(), 0);
    assert_eq!(view.prefix(5).len(), 0);
    assert_eq!(view.suffix(5).len(), 0);
}

#[test]
fn test_hello_world_miri() {
    let entries = [IoSlice::new(b"Hello "), IoSlice::new(b"World")];
    let view = ConstBufferSubspan::new(&entries);
    assert_eq!(view.len(), 11);
    assert_eq!(view.entry_count(), 2);
    assert_eq!(flatten(view), b"Hello World");

    let hell = view.prefix(4);
    assert_eq!(hell.entry_count(), 1);
    assert_eq!(hell.len(), 4);
    assert_eq!(flatten(hell), b"Hell");

    let rld = view.suffix(3);
    assert_eq!(rld.entry_count(), 1);
    assert_eq!(rld.len(), 3);
    assert_eq!(flatten(rld), b"rld");

    let hello = view.prefix(6);
    assert_eq!(hello.entry_count(), 1);
    assert_eq!(hello.raw_parts().2, 0);
    assert_eq!(hello.raw_parts().3, 6);
    assert_eq!(flatten(hello), b"Hello ");

    let everything = view.suffix(11);
    assert_eq!(everything.raw_parts(), view.raw_parts());
    assert_eq!(flatten(everything), b"Hello World");
}

#[test]
fn test_prefix_crosses_entries_miri() {
    let entries = [
        IoSlice::new(b"abc"),
        IoSlice::new(b"defg"),
        IoSlice::new(b"hi"),
    ];
    let view = ConstBufferSubspan::new(&entries);

    let prefix = view.prefix(5);
    assert_eq!(prefix.entry_count(), 2);
    assert_eq!(prefix.raw_parts().2, 0);
    assert_eq!(prefix.raw_parts().3, 2);
    assert_eq!(flatten(prefix), b"abcde");

    // Stopping exactly at an entry boundary keeps the entry whole.
    let prefix = view.prefix(7);
    assert_eq!(prefix.entry_count(), 2);
    assert_eq!(flatten(prefix), b"abcdefg");

    let prefix = view.prefix(8);
    assert_eq!(prefix.entry_count(), 3);
    assert_eq!(prefix.raw_parts().3, 1);
    assert_eq!(flatten(prefix), b"abcdefgh");
}

#[test]
fn test_suffix_crosses_entries_miri() {
    let entries = [
        IoSlice::new(b"abc"),
        IoSlice::new(b"defg"),
        IoSlice::new(b"hi"),
    ];
    let view = ConstBufferSubspan::new(&entries);

    let suffix = view.suffix(4);
    assert_eq!(suffix.entry_count(), 2);
    assert_eq!(suffix.raw_parts().2, 2);
    assert_eq!(suffix.raw_parts().3, 2);
    assert_eq!(flatten(suffix), b"fghi");

    let suffix = view.suffix(6);
    assert_eq!(suffix.entry_count(), 2);
    assert_eq!(suffix.raw_parts().2, 0);
    assert_eq!(flatten(suffix), b"defghi");

    let suffix = view.suffix(7);
    assert_eq!(suffix.entry_count(), 3);
    assert_eq!(suffix.raw_parts().2, 2);
    assert_eq!(flatten(suffix), b"cdefghi");
}

#[test]
fn test_trims_compose_miri() {
    let entries = [
        IoSlice::new(b"0123"),
        IoSlice::new(b"4567"),
        IoSlice::new(b"89ab"),
    ];
    let view = ConstBufferSubspan::new(&entries);

    // Trimmed at both ends: "23456789".
    let inner = view.suffix(10).prefix(8);
    assert_eq!(inner.entry_count(), 3);
    assert_eq!(inner.len(), 8);
    assert_eq!(flatten(inner), b"23456789");

    // Lengths are relative to the current view, not the backing array.
    assert_eq!(flatten(inner.prefix(1)), b"2");
    assert_eq!(flatten(inner.prefix(2)), b"23");
    assert_eq!(flatten(inner.prefix(3)), b"234");
    assert_eq!(flatten(inner.suffix(1)), b"9");
    assert_eq!(flatten(inner.suffix(2)), b"89");
    assert_eq!(flatten(inner.suffix(3)), b"789");
    assert_eq!(flatten(inner.prefix(100)), b"23456789");
    assert_eq!(flatten(inner.suffix(100)), b"23456789");

    // Narrow to a single trimmed entry, then trim that again.
    let middle = inner.prefix(6).suffix(4);
    assert_eq!(middle.entry_count(), 1);
    assert_eq!(flatten(middle), b"4567");
    assert_eq!(flatten(middle.prefix(3).suffix(2)), b"56");
    assert_eq!(flatten(middle.suffix(3).prefix(2)), b"56");

    let single = view.prefix(3).suffix(2);
    assert_eq!(single.raw_parts().2, 1);
    assert_eq!(single.raw_parts().3, 3);
    assert_eq!(flatten(single), b"12");
    assert_eq!(flatten(single.prefix(1)), b"1");
    assert_eq!(flatten(single.suffix(1)), b"2");
}

#[test]
fn test_empty_entries_miri() {
    let entries = [
        IoSlice::new(b""),
        IoSlice::new(b"ab"),
        IoSlice::new(b""),
        IoSlice::new(b"cd"),
        IoSlice::new(b""),
    ];
    let view = ConstBufferSubspan::new(&entries);
    assert_eq!(view.len(), 4);
    assert_eq!(view.entry_count(), 5);

    let prefix = view.prefix(2);
    assert_eq!(prefix.entry_count(), 2);
    assert_eq!(flatten(prefix), b"ab");

    let suffix = view.suffix(2);
    assert_eq!(suffix.entry_count(), 2);
    assert_eq!(flatten(suffix), b"cd");

    // Covering every byte returns the view as is, trailing empty entries included.
    assert_eq!(view.prefix(4).raw_parts(), view.raw_parts());
    assert_eq!(view.suffix(4).raw_parts(), view.raw_parts());

    assert_eq!(flatten(view.prefix(3)), b"abc");
    assert_eq!(flatten(view.suffix(3)), b"bcd");

    let nothing = [IoSlice::new(b""), IoSlice::new(b"")];
    let view = ConstBufferSubspan::new(&nothing);
    assert!(view.is_empty());
    assert_eq!(view.entry_count(), 2);
    assert_eq!(view.prefix(1).raw_parts(), view.raw_parts());
    assert_eq!(view.suffix(1).raw_parts(), view.raw_parts());
    assert_eq!(view.prefix(0).entry_count(), 0);
}

#[test]
fn test_clamp_miri() {
    let entries = [IoSlice::new(b"Hello "), IoSlice::new(b"World")];
    let view = ConstBufferSubspan::new(&entries);

    assert_eq!(view.prefix(111).raw_parts(), view.raw_parts());
    assert_eq!(view.suffix(111).raw_parts(), view.raw_parts());
    assert_eq!(view.prefix(usize::MAX).raw_parts(), view.raw_parts());
    assert_eq!(view.suffix(usize::MAX).raw_parts(), view.raw_parts());
    assert_eq!(view.prefix(0).entry_count(), 0);
    assert_eq!(view.suffix(0).entry_count(), 0);
}

#[test]
fn test_skip_miri() {
    let entries = [IoSlice::new(b"Hello "), IoSlice::new(b"World")];
    let view = ConstBufferSubspan::new(&entries);

    assert_eq!(flatten(view.skip_prefix(0)), b"Hello World");
    assert_eq!(flatten(view.skip_prefix(3)), b"lo World");
    assert_eq!(flatten(view.skip_prefix(6)), b"World");
    assert_eq!(flatten(view.skip_suffix(2)), b"Hello Wor");
    assert_eq!(flatten(view.skip_suffix(5)), b"Hello ");
    assert!(view.skip_prefix(11).is_empty());
    assert!(view.skip_suffix(100).is_empty());
}

#[test]
fn test_get_miri() {
    let entries = [
        IoSlice::new(b"abc"),
        IoSlice::new(b"defg"),
        IoSlice::new(b"hi"),
    ];
    let view = ConstBufferSubspan::new(&entries).skip_prefix(1).skip_suffix(1);

    assert_eq!(view.get(0).as_deref(), Some(&b"bc"[..]));
    assert_eq!(view.get(1).as_deref(), Some(&b"defg"[..]));
    assert_eq!(view.get(2).as_deref(), Some(&b"h"[..]));
    assert!(view.get(3).is_none());
    assert_eq!(view.first().as_deref(), Some(&b"bc"[..]));
    assert_eq!(view.last().as_deref(), Some(&b"h"[..]));

    // Trimmed entries still point into the backing bytes.
    assert_eq!(view.get(0).map(|s| s.as_ptr()), Some(entries[0][1..].as_ptr()));
}

#[test]
fn test_from_span_miri() {
    let entries = [IoSlice::new(b"Hello "), IoSlice::new(b"World")];
    let span = ConstBufferSpan::new(&entries);
    let view: ConstBufferSubspan<'_> = span.into();

    assert_eq!(view.raw_parts(), ConstBufferSubspan::new(&entries).raw_parts());
    assert_eq!(flatten(view), b"Hello World");
}

#[test]
fn test_source_unchanged_miri() {
    let entries = [IoSlice::new(b"Hello "), IoSlice::new(b"World")];
    let view = ConstBufferSubspan::new(&entries);
    let before = view.raw_parts();

    let _ = view.prefix(3);
    let _ = view.suffix(3);
    let _ = view.skip_prefix(7);

    assert_eq!(view.raw_parts(), before);
    assert_eq!(&*entries[0], b"Hello ");
    assert_eq!(&*entries[1], b"World");
}

#[test]
fn test_debug_hides_bytes() {
    let entries = [IoSlice::new(b"secret")];
    let repr = format!("{:?}", ConstBufferSubspan::new(&entries).prefix(2));

    assert!(repr.contains("entry_count: 1"));
    assert!(repr.contains("p1: 2"));
    assert!(!repr.contains("secret"));
}

#[cfg(test)]
mod properties {
    use super::*;
    use quickcheck_macros::quickcheck;

    // Builds an arbitrary view, already trimmed at both ends, over `chunks`.
    fn trimmed<'a>(entries: &'a [IoSlice<'a>], front: usize, back: usize) -> ConstBufferSubspan<'a> {
        let view = ConstBufferSubspan::new(entries);
        let len = view.len();
        let front = if len == 0 { 0 } else { front % (len + 1) };
        view.skip_prefix(front).skip_suffix(back % (len - front + 1))
    }

    fn expected_bytes(chunks: &[Vec<u8>], front: usize, back: usize) -> Vec<u8> {
        let all: Vec<u8> = chunks.concat();
        let len = all.len();
        let front = if len == 0 { 0 } else { front % (len + 1) };
        let back = back % (len - front + 1);
        all[front..len - back].to_vec()
    }

    #[quickcheck]
    fn prop_view_bytes(chunks: Vec<Vec<u8>>, front: usize, back: usize) -> bool {
        let entries = make_entries(&chunks);
        let view = trimmed(&entries, front, back);
        let expected = expected_bytes(&chunks, front, back);

        view.len() == expected.len() && flatten(view) == expected
    }

    #[quickcheck]
    fn prop_prefix_suffix_len(chunks: Vec<Vec<u8>>, front: usize, back: usize, n: usize) -> bool {
        let entries = make_entries(&chunks);
        let view = trimmed(&entries, front, back);
        let n = n % (view.len() + 1);

        view.prefix(n).len() == n && view.suffix(n).len() == n
    }

    #[quickcheck]
    fn prop_split_concat(chunks: Vec<Vec<u8>>, front: usize, back: usize, k: usize) -> bool {
        let entries = make_entries(&chunks);
        let view = trimmed(&entries, front, back);
        let len = view.len();
        let k = k % (len + 1);

        let mut joined = flatten(view.prefix(k));
        joined.extend(flatten(view.suffix(len - k)));
        joined == flatten(view)
    }

    #[quickcheck]
    fn prop_matches_slicing(chunks: Vec<Vec<u8>>, front: usize, back: usize, n: usize) -> bool {
        let entries = make_entries(&chunks);
        let view = trimmed(&entries, front, back);
        let bytes = flatten(view);
        let n = n % (bytes.len() + 1);

        flatten(view.prefix(n)) == bytes[..n]
            && flatten(view.suffix(n)) == bytes[bytes.len() - n..]
    }

    #[quickcheck]
    fn prop_idempotent(chunks: Vec<Vec<u8>>, front: usize, back: usize, n: usize) -> bool {
        let entries = make_entries(&chunks);
        let view = trimmed(&entries, front, back);
        let n = n % (view.len() + 2);

        let prefix = view.prefix(n);
        let suffix = view.suffix(n);
        prefix.prefix(n).raw_parts() == prefix.raw_parts()
            && suffix.suffix(n).raw_parts() == suffix.raw_parts()
    }

    #[quickcheck]
    fn prop_clamp(chunks: Vec<Vec<u8>>, front: usize, back: usize, extra: u8) -> bool {
        let entries = make_entries(&chunks);
        let view = trimmed(&entries, front, back);
        let n = view.len() + extra as usize;

        view.prefix(n).raw_parts() == view.raw_parts()
            && view.suffix(n).raw_parts() == view.raw_parts()
    }

    #[quickcheck]
    fn prop_zero_is_empty(chunks: Vec<Vec<u8>>, front: usize, back: usize) -> bool {
        let entries = make_entries(&chunks);
        let view = trimmed(&entries, front, back);

        view.prefix(0).entry_count() == 0 && view.suffix(0).entry_count() == 0
    }

    #[quickcheck]
    fn prop_entry_count_consistent(chunks: Vec<Vec<u8>>, front: usize, back: usize) -> bool {
        let entries = make_entries(&chunks);
        let view = trimmed(&entries, front, back);

        view.iter().len() == view.entry_count() && view.iter().count() == view.entry_count()
    }
}
