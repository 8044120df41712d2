use std::io::IoSlice;
use std::iter::FusedIterator;

use super::ConstBufferSubspan;

/// Iterates over the trimmed [`IoSlice`]s of a [`ConstBufferSubspan`],
/// from either end.
///
/// The iterator owns a copy of the (immutable) view, so each call to
/// [`ConstBufferSubspan::iter`] restarts from the first entry.
#[derive(Clone, Debug)]
pub struct SubspanIter<'a> {
    view: ConstBufferSubspan<'a>,
    front: usize, // Next position yielded by `next`
    back: usize,  // One past the next position yielded by `next_back`
}

impl<'a> SubspanIter<'a> {
    #[inline(always)]
    pub(super) fn new(view: ConstBufferSubspan<'a>) -> Self {
        SubspanIter {
            view,
            front: 0,
            back: view.entry_count(),
        }
    }

    /// Returns the view that is being iterated over.
    #[must_use]
    #[inline(always)]
    pub fn view(&self) -> ConstBufferSubspan<'a> {
        self.view
    }
}

impl<'a> Iterator for SubspanIter<'a> {
    type Item = IoSlice<'a>;

    #[inline]
    fn next(&mut self) -> Option<IoSlice<'a>> {
        if self.front >= self.back {
            return None;
        }

        let ret = self.view.get(self.front);
        self.front += 1;
        ret
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<IoSlice<'a>> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<'a> DoubleEndedIterator for SubspanIter<'a> {
    #[inline]
    fn next_back(&mut self) -> Option<IoSlice<'a>> {
        if self.front >= self.back {
            return None;
        }

        self.back -= 1;
        self.view.get(self.back)
    }
}

impl ExactSizeIterator for SubspanIter<'_> {}

impl FusedIterator for SubspanIter<'_> {}

/// Two iterators are equal when they walk the same view (same backing
/// array and trims) and are at the same positions.  Exhausted iterators
/// over the same view are all equal, wherever they stopped.
impl PartialEq for SubspanIter<'_> {
    fn eq(&self, other: &Self) -> bool {
        let same_view = std::ptr::eq(self.view.entries, other.view.entries)
            && self.view.p0 == other.view.p0
            && self.view.p1 == other.view.p1;
        if !same_view {
            return false;
        }

        let exhausted = |iter: &Self| iter.front >= iter.back;
        match (exhausted(self), exhausted(other)) {
            (true, true) => true,
            (false, false) => self.front == other.front && self.back == other.back,
            _ => false,
        }
    }
}

impl Eq for SubspanIter<'_> {}

#[cfg(test)]
fn exhaust(mut iter: SubspanIter<'_>) -> SubspanIter<'_> {
    iter.by_ref().for_each(drop);
    iter
}

#[test]
fn test_positions_miri() {
    let entries = [
        IoSlice::new(b"abc"),
        IoSlice::new(b"defg"),
        IoSlice::new(b"hi"),
    ];

    // Three entries, "bc", "defg", "h".
    let view = ConstBufferSubspan::new(&entries).prefix(8).suffix(7);
    let mut iter = view.iter();
    assert_eq!(iter.len(), 3);
    assert_eq!(iter.next().as_deref(), Some(&b"bc"[..]));
    assert_eq!(iter.next().as_deref(), Some(&b"defg"[..]));
    assert_eq!(iter.next().as_deref(), Some(&b"h"[..]));
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
    assert_eq!(iter.len(), 0);
}

#[test]
fn test_single_entry_miri() {
    let entries = [IoSlice::new(b"Hello World")];
    let view = ConstBufferSubspan::new(&entries).prefix(9).suffix(5);

    let yielded: Vec<Vec<u8>> = view.iter().map(|slice| slice.to_vec()).collect();
    assert_eq!(yielded, vec![b"o Wor".to_vec()]);
}

#[test]
fn test_double_ended_miri() {
    let entries = [
        IoSlice::new(b"abc"),
        IoSlice::new(b"defg"),
        IoSlice::new(b"hi"),
    ];
    let view = ConstBufferSubspan::new(&entries).skip_prefix(1).skip_suffix(1);

    let backward: Vec<Vec<u8>> = view.iter().rev().map(|slice| slice.to_vec()).collect();
    assert_eq!(backward, vec![b"h".to_vec(), b"defg".to_vec(), b"bc".to_vec()]);

    let mut iter = view.iter();
    assert_eq!(iter.next_back().as_deref(), Some(&b"h"[..]));
    assert_eq!(iter.next().as_deref(), Some(&b"bc"[..]));
    assert_eq!(iter.len(), 1);
    assert_eq!(iter.next_back().as_deref(), Some(&b"defg"[..]));
    assert!(iter.next().is_none());
    assert!(iter.next_back().is_none());
}

#[test]
fn test_nth_miri() {
    let entries = [
        IoSlice::new(b"abc"),
        IoSlice::new(b"defg"),
        IoSlice::new(b"hi"),
    ];
    let view = ConstBufferSubspan::new(&entries).skip_suffix(1);

    assert_eq!(view.iter().nth(2).as_deref(), Some(&b"h"[..]));
    assert!(view.iter().nth(3).is_none());
    assert!(view.iter().nth(usize::MAX).is_none());

    let mut iter = view.iter();
    assert_eq!(iter.nth(1).as_deref(), Some(&b"defg"[..]));
    assert_eq!(iter.len(), 1);
}

#[test]
fn test_restart_miri() {
    let entries = [IoSlice::new(b"Hello "), IoSlice::new(b"World")];
    let view = ConstBufferSubspan::new(&entries).suffix(8);

    let first: Vec<Vec<u8>> = view.iter().map(|slice| slice.to_vec()).collect();
    let second: Vec<Vec<u8>> = view.into_iter().map(|slice| slice.to_vec()).collect();
    assert_eq!(first, second);
    assert_eq!(first, vec![b"lo ".to_vec(), b"World".to_vec()]);

    let mut count = 0;
    for slice in &view {
        count += slice.len();
    }
    assert_eq!(count, 8);
}

#[test]
fn test_equality_miri() {
    let entries = [IoSlice::new(b"Hello "), IoSlice::new(b"World")];
    let view = ConstBufferSubspan::new(&entries);

    assert_eq!(view.iter(), view.iter());
    assert_ne!(view.iter(), exhaust(view.iter()));
    assert_eq!(exhaust(view.iter()), exhaust(view.iter()));

    let mut advanced = view.iter();
    advanced.next();
    assert_ne!(advanced, view.iter());
    let mut other = view.iter();
    other.next();
    assert_eq!(advanced, other);

    // Same backing array, different trims.
    assert_ne!(view.iter(), view.prefix(10).iter());
    assert_eq!(view.iter(), view.prefix(11).iter());

    // Exhausted from either end.
    let mut backward = view.iter();
    backward.next_back();
    backward.next_back();
    assert_eq!(backward, exhaust(view.iter()));

    // Other backing array.
    let copy = entries;
    assert_ne!(view.iter(), ConstBufferSubspan::new(&copy).iter());
}

#[test]
fn test_empty_begin_is_end_miri() {
    let entries: [IoSlice<'_>; 0] = [];
    let view = ConstBufferSubspan::new(&entries);

    assert_eq!(view.iter(), exhaust(view.iter()));
    assert_eq!(view.iter().len(), 0);
    assert!(view.iter().next().is_none());
    assert!(view.iter().next_back().is_none());
    assert_eq!(view.iter().view().len(), 0);
}
