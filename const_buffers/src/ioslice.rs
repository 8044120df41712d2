//! Use the backing foreign type to carve sub-ranges out of [`IoSlice`]s
//! without going through `&[u8]`: re-borrowing the pointee would tie the
//! result to the local borrow instead of the slice's own lifetime.
use std::io::IoSlice;

#[cfg(unix)]
mod unix {
    use std::io::IoSlice;

    const _: () =
        assert!(std::mem::size_of::<libc::iovec>() == std::mem::size_of::<IoSlice<'static>>());

    /// Creates an `IoSlice<'static>` from a raw pointer and length.
    ///
    /// # Safety
    ///
    /// The `'static` lifetime is a lie; the caller must ensure that the
    /// memory region pointed to by `base` with length `len` is valid for the
    /// lifetime of the returned `IoSlice`.
    #[must_use]
    #[inline]
    pub fn make_ioslice(base: *const u8, len: usize) -> IoSlice<'static> {
        let ret = libc::iovec {
            iov_base: base as *mut _,
            iov_len: len,
        };

        unsafe { std::mem::transmute(ret) }
    }

    /// Returns the base pointer and length of the given `IoSlice<'_>`.
    #[must_use]
    #[inline]
    pub fn ioslice_components(slice: IoSlice<'_>) -> (*const u8, usize) {
        let ret: libc::iovec = unsafe { std::mem::transmute(slice) };

        (ret.iov_base as *const u8, ret.iov_len)
    }
}

#[cfg(unix)]
pub use unix::{ioslice_components, make_ioslice};

#[allow(unused)]
mod windows {
    use std::io::IoSlice;

    // https://learn.microsoft.com/en-us/windows/win32/api/ws2def/ns-ws2def-wsabuf
    //
    // typedef struct _WSABUF {
    //   ULONG len;
    //   CHAR  *buf;
    // } WSABUF, *LPWSABUF;
    struct WSABuf {
        len: u32, // LLP64: ULONG is 32 bits.
        buf: *mut u8,
    }

    const _: () = assert!(std::mem::size_of::<WSABuf>() == std::mem::size_of::<IoSlice<'static>>());

    /// Creates an `IoSlice<'static>` from a raw pointer and length.
    ///
    /// # Safety
    ///
    /// The `'static` lifetime is a lie; the caller must ensure that the
    /// memory region pointed to by `base` with length `len` is valid for the
    /// lifetime of the returned `IoSlice`.
    #[must_use]
    #[inline]
    pub fn make_ioslice(base: *const u8, len: usize) -> IoSlice<'static> {
        // A sub-range never exceeds its source, and the source already fit in a WSABUF.
        let ret = WSABuf {
            len: len as u32,
            buf: base as *mut u8,
        };

        unsafe { std::mem::transmute(ret) }
    }

    /// Returns the base pointer and length of the given `IoSlice<'_>`.
    #[must_use]
    #[inline]
    pub fn ioslice_components(slice: IoSlice<'_>) -> (*const u8, usize) {
        let ret: WSABuf = unsafe { std::mem::transmute(slice) };

        (ret.buf as *const u8, ret.len as usize)
    }
}

#[cfg(windows)]
pub use windows::{ioslice_components, make_ioslice};

/// Returns the bytes `[begin, end)` of `slice`, with the same lifetime
/// as `slice`.
///
/// Panics when `begin > end` or `end > slice.len()`: the caller broke
/// a view invariant, and we refuse to build an out-of-bounds `IoSlice`.
#[must_use]
#[inline]
pub fn trim_ioslice(slice: IoSlice<'_>, begin: usize, end: usize) -> IoSlice<'_> {
    let (base, len) = ioslice_components(slice);
    assert!(
        begin <= end && end <= len,
        "invalid IoSlice trim. begin={} end={} len={}",
        begin,
        end,
        len
    );

    if begin == 0 && end == len {
        return slice;
    }

    // `base + begin` stays within (or one past the end of) the source
    // allocation, and `'static` narrows back to the source lifetime.
    make_ioslice(base.wrapping_add(begin), end - begin)
}

#[test]
fn test_roundtrip_miri() {
    let data = vec![1, 2, 3];
    let slice = IoSlice::new(&data);

    let (base, len) = ioslice_components(slice);
    assert_eq!(base, data.as_ptr_range().start);
    assert_eq!(len, data.len());

    let new_slice = make_ioslice(base, len);
    assert_eq!(&*slice, &*new_slice);
    assert_eq!(slice.as_ptr(), new_slice.as_ptr());
    assert_eq!(slice.len(), new_slice.len());

    assert_eq!(ioslice_components(slice), ioslice_components(new_slice))
}

#[test]
fn test_trim_miri() {
    let data = b"Hello World";
    let slice = IoSlice::new(data);

    assert_eq!(&*trim_ioslice(slice, 0, 11), b"Hello World");
    assert_eq!(&*trim_ioslice(slice, 0, 4), b"Hell");
    assert_eq!(&*trim_ioslice(slice, 8, 11), b"rld");
    assert_eq!(&*trim_ioslice(slice, 6, 6), b"");
    assert_eq!(&*trim_ioslice(slice, 11, 11), b"");

    let middle = trim_ioslice(slice, 2, 9);
    assert_eq!(&*middle, b"llo Wor");
    assert_eq!(middle.as_ptr(), data[2..].as_ptr());
}

#[test]
fn test_trim_outlives_source_binding_miri() {
    let data = b"abcdef".to_vec();
    let trimmed = {
        let slice = IoSlice::new(&data);
        trim_ioslice(slice, 1, 3)
    };

    assert_eq!(&*trimmed, b"bc");
}

#[test]
#[should_panic(expected = "invalid IoSlice trim")]
fn test_trim_past_end() {
    let _ = trim_ioslice(IoSlice::new(b"abc"), 1, 4);
}

#[test]
#[should_panic(expected = "invalid IoSlice trim")]
fn test_trim_reversed() {
    let _ = trim_ioslice(IoSlice::new(b"abc"), 2, 1);
}
