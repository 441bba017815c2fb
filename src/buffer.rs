//! Input buffer: an immutable, random-access byte view.
//!
//! The engine borrows the text it matches against; it never copies or
//! mutates it. A [`Buffer`] additionally carries a truncation limit so that
//! sub-grammar invocation can bound the effective input window without
//! re-slicing (positions stay valid in the enclosing text).

/// An immutable byte view with constant-time random access.
///
/// `get` past the limit returns `None`, which the matching engine treats as
/// an ordinary match failure — running off the end of input is never an
/// error.
#[derive(Debug, Clone, Copy)]
pub struct Buffer<'a> {
    bytes: &'a [u8],
    limit: usize,
}

impl<'a> Buffer<'a> {
    /// Wrap a byte slice.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, limit: bytes.len() }
    }

    /// A view over the same text that ends at `limit` (or earlier, if this
    /// buffer is already shorter). Positions are shared with `self`.
    pub fn truncated(&self, limit: usize) -> Buffer<'a> {
        Buffer { bytes: self.bytes, limit: limit.min(self.limit) }
    }

    /// Effective length of the view.
    pub fn len(&self) -> usize {
        self.limit
    }

    /// Whether the view is empty.
    pub fn is_empty(&self) -> bool {
        self.limit == 0
    }

    /// The byte at `i`, or `None` at or past the end of the view.
    pub fn get(&self, i: usize) -> Option<u8> {
        if i < self.limit { Some(self.bytes[i]) } else { None }
    }

    /// The bytes in `[start, end)`. Both bounds must lie within the view.
    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        &self.bytes[start..end.min(self.limit)]
    }
}

impl<'a> From<&'a [u8]> for Buffer<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Buffer::new(bytes)
    }
}

impl<'a> From<&'a str> for Buffer<'a> {
    fn from(text: &'a str) -> Self {
        Buffer::new(text.as_bytes())
    }
}
