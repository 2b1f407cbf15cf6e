//! Borrowed byte spans over a command buffer.

use std::fmt;
use std::ops::Range;

/// Half-open `[begin, end)` byte range into a caller-owned buffer.
///
/// A span never copies the text it covers; [`Span::as_str`] hands back a
/// slice of the original buffer. Offsets always fall on char boundaries
/// because every boundary the scanner stops at is an ASCII byte.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    buffer: &'a str,
    begin: usize,
    end: usize,
}

impl<'a> Span<'a> {
    pub(crate) fn new(buffer: &'a str, begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end && end <= buffer.len());
        Self { buffer, begin, end }
    }

    /// An empty span positioned at `at`.
    pub(crate) fn empty(buffer: &'a str, at: usize) -> Self {
        Self::new(buffer, at, at)
    }

    /// Same begin, new end.
    pub(crate) fn extend_to(self, end: usize) -> Self {
        Self::new(self.buffer, self.begin, end)
    }

    /// Byte offset of the first byte.
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// Byte offset one past the last byte.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.begin..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// The covered text, borrowed from the buffer.
    pub fn as_str(&self) -> &'a str {
        &self.buffer[self.begin..self.end]
    }
}

impl fmt::Debug for Span<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}..{}", self.as_str(), self.begin, self.end)
    }
}

impl fmt::Display for Span<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for Span<'_> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Span<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
