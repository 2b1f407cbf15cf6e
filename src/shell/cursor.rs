//! Continuation state threaded through successive split calls.

use thiserror::Error;

/// Errors raised when resuming a split sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// A resume call (no buffer supplied) was made before any call
    /// established the buffer.
    #[error("cursor resumed before a buffer was supplied")]
    UninitializedCursor,
}

/// Resumption point into a command buffer.
///
/// A cursor starts out uninitialized. The first call that supplies a buffer
/// binds it; every later call given `None` continues from the saved offset.
/// The cursor borrows the buffer, so the buffer cannot change while the
/// split sequence is in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor<'a> {
    buffer: Option<&'a str>,
    offset: usize,
}

impl<'a> Cursor<'a> {
    /// An uninitialized cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cursor already bound to the start of `buffer`.
    pub fn at_start(buffer: &'a str) -> Self {
        Self {
            buffer: Some(buffer),
            offset: 0,
        }
    }

    /// The buffer this cursor walks, once bound.
    pub fn buffer(&self) -> Option<&'a str> {
        self.buffer
    }

    /// Byte offset of the next unread byte.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_initialized(&self) -> bool {
        self.buffer.is_some()
    }

    /// True once the cursor sits at end-of-string (or was never bound).
    pub fn is_exhausted(&self) -> bool {
        match self.buffer {
            Some(buffer) => super::scanner::at_end(buffer, self.offset),
            None => true,
        }
    }

    /// Text not consumed yet.
    pub fn remaining(&self) -> &'a str {
        self.buffer.map(|b| &b[self.offset..]).unwrap_or("")
    }

    /// Pick the working position for a call: the start of `input` when
    /// given, the saved position otherwise.
    pub(crate) fn resolve(&mut self, input: Option<&'a str>) -> Result<(&'a str, usize), SplitError> {
        if let Some(buffer) = input {
            self.buffer = Some(buffer);
            self.offset = 0;
        }
        let buffer = self.buffer.ok_or(SplitError::UninitializedCursor)?;
        Ok((buffer, self.offset))
    }

    pub(crate) fn save(&mut self, offset: usize) {
        self.offset = offset;
    }
}
