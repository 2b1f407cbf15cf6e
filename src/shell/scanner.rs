//! Boundary scanner: extracts one token span at a time.
//!
//! A token is a maximal run of bytes that are not blanks or operator
//! characters. A double-quoted region is opaque: separators inside it do not
//! end the token, and an unterminated quote runs to the end of the buffer.
//! The buffer ends at its last byte or at the first NUL, whichever is first.

use super::cursor::{Cursor, SplitError};
use super::span::Span;

const NUL: u8 = 0;
const QUOTE: u8 = b'"';

/// Byte at `pos`, or NUL past the end of the buffer.
pub(crate) fn byte_at(buffer: &str, pos: usize) -> u8 {
    buffer.as_bytes().get(pos).copied().unwrap_or(NUL)
}

pub(crate) fn at_end(buffer: &str, pos: usize) -> bool {
    byte_at(buffer, pos) == NUL
}

pub(crate) fn is_blank(byte: u8) -> bool {
    byte == b' ' || byte == b'\t'
}

/// Bytes that end an unquoted token.
pub fn is_separator(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'>' | b'<' | b'|' | b'&' | b';')
}

/// Advance past spaces and tabs.
pub(crate) fn skip_blanks(buffer: &str, mut pos: usize) -> usize {
    while is_blank(byte_at(buffer, pos)) {
        pos += 1;
    }
    pos
}

/// Clamp `pos` into the buffer and back onto a char boundary.
fn clamp_to_boundary(buffer: &str, pos: usize) -> usize {
    let mut pos = pos.min(buffer.len());
    while !buffer.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Scan one token starting at `cursor`.
///
/// Returns the token span and the advanced cursor, which always equals the
/// span's end. When the cursor (after blanks) sits on a separator or at end
/// of input the span is empty. A cursor past the end is clamped to the end,
/// and one inside a multi-byte character moves back to its first byte.
pub fn scan(buffer: &str, cursor: usize) -> (Span<'_>, usize) {
    let begin = skip_blanks(buffer, clamp_to_boundary(buffer, cursor));
    let mut end = begin;

    loop {
        match byte_at(buffer, end) {
            NUL => break,
            QUOTE => {
                end += 1;
                while !matches!(byte_at(buffer, end), NUL | QUOTE) {
                    end += 1;
                }
                if byte_at(buffer, end) == QUOTE {
                    end += 1;
                }
            }
            b if is_separator(b) => break,
            _ => end += 1,
        }
    }

    (Span::new(buffer, begin, end), end)
}

/// Resumable form of [`scan`] sharing the splitter's cursor contract.
///
/// `Some(buffer)` starts at the beginning of `buffer`; `None` continues from
/// the saved cursor, e.g. to fetch a token the splitter left behind.
pub fn next_token<'a>(input: Option<&'a str>, cursor: &mut Cursor<'a>) -> Result<Span<'a>, SplitError> {
    let (buffer, pos) = cursor.resolve(input)?;
    let (span, next) = scan(buffer, pos);
    cursor.save(next);
    Ok(span)
}
