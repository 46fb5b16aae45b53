//! Byte cursor over a document part
//!
//! Delimiter search goes through memchr, which picks a vectorized routine
//! for the target at runtime. The scanner works over `&str` input. Every position it stops at is either
//! an ASCII delimiter or the end of input, so slices taken between two such
//! positions are always valid UTF-8.

use memchr::memchr;

/// Position-tracking view of the input
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Byte offset into the input
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// True once every byte has been consumed
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Input from the current position on
    #[inline]
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Input between two byte offsets; both must lie on char boundaries
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    /// A scanner over at most `len` bytes from the current position
    ///
    /// The window is shortened to the nearest character boundary so that
    /// slicing stays valid.
    pub fn bounded(&self, len: usize) -> Scanner<'a> {
        let mut end = self.pos.saturating_add(len).min(self.input.len());
        while !self.input.is_char_boundary(end) {
            end -= 1;
        }
        Scanner {
            input: &self.input[..end],
            pos: self.pos,
        }
    }

    /// Byte under the cursor
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// Byte `offset` bytes past the cursor
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Skip spaces, tabs, newlines and carriage returns
    #[inline]
    pub fn skip_whitespace(&mut self) {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && is_whitespace(bytes[self.pos]) {
            self.pos += 1;
        }
    }

    /// Offset of the next '<', if any
    #[inline]
    pub fn find_tag_start(&self) -> Option<usize> {
        self.find_byte(b'<')
    }

    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, &self.input.as_bytes()[self.pos..]).map(|i| self.pos + i)
    }

    /// Does the input continue with `needle`?
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.input.as_bytes()[self.pos..].starts_with(needle)
    }

    /// Read an element or attribute name
    ///
    /// Starts with a letter, underscore, colon or non-ASCII byte and continues
    /// with letters, digits, hyphens, underscores, periods and colons.
    pub fn read_name(&mut self) -> Option<&'a str> {
        let bytes = self.input.as_bytes();
        let start = self.pos;

        if start >= bytes.len() || !is_name_start_char(bytes[start]) {
            return None;
        }

        self.pos += 1;
        while self.pos < bytes.len() && is_name_char(bytes[self.pos]) {
            self.pos += 1;
        }

        Some(&self.input[start..self.pos])
    }
}

/// XML whitespace
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// First byte of a name: letter, `_`, `:` or any byte of a non-ASCII char
#[inline]
pub fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

/// Later bytes of a name: additionally digits, `-` and `.`
#[inline]
pub fn is_name_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' | b':') || b >= 0x80
}
