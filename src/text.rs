//! Position mapping between byte offsets and host line/column addresses.
//!
//! Engines scan `&str` buffers and find matches as byte offsets. Hosts address text as
//! zero-based `(line, character)` pairs where `character` counts UTF-16 code units, and
//! where `\n`, `\r\n` and a lone `\r` each terminate a line. [`LineIndex`] bridges the
//! two with a binary search over precomputed line starts.

use std::fmt;
use std::ops::Range as ByteRange;

/// A zero-based line/column address. `character` is measured in UTF-16 code units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextPosition {
    pub line: u32,
    pub character: u32,
}

impl TextPosition {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

/// Half-open `[start, end)` range of positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub start: TextPosition,
    pub end: TextPosition,
}

impl TextRange {
    pub fn new(start: TextPosition, end: TextPosition) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Line-start table for one snapshot of a buffer.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        let bytes = text.as_bytes();
        let mut idx = 0;
        while idx < bytes.len() {
            match bytes[idx] {
                b'\r' if bytes.get(idx + 1) == Some(&b'\n') => {
                    line_starts.push(idx + 2);
                    idx += 2;
                    continue;
                }
                b'\r' | b'\n' => line_starts.push(idx + 1),
                _ => {}
            }
            idx += 1;
        }
        Self { text, line_starts }
    }

    /// Convert a byte offset into a host position.
    ///
    /// Offsets past the end clamp to the end of the buffer. Offsets must fall on a
    /// char boundary; every offset the engines produce does.
    pub fn position(&self, byte_offset: usize) -> TextPosition {
        let offset = byte_offset.min(self.text.len());
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i - 1);
        let line_start = self.line_starts[line];
        let character = self.text[line_start..offset].encode_utf16().count();
        TextPosition::new(line as u32, character as u32)
    }

    pub fn range(&self, span: &ByteRange<usize>) -> TextRange {
        TextRange::new(self.position(span.start), self.position(span.end))
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
