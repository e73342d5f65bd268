//! Offsets, selections and line slicing shared by the editing heuristics.
//!
//! All offsets are byte offsets into UTF-8 text.

use serde::Serialize;

/// A selected range `start..end` in a buffer. A caret is an empty selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A collapsed selection at `offset`.
    pub const fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub const fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// Order the ends, clamp them to `text` and snap each back to a char
    /// boundary, so slicing `text` with the result never panics.
    pub fn clamped(self, text: &str) -> Self {
        let (lo, hi) = if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        Self::new(floor_boundary(text, lo), floor_boundary(text, hi))
    }
}

/// The outcome of a keystroke: the whole new buffer and where the caret lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edit {
    pub text: String,
    pub caret: usize,
}

impl Edit {
    /// Replace `selection` in `text` with `insert`, placing the caret
    /// `caret_in_insert` bytes into the inserted text.
    pub(crate) fn splice(
        text: &str,
        selection: Selection,
        insert: &str,
        caret_in_insert: usize,
    ) -> Self {
        let before = &text[..selection.start];
        let after = &text[selection.end..];
        let mut out = String::with_capacity(before.len() + insert.len() + after.len());
        out.push_str(before);
        out.push_str(insert);
        out.push_str(after);
        Self {
            text: out,
            caret: before.len() + caret_in_insert.min(insert.len()),
        }
    }

    pub const fn selection(&self) -> Selection {
        Selection::caret(self.caret)
    }
}

fn floor_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Offset of the first byte of the line containing `offset`.
pub fn line_start(text: &str, offset: usize) -> usize {
    text[..offset].rfind('\n').map_or(0, |i| i + 1)
}

/// Text from the start of the caret's line up to the caret.
pub fn line_prefix(text: &str, offset: usize) -> &str {
    &text[line_start(text, offset)..offset]
}

/// The run of whitespace a line starts with.
pub fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// The whitespace-delimited word ending exactly at the end of `prefix`.
pub fn trailing_word(prefix: &str) -> Option<&str> {
    let start = prefix
        .rfind(char::is_whitespace)
        .map_or(0, |i| i + prefix[i..].chars().next().map_or(1, char::len_utf8));
    let word = &prefix[start..];
    (!word.is_empty()).then_some(word)
}
