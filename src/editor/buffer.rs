use super::lines::{Edit, Selection, line_start};

/// One editor's text plus its selection.
///
/// Mirrors what a host text area holds: the assistant computes an [`Edit`]
/// and the buffer adopts it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorBuffer {
    text: String,
    selection: Selection,
    dirty: bool,
}

impl EditorBuffer {
    /// Create a new buffer from a string, caret at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            selection: Selection::default(),
            dirty: false,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Select `start..end`, clamped to the text.
    pub fn select(&mut self, start: usize, end: usize) {
        self.selection = Selection::new(start, end).clamped(&self.text);
    }

    /// Replace the whole text, collapsing the caret to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.selection = Selection::caret(self.text.len());
        self.dirty = true;
    }

    /// Adopt the result of a keystroke.
    pub fn apply(&mut self, edit: Edit) {
        self.selection = edit.selection().clamped(&edit.text);
        self.text = edit.text;
        self.dirty = true;
    }

    /// Number of lines; an empty buffer has one.
    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Content of a line without its newline.
    pub fn line_at(&self, line_idx: usize) -> Option<&str> {
        self.text.split('\n').nth(line_idx)
    }

    /// Zero-based line and byte column of the selection start.
    pub fn caret_position(&self) -> (usize, usize) {
        let offset = self.selection.start;
        let line = self.text[..offset].matches('\n').count();
        (line, offset - line_start(&self.text, offset))
    }
}
