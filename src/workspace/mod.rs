//! A sandbox session: three buffers wired to a store and a live preview.
//!
//! Every mutation goes through the same path: update the buffer, write it
//! to the [`BufferStore`], then render the preview exactly once.

mod preview;
mod store;

pub use preview::{HtmlFileRenderer, NullRenderer, PreviewRenderer};
pub use store::{BufferStore, JsonFileStore, MemoryStore};

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::document::{ExportOptions, Sources, export_document, import_document, import_single};
use crate::editor::{Edit, EditorBuffer, EditorRules, Key, Selection, handle_key};
use crate::error::{Result, SandpadError};
use crate::language::LanguageKind;

pub struct Workspace<S, R> {
    store: S,
    renderer: R,
    rules: EditorRules,
    buffers: [EditorBuffer; 3],
}

impl<S: BufferStore, R: PreviewRenderer> Workspace<S, R> {
    /// Load saved buffers from `store` and render the first preview.
    ///
    /// Empty saved slots are treated as absent.
    ///
    /// # Errors
    /// Returns an error if the initial preview cannot be rendered.
    pub fn open(store: S, renderer: R, rules: EditorRules) -> Result<Self> {
        let buffers = LanguageKind::ALL.map(|kind| {
            store
                .get(kind)
                .filter(|text| !text.is_empty())
                .map_or_else(EditorBuffer::empty, |text| EditorBuffer::from_text(&text))
        });
        let mut workspace = Self {
            store,
            renderer,
            rules,
            buffers,
        };
        workspace.refresh()?;
        Ok(workspace)
    }

    pub fn buffer(&self, kind: LanguageKind) -> &EditorBuffer {
        &self.buffers[slot(kind)]
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Snapshot of all three buffers.
    pub fn sources(&self) -> Sources {
        Sources::new(
            self.buffer(LanguageKind::Markup).text(),
            self.buffer(LanguageKind::Style).text(),
            self.buffer(LanguageKind::Script).text(),
        )
    }

    /// Move the selection of one buffer.
    pub fn select(&mut self, kind: LanguageKind, selection: Selection) {
        self.buffers[slot(kind)].select(selection.start, selection.end);
    }

    /// Replace a buffer's text, as after typing.
    ///
    /// # Errors
    /// Returns an error if the buffer cannot be persisted or previewed.
    pub fn set_buffer(&mut self, kind: LanguageKind, text: impl Into<String>) -> Result<()> {
        self.buffers[slot(kind)].set_text(text);
        self.persist(kind)?;
        self.refresh()
    }

    /// Run a key against a buffer at `selection` and adopt the result.
    ///
    /// # Errors
    /// Returns an error if the buffer cannot be persisted or previewed.
    pub fn handle_key(
        &mut self,
        kind: LanguageKind,
        key: Key,
        selection: Selection,
    ) -> Result<Edit> {
        let buffer = &self.buffers[slot(kind)];
        let edit = handle_key(key, buffer.text(), selection, kind, &self.rules);
        debug!(
            %kind,
            ?key,
            start = selection.start,
            end = selection.end,
            caret = edit.caret,
            "key handled"
        );
        self.buffers[slot(kind)].apply(edit.clone());
        self.persist(kind)?;
        self.refresh()?;
        Ok(edit)
    }

    /// Run a key at the buffer's current selection.
    ///
    /// # Errors
    /// Returns an error if the buffer cannot be persisted or previewed.
    pub fn press(&mut self, kind: LanguageKind, key: Key) -> Result<Edit> {
        let selection = self.buffer(kind).selection();
        self.handle_key(kind, key, selection)
    }

    /// Load a single-language file into one buffer.
    ///
    /// An unreadable file leaves everything untouched and returns `false`.
    ///
    /// # Errors
    /// Returns an error if the loaded buffer cannot be persisted or previewed.
    pub fn load_file(&mut self, kind: LanguageKind, path: &Path) -> Result<bool> {
        let Some(content) = read_or_warn(path) else {
            return Ok(false);
        };
        self.set_buffer(kind, import_single(&content))?;
        Ok(true)
    }

    /// Replace all three buffers from a full page.
    ///
    /// # Errors
    /// Returns an error if the buffers cannot be persisted or previewed.
    pub fn apply_document(&mut self, content: &str) -> Result<()> {
        let sources = import_document(content);
        for kind in LanguageKind::ALL {
            self.buffers[slot(kind)].set_text(sources.get(kind));
            self.persist(kind)?;
        }
        self.refresh()
    }

    /// Load a full page file into all three buffers.
    ///
    /// An unreadable file leaves everything untouched and returns `false`.
    ///
    /// # Errors
    /// Returns an error if the buffers cannot be persisted or previewed.
    pub fn load_document(&mut self, path: &Path) -> Result<bool> {
        let Some(content) = read_or_warn(path) else {
            return Ok(false);
        };
        self.apply_document(&content)?;
        Ok(true)
    }

    /// The page offered for download.
    pub fn export(&self, options: &ExportOptions) -> String {
        export_document(&self.sources(), &self.rules, options)
    }

    /// Write the exported page to `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn export_to(&self, path: &Path, options: &ExportOptions) -> Result<()> {
        fs::write(path, self.export(options)).map_err(|err| SandpadError::io(path, err))
    }

    fn persist(&mut self, kind: LanguageKind) -> Result<()> {
        let buffer = &mut self.buffers[slot(kind)];
        self.store.set(kind, buffer.text())?;
        buffer.mark_clean();
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        let sources = self.sources();
        self.renderer.render(&sources)
    }
}

const fn slot(kind: LanguageKind) -> usize {
    match kind {
        LanguageKind::Markup => 0,
        LanguageKind::Style => 1,
        LanguageKind::Script => 2,
    }
}

/// Read a file as text the way a browser would: invalid UTF-8 is replaced
/// and a leading byte-order mark is dropped.
fn read_or_warn(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            Some(text.strip_prefix('\u{feff}').unwrap_or(&text).to_string())
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "ignoring unreadable file");
            None
        }
    }
}
