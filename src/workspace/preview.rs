//! Live preview targets.

use std::fs;
use std::path::{Path, PathBuf};

use crate::document::{Sources, preview_document};
use crate::error::{Result, SandpadError};

/// Something that shows the current buffers as a page.
pub trait PreviewRenderer {
    /// Re-materialize the preview from the current buffers.
    ///
    /// # Errors
    /// Returns an error if the preview cannot be written.
    fn render(&mut self, sources: &Sources) -> Result<()>;
}

impl<R: PreviewRenderer + ?Sized> PreviewRenderer for Box<R> {
    fn render(&mut self, sources: &Sources) -> Result<()> {
        (**self).render(sources)
    }
}

/// Discards every render.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl PreviewRenderer for NullRenderer {
    fn render(&mut self, _sources: &Sources) -> Result<()> {
        Ok(())
    }
}

/// Writes the preview page to a file, for a browser to reload.
#[derive(Debug, Clone)]
pub struct HtmlFileRenderer {
    path: PathBuf,
}

impl HtmlFileRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreviewRenderer for HtmlFileRenderer {
    fn render(&mut self, sources: &Sources) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| SandpadError::io(parent, err))?;
        }
        fs::write(&self.path, preview_document(sources))
            .map_err(|err| SandpadError::io(&self.path, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_html_renderer_writes_preview() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("preview.html");
        let mut renderer = HtmlFileRenderer::new(&path);
        renderer
            .render(&Sources::new("<b>x</b>", "b{}", ""))
            .unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "<b>x</b><style>b{}</style><script></script>");
    }

    #[test]
    fn test_boxed_renderer_delegates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preview.html");
        let mut renderer: Box<dyn PreviewRenderer> = Box::new(HtmlFileRenderer::new(&path));
        renderer.render(&Sources::default()).unwrap();
        assert!(path.exists());
    }
}
