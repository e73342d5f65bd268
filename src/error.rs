//! Errors raised by the I/O edges of the sandbox.
//!
//! The editing core never fails; only stores, renderers, rules files and
//! the watcher surface errors.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SandpadError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SandpadError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("file watch failed: {0}")]
    Watch(#[from] notify::Error),
}

impl SandpadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
