//! Persistent homes for the three buffers.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SandpadError};
use crate::language::LanguageKind;

/// Named slots that outlive a session.
pub trait BufferStore {
    /// Saved text for `kind`, if any was ever stored.
    fn get(&self, kind: LanguageKind) -> Option<String>;

    /// Persist `text` for `kind`.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    fn set(&mut self, kind: LanguageKind, text: &str) -> Result<()>;
}

/// A store that forgets everything when dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: HashMap<LanguageKind, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BufferStore for MemoryStore {
    fn get(&self, kind: LanguageKind) -> Option<String> {
        self.slots.get(&kind).cloned()
    }

    fn set(&mut self, kind: LanguageKind, text: &str) -> Result<()> {
        self.slots.insert(kind, text.to_string());
        Ok(())
    }
}

/// Slots kept in a JSON object keyed by [`LanguageKind::slot_name`], written
/// through on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    slots: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let slots = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|err| SandpadError::io(&path, err))?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, slots })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| SandpadError::io(parent, err))?;
        }
        let json = serde_json::to_string_pretty(&self.slots)?;
        fs::write(&self.path, json).map_err(|err| SandpadError::io(&self.path, err))
    }
}

impl BufferStore for JsonFileStore {
    fn get(&self, kind: LanguageKind) -> Option<String> {
        self.slots.get(kind.slot_name()).cloned()
    }

    fn set(&mut self, kind: LanguageKind, text: &str) -> Result<()> {
        self.slots
            .insert(kind.slot_name().to_string(), text.to_string());
        self.flush()
    }
}
