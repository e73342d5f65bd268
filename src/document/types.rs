//! Types shared by import, export and the workspace.

use serde::{Deserialize, Serialize};

use crate::language::LanguageKind;

/// The three buffers of a sandbox session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sources {
    pub markup: String,
    pub style: String,
    pub script: String,
}

impl Sources {
    pub fn new(
        markup: impl Into<String>,
        style: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            markup: markup.into(),
            style: style.into(),
            script: script.into(),
        }
    }

    pub fn get(&self, kind: LanguageKind) -> &str {
        match kind {
            LanguageKind::Markup => &self.markup,
            LanguageKind::Style => &self.style,
            LanguageKind::Script => &self.script,
        }
    }

    pub fn set(&mut self, kind: LanguageKind, text: impl Into<String>) {
        let slot = match kind {
            LanguageKind::Markup => &mut self.markup,
            LanguageKind::Style => &mut self.style,
            LanguageKind::Script => &mut self.script,
        };
        *slot = text.into();
    }

    /// True when all three buffers are empty.
    pub fn is_empty(&self) -> bool {
        self.markup.is_empty() && self.style.is_empty() && self.script.is_empty()
    }
}

/// Head metadata written into exported documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Value of the `<html lang>` attribute.
    pub lang: String,
    /// Contents of `<title>`.
    pub title: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            title: "Saved Page".to_string(),
        }
    }
}
