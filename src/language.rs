//! The three buffer languages of a sandbox session.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Which of the three editors a buffer belongs to.
#[derive(
    clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LanguageKind {
    /// HTML body markup.
    #[value(alias = "html")]
    Markup,
    /// CSS rules.
    #[value(alias = "css")]
    Style,
    /// JavaScript.
    #[value(alias = "js")]
    Script,
}

impl LanguageKind {
    pub const ALL: [Self; 3] = [Self::Markup, Self::Style, Self::Script];

    /// Key under which this buffer is persisted in the store.
    pub const fn slot_name(self) -> &'static str {
        match self {
            Self::Markup => "htmlCode",
            Self::Style => "cssCode",
            Self::Script => "jsCode",
        }
    }

    /// Guess the language from a file extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "html" | "htm" => Some(Self::Markup),
            "css" => Some(Self::Style),
            "js" | "mjs" => Some(Self::Script),
            _ => None,
        }
    }
}

impl fmt::Display for LanguageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Markup => "markup",
            Self::Style => "style",
            Self::Script => "script",
        })
    }
}
