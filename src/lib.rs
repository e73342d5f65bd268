// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorRules)
    clippy::module_name_repetitions
)]

//! # Sandpad
//!
//! An HTML/CSS/JS snippet sandbox with structural editing.
//!
//! Sandpad keeps three buffers (markup, style, script) with:
//! - Auto-indentation and auto-closing on Enter
//! - `tag.class#id` abbreviation expansion on Tab
//! - Whole-buffer re-indentation
//! - Import and export of single-file pages
//! - A live preview page rewritten on every change
//!
//! ## Architecture
//!
//! The editing core is a set of pure functions from `(text, selection)` to
//! an [`editor::Edit`]. A [`workspace::Workspace`] owns the buffers and
//! pushes every change to a store and a preview renderer.
//!
//! ## Modules
//!
//! - [`editor`]: Line heuristics, reformatting and key handling
//! - [`document`]: Page import and export
//! - [`workspace`]: Buffers wired to persistence and preview
//! - [`watcher`]: File watching
//! - [`config`]: Saved command-line defaults
//! - [`language`]: The three buffer languages

pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod language;
pub mod watcher;
pub mod workspace;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::document::{ExportOptions, Sources};
    pub use crate::editor::{Edit, EditorRules, Key, Selection};
    pub use crate::language::LanguageKind;
    pub use crate::workspace::Workspace;
}
