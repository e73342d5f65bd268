//! Structural text editing for the three sandbox languages.
//!
//! - [`reformat`]: re-derive indentation for a whole buffer
//! - [`enter`] / [`tab`]: keystroke assistance returning an [`Edit`]
//! - [`classify_line`] / [`line_shape`]: the line heuristics both share
//!
//! Nothing here holds state between calls; the tables live in
//! [`EditorRules`] and are passed in explicitly.

mod abbrev;
mod assist;
mod buffer;
mod classify;
mod lines;
mod reformat;
mod rules;

pub use abbrev::{Abbreviation, Expansion};
pub use assist::{Key, enter, handle_key, tab};
pub use buffer::EditorBuffer;
pub use classify::{LineClass, LineShape, classify_line, line_shape};
pub use lines::{Edit, Selection, leading_whitespace, line_prefix, line_start, trailing_word};
pub use reformat::reformat;
pub use rules::{Attribute, EditorRules};
