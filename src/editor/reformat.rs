//! Whole-buffer re-indentation.
//!
//! A single forward pass over the lines keeps one depth counter. A line
//! starting with `}` or `</` is written one level shallower; a line ending in
//! `{` or starting with a non-void opening tag deepens every line after it.
//! Tag names are never matched against each other, so unbalanced or
//! interleaved markup simply drifts.

use tracing::debug;

use super::classify::line_shape;
use super::rules::EditorRules;

/// Re-indent `code` from scratch.
///
/// Existing leading and trailing whitespace on every line is discarded. CRLF
/// line endings come out as LF.
pub fn reformat(code: &str, rules: &EditorRules) -> String {
    if code.is_empty() {
        return String::new();
    }
    let normalized = code.replace("\r\n", "\n");

    let mut depth = 0usize;
    let mut out = Vec::new();
    for line in normalized.split('\n') {
        let trimmed = line.trim();
        let shape = line_shape(trimmed, rules);
        if shape.closes {
            depth = depth.saturating_sub(1);
        }
        out.push(format!("{}{trimmed}", rules.indent(depth)));
        if shape.opens {
            depth += 1;
        }
    }
    debug!(lines = out.len(), final_depth = depth, "reformatted");
    out.join("\n")
}
