//! Line classification used by the Enter handler and the reformatter.
//!
//! These are regex heuristics over a single trimmed line. There is no
//! parser behind them: strings, comments and multi-line tags are not
//! understood.

use std::sync::LazyLock;

use regex::Regex;

use super::rules::EditorRules;

/// `<tag ...>` with nothing after the first `>` except optional content that
/// ends in a closing tag. The closing tag is checked by hand.
static TAG_THEN_REST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<([a-zA-Z][a-zA-Z0-9_-]*)[^>]*>(.*)$").expect("valid regex")
});

/// A lone opening tag filling the whole line.
static OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<([a-zA-Z][a-zA-Z0-9_-]*)[^>]*>$").expect("valid regex")
});

/// Anything that looks like the start of a tag: `<`, at least one non-`>`, `>`.
static TAG_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<([^>]+)>").expect("valid regex"));

/// How the Enter key sees the text before the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// `<tag ...>...</tag>` on one line.
    InlineClosed { tag: &'a str },
    /// `<tag ...>` alone on the line.
    OpenTag { tag: &'a str },
    /// Ends with `{`.
    BlockOpen,
    /// Starts with `}` or `</`.
    Closer,
    Plain,
}

/// How the reformatter sees a line: whether it pops a level before being
/// written and whether it pushes one after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineShape {
    pub closes: bool,
    pub opens: bool,
}

/// Classify a line for the Enter key. Surrounding whitespace is ignored.
pub fn classify_line(line: &str) -> LineClass<'_> {
    let trimmed = line.trim();

    if let Some(tag) = inline_closed_tag(trimmed) {
        return LineClass::InlineClosed { tag };
    }
    if let Some(tag) = OPEN_TAG.captures(trimmed).and_then(|caps| caps.get(1)) {
        return LineClass::OpenTag { tag: tag.as_str() };
    }
    if trimmed.ends_with('{') {
        return LineClass::BlockOpen;
    }
    if starts_with_closer(trimmed) {
        return LineClass::Closer;
    }
    LineClass::Plain
}

/// Classify a line for the reformatter. Surrounding whitespace is ignored.
pub fn line_shape(line: &str, rules: &EditorRules) -> LineShape {
    let trimmed = line.trim();
    LineShape {
        closes: starts_with_closer(trimmed),
        opens: trimmed.ends_with('{') || opens_element(trimmed, rules),
    }
}

fn starts_with_closer(trimmed: &str) -> bool {
    trimmed.starts_with('}') || trimmed.starts_with("</")
}

fn opens_element(trimmed: &str, rules: &EditorRules) -> bool {
    TAG_PREFIX
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .is_some_and(|inner| {
            let inner = inner.as_str();
            !inner.starts_with('/') && !rules.starts_with_void(inner)
        })
}

/// The tag name of a `<tag ...>...</tag>` line.
///
/// When the closing tag names a prefix of the opening tag's name (as in
/// `<lix></li>`), the shorter name wins, mirroring a backtracking
/// backreference match.
fn inline_closed_tag(trimmed: &str) -> Option<&str> {
    let caps = TAG_THEN_REST.captures(trimmed)?;
    let name = caps.get(1)?.as_str();
    let rest = caps.get(2)?.as_str();
    (1..=name.len()).rev().map(|len| &name[..len]).find(|tag| {
        rest.strip_suffix('>')
            .and_then(|r| r.strip_suffix(*tag))
            .is_some_and(|r| r.ends_with("</"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_closed_pair() {
        assert_eq!(
            classify_line("  <li class=\"x\">item</li>  "),
            LineClass::InlineClosed { tag: "li" }
        );
        assert_eq!(
            classify_line("<p></p>"),
            LineClass::InlineClosed { tag: "p" }
        );
    }

    #[test]
    fn test_inline_closed_requires_matching_name() {
        assert_eq!(classify_line("<b>x</i>"), LineClass::Plain);
    }

    #[test]
    fn test_inline_closed_accepts_prefix_of_open_name() {
        assert_eq!(
            classify_line("<lix>y</li>"),
            LineClass::InlineClosed { tag: "li" }
        );
    }

    #[test]
    fn test_open_tag_alone() {
        assert_eq!(classify_line("<div>"), LineClass::OpenTag { tag: "div" });
        assert_eq!(
            classify_line("    <my-widget data-x=\"1\">"),
            LineClass::OpenTag { tag: "my-widget" }
        );
        // void elements still look like open tags to the Enter key
        assert_eq!(
            classify_line("<img src=\"a.png\">"),
            LineClass::OpenTag { tag: "img" }
        );
    }

    #[test]
    fn test_open_tag_with_trailing_text_is_plain() {
        assert_eq!(classify_line("<div>hello"), LineClass::Plain);
        assert_eq!(classify_line("<1div>"), LineClass::Plain);
    }

    #[test]
    fn test_block_open_and_closer() {
        assert_eq!(classify_line(".box {"), LineClass::BlockOpen);
        assert_eq!(classify_line("} else {"), LineClass::BlockOpen);
        assert_eq!(classify_line("}"), LineClass::Closer);
        assert_eq!(classify_line("</ul>"), LineClass::Closer);
        assert_eq!(classify_line("color: red;"), LineClass::Plain);
    }

    #[test]
    fn test_shape_of_void_and_normal_elements() {
        let rules = EditorRules::default();
        assert_eq!(line_shape("<img src=\"x\">", &rules), LineShape::default());
        assert_eq!(line_shape("<br>", &rules), LineShape::default());
        assert_eq!(
            line_shape("<div>", &rules),
            LineShape {
                closes: false,
                opens: true
            }
        );
    }

    #[test]
    fn test_shape_of_brace_lines() {
        let rules = EditorRules::default();
        assert_eq!(
            line_shape("} else {", &rules),
            LineShape {
                closes: true,
                opens: true
            }
        );
        assert_eq!(
            line_shape("</div>", &rules),
            LineShape {
                closes: true,
                opens: false
            }
        );
    }

    #[test]
    fn test_shape_counts_inline_pairs_and_doctype_as_openers() {
        let rules = EditorRules::default();
        assert!(line_shape("<li>a</li>", &rules).opens);
        assert!(line_shape("<!DOCTYPE html>", &rules).opens);
        // void matching is a prefix test on the tag text
        assert!(line_shape("<header>", &rules).opens);
        assert!(!line_shape("<brand>", &rules).opens);
        assert!(!line_shape("<hr/>", &rules).opens);
        assert!(!line_shape("<>", &rules).opens);
        assert!(!line_shape("<div", &rules).opens);
    }
}
