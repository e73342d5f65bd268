//! Enter and Tab handling.
//!
//! Both handlers are pure: they take the buffer and selection and return the
//! whole new buffer plus a collapsed caret. The "current line" they look at
//! is the text between the start of the caret's line and the selection
//! start, so anything after the caret never influences the outcome.

use serde::{Deserialize, Serialize};

use super::abbrev::Abbreviation;
use super::classify::{LineClass, classify_line};
use super::lines::{Edit, Selection, leading_whitespace, line_prefix, trailing_word};
use super::rules::EditorRules;
use crate::language::LanguageKind;

/// Keys the assistant takes over from the host editor.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Enter,
    Tab,
}

/// Dispatch a key to its handler.
pub fn handle_key(
    key: Key,
    text: &str,
    selection: Selection,
    kind: LanguageKind,
    rules: &EditorRules,
) -> Edit {
    match key {
        Key::Enter => enter(text, selection, kind, rules),
        Key::Tab => tab(text, selection, rules),
    }
}

/// Insert a line break, replacing the selection.
///
/// In priority order:
/// - after `<tag>...</tag>`: a deeper blank line and `</tag>` at the old
///   indentation (any language);
/// - after a lone `<tag>` in markup: a deeper blank line and a blank line at
///   the old indentation, with no closing tag written;
/// - after a line ending in `{` in a stylesheet: a deeper blank line and `}`;
/// - otherwise a newline carrying the current leading whitespace.
///
/// The caret lands at the end of the first inserted line.
pub fn enter(text: &str, selection: Selection, kind: LanguageKind, rules: &EditorRules) -> Edit {
    let selection = selection.clamped(text);
    let prefix = line_prefix(text, selection.start);
    let indentation = leading_whitespace(prefix);
    let inside = format!("{indentation}{}", rules.unit());

    let insert = match (classify_line(prefix), kind) {
        (LineClass::InlineClosed { tag }, _) => {
            format!("\n{inside}\n{indentation}</{tag}>")
        }
        (LineClass::OpenTag { .. }, LanguageKind::Markup) => format!("\n{inside}\n"),
        (LineClass::BlockOpen, LanguageKind::Style) => format!("\n{inside}\n{indentation}}}"),
        _ => {
            let insert = format!("\n{indentation}");
            let caret = insert.len();
            return Edit::splice(text, selection, &insert, caret);
        }
    };
    Edit::splice(text, selection, &insert, 1 + inside.len())
}

/// Expand the shorthand word before the caret into an element, or insert one
/// indentation unit when there is no word.
///
/// The word is whatever non-whitespace run ends at the selection start; the
/// selection itself is replaced along with it.
pub fn tab(text: &str, selection: Selection, rules: &EditorRules) -> Edit {
    let selection = selection.clamped(text);
    let prefix = line_prefix(text, selection.start);

    let Some(token) = trailing_word(prefix) else {
        let unit = rules.unit();
        return Edit::splice(text, selection, &unit, unit.len());
    };

    let expansion = Abbreviation::parse(token).expand(rules);
    let replaced = Selection::new(selection.start - token.len(), selection.end);
    Edit::splice(text, replaced, &expansion.text, expansion.caret)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> EditorRules {
        EditorRules::default()
    }

    /// Run a key on `text` where `|` marks the caret.
    fn press(key: Key, kind: LanguageKind, marked: &str) -> (String, usize) {
        let caret = marked.find('|').expect("caret marker");
        let text = marked.replacen('|', "", 1);
        let edit = handle_key(key, &text, Selection::caret(caret), kind, &rules());
        (edit.text, edit.caret)
    }

    /// Render an edit with `|` at the caret.
    fn marked((text, caret): (String, usize)) -> String {
        format!("{}|{}", &text[..caret], &text[caret..])
    }

    // --- Enter ---

    #[test]
    fn test_enter_between_tags_in_markup() {
        let out = press(Key::Enter, LanguageKind::Markup, "<li>|</li>");
        assert_eq!(marked(out), "<li>\n  |\n</li>");
    }

    #[test]
    fn test_enter_after_inline_pair_appends_closing_tag() {
        let out = press(Key::Enter, LanguageKind::Script, "  <b>x</b>|");
        assert_eq!(marked(out), "  <b>x</b>\n    |\n  </b>");
    }

    #[test]
    fn test_enter_after_open_tag_leaves_closing_line_empty() {
        // no closing tag is written for a lone open tag, only the scaffold
        let out = press(Key::Enter, LanguageKind::Markup, "    <section>|");
        assert_eq!(marked(out), "    <section>\n      |\n");
    }

    #[test]
    fn test_enter_after_open_tag_outside_markup_is_plain() {
        let out = press(Key::Enter, LanguageKind::Style, "  <div>|");
        assert_eq!(marked(out), "  <div>\n  |");
    }

    #[test]
    fn test_enter_after_css_block_open() {
        let out = press(Key::Enter, LanguageKind::Style, ".box {|");
        assert_eq!(marked(out), ".box {\n  |\n}");
    }

    #[test]
    fn test_enter_after_nested_css_block_keeps_base_indent() {
        let out = press(Key::Enter, LanguageKind::Style, "a {\n  .b {|\n}");
        assert_eq!(marked(out), "a {\n  .b {\n    |\n  }\n}");
    }

    #[test]
    fn test_enter_after_brace_in_script_is_plain() {
        let out = press(Key::Enter, LanguageKind::Script, "\tif (x) {|");
        assert_eq!(marked(out), "\tif (x) {\n\t|");
    }

    #[test]
    fn test_enter_copies_indentation_verbatim() {
        let out = press(Key::Enter, LanguageKind::Script, "   let a = 1;|");
        assert_eq!(marked(out), "   let a = 1;\n   |");
    }

    #[test]
    fn test_enter_only_looks_before_the_caret() {
        let out = press(Key::Enter, LanguageKind::Style, "a|b {");
        assert_eq!(marked(out), "a\n|b {");
    }

    #[test]
    fn test_enter_replaces_selection() {
        let rules = rules();
        let edit = enter(".a {XYZ", Selection::new(4, 7), LanguageKind::Style, &rules);
        assert_eq!(edit.text, ".a {\n  \n}");
        assert_eq!(edit.caret, 7);
        assert!(edit.selection().is_caret());
    }

    #[test]
    fn test_enter_on_empty_buffer() {
        let edit = enter("", Selection::caret(0), LanguageKind::Markup, &rules());
        assert_eq!(edit.text, "\n");
        assert_eq!(edit.caret, 1);
    }

    #[test]
    fn test_enter_clamps_out_of_range_selection() {
        let edit = enter("ab", Selection::new(9, 1), LanguageKind::Script, &rules());
        assert_eq!(edit.text, "a\n");
        assert_eq!(edit.caret, 2);
    }

    // --- Tab ---

    #[test]
    fn test_tab_without_word_inserts_spaces() {
        let out = press(Key::Tab, LanguageKind::Markup, "x |y");
        assert_eq!(marked(out), "x   |y");
    }

    #[test]
    fn test_tab_at_line_start_inserts_spaces() {
        let out = press(Key::Tab, LanguageKind::Markup, "<p>\n|");
        assert_eq!(marked(out), "<p>\n  |");
    }

    #[test]
    fn test_tab_expands_anchor() {
        let out = press(Key::Tab, LanguageKind::Markup, "a.link#nav|");
        assert_eq!(
            marked(out),
            "<a class=\"link\" id=\"nav\" href=\"\" target=\"_blank\">|</a>"
        );
    }

    #[test]
    fn test_tab_expands_image_with_caret_at_end() {
        let out = press(Key::Tab, LanguageKind::Markup, "img.icon|");
        assert_eq!(marked(out), "<img class=\"icon\" src=\"\" alt=\"\" />|");
    }

    #[test]
    fn test_tab_expands_only_the_last_word() {
        let out = press(Key::Tab, LanguageKind::Markup, "<div>\n  hello ul.menu|\n</div>");
        assert_eq!(
            marked(out),
            "<div>\n  hello <ul class=\"menu\">|</ul>\n</div>"
        );
    }

    #[test]
    fn test_tab_expands_in_any_language() {
        let out = press(Key::Tab, LanguageKind::Style, "color|");
        assert_eq!(marked(out), "<color>|</color>");
    }

    #[test]
    fn test_tab_replaces_selection_after_word() {
        let rules = rules();
        let edit = tab("p#x SELECTED", Selection::new(3, 12), &rules);
        assert_eq!(edit.text, "<p id=\"x\"></p>");
        assert_eq!(edit.caret, 10);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn kind() -> impl Strategy<Value = LanguageKind> {
            prop_oneof![
                Just(LanguageKind::Markup),
                Just(LanguageKind::Style),
                Just(LanguageKind::Script),
            ]
        }

        proptest! {
            #[test]
            fn caret_stays_on_a_char_boundary(
                text in "[a-z<>/{}.# \né\t]{0,60}",
                start in 0..80usize,
                end in 0..80usize,
                kind in kind(),
                is_tab in any::<bool>(),
            ) {
                let key = if is_tab { Key::Tab } else { Key::Enter };
                let edit = handle_key(key, &text, Selection::new(start, end), kind, &rules());
                prop_assert!(edit.caret <= edit.text.len());
                prop_assert!(edit.text.is_char_boundary(edit.caret));
            }

            #[test]
            fn enter_keeps_text_around_the_selection(
                before in "[a-z ]{0,20}",
                after in "[a-z ]{0,20}",
                kind in kind(),
            ) {
                let text = format!("{before}{after}");
                let edit = enter(&text, Selection::caret(before.len()), kind, &rules());
                prop_assert!(edit.text.starts_with(&before));
                prop_assert!(edit.text.ends_with(&after));
            }
        }
    }
}
