//! `tag.class#id` shorthand expansion.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use super::rules::EditorRules;

static TAG_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z][a-zA-Z0-9_-]*)").expect("valid regex"));
static CLASS_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.([a-zA-Z0-9_-]+)").expect("valid regex"));
static ID_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([a-zA-Z0-9_-]+)").expect("valid regex"));

const DEFAULT_TAG: &str = "div";

/// A parsed shorthand token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abbreviation<'a> {
    pub tag: &'a str,
    pub class: Option<&'a str>,
    pub id: Option<&'a str>,
}

/// Replacement text for a token and where the caret goes inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub text: String,
    pub caret: usize,
}

impl<'a> Abbreviation<'a> {
    /// Parse a token. Never fails: a token without a leading tag name becomes
    /// a `div`, and only the first `.class` and `#id` are kept.
    pub fn parse(token: &'a str) -> Self {
        Self {
            tag: first_group(&TAG_NAME, token).unwrap_or(DEFAULT_TAG),
            class: first_group(&CLASS_NAME, token),
            id: first_group(&ID_NAME, token),
        }
    }

    pub fn expand(&self, rules: &EditorRules) -> Expansion {
        let mut attrs = String::new();
        if let Some(class) = self.class {
            let _ = write!(attrs, " class=\"{class}\"");
        }
        if let Some(id) = self.id {
            let _ = write!(attrs, " id=\"{id}\"");
        }
        for attr in rules.attributes_for(self.tag) {
            let _ = write!(attrs, " {}=\"{}\"", attr.name, attr.value);
        }

        let tag = self.tag;
        if rules.is_self_closing(tag) {
            let text = format!("<{tag}{attrs} />");
            let caret = text.len();
            Expansion { text, caret }
        } else {
            let open = format!("<{tag}{attrs}>");
            let caret = open.len();
            Expansion {
                text: format!("{open}</{tag}>"),
                caret,
            }
        }
    }
}

fn first_group<'a>(re: &Regex, token: &'a str) -> Option<&'a str> {
    re.captures(token)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
