//! Tables that drive the editing heuristics.
//!
//! Every heuristic in [`crate::editor`] takes an [`EditorRules`] instead of
//! reaching for globals, so callers can swap the tables (for example from a
//! JSON rules file) without touching the algorithms.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SandpadError};

/// Elements that never raise the reformatter's nesting depth.
const DEFAULT_VOID_ELEMENTS: &[&str] = &["br", "img", "input", "link", "meta", "hr"];

/// Elements the Tab expansion writes as `<tag ... />`.
const DEFAULT_SELF_CLOSING_TAGS: &[&str] = &["img", "input", "link", "meta"];

const DEFAULT_ATTRIBUTES: &[(&str, &[(&str, &str)])] = &[
    ("a", &[("href", ""), ("target", "_blank")]),
    ("img", &[("src", ""), ("alt", "")]),
    ("input", &[("type", "")]),
    ("form", &[("action", ""), ("method", "")]),
    ("link", &[("rel", ""), ("href", "")]),
    ("script", &[("src", "")]),
    ("meta", &[("charset", "")]),
    ("button", &[("type", "")]),
    ("textarea", &[]),
    ("select", &[]),
];

/// A single `name="value"` pair added by abbreviation expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorRules {
    /// Spaces per nesting level.
    pub indent_width: usize,
    /// Tag-name prefixes that do not open a block when reformatting.
    /// Matched case-sensitively against the start of the tag.
    pub void_elements: Vec<String>,
    /// Tags expanded as self-closing. Matched case-insensitively.
    pub self_closing_tags: Vec<String>,
    /// Extra attributes appended after `class`/`id` when expanding a tag.
    pub default_attributes: BTreeMap<String, Vec<Attribute>>,
}

impl Default for EditorRules {
    fn default() -> Self {
        Self {
            indent_width: 2,
            void_elements: DEFAULT_VOID_ELEMENTS
                .iter()
                .map(ToString::to_string)
                .collect(),
            self_closing_tags: DEFAULT_SELF_CLOSING_TAGS
                .iter()
                .map(ToString::to_string)
                .collect(),
            default_attributes: DEFAULT_ATTRIBUTES
                .iter()
                .map(|(tag, attrs)| {
                    let attrs = attrs
                        .iter()
                        .map(|(name, value)| Attribute::new(*name, *value))
                        .collect();
                    ((*tag).to_string(), attrs)
                })
                .collect(),
        }
    }
}

impl EditorRules {
    /// Load rules from a JSON file. Missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| SandpadError::io(path, err))?;
        let rules = serde_json::from_str(&content)?;
        Ok(rules)
    }

    /// Leading whitespace for `depth` nesting levels.
    pub fn indent(&self, depth: usize) -> String {
        " ".repeat(depth * self.indent_width)
    }

    /// One indentation unit.
    pub fn unit(&self) -> String {
        self.indent(1)
    }

    /// Whether the text right after `<` starts with a void element name.
    pub fn starts_with_void(&self, tag_text: &str) -> bool {
        self.void_elements
            .iter()
            .any(|name| tag_text.starts_with(name.as_str()))
    }

    pub fn is_self_closing(&self, tag: &str) -> bool {
        self.self_closing_tags
            .iter()
            .any(|name| name.eq_ignore_ascii_case(tag))
    }

    /// Default attributes for an exact tag name, empty if none are registered.
    pub fn attributes_for(&self, tag: &str) -> &[Attribute] {
        self.default_attributes
            .get(tag)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_indent_is_two_spaces() {
        let rules = EditorRules::default();
        assert_eq!(rules.unit(), "  ");
        assert_eq!(rules.indent(3), "      ");
        assert_eq!(rules.indent(0), "");
    }

    #[test]
    fn test_void_prefix_matching_is_case_sensitive() {
        let rules = EditorRules::default();
        assert!(rules.starts_with_void("br"));
        assert!(rules.starts_with_void("img src=\"x\""));
        assert!(rules.starts_with_void("hr/"));
        assert!(!rules.starts_with_void("BR"));
        assert!(!rules.starts_with_void("div"));
    }

    #[test]
    fn test_self_closing_is_case_insensitive() {
        let rules = EditorRules::default();
        assert!(rules.is_self_closing("IMG"));
        assert!(rules.is_self_closing("meta"));
        assert!(!rules.is_self_closing("br"));
        assert!(!rules.is_self_closing("div"));
    }

    #[test]
    fn test_attributes_for_known_and_unknown_tags() {
        let rules = EditorRules::default();
        let names: Vec<_> = rules
            .attributes_for("form")
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["action", "method"]);
        assert!(rules.attributes_for("textarea").is_empty());
        assert!(rules.attributes_for("section").is_empty());
        // lookup is exact, unlike the self-closing check
        assert!(rules.attributes_for("A").is_empty());
    }

    #[test]
    fn test_load_partial_rules_keeps_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{ "indent_width": 4 }"#).unwrap();
        let rules = EditorRules::load(file.path()).unwrap();
        assert_eq!(rules.indent_width, 4);
        assert_eq!(rules.void_elements, EditorRules::default().void_elements);
        assert_eq!(rules.attributes_for("a").len(), 2);
    }

    #[test]
    fn test_load_invalid_json_is_an_error() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "indent_width = 4").unwrap();
        assert!(matches!(
            EditorRules::load(file.path()),
            Err(SandpadError::Json(_))
        ));
    }
}
