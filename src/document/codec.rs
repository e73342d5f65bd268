use std::sync::LazyLock;

use regex::Regex;

use super::types::{ExportOptions, Sources};
use crate::editor::{EditorRules, reformat};

static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>(.*?)</style>").expect("valid regex"));
static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>(.*?)</script>").expect("valid regex"));

/// Wrapper markup removed from an imported document, first match of each.
static WRAPPERS: LazyLock<[Regex; 6]> = LazyLock::new(|| {
    [
        r"(?i)<!DOCTYPE[^>]*>",
        r"(?i)<html(?:\s[^>]*)?>",
        r"(?i)</html>",
        r"(?is)<head(?:\s[^>]*)?>.*?</head>",
        r"(?i)<body(?:\s[^>]*)?>",
        r"(?i)</body>",
    ]
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
});

/// Build a standalone page from the three buffers, each reformatted first.
///
/// The style buffer lands in `<head>`, the script buffer at the end of
/// `<body>` after the markup.
pub fn export_document(sources: &Sources, rules: &EditorRules, options: &ExportOptions) -> String {
    let markup = reformat(&sources.markup, rules);
    let style = reformat(&sources.style, rules);
    let script = reformat(&sources.script, rules);
    let ExportOptions { lang, title } = options;

    format!(
        "<!DOCTYPE html>
<html lang=\"{lang}\">
<head>
<meta charset=\"UTF-8\" />
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />
<title>{title}</title>
<style>
{style}
</style>
</head>
<body>
{markup}

<script>
{script}
</script>
</body>
</html>"
    )
}

/// Split a full page back into the three buffers.
///
/// The first `<style>` and first `<script>` blocks supply the style and
/// script buffers; every such block is then removed. The doctype, the
/// `<html>` and `<body>` tags and the whole `<head>` element are stripped and
/// what remains becomes the markup. Missing pieces are simply empty.
pub fn import_document(content: &str) -> Sources {
    let (style, content) = take_block(&STYLE_BLOCK, content);
    let (script, content) = take_block(&SCRIPT_BLOCK, &content);

    let mut markup = content;
    for wrapper in WRAPPERS.iter() {
        markup = wrapper.replace(&markup, "").into_owned();
    }

    Sources {
        markup: markup.trim().to_string(),
        style,
        script,
    }
}

/// Contents of a single-language file as loaded into its buffer.
pub fn import_single(content: &str) -> String {
    content.trim().to_string()
}

/// The document the live preview shows: markup followed by the style and
/// script buffers in their own elements, unformatted.
pub fn preview_document(sources: &Sources) -> String {
    format!(
        "{}<style>{}</style><script>{}</script>",
        sources.markup, sources.style, sources.script
    )
}

fn take_block(re: &Regex, content: &str) -> (String, String) {
    let body = re
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    (body, re.replace_all(content, "").into_owned())
}
