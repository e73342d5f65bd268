use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Defaults saved in `.sandpadrc` files, as command-line tokens.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub store: Option<PathBuf>,
    pub preview: Option<PathBuf>,
    pub no_preview: bool,
    pub rules: Option<PathBuf>,
    pub lang: Option<String>,
    pub title: Option<String>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: options from `other` win, switches add up.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            store: other.store.clone().or_else(|| self.store.clone()),
            preview: other.preview.clone().or_else(|| self.preview.clone()),
            no_preview: self.no_preview || other.no_preview,
            rules: other.rules.clone().or_else(|| self.rules.clone()),
            lang: other.lang.clone().or_else(|| self.lang.clone()),
            title: other.title.clone().or_else(|| self.title.clone()),
        }
    }
}

fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return Some(PathBuf::from(appdata).join("sandpad"));
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("sandpad"),
            );
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join("sandpad"));
        }
        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(".config").join("sandpad"));
        }
    }

    None
}

fn data_dir() -> Option<PathBuf> {
    if cfg!(any(target_os = "windows", target_os = "macos")) {
        return config_dir();
    }
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
        return Some(PathBuf::from(xdg).join("sandpad"));
    }
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".local").join("share").join("sandpad"))
}

pub fn global_config_path() -> PathBuf {
    config_dir().map_or_else(|| PathBuf::from(".sandpadrc"), |dir| dir.join("config"))
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".sandpadrc")
}

/// Where buffers persist between sessions unless `--store` says otherwise.
pub fn default_store_path() -> PathBuf {
    data_dir().map_or_else(
        || PathBuf::from(".sandpad-buffers.json"),
        |dir| dir.join("buffers.json"),
    )
}

/// Where the live preview page is written unless `--preview` says otherwise.
pub fn default_preview_path() -> PathBuf {
    data_dir().map_or_else(
        || PathBuf::from(".sandpad-preview.html"),
        |dir| dir.join("preview.html"),
    )
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| {
            // `--title=Two Words` keeps its spaces
            if line.contains('=') {
                vec![line.to_string()]
            } else {
                line.split_whitespace().map(ToOwned::to_owned).collect()
            }
        })
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# sandpad defaults (saved with --save)".to_string());
    if let Some(store) = &flags.store {
        lines.push(format!("--store {}", store.display()));
    }
    if let Some(preview) = &flags.preview {
        lines.push(format!("--preview {}", preview.display()));
    }
    if flags.no_preview {
        lines.push("--no-preview".to_string());
    }
    if let Some(rules) = &flags.rules {
        lines.push(format!("--rules {}", rules.display()));
    }
    if let Some(lang) = &flags.lang {
        lines.push(format!("--lang {lang}"));
    }
    if let Some(title) = &flags.title {
        lines.push(format!("--title={title}"));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the saved-default flags out of a token list, ignoring everything else.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        if token == "--no-preview" {
            flags.no_preview = true;
        } else if let Some((name, value)) = token.split_once('=') {
            apply_option(&mut flags, name, value);
        } else if is_option(token) {
            if let Some(next) = tokens.get(i + 1) {
                apply_option(&mut flags, token, next);
                i += 1;
            }
        }
        i += 1;
    }
    flags
}

fn is_option(token: &str) -> bool {
    matches!(
        token,
        "--store" | "--preview" | "--rules" | "--lang" | "--title"
    )
}

fn apply_option(flags: &mut ConfigFlags, name: &str, value: &str) {
    match name {
        "--store" => flags.store = Some(PathBuf::from(value)),
        "--preview" => flags.preview = Some(PathBuf::from(value)),
        "--rules" => flags.rules = Some(PathBuf::from(value)),
        "--lang" => flags.lang = Some(value.to_string()),
        "--title" => flags.title = Some(value.to_string()),
        _ => {}
    }
}
