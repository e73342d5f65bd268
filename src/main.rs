//! Sandpad - an HTML/CSS/JS snippet sandbox for the terminal.
//!
//! # Usage
//!
//! ```bash
//! sandpad load index.html
//! sandpad key enter --as style --at 6
//! sandpad format app.js --write
//! sandpad export -o index.html
//! sandpad watch --markup body.html --style site.css
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use sandpad::config::{
    ConfigFlags, clear_config_flags, default_preview_path, default_store_path,
    global_config_path, load_config_flags, local_override_path, parse_flag_tokens,
    save_config_flags,
};
use sandpad::document::{EXPORT_FILE_NAME, ExportOptions};
use sandpad::editor::{EditorRules, Key, Selection, handle_key, reformat};
use sandpad::language::LanguageKind;
use sandpad::watcher::SourceWatcher;
use sandpad::workspace::{
    HtmlFileRenderer, JsonFileStore, NullRenderer, PreviewRenderer, Workspace,
};

type SessionWorkspace = Workspace<JsonFileStore, Box<dyn PreviewRenderer>>;

/// HTML/CSS/JS snippet sandbox with structural auto-indentation
#[derive(Parser, Debug)]
#[command(name = "sandpad", version, about, long_about = None)]
struct Cli {
    /// Buffer store file (JSON)
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Preview page rewritten after every buffer change
    #[arg(long, global = true, value_name = "PATH")]
    preview: Option<PathBuf>,

    /// Do not write a preview page
    #[arg(long, global = true)]
    no_preview: bool,

    /// JSON file overriding indentation and abbreviation tables
    #[arg(long, global = true, value_name = "PATH")]
    rules: Option<PathBuf>,

    /// `lang` attribute of exported pages
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Title of exported pages
    #[arg(long, global = true)]
    title: Option<String>,

    /// Save current command-line flags as defaults in .sandpadrc
    #[arg(long, global = true)]
    save: bool,

    /// Clear saved defaults in .sandpadrc
    #[arg(long, global = true)]
    clear: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Re-indent a file (or stdin) and print the result
    Format {
        /// File to format; reads stdin when omitted
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Rewrite the file in place
        #[arg(short, long, requires = "file")]
        write: bool,
    },

    /// Press Enter or Tab at an offset and print the resulting edit as JSON
    Key {
        #[arg(value_enum)]
        key: Key,

        /// Selection start (byte offset)
        #[arg(long)]
        at: usize,

        /// Selection end (byte offset); defaults to --at
        #[arg(long)]
        to: Option<usize>,

        /// Buffer language; guessed from the file extension when omitted
        #[arg(long = "as", value_enum)]
        kind: Option<LanguageKind>,

        /// Edit this file instead of the stored buffer
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Rewrite the file with the edit applied
        #[arg(short, long, requires = "file")]
        write: bool,
    },

    /// Load a single-language file into its buffer
    Load {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Buffer language; guessed from the file extension when omitted
        #[arg(long = "as", value_enum)]
        kind: Option<LanguageKind>,
    },

    /// Split a full page into the three buffers
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Write the buffers as one reformatted page
    Export {
        #[arg(short, long, value_name = "PATH", default_value = EXPORT_FILE_NAME)]
        output: PathBuf,

        /// Print the page instead of writing it
        #[arg(long)]
        stdout: bool,
    },

    /// Print one buffer, or all three as JSON
    Show {
        #[arg(value_enum)]
        kind: Option<LanguageKind>,

        /// Print only this zero-based line of the buffer
        #[arg(long, requires = "kind")]
        line: Option<usize>,
    },

    /// Reload buffers from files as they change
    Watch {
        #[arg(long, value_name = "FILE")]
        markup: Option<PathBuf>,

        #[arg(long, value_name = "FILE")]
        style: Option<PathBuf>,

        #[arg(long, value_name = "FILE")]
        script: Option<PathBuf>,
    },
}

fn kind_for(kind: Option<LanguageKind>, file: Option<&Path>) -> Result<LanguageKind> {
    kind.or_else(|| file.and_then(LanguageKind::from_extension))
        .context("cannot tell the buffer language; pass --as markup|style|script")
}

fn open_workspace(flags: &ConfigFlags, rules: EditorRules) -> Result<SessionWorkspace> {
    let store_path = flags.store.clone().unwrap_or_else(default_store_path);
    let store = JsonFileStore::open(&store_path)
        .with_context(|| format!("Failed to open buffer store {}", store_path.display()))?;
    debug!(store = %store.path().display(), "opened buffer store");
    let renderer: Box<dyn PreviewRenderer> = if flags.no_preview {
        Box::new(NullRenderer)
    } else {
        let renderer =
            HtmlFileRenderer::new(flags.preview.clone().unwrap_or_else(default_preview_path));
        debug!(preview = %renderer.path().display(), "writing preview page");
        Box::new(renderer)
    };
    Workspace::open(store, renderer, rules).context("Failed to open workspace")
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn print_sources(workspace: &SessionWorkspace) -> Result<()> {
    let sources = workspace.sources();
    if sources.is_empty() {
        eprintln!("all buffers are empty");
    }
    println!("{}", serde_json::to_string_pretty(&sources)?);
    Ok(())
}

fn run_watch(workspace: &mut SessionWorkspace, files: Vec<(LanguageKind, PathBuf)>) -> Result<()> {
    if files.is_empty() {
        anyhow::bail!("nothing to watch; pass --markup, --style or --script");
    }
    for (kind, path) in &files {
        workspace.load_file(*kind, path)?;
    }
    let mut watcher =
        SourceWatcher::new(&files, Duration::from_millis(200)).context("Failed to watch files")?;
    eprintln!("watching {} file(s), Ctrl+C to stop", files.len());
    loop {
        for (kind, path) in watcher.take_changes() {
            if workspace.load_file(kind, &path)? {
                eprintln!("reloaded {kind} from {}", path.display());
            }
        }
        std::thread::sleep(Duration::from_millis(250));
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let rules = match &effective.rules {
        Some(path) => EditorRules::load(path)
            .with_context(|| format!("Failed to load rules {}", path.display()))?,
        None => EditorRules::default(),
    };
    let defaults = ExportOptions::default();
    let export_options = ExportOptions {
        lang: effective.lang.clone().unwrap_or(defaults.lang),
        title: effective.title.clone().unwrap_or(defaults.title),
    };

    let Some(command) = cli.command else {
        if !(cli.save || cli.clear) {
            print_sources(&open_workspace(&effective, rules)?)?;
        }
        return Ok(());
    };

    match command {
        Command::Format { file, write } => {
            let input = read_input(file.as_deref())?;
            let output = reformat(&input, &rules);
            match file {
                Some(path) if write => std::fs::write(&path, output)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                _ => println!("{output}"),
            }
        }
        Command::Key {
            key,
            at,
            to,
            kind,
            file,
            write,
        } => {
            let kind = kind_for(kind, file.as_deref())?;
            let selection = Selection::new(at, to.unwrap_or(at));
            let edit = if let Some(path) = &file {
                let text = read_input(Some(path))?;
                let edit = handle_key(key, &text, selection, kind, &rules);
                if write {
                    std::fs::write(path, &edit.text)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                }
                edit
            } else {
                open_workspace(&effective, rules)?.handle_key(kind, key, selection)?
            };
            println!("{}", serde_json::to_string_pretty(&edit)?);
        }
        Command::Load { file, kind } => {
            let kind = kind_for(kind, Some(&file))?;
            let mut workspace = open_workspace(&effective, rules)?;
            if !workspace.load_file(kind, &file)? {
                eprintln!("[warn] could not read {}", file.display());
            }
        }
        Command::Import { file } => {
            let mut workspace = open_workspace(&effective, rules)?;
            if !workspace.load_document(&file)? {
                eprintln!("[warn] could not read {}", file.display());
            }
        }
        Command::Export { output, stdout } => {
            let workspace = open_workspace(&effective, rules)?;
            if stdout {
                println!("{}", workspace.export(&export_options));
            } else {
                workspace
                    .export_to(&output, &export_options)
                    .with_context(|| format!("Failed to export {}", output.display()))?;
            }
        }
        Command::Show { kind, line } => {
            let workspace = open_workspace(&effective, rules)?;
            match (kind, line) {
                (Some(kind), Some(line)) => {
                    let buffer = workspace.buffer(kind);
                    let text = buffer.line_at(line).with_context(|| {
                        format!(
                            "line {line} is out of range; the {kind} buffer has {} line(s)",
                            buffer.line_count()
                        )
                    })?;
                    println!("{text}");
                }
                (Some(kind), None) => println!("{}", workspace.buffer(kind).text()),
                (None, _) => print_sources(&workspace)?,
            }
        }
        Command::Watch {
            markup,
            style,
            script,
        } => {
            let files = [
                (LanguageKind::Markup, markup),
                (LanguageKind::Style, style),
                (LanguageKind::Script, script),
            ]
            .into_iter()
            .filter_map(|(kind, path)| path.map(|p| (kind, p)))
            .collect();
            let mut workspace = open_workspace(&effective, rules)?;
            run_watch(&mut workspace, files)?;
        }
    }

    Ok(())
}
