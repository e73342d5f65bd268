//! File watching for the `watch` command.
//!
//! Uses notify crate for cross-platform file system events.
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::error::Result;
use crate::language::LanguageKind;

#[derive(Debug)]
struct Target {
    kind: LanguageKind,
    path: PathBuf,
    name: Option<OsString>,
    root: PathBuf,
}

/// Watches the source file behind each buffer and reports, after a quiet
/// period, which buffers need reloading.
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    targets: Vec<Target>,
    debounce: Duration,
    pending: BTreeSet<usize>,
    pending_since: Option<Instant>,
}

impl SourceWatcher {
    /// Watch each `(kind, path)` pair.
    ///
    /// # Errors
    /// Returns an error if the file watcher cannot be created or a path cannot be watched.
    pub fn new(files: &[(LanguageKind, PathBuf)], debounce: Duration) -> Result<Self> {
        let targets: Vec<Target> = files
            .iter()
            .map(|(kind, path)| {
                // Canonicalize so event paths from the OS (which are always
                // absolute and canonical) match our stored paths.
                let path = path.canonicalize().unwrap_or_else(|_| path.clone());
                Target {
                    kind: *kind,
                    name: path.file_name().map(std::ffi::OsStr::to_os_string),
                    root: watch_root_for(&path),
                    path,
                }
            })
            .collect();

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        let roots: BTreeSet<&PathBuf> = targets.iter().map(|t| &t.root).collect();
        for root in roots {
            watcher.watch(root, RecursiveMode::NonRecursive)?;
        }

        Ok(Self {
            _watcher: watcher,
            rx,
            targets,
            debounce,
            pending: BTreeSet::new(),
            pending_since: None,
        })
    }

    /// Buffers whose files changed, once changes have settled. Empty while
    /// nothing changed or the debounce period is still running.
    pub fn take_changes(&mut self) -> Vec<(LanguageKind, PathBuf)> {
        let mut saw_relevant_event = false;
        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(ev) => {
                    let hits = self.relevant_targets(&ev);
                    if hits.is_empty() {
                        debug!(kind = ?ev.kind, paths = ?ev.paths, "irrelevant watch event");
                    }
                    saw_relevant_event |= !hits.is_empty();
                    self.pending.extend(hits);
                }
                Err(err) => warn!(%err, "watch error"),
            }
        }

        if saw_relevant_event {
            self.pending_since = Some(Instant::now());
        }

        let Some(pending_since) = self.pending_since else {
            return Vec::new();
        };
        if pending_since.elapsed() < self.debounce {
            return Vec::new();
        }
        self.pending_since = None;
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(|i| (self.targets[i].kind, self.targets[i].path.clone()))
            .collect()
    }

    fn relevant_targets(&self, event: &Event) -> Vec<usize> {
        self.targets
            .iter()
            .enumerate()
            .filter(|(_, target)| {
                event.paths.iter().any(|path| {
                    path == &target.root
                        || path == &target.path
                        || target
                            .name
                            .as_ref()
                            .is_some_and(|name| path.file_name().is_some_and(|f| f == name))
                })
            })
            .map(|(i, _)| i)
            .collect()
    }
}

fn watch_root_for(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::EventKind;
    use tempfile::tempdir;

    fn event(paths: Vec<PathBuf>) -> Event {
        Event {
            kind: EventKind::Any,
            paths,
            attrs: notify::event::EventAttributes::new(),
        }
    }

    #[test]
    fn test_file_event_selects_matching_buffer() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let css = canonical_dir.join("site.css");
        let js = canonical_dir.join("app.js");
        std::fs::write(&css, "a{}").expect("write");
        std::fs::write(&js, "f()").expect("write");
        let watcher = SourceWatcher::new(
            &[(LanguageKind::Style, css.clone()), (LanguageKind::Script, js)],
            Duration::from_millis(10),
        )
        .expect("watcher");

        assert_eq!(watcher.relevant_targets(&event(vec![css])), vec![0]);
    }

    #[test]
    fn test_directory_event_is_relevant_for_every_file_in_it() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let html = canonical_dir.join("index.html");
        let css = canonical_dir.join("site.css");
        std::fs::write(&html, "<p></p>").expect("write");
        std::fs::write(&css, "p{}").expect("write");
        let watcher = SourceWatcher::new(
            &[(LanguageKind::Markup, html), (LanguageKind::Style, css)],
            Duration::from_millis(10),
        )
        .expect("watcher");

        assert_eq!(
            watcher.relevant_targets(&event(vec![canonical_dir])),
            vec![0, 1]
        );
    }

    #[test]
    fn test_watch_root_for_relative_file_is_dot() {
        let root = watch_root_for(Path::new("style.css"));
        assert_eq!(root, PathBuf::from("."));
    }

    #[test]
    fn test_real_file_modification_detected() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let path = canonical_dir.join("app.js");
        std::fs::write(&path, "original()").expect("write");

        let mut watcher = SourceWatcher::new(
            &[(LanguageKind::Script, path.clone())],
            Duration::from_millis(50),
        )
        .expect("watcher");

        // Give the backend time to register the watch
        std::thread::sleep(Duration::from_millis(500));

        std::fs::write(&path, "modified()").expect("write");

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut changed = Vec::new();
        while Instant::now() < deadline {
            changed = watcher.take_changes();
            if !changed.is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }

        assert_eq!(changed, vec![(LanguageKind::Script, path)]);
    }
}
