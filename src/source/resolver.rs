//! Resolve path arguments into work items.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use super::FileFilter;
use crate::error::Error;

/// Display name used for standard input
pub const STDIN_IDENTITY: &str = "<standard input>";

/// How an item entered the batch. The error policy depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Stdin,
    /// Named directly on the command line
    Explicit,
    /// Found while walking a directory argument
    Walked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    Path(PathBuf),
}

/// One unit of formatting work. Consumed exactly once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub identity: String,
    pub source: Source,
    pub origin: Origin,
}

impl WorkItem {
    #[must_use]
    pub fn stdin() -> Self {
        Self {
            identity: STDIN_IDENTITY.to_string(),
            source: Source::Stdin,
            origin: Origin::Stdin,
        }
    }

    #[must_use]
    pub fn file(path: PathBuf, origin: Origin) -> Self {
        Self {
            identity: path.display().to_string(),
            source: Source::Path(path),
            origin,
        }
    }

    #[must_use]
    pub fn is_stdin(&self) -> bool {
        matches!(self.source, Source::Stdin)
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            Source::Stdin => None,
            Source::Path(path) => Some(path),
        }
    }
}

/// A discovery failure, tagged with where it happened.
#[derive(Debug)]
pub struct Unresolved {
    pub origin: Origin,
    /// Display name of the path that failed
    pub identity: String,
    pub error: Error,
}

impl Unresolved {
    fn discovery(origin: Origin, path: PathBuf, source: io::Error) -> Self {
        Self {
            origin,
            identity: path.display().to_string(),
            error: Error::Discovery { path, source },
        }
    }
}

struct Walk<'a> {
    root: PathBuf,
    entries: Box<dyn Iterator<Item = walkdir::Result<DirEntry>> + 'a>,
}

/// Lazy, single-pass sequence of work items.
///
/// Arguments are stat'ed one at a time as the sequence is consumed, so an
/// argument is never looked at before everything ahead of it was processed.
pub struct Sources<'a> {
    filter: &'a FileFilter,
    args: std::slice::Iter<'a, PathBuf>,
    stdin_pending: bool,
    walk: Option<Walk<'a>>,
}

impl<'a> Sources<'a> {
    /// An empty argument list stands for standard input.
    #[must_use]
    pub fn new(args: &'a [PathBuf], filter: &'a FileFilter) -> Self {
        Self {
            filter,
            args: args.iter(),
            stdin_pending: args.is_empty(),
            walk: None,
        }
    }

    /// Excluded directories are pruned, so nothing below them is read.
    fn start_walk(&mut self, root: &Path) {
        debug!("walking {}", root.display());
        let filter = self.filter;
        let prune_root = root.to_path_buf();
        let entries = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !filter.prunes(entry, &prune_root));
        self.walk = Some(Walk {
            root: root.to_path_buf(),
            entries: Box::new(entries),
        });
    }
}

impl Iterator for Sources<'_> {
    type Item = Result<WorkItem, Unresolved>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stdin_pending {
            self.stdin_pending = false;
            return Some(Ok(WorkItem::stdin()));
        }

        loop {
            if let Some(walk) = self.walk.as_mut() {
                match walk.entries.next() {
                    Some(Ok(entry)) => {
                        if self.filter.is_eligible(&entry, &walk.root) {
                            return Some(Ok(WorkItem::file(entry.into_path(), Origin::Walked)));
                        }
                        continue;
                    }
                    Some(Err(err)) => {
                        let path = err
                            .path()
                            .map_or_else(|| walk.root.clone(), Path::to_path_buf);
                        // symlink loops carry no io error of their own
                        let message = err.to_string();
                        let source = err
                            .into_io_error()
                            .unwrap_or_else(|| io::Error::other(message));
                        return Some(Err(Unresolved::discovery(Origin::Walked, path, source)));
                    }
                    None => self.walk = None,
                }
            }

            let arg = self.args.next()?;
            match fs::metadata(arg) {
                Err(source) => {
                    return Some(Err(Unresolved::discovery(
                        Origin::Explicit,
                        arg.clone(),
                        source,
                    )));
                }
                Ok(meta) if meta.is_dir() => self.start_walk(arg),
                Ok(_) => return Some(Ok(WorkItem::file(arg.clone(), Origin::Explicit))),
            }
        }
    }
}
