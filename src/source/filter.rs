//! Eligibility rules for entries found while walking a directory.

use std::path::{Component, Path};

use glob::Pattern;
use walkdir::DirEntry;

/// Extension used when nothing else is configured
pub const DEFAULT_EXTENSION: &str = "hcl";

/// Decides whether a walked entry should be formatted.
///
/// An entry is eligible when it is a regular file, its name does not start
/// with `.`, its name ends with one of the target extensions, and it matches
/// none of the exclude patterns.
#[derive(Debug, Clone)]
pub struct FileFilter {
    /// Name suffixes, each including the leading dot (".hcl")
    suffixes: Vec<String>,
    exclude: Vec<Pattern>,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new(&[DEFAULT_EXTENSION.to_string()], Vec::new())
    }
}

impl FileFilter {
    /// Build a filter from bare extensions (with or without a leading dot).
    #[must_use]
    pub fn new(extensions: &[String], exclude: Vec<Pattern>) -> Self {
        let suffixes = extensions
            .iter()
            .map(|ext| format!(".{}", ext.strip_prefix('.').unwrap_or(ext)))
            .collect();
        Self { suffixes, exclude }
    }

    /// Check a walked entry. `root` is the directory the walk started from;
    /// exclude patterns only see the part of the path below it.
    #[must_use]
    pub fn is_eligible(&self, entry: &DirEntry, root: &Path) -> bool {
        if !entry.file_type().is_file() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        if !self.matches_name(&name) {
            return false;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        !self.is_excluded(relative)
    }

    /// `true` for a directory below `root` that matches an exclude pattern.
    /// The walk never descends into such a directory.
    #[must_use]
    pub fn prunes(&self, entry: &DirEntry, root: &Path) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        self.is_excluded(relative)
    }

    /// Name-only part of the rule: not hidden and carrying a target suffix.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        !name.starts_with('.') && self.suffixes.iter().any(|suffix| name.ends_with(suffix))
    }

    /// Check a path against the exclude patterns: the whole path, the file
    /// name, then each normal component.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.exclude.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();
        self.exclude.iter().any(|pattern| {
            pattern.matches(&path_str)
                || path.components().any(|component| match component {
                    Component::Normal(c) => pattern.matches(&c.to_string_lossy()),
                    _ => false,
                })
        })
    }
}
