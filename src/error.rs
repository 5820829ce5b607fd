//! Error types and result aliases for hclfmt.
//!
//! Every failure that can happen while resolving, reading, formatting or
//! writing a single work item is a variant of [`Error`]. Each variant names
//! the path (or the `<standard input>` sentinel) it concerns and keeps the
//! underlying cause as its source; render with `{:#}` through `anyhow` to get
//! the whole chain on one line.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by formatter backends.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid flag combination, rejected before any input is touched.
    #[error("{0}")]
    Usage(String),

    /// A named path (or a walked entry) could not be stat'ed.
    #[error("{}", path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("reading {identity}")]
    Read {
        identity: String,
        #[source]
        source: io::Error,
    },

    /// The formatter backend rejected the input.
    #[error("formatting {identity}")]
    Format {
        identity: String,
        #[source]
        source: BoxError,
    },

    #[error("writing {identity}")]
    Write {
        identity: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Short label for the failing stage, used in diagnostics and profiles.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Usage(_) => "usage",
            Error::Discovery { .. } => "discovery",
            Error::Read { .. } => "read",
            Error::Format { .. } => "format",
            Error::Write { .. } => "write",
            Error::Config(_) => "config",
        }
    }
}
