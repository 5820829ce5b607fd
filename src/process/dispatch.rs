//! Per-item read, format and commit.

use std::fs::{self, File};
use std::io::{Read, Write};

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::format::Formatter;
use crate::source::{Source, WorkItem};

/// Runs one work item through the formatter and commits the result.
///
/// In-place mode overwrites the item's file; otherwise (and always for
/// stdin) the formatted bytes are appended verbatim to the shared output.
/// Nothing is written for an item unless formatting succeeded.
pub struct Dispatcher<F, R, W> {
    formatter: F,
    stdin: R,
    out: W,
    write_in_place: bool,
}

impl<F: Formatter, R: Read, W: Write> Dispatcher<F, R, W> {
    pub fn new(config: &RunConfig, formatter: F, stdin: R, out: W) -> Self {
        Self {
            formatter,
            stdin,
            out,
            write_in_place: config.write_in_place,
        }
    }

    pub fn process(&mut self, item: &WorkItem) -> Result<()> {
        let contents = self.read(item)?;
        let formatted = self
            .formatter
            .format(&contents)
            .map_err(|source| Error::Format {
                identity: item.identity.clone(),
                source,
            })?;
        self.commit(item, &formatted)
    }

    /// Hand back the output stream.
    pub fn into_output(self) -> W {
        self.out
    }

    fn read(&mut self, item: &WorkItem) -> Result<Vec<u8>> {
        let mut contents = Vec::new();
        let result = match &item.source {
            Source::Stdin => self.stdin.read_to_end(&mut contents),
            // the handle is dropped before this arm returns
            Source::Path(path) => {
                File::open(path).and_then(|mut file| file.read_to_end(&mut contents))
            }
        };
        result.map(|_| contents).map_err(|source| Error::Read {
            identity: item.identity.clone(),
            source,
        })
    }

    fn commit(&mut self, item: &WorkItem, formatted: &[u8]) -> Result<()> {
        let result = match item.path() {
            // existing permissions are kept; new files get the platform default
            Some(path) if self.write_in_place => fs::write(path, formatted),
            _ => self
                .out
                .write_all(formatted)
                .and_then(|()| self.out.flush()),
        };
        result.map_err(|source| Error::Write {
            identity: item.identity.clone(),
            source,
        })
    }
}
