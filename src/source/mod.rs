//! Input discovery.
//!
//! Turns the command-line path arguments into a lazy stream of [`WorkItem`]s:
//! - no arguments: a single item for standard input
//! - a regular file: one item, always, whatever its name
//! - a directory: one item per entry accepted by the [`FileFilter`],
//!   found by a depth-first walk in file-name order

pub mod filter;
pub mod resolver;

pub use filter::FileFilter;
pub use resolver::{Origin, Source, Sources, Unresolved, WorkItem, STDIN_IDENTITY};
