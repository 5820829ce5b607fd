//! hclfmt - batch formatter for HCL configuration files
//!
//! Finds HCL sources (standard input, named files, or recursively walked
//! directories), runs each through a [`Formatter`] and writes the result to
//! standard output or back to the file.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod process;
pub mod profile;
pub mod source;

// Re-export commonly used types
pub use cli::{build_cli, check_usage, parse_args, parse_args_from, CliArgs};
pub use config::{Config, ErrorPolicy, RunConfig};
pub use error::{BoxError, Error, Result};
pub use format::{Formatter, HclFormatter, Identity};
pub use process::{run_batch, Dispatcher, Report};
pub use profile::Profile;
pub use source::{FileFilter, Origin, Source, Sources, WorkItem};
