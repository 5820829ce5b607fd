//! Command-line interface for hclfmt.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

use crate::error::{Error, Result};

/// CLI arguments parsed from command line
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Files or directories to format; empty means standard input
    pub inputs: Vec<PathBuf>,

    /// Write result back to each source file instead of stdout
    pub write: bool,

    /// Timing profile output path
    pub cpuprofile: Option<PathBuf>,

    /// Additional extensions to pick up while walking directories
    pub extensions: Vec<String>,

    /// Exclude patterns for walked entries (glob patterns)
    pub exclude: Vec<String>,

    /// Continue past failures on explicitly named files
    pub keep_going: bool,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Enable debug output
    pub debug: bool,
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("hclfmt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rewrites HCL files into canonical form")
        .override_usage("hclfmt [OPTIONS] [PATH]...")
        .after_help(
            "With no PATH, reads standard input and writes the result to standard output.\n\
             Directories are walked recursively; hidden files are skipped.",
        )
        .arg(
            Arg::new("inputs")
                .help("Files or directories to format")
                .value_name("PATH")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("write")
                .short('w')
                .long("write")
                .help("Write result to (source) file instead of stdout")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("cpuprofile")
                .long("cpuprofile")
                .help("Write a per-file timing profile to this file")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("ext")
                .short('e')
                .long("ext")
                .help("Additional extension to format when walking directories (repeatable)")
                .value_name("EXT")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("exclude")
                .short('x')
                .long("exclude")
                .help("Skip walked entries matching pattern (repeatable)")
                .value_name("PATTERN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("keep-going")
                .short('k')
                .long("keep-going")
                .help("Report failures on named files and continue instead of stopping")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Config file path (overrides auto-discovery of hclfmt.toml)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
}

/// Parse CLI arguments from command line
#[must_use]
pub fn parse_args() -> CliArgs {
    args_from_matches(&build_cli().get_matches())
}

/// Parse CLI arguments from an iterator (for testing)
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

/// Convert clap `ArgMatches` to `CliArgs`
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        write: matches.get_flag("write"),
        cpuprofile: matches.get_one::<PathBuf>("cpuprofile").cloned(),
        extensions: matches
            .get_many::<String>("ext")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        exclude: matches
            .get_many::<String>("exclude")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        keep_going: matches.get_flag("keep-going"),
        config: matches.get_one::<PathBuf>("config").cloned(),
        debug: matches.get_flag("debug"),
    }
}

/// Reject flag combinations that cannot work, before any input is touched.
pub fn check_usage(args: &CliArgs) -> Result<()> {
    if args.write && args.inputs.is_empty() {
        return Err(Error::Usage("cannot use -w with standard input".to_string()));
    }
    Ok(())
}
