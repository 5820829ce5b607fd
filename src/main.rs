//! hclfmt - batch formatter for HCL configuration files

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal};
use std::process::ExitCode;

use anyhow::Context;
use hclfmt::{
    check_usage, parse_args, run_batch, CliArgs, Config, Dispatcher, HclFormatter, Profile,
    Report, RunConfig,
};
use hclfmt::profile::settle;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = parse_args();
    init_logging(args.debug);

    match run(&args) {
        Ok(report) if report.is_clean() => ExitCode::SUCCESS,
        Ok(report) => {
            eprintln!("{} item(s) could not be formatted", report.failed);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr; `RUST_LOG` wins over `--debug`
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

fn run(args: &CliArgs) -> anyhow::Result<Report> {
    // -w with stdin is rejected before anything is read, config included
    check_usage(args)?;

    let config = Config::load(args.config.as_deref())?;
    debug!("configuration: {config:?}");
    let run_config = RunConfig::new(args, &config)?;

    let profile_file = run_config
        .profile_output
        .as_ref()
        .map(|path| {
            File::create(path).with_context(|| format!("creating cpu profile {}", path.display()))
        })
        .transpose()?;
    let mut profile = profile_file.as_ref().map(|_| Profile::default());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut dispatcher = Dispatcher::new(&run_config, HclFormatter, stdin.lock(), stdout.lock());
    let result = run_batch(&run_config, &mut dispatcher, profile.as_mut());

    let written = match (profile_file, profile) {
        (Some(file), Some(profile)) => profile.write_to(BufWriter::new(file)),
        _ => Ok(()),
    };

    settle(result, written)
}
