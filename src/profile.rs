//! Per-item timing profile written by `--cpuprofile`.
//!
//! One tab-separated row per item: identity, outcome (`ok` or the failing
//! stage), elapsed microseconds.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Context;
use tracing::error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub identity: String,
    pub outcome: &'static str,
    pub elapsed: Duration,
}

#[derive(Debug, Default, Clone)]
pub struct Profile {
    samples: Vec<Sample>,
}

impl Profile {
    pub fn record(&mut self, identity: &str, outcome: &'static str, elapsed: Duration) {
        self.samples.push(Sample {
            identity: identity.to_string(),
            outcome,
            elapsed,
        });
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "identity\toutcome\tmicros")?;
        for sample in &self.samples {
            writeln!(
                out,
                "{}\t{}\t{}",
                sample.identity,
                sample.outcome,
                sample.elapsed.as_micros()
            )?;
        }
        out.flush()
    }
}

/// Combine the batch outcome with the result of writing its profile.
///
/// A batch error wins; a profile write failing behind it is only logged.
pub fn settle<T, E>(batch: Result<T, E>, written: io::Result<()>) -> anyhow::Result<T>
where
    E: Into<anyhow::Error>,
{
    match (batch, written) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) => Err(err).context("writing cpu profile"),
        (Err(err), Ok(())) => Err(err.into()),
        (Err(err), Err(write_err)) => {
            error!("writing cpu profile: {write_err}");
            Err(err.into())
        }
    }
}
