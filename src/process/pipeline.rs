//! Batch driver
//!
//! Consumes the work item stream in order and applies the error policy:
//! - stdin is always fail-fast
//! - explicitly named files follow the run's explicit policy (fail-fast
//!   unless `keep_going` is set)
//! - entries found by walking a directory are always best-effort: the error is
//!   logged and the walk carries on
//!
//! Items are processed strictly one after another; the next argument is not
//! even stat'ed until the current item has been committed.

use std::io::{Read, Write};
use std::time::Instant;

use tracing::{debug, error};

use super::Dispatcher;
use crate::config::{ErrorPolicy, RunConfig};
use crate::error::Result;
use crate::format::Formatter;
use crate::profile::Profile;
use crate::source::{Origin, Sources, Unresolved};

/// Outcome of a batch that ran to completion
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub formatted: usize,
    /// Items that failed under the best-effort policy
    pub failed: usize,
}

impl Report {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Policy for an item given where it came from
#[must_use]
pub fn policy_for(config: &RunConfig, origin: Origin) -> ErrorPolicy {
    match origin {
        Origin::Stdin => ErrorPolicy::FailFast,
        Origin::Explicit => config.explicit_policy,
        Origin::Walked => ErrorPolicy::BestEffort,
    }
}

/// Run every work item of `config` through `dispatcher`.
///
/// Returns the first error hit under the fail-fast policy; items after it are
/// never attempted. When a profile is given, every attempted item is recorded,
/// including the one that aborted the batch.
pub fn run_batch<F, R, W>(
    config: &RunConfig,
    dispatcher: &mut Dispatcher<F, R, W>,
    mut profile: Option<&mut Profile>,
) -> Result<Report>
where
    F: Formatter,
    R: Read,
    W: Write,
{
    let mut report = Report::default();

    for next in Sources::new(&config.inputs, &config.filter) {
        let started = Instant::now();
        let (identity, origin, outcome) = match next {
            Ok(item) => {
                debug!("formatting {}", item.identity);
                let outcome = dispatcher.process(&item);
                (item.identity, item.origin, outcome)
            }
            Err(Unresolved {
                origin,
                identity,
                error,
            }) => (identity, origin, Err(error)),
        };

        if let Some(profile) = profile.as_deref_mut() {
            let label = outcome.as_ref().map_or_else(|e| e.kind(), |_| "ok");
            profile.record(&identity, label, started.elapsed());
        }

        match outcome {
            Ok(()) => report.formatted += 1,
            Err(err) => match policy_for(config, origin) {
                ErrorPolicy::FailFast => return Err(err),
                ErrorPolicy::BestEffort => {
                    error!("{:#}", anyhow::Error::from(err));
                    report.failed += 1;
                }
            },
        }
    }

    debug!(
        formatted = report.formatted,
        failed = report.failed,
        "batch finished"
    );
    Ok(report)
}
