//! File processing pipeline.
//!
//! - [`dispatch`]: reads one work item, formats it and commits the result
//! - [`pipeline`]: drives the whole batch and applies the error policy
//!
//! The main entry point is [`run_batch`].

pub mod dispatch;
pub mod pipeline;

pub use dispatch::Dispatcher;
pub use pipeline::{policy_for, run_batch, Report};
