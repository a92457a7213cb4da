//! Worker pool module for running many transfers with bounded concurrency.
//!
//! # Overview
//!
//! The pool module is organized into three components:
//!
//! - `dispatcher` - The Dispatcher feeding a fixed set of workers over a bounded queue
//! - `job` - The TransferJob unit of work
//! - `summary` - Per-job summaries and the aggregated run report

pub mod dispatcher;
pub mod job;
pub mod summary;

pub use dispatcher::{Dispatcher, PoolConfig};
pub use job::TransferJob;
pub use summary::{RunOutcome, RunReport, Status, Summary};
