//! Docjob Runner
//!
//! Drives asynchronous document-processing jobs from submission to a
//! fetched result.
//!
//! Architecture:
//! - Configuration: Polling and concurrency settings from environment or defaults
//! - Repositories: Remote job service and content store behind traits
//! - Services: The submit, await and fetch workflow
//! - Scheduler: Bounded concurrent batches of workflows
//!
//! Time is read through a [`Clock`] so waits can be tested without real
//! sleeping.

pub mod backoff;
pub mod clock;
pub mod config;
pub mod error;
pub mod repository;
pub mod scheduler;
pub mod service;

#[cfg(test)]
mod testing;

pub use backoff::Backoff;
pub use clock::{Clock, ManualClock, TokioClock};
pub use config::RunnerConfig;
pub use error::{Result, RunnerError, SubmissionFailure};
pub use repository::{ContentStore, HttpContentStore, HttpJobService, InMemoryContentStore, JobService};
pub use scheduler::{BatchOutcome, run_batch};
pub use service::{AsyncJobRunner, PollObserver, WaitOptions};
