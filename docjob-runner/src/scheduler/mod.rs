//! Scheduler layer for the runner
//!
//! Drives many workflows concurrently on top of the single-job runner,
//! bounding how many remote jobs are in flight at once.

pub mod batch;

pub use batch::{BatchOutcome, run_batch};
